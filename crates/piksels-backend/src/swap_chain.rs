/// How rendered images are handed to the presentation engine.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SwapChainMode {
    /// Images are transferred right away.
    Immediate,

    /// Images queue up and one is taken at every vertical blank.
    #[default]
    Fifo,

    /// Like [`SwapChainMode::Fifo`], but a full queue has its oldest image
    /// replaced.
    Mailbox,
}
