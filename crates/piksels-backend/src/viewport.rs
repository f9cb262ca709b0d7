#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Viewport {
    /// Covers the whole of the bound render targets.
    #[default]
    Whole,

    Specific {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}
