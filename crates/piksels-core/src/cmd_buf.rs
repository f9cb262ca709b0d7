use piksels_backend::Backend;

/// A command buffer. Released when dropped, whether it was submitted or not.
#[derive(Debug)]
pub struct CmdBuf<B>
where
    B: Backend,
{
    raw: B::CmdBuf,
}

impl<B> Drop for CmdBuf<B>
where
    B: Backend,
{
    fn drop(&mut self) {
        B::drop_cmd_buf(&self.raw);
    }
}

impl<B> CmdBuf<B>
where
    B: Backend,
{
    pub(crate) fn from_raw(raw: B::CmdBuf) -> Self {
        Self { raw }
    }

    #[must_use]
    pub fn raw(&self) -> &B::CmdBuf {
        &self.raw
    }
}
