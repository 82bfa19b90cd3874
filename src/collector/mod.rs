pub mod session_summary;

pub use session_summary::*;

use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

/// Receives every frame of a session from [`FrameCursor::process`].
pub trait FrameHandler {
    fn handle_frame(&mut self, view: &FrameView) -> ReplayResult<FrameControl>;

    fn process_session<S: DumpSource>(
        mut self,
        cursor: &mut FrameCursor<S>,
    ) -> ReplayResult<Self>
    where
        Self: Sized,
    {
        cursor.process(&mut self)?;
        Ok(self)
    }
}

impl<G> FrameHandler for G
where
    G: FnMut(&FrameView) -> ReplayResult<FrameControl>,
{
    fn handle_frame(&mut self, view: &FrameView) -> ReplayResult<FrameControl> {
        self(view)
    }
}
