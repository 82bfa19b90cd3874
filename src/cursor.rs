use crate::*;
use glam::Vec2;
use log::warn;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CursorState {
    /// No frame has been delivered yet.
    Uninitialized,
    /// A chunk is resident and the cursor points at one of its frames.
    Positioned,
    /// The next dump was missing, empty or malformed. Terminal.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallView {
    /// Ball position observed in this frame.
    pub sample: Option<Vec2>,
    /// Next observation later in the same chunk. Only looked up for frames
    /// that carry their own sample.
    pub next_sample: Option<BallSample>,
    /// The observed or interpolated position to display for this frame.
    pub position: Option<Vec2>,
}

impl BallView {
    pub fn is_interpolated(&self) -> bool {
        self.sample.is_none() && self.position.is_some()
    }
}

/// Everything a consumer needs to render the frame the cursor points at.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub logical_position: usize,
    pub dump_index: usize,
    pub cameras: &'a CameraTable,
    pub frame: &'a Frame,
    pub ball: BallView,
}

/// Pull-based, single pass cursor over every frame of a session, crossing
/// dump boundaries transparently.
pub struct FrameCursor<S = DumpDirectory> {
    sequencer: DumpSequencer<S>,
    interpolator: BallInterpolator,
    state: CursorState,
    frame_index: usize,
    frames_delivered: usize,
}

impl FrameCursor<DumpDirectory> {
    pub fn open<P: Into<PathBuf>>(dumps_directory: P) -> Self {
        Self::new(DumpDirectory::new(dumps_directory))
    }

    pub fn from_config(config: &ReplayConfig) -> Self {
        Self::new(config.dump_directory())
    }
}

impl<S: DumpSource> FrameCursor<S> {
    pub fn new(source: S) -> Self {
        Self {
            sequencer: DumpSequencer::new(source),
            interpolator: BallInterpolator::new(),
            state: CursorState::Uninitialized,
            frame_index: 0,
            frames_delivered: 0,
        }
    }

    /// Move to the next frame of the session, loading the next dump when the
    /// resident one is used up. Returns `Ok(false)` once the session is over;
    /// every later call also returns `Ok(false)`.
    pub fn advance(&mut self) -> ReplayResult<bool> {
        match self.state {
            CursorState::Exhausted => return Ok(false),
            CursorState::Uninitialized => return self.enter_next_chunk(),
            CursorState::Positioned => {}
        }

        self.frame_index += 1;
        let chunk_len = self.sequencer.chunk().map(DumpChunk::len).unwrap_or(0);
        if self.frame_index >= chunk_len {
            return self.enter_next_chunk();
        }
        self.frames_delivered += 1;
        Ok(true)
    }

    fn enter_next_chunk(&mut self) -> ReplayResult<bool> {
        let loaded = match self.sequencer.load_next() {
            Ok(loaded) => loaded,
            Err(e) => {
                self.state = CursorState::Exhausted;
                return Err(e);
            }
        };
        if !loaded {
            self.state = CursorState::Exhausted;
            return Ok(false);
        }

        self.frame_index = 0;
        if self.sequencer.chunk().map_or(true, DumpChunk::is_empty) {
            warn!(
                "Dump {} has no frames, ending session",
                self.sequencer.next_dump_index() - 1
            );
            self.state = CursorState::Exhausted;
            return Ok(false);
        }
        self.state = CursorState::Positioned;
        self.frames_delivered += 1;
        Ok(true)
    }

    /// The frame the cursor points at. Fails before the first successful
    /// [`advance`](Self::advance) and after the session is exhausted.
    pub fn current(&mut self) -> ReplayResult<FrameView<'_>> {
        match self.state {
            CursorState::Uninitialized => {
                return ReplayError::new_result(ReplayErrorVariant::CursorNotPositioned)
            }
            CursorState::Exhausted => {
                return ReplayError::new_result(ReplayErrorVariant::CursorExhausted)
            }
            CursorState::Positioned => {}
        }

        // Positioned always has a non-empty resident chunk and an in-range
        // frame index.
        let chunk = self
            .sequencer
            .chunk()
            .expect("positioned cursor has a resident chunk");
        let frame = &chunk.frames[self.frame_index];

        let logical_position = self.frames_delivered - 1;
        let sample = frame.ball_sample();
        let next_sample =
            sample.and_then(|_| next_ball_sample(chunk, self.frame_index, logical_position));
        let position = self
            .interpolator
            .ball_at(logical_position, sample, next_sample)?;

        Ok(FrameView {
            logical_position,
            dump_index: chunk.index,
            cameras: &chunk.cameras,
            frame,
            ball: BallView {
                sample,
                next_sample,
                position,
            },
        })
    }

    /// [`advance`](Self::advance) followed by [`current`](Self::current).
    pub fn next_frame(&mut self) -> ReplayResult<Option<FrameView<'_>>> {
        if self.advance()? {
            self.current().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Point back at the first frame of the resident chunk and treat it as
    /// dump 0, so the next dump boundary loads dump 1. The resident chunk is
    /// kept as is, and logical positions keep counting up from where they
    /// were.
    pub fn reset(&mut self) {
        self.frame_index = 0;
        self.sequencer.rewind();
        let has_frames = self.sequencer.chunk().map_or(false, |c| !c.is_empty());
        self.state = if has_frames && self.frames_delivered > 0 {
            CursorState::Positioned
        } else {
            CursorState::Uninitialized
        };
    }

    /// Drive the cursor to the end of the session, handing every frame to
    /// `handler`. Returns the number of frames handled.
    pub fn process<H: FrameHandler>(&mut self, handler: &mut H) -> ReplayResult<usize> {
        let mut handled = 0;
        while self.advance()? {
            let view = self.current()?;
            handled += 1;
            if handler.handle_frame(&view)? == FrameControl::Stop {
                break;
            }
        }
        Ok(handled)
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    /// Logical position of the most recently delivered frame.
    pub fn logical_position(&self) -> Option<usize> {
        self.frames_delivered.checked_sub(1)
    }

    pub fn sequencer(&self) -> &DumpSequencer<S> {
        &self.sequencer
    }

    pub fn interpolator(&self) -> &BallInterpolator {
        &self.interpolator
    }
}

/// The next frame after `frame_index` in `chunk` that carries a ball
/// observation. Does not look past the end of the chunk.
fn next_ball_sample(
    chunk: &DumpChunk,
    frame_index: usize,
    logical_position: usize,
) -> Option<BallSample> {
    chunk.frames[frame_index + 1..]
        .iter()
        .enumerate()
        .find_map(|(offset, frame)| {
            frame
                .ball_sample()
                .map(|position| BallSample::new(logical_position + offset + 1, position))
        })
}
