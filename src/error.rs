use std::backtrace::Backtrace;
use std::path::PathBuf;
use thiserror::Error;

/// [`ReplayErrorVariant`] enumerates the specific failures that can occur
/// while loading dump files and iterating over a recorded session. A missing
/// dump file is deliberately absent from this list: it is the normal end of
/// a session and is reported as `false`/`None` rather than as an error.
#[derive(Error, Debug, Clone)]
pub enum ReplayErrorVariant {
    #[error("current() called before the cursor was advanced onto a frame")]
    CursorNotPositioned,

    #[error("current() called after the cursor reached the end of the session")]
    CursorExhausted,

    #[error("Could not read dump {path:?}: {message}")]
    DumpIo { path: PathBuf, message: String },

    #[error("Malformed dump {dump:}: {message}")]
    MalformedDump { dump: String, message: String },

    #[error("Frame {frame_key} of dump {dump:} has a ball position with {len} components")]
    ShortBallPosition {
        dump: String,
        frame_key: i64,
        len: usize,
    },

    #[error("Camera {camera_id} of dump {dump:} has {len} components")]
    ShortCameraPosition {
        dump: String,
        camera_id: usize,
        len: usize,
    },

    #[error(
        "Player {player_id} in frame {frame_key} of dump {dump:} uses camera {camera_id}, but only {camera_count} cameras exist"
    )]
    UnknownCameraId {
        dump: String,
        frame_key: i64,
        player_id: i32,
        camera_id: usize,
        camera_count: usize,
    },

    #[error("Interpolation order was incorrect start {start:} end {end:}")]
    InterpolationOrder { start: usize, end: usize },

    #[error("Could not read config {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}

/// [`ReplayError`] pairs a [`ReplayErrorVariant`] with the backtrace captured
/// where it was raised.
#[derive(Debug)]
pub struct ReplayError {
    pub backtrace: Backtrace,
    pub variant: ReplayErrorVariant,
}

impl ReplayError {
    pub fn new(variant: ReplayErrorVariant) -> Self {
        Self {
            backtrace: Backtrace::capture(),
            variant,
        }
    }

    pub fn new_result<T>(variant: ReplayErrorVariant) -> Result<T, Self> {
        Err(Self::new(variant))
    }
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.variant)
    }
}

impl std::error::Error for ReplayError {}

impl From<ReplayErrorVariant> for ReplayError {
    fn from(variant: ReplayErrorVariant) -> Self {
        Self::new(variant)
    }
}

#[allow(clippy::result_large_err)]
pub type ReplayResult<T> = Result<T, ReplayError>;
