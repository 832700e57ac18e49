use crate::capture::error::Result;
use crate::capture::frame::Frame;

/// Pull interface over a live frame source.
///
/// Implemented per transport (MJPEG-over-HTTP for network cameras). The
/// capture loop calls `read_frame` once per cycle; `Ok(None)` signals
/// end-of-stream and terminates collection gracefully, while `Err` is a
/// device failure and aborts the run.
pub trait CaptureSource: Send {
    /// Block until the next frame is available.
    ///
    /// Returns `Ok(None)` when the stream has ended.
    fn read_frame(&mut self) -> Result<Option<Frame>>;
}
