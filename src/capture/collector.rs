use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::capture::error::Result;
use crate::capture::source::CaptureSource;
use crate::capture::stats::{CaptureStats, CaptureSummary};
use crate::collection::error::CollectionError;
use crate::collection::store::ImageCollection;

/// Run the capture loop: pull a frame, preprocess, persist, repeat.
///
/// Single-threaded with one frame in flight — the next frame is not read
/// until the previous one is on disk. The loop ends when the source reports
/// end-of-stream or `stop` is set (cooperative cancellation; the in-flight
/// frame always completes first).
///
/// Frames rejected by preprocessing (unsupported pixel format) are dropped
/// and counted; any other persistence failure aborts the run.
pub fn run_capture(
    source: &mut dyn CaptureSource,
    collection: &mut ImageCollection,
    stop: &AtomicBool,
) -> Result<CaptureSummary> {
    let mut stats = CaptureStats::new();

    while !stop.load(Ordering::Relaxed) {
        let Some(frame) = source.read_frame()? else {
            debug!("capture source reached end of stream");
            break;
        };

        match collection.accept(&frame) {
            Ok(path) => {
                debug!("stored frame at {}", path.display());
                stats.record_accepted();
            }
            Err(CollectionError::Preprocess(e)) => {
                warn!("dropping frame: {e}");
                stats.record_dropped();
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(stats.summary())
}
