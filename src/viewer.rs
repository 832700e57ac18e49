//! Hand-off to an external point-cloud viewer.

use std::path::Path;
use std::process::Command;

use tracing::info;

/// Open the fused artifact in the configured viewer.
///
/// Fire-and-forget: the viewer is spawned detached and its exit status is
/// never consumed. Only a failed launch is reported.
#[allow(clippy::zombie_processes)] // the viewer outlives this process; it is never reaped
pub fn open(viewer: &str, artifact: &Path) -> std::io::Result<()> {
    info!("opening {} in {viewer}", artifact.display());
    Command::new(viewer).arg(artifact).spawn()?;
    Ok(())
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;

    #[test]
    fn missing_viewer_binary_reports_launch_failure() {
        let err = open("definitely-not-a-real-viewer", Path::new("fused.ply")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }

    #[test]
    fn spawn_does_not_wait_for_the_viewer() {
        // `sleep` outlives the call; open() must return immediately
        let start = std::time::Instant::now();
        open("sleep", Path::new("2")).unwrap();
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }
}
