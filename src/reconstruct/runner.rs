use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::reconstruct::error::{ReconstructError, Result};
use crate::reconstruct::stage::StageCommand;

/// Executes one stage's external process to completion.
///
/// This is the orchestrator's only side-effect seam; tests substitute a mock
/// that fabricates (or withholds) the stage artifacts.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run the command and wait for it to exit. Non-zero exit is an error.
    async fn run(&self, command: &StageCommand) -> Result<()>;
}

/// Runs stages as real COLMAP child processes, bounded by a wall-clock
/// timeout. On expiry the child is killed and the stage fails — a hung
/// external process must not block the pipeline forever.
pub struct ColmapRunner {
    timeout: Duration,
}

impl ColmapRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ProcessRunner for ColmapRunner {
    async fn run(&self, command: &StageCommand) -> Result<()> {
        debug!("spawning {} {:?}", command.program, command.args);
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ReconstructError::Spawn {
                stage: command.stage,
                source: e,
            })?;

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(waited) => waited.map_err(|e| ReconstructError::Spawn {
                stage: command.stage,
                source: e,
            })?,
            Err(_) => {
                let _ = child.kill().await;
                return Err(ReconstructError::Timeout {
                    stage: command.stage,
                    timeout_secs: self.timeout.as_secs(),
                });
            }
        };

        if status.success() {
            Ok(())
        } else {
            Err(ReconstructError::StageFailed {
                stage: command.stage,
                status,
            })
        }
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use crate::reconstruct::stage::Stage;
    use std::ffi::OsString;

    fn command(program: &str, args: &[&str]) -> StageCommand {
        StageCommand {
            stage: Stage::FeatureExtraction,
            program: program.to_string(),
            args: args.iter().map(OsString::from).collect(),
        }
    }

    fn runner() -> ColmapRunner {
        ColmapRunner::new(Duration::from_secs(5))
    }

    #[tokio::test]
    async fn successful_process_is_ok() {
        runner().run(&command("true", &[])).await.unwrap();
    }

    #[tokio::test]
    async fn non_zero_exit_is_a_stage_failure() {
        let err = runner().run(&command("false", &[])).await.unwrap_err();
        assert!(matches!(err, ReconstructError::StageFailed { .. }));
        assert_eq!(err.stage(), Some(Stage::FeatureExtraction));
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let err = runner()
            .run(&command("definitely-not-a-real-binary", &[]))
            .await
            .unwrap_err();
        assert!(matches!(err, ReconstructError::Spawn { .. }));
    }

    #[tokio::test]
    async fn hung_process_is_killed_on_timeout() {
        let runner = ColmapRunner::new(Duration::from_millis(50));
        let err = runner.run(&command("sleep", &["30"])).await.unwrap_err();
        assert!(matches!(
            err,
            ReconstructError::Timeout {
                timeout_secs: 0,
                ..
            }
        ));
    }
}
