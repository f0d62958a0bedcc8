// ─── Transfer Orchestrator ───
// staging → connect → push → cleanup, one transfer at a time.

use chrono::Utc;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::model::{PushOutcome, TransferPhase, TransferReport, TransferRequest};
use crate::core::bridge::{DeviceBridge, ProcessRunner};
use crate::core::error::TransferResult;
use crate::core::notify::Notifier;
use crate::core::staging::StagingManager;

pub struct TransferOrchestrator<R> {
    staging: StagingManager,
    bridge: DeviceBridge<R>,
    notifier: Box<dyn Notifier>,
}

impl<R: ProcessRunner> TransferOrchestrator<R> {
    pub fn new(
        staging: StagingManager,
        bridge: DeviceBridge<R>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            staging,
            bridge,
            notifier,
        }
    }

    pub fn bridge(&self) -> &DeviceBridge<R> {
        &self.bridge
    }

    /// Run one transfer to completion.
    ///
    /// Staging and connect failures stop the workflow; push failures do not.
    /// The staging directory is removed on every path before returning, and
    /// the completion notification fires only when staging and connect
    /// both succeeded.
    pub async fn run(&self, request: &TransferRequest) -> TransferReport {
        let mut report = TransferReport::start();
        let span = info_span!("transfer", id = %report.id, port = request.port);

        async {
            info!(
                "Starting transfer of {} file(s) to 127.0.0.1:{}",
                request.file_paths.len(),
                request.port
            );

            if let Err(e) = self.stage_connect_push(request, &mut report).await {
                error!("Transfer aborted during {}: {}", report.phase, e);
                report.failure = Some(e);
                enter(&mut report, TransferPhase::Failed);
            }

            enter(&mut report, TransferPhase::CleaningUp);
            report.cleanup_error = self.staging.cleanup().await;

            if report.succeeded() {
                info!(
                    "Mod transfer finished: {}/{} file(s) pushed",
                    report.pushed_count(),
                    report.pushes.len()
                );
                self.notifier.transfer_complete(&report);
                report.notified = true;
            }

            report.finished_at = Some(Utc::now());
            enter(&mut report, TransferPhase::Done);
        }
        .instrument(span)
        .await;

        report
    }

    async fn stage_connect_push(
        &self,
        request: &TransferRequest,
        report: &mut TransferReport,
    ) -> TransferResult<()> {
        enter(report, TransferPhase::Staging);
        report.staged = self.staging.stage(&request.file_paths).await?;

        enter(report, TransferPhase::Connecting);
        let target = self.bridge.target_for(&request.target_program_path);
        self.bridge.connect(&target, request.port).await?;

        enter(report, TransferPhase::Pushing);
        for staged_path in &report.staged {
            let error = match self.bridge.push(&target, staged_path).await {
                Ok(()) => None,
                Err(e) => {
                    warn!("Failed to push {:?} to device: {}", staged_path, e);
                    Some(e)
                }
            };
            report.pushes.push(PushOutcome {
                staged_path: staged_path.clone(),
                error,
            });
        }

        Ok(())
    }
}

fn enter(report: &mut TransferReport, phase: TransferPhase) {
    debug!("Transfer phase {} -> {}", report.phase, phase);
    report.phase = phase;
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    use super::*;
    use crate::core::bridge::runner::testing::FakeRunner;
    use crate::core::bridge::{BridgeError, BridgeInvocation, ProcessOutput};
    use crate::core::error::TransferError;
    use crate::core::notify::testing::RecordingNotifier;

    const REMOTE: &str = "/storage/emulated/0/Android/data/com.megagame.crosscore/files/Custom";

    struct Fixture {
        _root: tempfile::TempDir,
        staging_dir: PathBuf,
        mods: PathBuf,
        other: PathBuf,
        notifier: Arc<RecordingNotifier>,
    }

    impl Fixture {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            let mods = root.path().join("mods");
            let other = root.path().join("other");
            std::fs::create_dir_all(&mods).unwrap();
            std::fs::create_dir_all(&other).unwrap();
            Self {
                staging_dir: root.path().join("crosscore-temp"),
                mods,
                other,
                notifier: Arc::new(RecordingNotifier::default()),
                _root: root,
            }
        }

        fn file(&self, dir: &Path, name: &str, content: &str) -> PathBuf {
            let path = dir.join(name);
            std::fs::write(&path, content).unwrap();
            path
        }

        fn orchestrator(&self, runner: FakeRunner) -> TransferOrchestrator<FakeRunner> {
            TransferOrchestrator::new(
                StagingManager::new(self.staging_dir.clone()),
                DeviceBridge::new(runner, PathBuf::from("adb"), REMOTE),
                Box::new(Arc::clone(&self.notifier)),
            )
        }

        fn request(&self, files: Vec<PathBuf>) -> TransferRequest {
            TransferRequest {
                target_program_path: PathBuf::new(),
                port: 16384,
                file_paths: files,
            }
        }
    }

    /// Swaps the staging directory for a plain file while the first push
    /// runs, so the later cleanup cannot remove it.
    struct StagingSwapRunner {
        inner: FakeRunner,
        staging_dir: PathBuf,
    }

    #[async_trait::async_trait]
    impl ProcessRunner for StagingSwapRunner {
        async fn run(&self, invocation: &BridgeInvocation) -> Result<ProcessOutput, BridgeError> {
            if invocation.operation == "push" && self.staging_dir.is_dir() {
                std::fs::remove_dir_all(&self.staging_dir).unwrap();
                std::fs::write(&self.staging_dir, "in the way").unwrap();
            }
            self.inner.run(invocation).await
        }
    }

    #[tokio::test]
    async fn duplicate_base_names_stage_once_and_push_once() {
        let fx = Fixture::new();
        let files = vec![
            fx.file(&fx.mods, "skin_a.mod", "mods a"),
            fx.file(&fx.other, "skin_a.mod", "other a"),
            fx.file(&fx.mods, "skin_b.mod", "mods b"),
        ];
        let orchestrator = fx.orchestrator(FakeRunner::default());

        let report = orchestrator.run(&fx.request(files)).await;

        let calls = orchestrator.bridge().runner().calls();
        assert_eq!(calls[0].args, vec!["connect", "127.0.0.1:16384"]);
        assert_eq!(orchestrator.bridge().runner().operations(), vec!["connect", "push", "push"]);
        assert_eq!(
            calls[1].args[1],
            fx.staging_dir.join("skin_a.mod").to_string_lossy()
        );
        assert_eq!(
            calls[2].args[1],
            fx.staging_dir.join("skin_b.mod").to_string_lossy()
        );
        assert_eq!(report.staged.len(), 2);
        assert!(report.succeeded());
        assert_eq!(report.phase, TransferPhase::Done);
        assert!(!fx.staging_dir.exists());
        assert_eq!(fx.notifier.count(), 1);
    }

    #[tokio::test]
    async fn connect_failure_skips_pushes_and_notification() {
        let fx = Fixture::new();
        let files = vec![fx.file(&fx.mods, "skin_a.mod", "a")];
        let orchestrator = fx.orchestrator(FakeRunner::with_codes([1]));

        let report = orchestrator.run(&fx.request(files)).await;

        assert_eq!(orchestrator.bridge().runner().operations(), vec!["connect"]);
        assert!(matches!(
            report.failure,
            Some(TransferError::Bridge(BridgeError::Exit { operation: "connect", .. }))
        ));
        assert!(report.pushes.is_empty());
        assert!(!report.notified);
        assert!(!fx.staging_dir.exists());
        assert_eq!(fx.notifier.count(), 0);
    }

    #[tokio::test]
    async fn push_failure_does_not_stop_remaining_pushes() {
        let fx = Fixture::new();
        let files = vec![
            fx.file(&fx.mods, "skin_a.mod", "a"),
            fx.file(&fx.mods, "skin_b.mod", "b"),
        ];
        // connect ok, first push fails, second push ok
        let orchestrator = fx.orchestrator(FakeRunner::with_codes([0, 1, 0]));

        let report = orchestrator.run(&fx.request(files)).await;

        assert_eq!(
            orchestrator.bridge().runner().operations(),
            vec!["connect", "push", "push"]
        );
        assert_eq!(report.pushes.len(), 2);
        assert!(!report.pushes[0].succeeded());
        assert!(report.pushes[1].succeeded());
        assert_eq!(report.failed_pushes().count(), 1);
        assert!(report.succeeded());
        assert!(report.notified);
        assert!(!fx.staging_dir.exists());
        assert_eq!(fx.notifier.count(), 1);
    }

    #[tokio::test]
    async fn staging_failure_skips_bridge_entirely() {
        let fx = Fixture::new();
        let files = vec![
            fx.file(&fx.mods, "skin_a.mod", "a"),
            fx.mods.join("missing.mod"),
        ];
        let orchestrator = fx.orchestrator(FakeRunner::default());

        let report = orchestrator.run(&fx.request(files)).await;

        assert!(orchestrator.bridge().runner().calls().is_empty());
        assert!(report.failure.as_ref().is_some_and(TransferError::is_staging));
        assert_eq!(report.phase, TransferPhase::Done);
        assert!(!fx.staging_dir.exists());
        assert_eq!(fx.notifier.count(), 0);
    }

    #[tokio::test]
    async fn cleanup_runs_even_if_staging_dir_never_created() {
        let fx = Fixture::new();
        let orchestrator = fx.orchestrator(FakeRunner::default());

        let report = orchestrator.run(&fx.request(Vec::new())).await;

        assert!(report.cleanup_error.is_none());
        assert_eq!(orchestrator.bridge().runner().operations(), vec!["connect"]);
        assert!(!fx.staging_dir.exists());
        assert!(StagingManager::new(fx.staging_dir.clone())
            .cleanup()
            .await
            .is_none());
    }

    #[tokio::test]
    async fn bridge_runs_from_request_target_dir() {
        let fx = Fixture::new();
        let shell = fx.other.clone();
        let files = vec![fx.file(&fx.mods, "skin_a.mod", "a")];
        let orchestrator = fx.orchestrator(FakeRunner::default());
        let request = TransferRequest {
            target_program_path: shell.clone(),
            ..fx.request(files)
        };

        let report = orchestrator.run(&request).await;

        assert!(report.succeeded());
        let calls = orchestrator.bridge().runner().calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|call| call.working_dir.as_ref() == Some(&shell)));
    }

    #[tokio::test]
    async fn cleanup_failure_is_recorded_not_raised() {
        let fx = Fixture::new();
        // A regular file where the staging directory should be: staging
        // cannot create it and cleanup cannot remove it as a directory.
        std::fs::write(&fx.staging_dir, "not a dir").unwrap();
        let files = vec![fx.file(&fx.mods, "skin_a.mod", "a")];
        let orchestrator = fx.orchestrator(FakeRunner::default());

        let report = orchestrator.run(&fx.request(files)).await;

        assert!(report.failure.as_ref().is_some_and(TransferError::is_staging));
        assert!(matches!(report.cleanup_error, Some(TransferError::Io { .. })));
        assert_eq!(report.phase, TransferPhase::Done);
        assert!(report.finished_at.is_some());
        assert!(!report.notified);
        assert_eq!(fx.notifier.count(), 0);
        assert!(fx.staging_dir.is_file());
    }

    #[tokio::test]
    async fn cleanup_failure_after_push_still_notifies() {
        let fx = Fixture::new();
        let files = vec![fx.file(&fx.mods, "skin_a.mod", "a")];
        let orchestrator = TransferOrchestrator::new(
            StagingManager::new(fx.staging_dir.clone()),
            DeviceBridge::new(
                StagingSwapRunner {
                    inner: FakeRunner::default(),
                    staging_dir: fx.staging_dir.clone(),
                },
                PathBuf::from("adb"),
                REMOTE,
            ),
            Box::new(Arc::clone(&fx.notifier)),
        );

        let report = orchestrator.run(&fx.request(files)).await;

        assert!(report.succeeded());
        assert!(matches!(report.cleanup_error, Some(TransferError::Io { .. })));
        assert_eq!(report.phase, TransferPhase::Done);
        assert!(report.notified);
        assert_eq!(fx.notifier.count(), 1);
    }
}
