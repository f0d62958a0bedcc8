use std::process::ExitCode;

use tracing::{error, info, warn};

use crate::cli::{Command, PushArgs, SettingOverrides, SettingsAction};
use crate::core::bridge::{DeviceBridge, SystemRunner};
use crate::core::error::{TransferError, TransferResult};
use crate::core::notify::{self, Notifier, SilentNotifier};
use crate::core::session::TransferSession;
use crate::core::staging::StagingManager;
use crate::core::state::AppState;
use crate::core::transfer::{TransferOrchestrator, TransferReport};

pub async fn dispatch(state: &mut AppState, command: Command) -> ExitCode {
    let result = match command {
        Command::Push(args) => push(state, args).await.map(|report| {
            print_summary(&report);
            if report.succeeded() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }),
        Command::Settings {
            action: SettingsAction::Show,
        } => settings_show(state).map(|json| {
            println!("{}", json);
            ExitCode::SUCCESS
        }),
        Command::Settings {
            action: SettingsAction::Set(overrides),
        } => settings_set(state, &overrides).map(|()| {
            println!("Settings saved to {}", state.settings_path.display());
            ExitCode::SUCCESS
        }),
        Command::Cleanup => cleanup(state).await.map(|()| ExitCode::SUCCESS),
    };

    result.unwrap_or_else(|e| {
        error!("{}", e);
        eprintln!("error: {}", e);
        ExitCode::FAILURE
    })
}

/// Run one transfer with the current settings and the given files.
///
/// Command-line overrides are applied to the settings first so they are
/// remembered at shutdown, the same way values typed into the window were.
pub async fn push(state: &mut AppState, args: PushArgs) -> TransferResult<TransferReport> {
    args.overrides.apply(&mut state.settings)?;
    let settings = &state.settings;

    let port = settings.port()?;
    let target_dir = settings.target_dir()?;

    let mut session = TransferSession::new();
    let added = session.add(&args.files);
    if added < args.files.len() {
        info!("Ignored {} duplicate path(s)", args.files.len() - added);
    }
    if session.is_empty() {
        return Err(TransferError::NoFiles);
    }
    for (name, path) in session.display_names().iter().zip(session.files()) {
        info!("Queued {} ({:?})", name, path);
    }

    let request = session.take_request(target_dir.unwrap_or_default(), port);

    let notifier: Box<dyn Notifier> = if args.no_notify {
        Box::new(SilentNotifier)
    } else {
        notify::default_notifier()
    };

    let orchestrator = TransferOrchestrator::new(
        StagingManager::new(settings.staging_dir.clone()),
        DeviceBridge::new(
            SystemRunner::new(settings.command_timeout()),
            settings.bridge_program.clone(),
            settings.remote_dir.clone(),
        ),
        notifier,
    );

    Ok(orchestrator.run(&request).await)
}

pub fn settings_show(state: &AppState) -> TransferResult<String> {
    Ok(serde_json::to_string_pretty(&state.settings)?)
}

pub fn settings_set(state: &mut AppState, overrides: &SettingOverrides) -> TransferResult<()> {
    overrides.apply(&mut state.settings)?;
    state.save_settings()
}

/// Remove a staging directory left behind by an interrupted run.
pub async fn cleanup(state: &AppState) -> TransferResult<()> {
    let staging = StagingManager::new(state.settings.staging_dir.clone());
    match staging.cleanup().await {
        Some(e) => Err(e),
        None => {
            info!("Staging directory {:?} is clear", staging.staging_dir());
            Ok(())
        }
    }
}

fn print_summary(report: &TransferReport) {
    match &report.failure {
        None => println!(
            "Transfer {}: {} staged, {} pushed",
            report.id,
            report.staged.len(),
            report.pushed_count()
        ),
        Some(e) => println!("Transfer {} failed: {}", report.id, e),
    }

    for outcome in report.failed_pushes() {
        if let Some(e) = &outcome.error {
            println!("  not pushed: {} ({})", outcome.staged_path.display(), e);
        }
    }

    if let Some(e) = &report.cleanup_error {
        warn!("Staging directory was not removed: {}", e);
    }
}
