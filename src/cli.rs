//! Command-line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::error::TransferResult;
use crate::core::state::TransferSettings;

/// Get default settings path help text for current platform
fn default_settings_help() -> String {
    #[cfg(target_os = "linux")]
    return "Settings file (default: ~/.local/share/crosscore-mod-transfer/settings.json)"
        .to_string();

    #[cfg(target_os = "macos")]
    return "Settings file (default: ~/Library/Application Support/crosscore-mod-transfer/settings.json)"
        .to_string();

    #[cfg(target_os = "windows")]
    return "Settings file (default: %APPDATA%\\crosscore-mod-transfer\\settings.json)".to_string();

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return "Settings file (overrides platform default)".to_string();
}

/// CrossCore mod transfer tool: stage mod files and push them to the emulator over adb
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Settings file (overrides platform default)
    #[arg(long, global = true, help = default_settings_help())]
    pub settings: Option<PathBuf>,

    /// Enable debug logging (shows every adb command line and its output)
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Stage the given mod files and push them to the device
    Push(PushArgs),

    /// Show or change remembered settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Remove a staging directory left behind by an interrupted transfer
    Cleanup,
}

#[derive(clap::Args, Debug)]
pub struct PushArgs {
    #[command(flatten)]
    pub overrides: SettingOverrides,

    /// Do not show the completion notification
    #[arg(long, default_value = "false")]
    pub no_notify: bool,

    /// Mod files to transfer. Keep the original file names: files on the
    /// device are replaced by name.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Print the effective settings as JSON
    Show,
    /// Update one or more settings
    Set(SettingOverrides),
}

/// Values that can be set from the command line and are remembered afterwards.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct SettingOverrides {
    /// Emulator shell directory (where its adb lives)
    #[arg(short = 't', long)]
    pub target_path: Option<String>,

    /// Emulator adb port [default: 16384]
    #[arg(short, long)]
    pub port: Option<String>,

    /// Local staging directory
    #[arg(long)]
    pub staging_dir: Option<PathBuf>,

    /// Destination directory on the device
    #[arg(long)]
    pub remote_dir: Option<String>,

    /// adb executable name or path
    #[arg(long)]
    pub bridge_program: Option<PathBuf>,

    /// Timeout for each adb command in seconds (0 disables)
    #[arg(long)]
    pub timeout: Option<u64>,
}

impl SettingOverrides {
    /// Apply the given values. The port is validated before anything changes.
    pub fn apply(&self, settings: &mut TransferSettings) -> TransferResult<()> {
        if let Some(port) = &self.port {
            let candidate = TransferSettings {
                port_number: port.trim().to_string(),
                ..TransferSettings::default()
            };
            candidate.port()?;
            settings.port_number = candidate.port_number;
        }
        if let Some(target_path) = &self.target_path {
            settings.target_path = target_path.trim().to_string();
        }
        if let Some(staging_dir) = &self.staging_dir {
            settings.staging_dir = staging_dir.clone();
        }
        if let Some(remote_dir) = &self.remote_dir {
            settings.remote_dir = remote_dir.clone();
        }
        if let Some(bridge_program) = &self.bridge_program {
            settings.bridge_program = bridge_program.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.command_timeout_secs = timeout;
        }
        Ok(())
    }
}
