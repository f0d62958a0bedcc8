use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::{TransferError, TransferResult};

const APP_DIR_NAME: &str = "crosscore-mod-transfer";
const SETTINGS_FILE: &str = "settings.json";

pub const DEFAULT_PORT: u16 = 16384;
pub const DEFAULT_REMOTE_DIR: &str =
    "/storage/emulated/0/Android/data/com.megagame.crosscore/files/Custom";
pub const DEFAULT_BRIDGE_PROGRAM: &str = "adb";
pub const DEFAULT_COMMAND_TIMEOUT_SECS: u64 = 120;
const STAGING_DIR_NAME: &str = "crosscore-temp";

/// Values remembered between runs.
///
/// `port_number` stays a string, exactly as typed; it is only parsed when a
/// transfer needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferSettings {
    /// Emulator shell directory holding the bundled adb.
    pub target_path: String,
    pub port_number: String,
    pub staging_dir: PathBuf,
    pub remote_dir: String,
    pub bridge_program: PathBuf,
    /// `0` disables the timeout.
    pub command_timeout_secs: u64,
}

impl Default for TransferSettings {
    fn default() -> Self {
        Self {
            target_path: String::new(),
            port_number: DEFAULT_PORT.to_string(),
            staging_dir: std::env::temp_dir().join(STAGING_DIR_NAME),
            remote_dir: DEFAULT_REMOTE_DIR.to_string(),
            bridge_program: PathBuf::from(DEFAULT_BRIDGE_PROGRAM),
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl TransferSettings {
    /// Parse the stored port. Blank means the default port.
    pub fn port(&self) -> TransferResult<u16> {
        let raw = self.port_number.trim();
        if raw.is_empty() {
            return Ok(DEFAULT_PORT);
        }
        match raw.parse::<u16>() {
            Ok(port) if port != 0 => Ok(port),
            _ => Err(TransferError::InvalidPort(raw.to_string())),
        }
    }

    /// `None` when no target directory is configured.
    pub fn target_dir(&self) -> TransferResult<Option<PathBuf>> {
        let raw = self.target_path.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        let dir = PathBuf::from(raw);
        if !dir.is_dir() {
            return Err(TransferError::TargetPath(dir));
        }
        Ok(Some(dir))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

/// Settings plus where they live on disk.
pub struct AppState {
    pub settings_path: PathBuf,
    pub settings: TransferSettings,
    /// The file on disk could not be parsed. It is kept for the user to fix
    /// and only replaced by an explicit save.
    unreadable_file: bool,
}

impl AppState {
    /// Read settings once at startup. A missing file is created with defaults;
    /// a corrupt one is ignored with a warning and left in place.
    pub fn load(settings_path: Option<PathBuf>) -> Self {
        let settings_path = settings_path.unwrap_or_else(default_settings_path);

        let (settings, unreadable_file) = match load_settings_from_disk(&settings_path) {
            SettingsFile::Loaded(settings) => (settings, false),
            SettingsFile::Unreadable => (TransferSettings::default(), true),
            SettingsFile::Missing => {
                let settings = TransferSettings::default();
                if let Err(e) = write_settings(&settings_path, &settings) {
                    warn!("Could not create {:?}: {}", settings_path, e);
                } else {
                    info!("Created default settings at {:?}", settings_path);
                }
                (settings, false)
            }
        };

        Self {
            settings_path,
            settings,
            unreadable_file,
        }
    }

    /// Write current settings back, replacing whatever is on disk.
    pub fn save_settings(&self) -> TransferResult<()> {
        write_settings(&self.settings_path, &self.settings)?;
        debug!("Saved settings to {:?}", self.settings_path);
        Ok(())
    }

    /// Save run at shutdown. Skipped when the file on disk was unreadable at
    /// startup, so a hand-edited file with a typo is not replaced by defaults.
    pub fn save_on_shutdown(&self) -> TransferResult<()> {
        if self.unreadable_file {
            warn!(
                "Not saving settings: {:?} could not be read at startup",
                self.settings_path
            );
            return Ok(());
        }
        self.save_settings()
    }
}

enum SettingsFile {
    Loaded(TransferSettings),
    Missing,
    Unreadable,
}

fn load_settings_from_disk(path: &Path) -> SettingsFile {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return SettingsFile::Missing,
        Err(e) => {
            warn!("Could not read settings file {:?}: {}", path, e);
            return SettingsFile::Unreadable;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(settings) => SettingsFile::Loaded(settings),
        Err(e) => {
            warn!("Ignoring corrupt settings file {:?}: {}", path, e);
            SettingsFile::Unreadable
        }
    }
}

fn write_settings(path: &Path, settings: &TransferSettings) -> TransferResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TransferError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn default_settings_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join(SETTINGS_FILE)
}
