use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Overrides `echo_trace` when set to `1`/`true` or `0`/`false`.
pub const ECHO_ENV: &str = "TENANCY_ECHO";
/// Path of a JSON settings file.
pub const SETTINGS_PATH_ENV: &str = "TENANCY_SETTINGS";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    /// Print every lifecycle event to stdout as it happens.
    #[serde(default)]
    pub echo_trace: bool,

    #[serde(default = "default_true")]
    pub keep_journal: bool,

    /// Print the journal as JSON once the demo finishes.
    #[serde(default)]
    pub dump_journal: bool,
}

fn default_version() -> u32 {
    1
}
fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: 1,
            echo_trace: false,
            keep_journal: true,
            dump_journal: false,
        }
    }
}

impl Settings {
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        let mut settings = serde_json::from_str::<Settings>(contents)?;
        settings.migrate();
        Ok(settings)
    }

    /// Settings file named by `TENANCY_SETTINGS` (defaults if unset or
    /// unreadable), then environment overrides.
    pub fn load() -> Self {
        Self::load_or(Settings::default())
    }

    /// Like [`Settings::load`], with `fallback` standing in for a missing or
    /// unusable settings file. Values from a file are never overridden except
    /// by the environment.
    pub fn load_or(fallback: Settings) -> Self {
        let mut settings = Self::load_file().unwrap_or(fallback);
        settings.apply_env();
        settings
    }

    /// Defaults, but with every lifecycle event echoed to stdout.
    pub fn echoing() -> Self {
        Settings {
            echo_trace: true,
            ..Settings::default()
        }
    }

    fn load_file() -> Option<Self> {
        Self::settings_path()
            .and_then(|path| match fs::read_to_string(&path) {
                Ok(contents) => Some(contents),
                Err(err) => {
                    warn!("Could not read settings from {}: {}", path.display(), err);
                    None
                }
            })
            .and_then(|contents| match Self::from_json(&contents) {
                Ok(settings) => Some(settings),
                Err(err) => {
                    warn!("Ignoring malformed settings: {}", err);
                    None
                }
            })
    }

    pub fn apply_env(&mut self) {
        if let Some(echo) = Self::echo_from_env() {
            self.echo_trace = echo;
        }
    }

    pub fn echo_from_env() -> Option<bool> {
        match std::env::var(ECHO_ENV).ok()?.trim() {
            "1" | "true" => Some(true),
            "0" | "false" => Some(false),
            other => {
                warn!("Ignoring {}={:?}", ECHO_ENV, other);
                None
            }
        }
    }

    fn settings_path() -> Option<PathBuf> {
        std::env::var_os(SETTINGS_PATH_ENV).map(PathBuf::from)
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                self.version = 1;
            }
            _ => (),
        }
    }
}
