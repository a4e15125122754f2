//! Runtime settings.
//!
//! Read from the environment, after loading a `.env` file if one exists.
//! CLI flags override individual values.

use std::env;
use std::path::PathBuf;

use crate::delivery::DEFAULT_OUTBOX_DIR;
use crate::formatting::DEFAULT_FORMATTING_FILE;

pub const RECIPIENT_VAR: &str = "VAULTREPORT_RECIPIENT";
pub const OUTBOX_DIR_VAR: &str = "VAULTREPORT_OUTBOX_DIR";
pub const FORMATTING_FILE_VAR: &str = "VAULTREPORT_FORMATTING_FILE";
pub const PORT_VAR: &str = "PORT";

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Where finished reports are sent
    pub recipient: Option<String>,
    /// Outbox directory for [`crate::delivery::OutboxDelivery`]
    pub outbox_dir: PathBuf,
    /// Formatting-hint sidecar
    pub formatting_file: PathBuf,
    /// HTTP listen port
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recipient: None,
            outbox_dir: PathBuf::from(DEFAULT_OUTBOX_DIR),
            formatting_file: PathBuf::from(DEFAULT_FORMATTING_FILE),
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    /// Load `.env` (if present) then read the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            recipient: get(RECIPIENT_VAR),
            outbox_dir: get(OUTBOX_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.outbox_dir),
            formatting_file: get(FORMATTING_FILE_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.formatting_file),
            port: get(PORT_VAR)
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    pub fn with_recipient(mut self, recipient: Option<String>) -> Self {
        if recipient.is_some() {
            self.recipient = recipient;
        }
        self
    }

    pub fn with_outbox_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.outbox_dir = dir;
        }
        self
    }

    pub fn with_formatting_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.formatting_file = path;
        }
        self
    }
}
