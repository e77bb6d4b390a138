use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const API_URL_ENV: &str = "CONTACT_BOOK_API_URL";
pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("no config directory available")]
    NoConfigDir,

    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// User settings persisted as TOML in the platform config directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub token: Option<String>,
    pub rows_per_page: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: None,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
        }
    }
}

impl Settings {
    pub fn path() -> Option<PathBuf> {
        let proj = ProjectDirs::from("com", "example", "ContactBook")?;
        Some(proj.config_dir().join("settings.toml"))
    }

    /// Settings from the default location with environment overrides applied.
    pub fn load() -> Self {
        let settings = Self::path()
            .map(|p| Self::load_from(&p))
            .unwrap_or_default();
        settings.with_overrides(|key| std::env::var(key).ok())
    }

    /// A missing or unreadable file yields defaults.
    pub fn load_from(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        toml::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings at {}: {e}", path.display());
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Applies `change` to the stored settings file (environment overrides
    /// are not written back).
    pub fn update(change: impl FnOnce(&mut Settings)) -> Result<(), SettingsError> {
        let path = Self::path().ok_or(SettingsError::NoConfigDir)?;
        let mut stored = Self::load_from(&path);
        change(&mut stored);
        stored.save_to(&path)
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.base_url = url;
        }
        self
    }
}
