use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use log::info;

use crate::app::{Settings, SettingsError};

#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Arc<RwLock<Option<String>>>,
    settings_path: Option<PathBuf>,
}

impl Session {
    /// A session that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// A session backed by the settings file at `path`, starting from the
    /// token stored there (if any).
    pub fn persistent(path: PathBuf) -> Self {
        let token = Settings::load_from(&path).token;
        Self {
            token: Arc::new(RwLock::new(token)),
            settings_path: Some(path),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn sign_in(&self, token: String) -> Result<(), SettingsError> {
        self.persist(Some(token.clone()))?;
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        info!("Signed in");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), SettingsError> {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.persist(None)?;
        info!("Signed out");
        Ok(())
    }

    fn persist(&self, token: Option<String>) -> Result<(), SettingsError> {
        let Some(path) = &self.settings_path else {
            return Ok(());
        };
        let mut settings = Settings::load_from(path);
        settings.token = token;
        settings.save_to(path)
    }
}
