use log::{info, warn};
use thiserror::Error;

use crate::api::models::{Credentials, RegisteredUser};
use crate::api::ApiClient;
use crate::app::SettingsError;
use crate::contacts::validation::{is_valid_email, trim_form, Field, ValidationErrors};

pub const PASSWORD_SPECIALS: &str = "@$!%*?&";
pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Invalid(ValidationErrors),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Registration failed. Please try again.")]
    RegistrationFailed,

    #[error("Could not store session: {0}")]
    Session(#[from] SettingsError),
}

fn is_strong_password(password: &str) -> bool {
    let allowed = |c: char| c.is_ascii_alphanumeric() || PASSWORD_SPECIALS.contains(c);
    password.chars().count() >= MIN_PASSWORD_LEN
        && password.chars().all(allowed)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c))
}

pub fn validate_registration(credentials: &Credentials) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if trim_form(&credentials.email).is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&credentials.email) {
        errors.insert(Field::Email, "Enter a valid email address");
    }

    if credentials.password.is_empty() {
        errors.insert(Field::Password, "Password is required");
    } else if !is_strong_password(&credentials.password) {
        errors.insert(
            Field::Password,
            "Password must be at least 8 characters, include uppercase, lowercase, number, and special character",
        );
    }

    errors
}

pub async fn register(api: &ApiClient, credentials: &Credentials) -> Result<RegisteredUser, AuthError> {
    let errors = validate_registration(credentials);
    if !errors.is_empty() {
        return Err(AuthError::Invalid(errors));
    }
    match api.register(credentials).await {
        Ok(user) => {
            info!("Registered {}", user.email);
            Ok(user)
        }
        Err(e) => {
            warn!("Registration failed: {e}");
            Err(AuthError::RegistrationFailed)
        }
    }
}

/// Logs in and stores the returned token in the client's session.
pub async fn sign_in(api: &ApiClient, credentials: &Credentials) -> Result<(), AuthError> {
    let response = api.login(credentials).await.map_err(|e| {
        warn!("Login failed: {e}");
        AuthError::InvalidCredentials
    })?;
    api.session().sign_in(response.access_token)?;
    Ok(())
}
