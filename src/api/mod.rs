pub mod client;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;

use async_trait::async_trait;

use models::{Contact, ContactDraft};

/// The contact operations the controller needs from a backend.
#[async_trait]
pub trait ContactsApi: Send + Sync {
    async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError>;
    async fn create_contact(&self, draft: &ContactDraft) -> Result<Contact, ApiError>;
    async fn update_contact(&self, id: i64, draft: &ContactDraft) -> Result<Contact, ApiError>;
    async fn delete_contact(&self, id: i64) -> Result<(), ApiError>;
}
