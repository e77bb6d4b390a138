use log::{debug, warn};

use crate::api::models::{Contact, ContactDraft};
use crate::api::{ApiError, ContactsApi};
use crate::contacts::duplicates::check_duplicates;
use crate::contacts::validation::{validate, Field, ValidationErrors};

pub const SAVE_FAILED: &str = "Error saving contact.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    Validating,
    DuplicateChecking,
    Invalid,
    Submitting,
    BackendRejected,
}

/// Why a submit did not reach the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitBlocked {
    NoForm,
    InFlight,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    Create(ContactDraft),
    Update { id: i64, draft: ContactDraft },
}

impl SaveRequest {
    pub async fn send<A: ContactsApi + ?Sized>(&self, api: &A) -> Result<Contact, ApiError> {
        match self {
            SaveRequest::Create(draft) => api.create_contact(draft).await,
            SaveRequest::Update { id, draft } => api.update_contact(*id, draft).await,
        }
    }
}

impl ContactDraft {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::FirstName => Some(&self.first_name),
            Field::LastName => Some(&self.last_name),
            Field::Email => Some(&self.email),
            Field::Phone => Some(&self.phone),
            Field::Address => Some(&self.address),
            Field::Password => None,
        }
    }

    fn slot(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::FirstName => Some(&mut self.first_name),
            Field::LastName => Some(&mut self.last_name),
            Field::Email => Some(&mut self.email),
            Field::Phone => Some(&mut self.phone),
            Field::Address => Some(&mut self.address),
            Field::Password => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormState {
    draft: ContactDraft,
    current: Option<Contact>,
    errors: ValidationErrors,
    duplicate_error: Option<String>,
    phase: SubmitPhase,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// An empty form for a new contact.
    pub fn new() -> Self {
        Self {
            draft: ContactDraft::default(),
            current: None,
            errors: ValidationErrors::new(),
            duplicate_error: None,
            phase: SubmitPhase::Idle,
        }
    }

    /// A form seeded from an existing contact.
    pub fn edit(contact: &Contact) -> Self {
        Self {
            draft: contact.draft(),
            current: Some(contact.clone()),
            ..Self::new()
        }
    }

    pub fn draft(&self) -> &ContactDraft {
        &self.draft
    }

    pub fn current(&self) -> Option<&Contact> {
        self.current.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.current.is_some()
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn duplicate_error(&self) -> Option<&str> {
        self.duplicate_error.as_deref()
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    /// Updates one field, clearing its error and the whole-form message.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let Some(slot) = self.draft.slot(field) else {
            return;
        };
        *slot = value.into();
        self.errors.remove(field);
        self.duplicate_error = None;
        if matches!(self.phase, SubmitPhase::Invalid | SubmitPhase::BackendRejected) {
            self.phase = SubmitPhase::Idle;
        }
    }

    fn transition(&mut self, phase: SubmitPhase) {
        debug!("Contact form {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }

    /// Runs validation and the duplicate check against `contacts`. On
    /// success the form enters `Submitting` and the request to send is
    /// returned; a form already submitting refuses.
    pub fn begin_submit(&mut self, contacts: &[Contact]) -> Result<SaveRequest, SubmitBlocked> {
        if self.is_submitting() {
            return Err(SubmitBlocked::InFlight);
        }
        self.duplicate_error = None;

        self.transition(SubmitPhase::Validating);
        self.errors = validate(&self.draft);
        if !self.errors.is_empty() {
            self.transition(SubmitPhase::Invalid);
            return Err(SubmitBlocked::Invalid);
        }

        self.transition(SubmitPhase::DuplicateChecking);
        let duplicate = check_duplicates(&self.draft, contacts, self.current.as_ref());
        if let Some(message) = duplicate.message() {
            self.duplicate_error = Some(message.to_string());
            self.transition(SubmitPhase::Invalid);
            return Err(SubmitBlocked::Invalid);
        }

        self.transition(SubmitPhase::Submitting);
        let draft = self.draft.clone();
        Ok(match self.current.as_ref().and_then(|c| c.id) {
            Some(id) => SaveRequest::Update { id, draft },
            None => {
                if self.current.is_some() {
                    warn!("Editing a contact without an id; creating it instead");
                }
                SaveRequest::Create(draft)
            }
        })
    }

    /// Records a failed save. A backend "already exists" detail is shown as
    /// is; anything else becomes the generic save error.
    pub fn finish_submit(&mut self, error: &ApiError) {
        let message = if error.is_duplicate() {
            error.detail().unwrap_or(SAVE_FAILED)
        } else {
            SAVE_FAILED
        };
        self.duplicate_error = Some(message.to_string());
        self.transition(SubmitPhase::BackendRejected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn filled() -> FormState {
        let mut form = FormState::new();
        form.set_field(Field::FirstName, "Jane");
        form.set_field(Field::LastName, "Roe");
        form.set_field(Field::Email, "jane@example.com");
        form.set_field(Field::Phone, "5551234567");
        form.set_field(Field::Address, "2 Side St");
        form
    }

    fn saved(id: i64, email: &str, phone: &str) -> Contact {
        Contact {
            id: Some(id),
            first_name: "Old".into(),
            last_name: "Entry".into(),
            email: email.into(),
            phone: phone.into(),
            address: "x".into(),
            owner_id: Some(1),
        }
    }

    #[test]
    fn invalid_form_never_yields_a_request() {
        let mut form = FormState::new();
        form.set_field(Field::FirstName, "John1");
        assert_eq!(form.begin_submit(&[]), Err(SubmitBlocked::Invalid));
        assert_eq!(form.phase(), SubmitPhase::Invalid);
        assert_eq!(
            form.errors().get(Field::FirstName),
            Some("First name must contain only letters")
        );
    }

    #[test]
    fn editing_a_field_clears_its_error_and_the_form_message() {
        let mut form = FormState::new();
        let _ = form.begin_submit(&[]);
        assert!(form.errors().get(Field::Email).is_some());
        form.set_field(Field::Email, "x@y.com");
        assert!(form.errors().get(Field::Email).is_none());
        assert!(form.errors().get(Field::Phone).is_some());
        assert_eq!(form.phase(), SubmitPhase::Idle);
    }

    #[test]
    fn duplicate_blocks_with_summary_message() {
        let mut form = filled();
        let list = [saved(3, "JANE@example.com", "000")];
        assert_eq!(form.begin_submit(&list), Err(SubmitBlocked::Invalid));
        assert_eq!(
            form.duplicate_error(),
            Some("A contact with this email already exists.")
        );
        assert!(form.errors().is_empty());

        form.set_field(Field::Email, "other@example.com");
        assert_eq!(form.duplicate_error(), None);
    }

    #[test]
    fn new_contact_becomes_create_request() {
        let mut form = filled();
        let request = form.begin_submit(&[]).unwrap();
        assert_eq!(request, SaveRequest::Create(form.draft().clone()));
        assert!(form.is_submitting());
    }

    #[test]
    fn edited_contact_becomes_update_request_and_skips_itself() {
        let existing = saved(9, "jane@example.com", "5551234567");
        let mut form = FormState::edit(&existing);
        form.set_field(Field::FirstName, "Janet");
        let request = form.begin_submit(&[existing.clone()]).unwrap();
        match request {
            SaveRequest::Update { id, draft } => {
                assert_eq!(id, 9);
                assert_eq!(draft.first_name, "Janet");
            }
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn second_submit_while_in_flight_is_refused() {
        let mut form = filled();
        assert!(form.begin_submit(&[]).is_ok());
        assert_eq!(form.begin_submit(&[]), Err(SubmitBlocked::InFlight));
    }

    #[test]
    fn backend_duplicate_detail_is_shown_verbatim() {
        let mut form = filled();
        form.begin_submit(&[]).unwrap();
        form.finish_submit(&ApiError::Rejected {
            status: StatusCode::BAD_REQUEST,
            detail: Some("Contact already exists".into()),
        });
        assert_eq!(form.duplicate_error(), Some("Contact already exists"));
        assert_eq!(form.phase(), SubmitPhase::BackendRejected);
        assert_eq!(form.draft().first_name, "Jane");
        assert!(form.begin_submit(&[]).is_ok());
    }

    #[test]
    fn other_backend_failures_use_generic_message() {
        let mut form = filled();
        form.begin_submit(&[]).unwrap();
        form.finish_submit(&ApiError::Rejected {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Some("database is locked".into()),
        });
        assert_eq!(form.duplicate_error(), Some(SAVE_FAILED));
    }
}
