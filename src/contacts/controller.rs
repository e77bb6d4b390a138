use log::{debug, error, info, warn};

use crate::api::models::Contact;
use crate::api::{ApiError, ContactsApi};
use crate::contacts::form::{FormState, SaveRequest, SubmitBlocked};
use crate::contacts::pagination::Pagination;

pub const DELETE_FAILED: &str = "Error deleting contact.";
pub const LOAD_FAILED: &str = "Error loading contacts.";

/// Identifies one opened form. A save result carries the ticket of the form
/// that sent it and only touches that form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormTicket(u64);

#[derive(Debug)]
pub struct PendingSave {
    pub ticket: FormTicket,
    pub request: SaveRequest,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Saved(Contact),
    Blocked(SubmitBlocked),
    Failed(ApiError),
}

/// State behind the contacts view: the fetched list, the open dialog (if
/// any), the page cursor, and a one-line notice for list-level failures.
///
/// Every mutation is followed by a full refetch; the list is replaced, never
/// patched.
pub struct ContactsController<A> {
    api: A,
    contacts: Vec<Contact>,
    form: Option<FormState>,
    ticket: FormTicket,
    saving: Option<FormTicket>,
    pagination: Pagination,
    deleting: Option<i64>,
    notice: Option<String>,
}

impl<A: ContactsApi> ContactsController<A> {
    pub fn new(api: A, rows_per_page: usize) -> Self {
        Self {
            api,
            contacts: Vec::new(),
            form: None,
            ticket: FormTicket(0),
            saving: None,
            pagination: Pagination::new(rows_per_page),
            deleting: None,
            notice: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    pub fn page_items(&self) -> &[Contact] {
        self.pagination.slice(&self.contacts)
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.contacts.len())
    }

    pub fn set_page(&mut self, page: usize) {
        self.pagination.set_page(page, self.contacts.len());
    }

    pub fn set_rows_per_page(&mut self, rows_per_page: usize) -> bool {
        self.pagination.set_rows_per_page(rows_per_page)
    }

    pub fn form(&self) -> Option<&FormState> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormState> {
        self.form.as_mut()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.is_some()
    }

    /// Replaces the list wholesale, e.g. with a cached snapshot or a fresh
    /// fetch.
    pub fn replace_contacts(&mut self, contacts: Vec<Contact>) {
        self.contacts = contacts;
        self.pagination.clamp(self.contacts.len());
    }

    fn open(&mut self, form: FormState) {
        self.ticket = FormTicket(self.ticket.0 + 1);
        self.form = Some(form);
    }

    pub fn open_new(&mut self) {
        self.open(FormState::new());
    }

    /// Opens the dialog on the contact with `id`; false if it is not in the
    /// list.
    pub fn open_edit(&mut self, id: i64) -> bool {
        match self.contacts.iter().find(|c| c.id == Some(id)) {
            Some(contact) => {
                let form = FormState::edit(contact);
                self.open(form);
                true
            }
            None => {
                warn!("Contact {id} not in the current list");
                false
            }
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// True while `ticket` belongs to the form that is still open.
    pub fn is_current(&self, ticket: FormTicket) -> bool {
        self.form.is_some() && self.ticket == ticket
    }

    /// One save at a time, even across a closed and reopened dialog.
    pub fn begin_submit(&mut self) -> Result<PendingSave, SubmitBlocked> {
        let form = self.form.as_mut().ok_or(SubmitBlocked::NoForm)?;
        if self.saving.is_some() {
            return Err(SubmitBlocked::InFlight);
        }
        let request = form.begin_submit(&self.contacts)?;
        self.saving = Some(self.ticket);
        Ok(PendingSave {
            ticket: self.ticket,
            request,
        })
    }

    /// Applies the result of a save to the form that sent it. On success that
    /// dialog closes and the caller is expected to refresh the list. A result
    /// for a form that has since been closed leaves the open form alone.
    pub fn finish_submit(
        &mut self,
        ticket: FormTicket,
        result: Result<Contact, ApiError>,
    ) -> SubmitOutcome {
        if self.saving == Some(ticket) {
            self.saving = None;
        }
        let current = self.is_current(ticket);
        match result {
            Ok(contact) => {
                info!("Saved contact {:?}", contact.id);
                if current {
                    self.form = None;
                }
                SubmitOutcome::Saved(contact)
            }
            Err(err) => {
                error!("Error saving contact: {err}");
                match self.form.as_mut() {
                    Some(form) if current => form.finish_submit(&err),
                    _ => debug!("Dropping save error for a closed form"),
                }
                SubmitOutcome::Failed(err)
            }
        }
    }

    pub fn finish_refresh(&mut self, result: Result<Vec<Contact>, ApiError>) -> Result<(), ApiError> {
        match result {
            Ok(contacts) => {
                self.replace_contacts(contacts);
                self.notice = None;
                Ok(())
            }
            Err(err) => {
                error!("Error fetching contacts: {err}");
                self.notice = Some(LOAD_FAILED.to_string());
                Err(err)
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let result = self.api.list_contacts().await;
        self.finish_refresh(result)
    }

    /// Validate, check duplicates, save, then refetch the list.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let pending = match self.begin_submit() {
            Ok(pending) => pending,
            Err(blocked) => return SubmitOutcome::Blocked(blocked),
        };
        let result = pending.request.send(&self.api).await;
        let outcome = self.finish_submit(pending.ticket, result);
        if matches!(outcome, SubmitOutcome::Saved(_)) {
            if let Err(e) = self.refresh().await {
                warn!("Saved, but the list could not be refetched: {e}");
            }
        }
        outcome
    }

    /// Marks `id` as being deleted; false while another delete is pending.
    pub fn begin_delete(&mut self, id: i64) -> bool {
        if self.deleting.is_some() {
            return false;
        }
        self.deleting = Some(id);
        true
    }

    /// Applies the result of a delete. Failures leave the list untouched
    /// and set the notice. Returns true when the list should be refetched.
    pub fn finish_delete(&mut self, result: &Result<(), ApiError>) -> bool {
        let id = self.deleting.take();
        match result {
            Ok(()) => {
                info!("Deleted contact {id:?}");
                true
            }
            Err(err) => {
                error!("Error deleting contact {id:?}: {err}");
                self.notice = Some(DELETE_FAILED.to_string());
                false
            }
        }
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), ApiError> {
        if !self.begin_delete(id) {
            return Ok(());
        }
        let result = self.api.delete_contact(id).await;
        if self.finish_delete(&result) {
            self.refresh().await
        } else {
            result
        }
    }
}
