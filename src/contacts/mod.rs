pub mod controller;
pub mod duplicates;
pub mod form;
pub mod pagination;
pub mod validation;

pub use controller::{ContactsController, FormTicket, PendingSave, SubmitOutcome};
pub use duplicates::{check_duplicates, DuplicateCheck};
pub use form::{FormState, SaveRequest, SubmitBlocked, SubmitPhase};
pub use pagination::Pagination;
pub use validation::{validate, Field, ValidationErrors};
