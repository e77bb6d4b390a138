use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::models::ContactDraft;

// Patterns run on the untrimmed value.
static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s\x{FEFF}]+$").expect("name pattern compiles"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]+@([A-Za-z0-9_\-]+\.)+[A-Za-z0-9_\-]{2,4}$")
        .expect("email pattern compiles")
});

pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    Password,
}

impl Field {
    pub const CONTACT: [Field; 5] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::Phone,
        Field::Address,
    ];

    /// Wire name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Password => "password",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Address => "Address",
            Field::Password => "Password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Messages for the fields that currently fail. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Unicode white space or a byte order mark, which pasted text often carries.
pub fn is_form_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

pub fn trim_form(value: &str) -> &str {
    value.trim_matches(is_form_space)
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn phone_digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

fn check_name(errors: &mut ValidationErrors, field: Field, value: &str, label: &str) {
    if trim_form(value).is_empty() {
        errors.insert(field, format!("{label} is required"));
    } else if !NAME_RE.is_match(value) {
        errors.insert(field, format!("{label} must contain only letters"));
    }
}

/// Checks every contact field and returns the failures.
pub fn validate(draft: &ContactDraft) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    check_name(&mut errors, Field::FirstName, &draft.first_name, "First name");
    check_name(&mut errors, Field::LastName, &draft.last_name, "Last name");

    if trim_form(&draft.email).is_empty() {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&draft.email) {
        errors.insert(Field::Email, "Invalid email address");
    }

    if trim_form(&draft.phone).is_empty() {
        errors.insert(Field::Phone, "Phone is required");
    } else if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&phone_digit_count(&draft.phone)) {
        errors.insert(Field::Phone, "Phone must be 10-15 digits");
    }

    if trim_form(&draft.address).is_empty() {
        errors.insert(Field::Address, "Address is required");
    }

    errors
}
