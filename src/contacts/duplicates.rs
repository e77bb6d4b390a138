use crate::api::models::{Contact, ContactDraft};
use crate::contacts::validation::trim_form;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateCheck {
    Clear,
    Email,
    Phone,
}

impl DuplicateCheck {
    pub fn is_clear(self) -> bool {
        self == DuplicateCheck::Clear
    }

    pub fn message(self) -> Option<&'static str> {
        match self {
            DuplicateCheck::Clear => None,
            DuplicateCheck::Email => Some("A contact with this email already exists."),
            DuplicateCheck::Phone => Some("A contact with this phone already exists."),
        }
    }
}

/// Emails compare trimmed and case-insensitively, phones trimmed and
/// verbatim. When `editing` is set, contacts sharing its id are skipped.
/// Email collisions win over phone collisions.
pub fn check_duplicates(
    draft: &ContactDraft,
    contacts: &[Contact],
    editing: Option<&Contact>,
) -> DuplicateCheck {
    let email = trim_form(&draft.email).to_lowercase();
    let phone = trim_form(&draft.phone);

    let others = || {
        contacts
            .iter()
            .filter(move |c| editing.is_none_or(|current| c.id != current.id))
    };

    if others().any(|c| trim_form(&c.email).to_lowercase() == email) {
        return DuplicateCheck::Email;
    }
    if others().any(|c| trim_form(&c.phone) == phone) {
        return DuplicateCheck::Phone;
    }
    DuplicateCheck::Clear
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: i64, email: &str, phone: &str) -> Contact {
        Contact {
            id: Some(id),
            first_name: "A".into(),
            last_name: "B".into(),
            email: email.into(),
            phone: phone.into(),
            address: "x".into(),
            owner_id: Some(1),
        }
    }

    fn draft(email: &str, phone: &str) -> ContactDraft {
        ContactDraft {
            email: email.into(),
            phone: phone.into(),
            ..Default::default()
        }
    }

    #[test]
    fn same_email_different_phone() {
        let list = [contact(1, "a@x.com", "123")];
        assert_eq!(
            check_duplicates(&draft("a@x.com", "999"), &list, None),
            DuplicateCheck::Email
        );
    }

    #[test]
    fn same_phone_different_email() {
        let list = [contact(1, "a@x.com", "123")];
        assert_eq!(
            check_duplicates(&draft("b@x.com", "123"), &list, None),
            DuplicateCheck::Phone
        );
    }

    #[test]
    fn editing_excludes_the_record_itself() {
        let a = contact(1, "a@x.com", "123");
        let list = [a.clone()];
        assert_eq!(
            check_duplicates(&a.draft(), &list, Some(&a)),
            DuplicateCheck::Clear
        );
    }

    #[test]
    fn editing_still_sees_other_records() {
        let a = contact(1, "a@x.com", "123");
        let b = contact(2, "b@x.com", "456");
        let list = [a.clone(), b];
        assert_eq!(
            check_duplicates(&draft("b@x.com", "123"), &list, Some(&a)),
            DuplicateCheck::Email
        );
    }

    #[test]
    fn email_comparison_ignores_case_and_padding() {
        let list = [contact(1, "a@x.com", "123")];
        assert_eq!(
            check_duplicates(&draft("  A@X.com ", "555"), &list, None),
            DuplicateCheck::Email
        );
        assert_eq!(
            check_duplicates(&draft("\u{feff}a@x.com", "555"), &list, None),
            DuplicateCheck::Email
        );
    }

    #[test]
    fn email_wins_when_both_collide() {
        let list = [contact(1, "a@x.com", "123")];
        let result = check_duplicates(&draft("a@x.com", "123"), &list, None);
        assert_eq!(result, DuplicateCheck::Email);
        assert_eq!(result.message(), Some("A contact with this email already exists."));
    }

    #[test]
    fn phone_is_compared_verbatim_after_trim() {
        let list = [contact(1, "a@x.com", "123-456-7890")];
        assert_eq!(
            check_duplicates(&draft("b@x.com", " 123-456-7890 "), &list, None),
            DuplicateCheck::Phone
        );
        assert_eq!(
            check_duplicates(&draft("b@x.com", "1234567890"), &list, None),
            DuplicateCheck::Clear
        );
    }

    #[test]
    fn empty_list_is_clear() {
        assert!(check_duplicates(&draft("a@x.com", "1"), &[], None).is_clear());
    }
}
