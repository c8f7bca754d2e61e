use crate::normalize::{email_keys, name_key, phone_keys, UNNAMED_NAME_KEY};
use shared_types::{Contact, MatchStrength};

/// Grades how confident we are that two contacts are the same entity.
///
/// A shared phone or email is `Strong`. Otherwise an equal name key is
/// `Weak`, upgraded to `Medium` by one matching organization or birthday.
/// Unnamed contacts never match on name.
pub fn compare(a: &Contact, b: &Contact) -> MatchStrength {
    let a_phones = phone_keys(a);
    if phone_keys(b).iter().any(|k| a_phones.contains(k)) {
        return MatchStrength::Strong;
    }

    let a_emails = email_keys(a);
    if email_keys(b).iter().any(|k| a_emails.contains(k)) {
        return MatchStrength::Strong;
    }

    let name_a = name_key(a);
    let name_b = name_key(b);

    if name_a == UNNAMED_NAME_KEY || name_b == UNNAMED_NAME_KEY {
        return MatchStrength::None;
    }

    if name_a.is_empty() || name_a != name_b {
        return MatchStrength::None;
    }

    if !a.organization.is_empty() && a.organization == b.organization {
        return MatchStrength::Medium;
    }

    if !a.birthday.is_empty() && a.birthday == b.birthday {
        return MatchStrength::Medium;
    }

    MatchStrength::Weak
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, phones: &[&str], emails: &[&str]) -> Contact {
        Contact {
            phones: phones.iter().map(|s| s.to_string()).collect(),
            emails: emails.iter().map(|s| s.to_string()).collect(),
            ..Contact::named(name)
        }
    }

    #[test]
    fn test_phone_or_email_is_strong() {
        let a = contact("John Doe", &["+1-555-123-4567"], &[]);
        let b = contact("Totally Different", &["555.123.4567"], &[]);
        assert_eq!(compare(&a, &b), MatchStrength::Strong);

        let a = contact("John Doe", &[], &["john+work@example.com"]);
        let b = contact("JD", &[], &["John@Example.com"]);
        assert_eq!(compare(&a, &b), MatchStrength::Strong);
    }

    #[test]
    fn test_name_only_is_weak() {
        let a = contact("John Doe", &["555-111-1111"], &[]);
        let b = contact("Mr. John Doe", &["555-222-2222"], &[]);
        assert_eq!(compare(&a, &b), MatchStrength::Weak);
    }

    #[test]
    fn test_name_with_corroboration_is_medium() {
        let a = Contact {
            organization: "Acme".to_string(),
            birthday: "1980-01-01".to_string(),
            ..Contact::named("John Doe")
        };
        let b = Contact {
            organization: "Acme".to_string(),
            birthday: "1980-01-01".to_string(),
            ..Contact::named("john doe")
        };
        // Two corroborating fields do not go past medium
        assert_eq!(compare(&a, &b), MatchStrength::Medium);

        let c = Contact {
            birthday: "1980-01-01".to_string(),
            ..Contact::named("John Doe")
        };
        assert_eq!(compare(&a, &c), MatchStrength::Medium);

        let d = Contact {
            organization: "Other".to_string(),
            ..Contact::named("John Doe")
        };
        assert_eq!(compare(&a, &d), MatchStrength::Weak);
    }

    #[test]
    fn test_different_names_is_none() {
        let a = contact("John Doe", &["555-111-1111"], &[]);
        let b = contact("Jane Doe", &["555-222-2222"], &[]);
        assert_eq!(compare(&a, &b), MatchStrength::None);
    }

    #[test]
    fn test_unnamed_contacts_are_none() {
        assert_eq!(
            compare(&Contact::default(), &Contact::default()),
            MatchStrength::None
        );
    }

    #[test]
    fn test_unnamed_contacts_still_match_by_phone() {
        let a = contact("", &["555-123-4567"], &[]);
        let b = contact("", &["5551234567"], &[]);
        assert_eq!(compare(&a, &b), MatchStrength::Strong);
    }

    #[test]
    fn test_empty_phone_keys_do_not_match() {
        let a = contact("Alpha", &["12"], &[]);
        let b = contact("Beta", &["34"], &[]);
        assert_eq!(compare(&a, &b), MatchStrength::None);
    }
}
