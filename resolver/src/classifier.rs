//! Duplicate classification policy.
//!
//! Phone and email hits are always accepted. A candidate reached only by
//! name is accepted when the two contacts share a phone or email key, or
//! when at least one of them is minimal (see [`Contact::is_minimal`]). Two
//! richly detailed contacts that merely share a name are kept apart.

use crate::normalize::{email_keys, phone_keys};
use shared_types::Contact;
use std::fmt;

/// Which rule made a candidate count as a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchReason {
    /// Shared non-empty phone key
    Phone,
    /// Shared non-empty email key
    Email,
    /// Same name and an overlapping phone or email key
    NameWithOverlap,
    /// Same name, no overlap, at least one side minimal
    NameWithMinimal,
}

impl fmt::Display for MatchReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl MatchReason {
    pub fn label(&self) -> &'static str {
        match self {
            MatchReason::Phone => "same phone",
            MatchReason::Email => "same email",
            MatchReason::NameWithOverlap => "same name and contact data",
            MatchReason::NameWithMinimal => "same name, sparse record",
        }
    }
}

/// True if the two contacts share any non-empty phone key or email key.
pub fn has_key_overlap(a: &Contact, b: &Contact) -> bool {
    let a_phones = phone_keys(a);
    if !a_phones.is_empty() && phone_keys(b).iter().any(|k| a_phones.contains(k)) {
        return true;
    }

    let a_emails = email_keys(a);
    !a_emails.is_empty() && email_keys(b).iter().any(|k| a_emails.contains(k))
}

/// Decides whether a candidate that shares the query's name key is the same
/// entity. Returns `None` when the name match alone is not trusted.
pub fn classify_name_match(query: &Contact, candidate: &Contact) -> Option<MatchReason> {
    if has_key_overlap(query, candidate) {
        return Some(MatchReason::NameWithOverlap);
    }

    if query.is_minimal() || candidate.is_minimal() {
        return Some(MatchReason::NameWithMinimal);
    }

    None
}

/// Boolean form of [`classify_name_match`].
pub fn accepts_name_match(query: &Contact, candidate: &Contact) -> bool {
    classify_name_match(query, candidate).is_some()
}
