//! Field normalizers.
//!
//! Each function turns one raw contact field into a comparison key. Keys are
//! only ever compared for equality; they are never displayed or stored back
//! into a contact. All functions are total: input that cannot produce a
//! usable key yields an empty string, and an empty key never joins records.

use shared_types::{Address, Contact};
use std::collections::HashSet;
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

/// Number of trailing digits that identify a phone number regardless of
/// country code or trunk prefix.
const PHONE_SUFFIX_LEN: usize = 9;

/// Shorter digit strings are not usable for matching.
const MIN_PHONE_DIGITS: usize = 6;

/// Name key of [`shared_types::UNNAMED_CONTACT`]; never matches anything.
pub const UNNAMED_NAME_KEY: &str = "unnamed contact";

const NAME_PREFIXES: &[&str] = &[
    "dr ", "dr. ", "mr ", "mr. ", "mrs ", "mrs. ", "ms ", "ms. ", "prof ", "prof. ",
];

const NAME_SUFFIXES: &[&str] = &[
    " jr", " jr.", " sr", " sr.", " ii", " iii", " iv", " phd", " md",
];

/// Normalizes a phone number to its last nine digits.
///
/// `+1-555-123-4567`, `1-555-123-4567` and `555-123-4567` all map to
/// `551234567`. Numbers with six to eight digits are kept as-is, anything
/// shorter maps to the empty key.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() >= PHONE_SUFFIX_LEN {
        return digits[digits.len() - PHONE_SUFFIX_LEN..].to_string();
    }

    if digits.len() >= MIN_PHONE_DIGITS {
        return digits;
    }

    String::new()
}

/// Normalizes an email address.
///
/// Lowercases, strips plus-addressing, folds `googlemail.com` into
/// `gmail.com` and drops dots from Gmail local parts. Strings that are not a
/// single `local@domain` pair are returned trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim().to_lowercase();

    let (local, domain) = match email.split_once('@') {
        Some((local, domain)) if !domain.contains('@') => (local, domain),
        _ => return email,
    };

    let local = match local.find('+') {
        Some(idx) => &local[..idx],
        None => local,
    };

    let domain = if domain == "googlemail.com" {
        "gmail.com"
    } else {
        domain
    };

    // Dots are only insignificant for Gmail
    if domain == "gmail.com" {
        return format!("{}@{}", local.replace('.', ""), domain);
    }

    format!("{}@{}", local, domain)
}

/// Normalizes a person name.
///
/// Lowercases, strips combining diacritics, collapses whitespace and removes
/// at most one honorific prefix and one generational or credential suffix.
/// Characters without a canonical decomposition (such as `ø`) are kept.
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = remove_accents(&lowered);
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");

    let name = NAME_PREFIXES
        .iter()
        .find_map(|p| collapsed.strip_prefix(p))
        .unwrap_or(collapsed.as_str());

    let name = NAME_SUFFIXES
        .iter()
        .find_map(|s| name.strip_suffix(s))
        .unwrap_or(name);

    name.trim().to_string()
}

/// Location key of an address: the five location fields, each trimmed,
/// lowercased and whitespace-collapsed.
pub fn normalize_address(address: &Address) -> String {
    [
        &address.street,
        &address.city,
        &address.region,
        &address.postal_code,
        &address.country,
    ]
    .into_iter()
    .map(|part| {
        part.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    })
    .collect::<Vec<_>>()
    .join("|")
}

/// Case-insensitive URL key.
pub fn normalize_url(url: &str) -> String {
    url.trim().to_lowercase()
}

/// Non-empty phone keys of a contact.
pub fn phone_keys(contact: &Contact) -> HashSet<String> {
    contact
        .phones
        .iter()
        .map(|p| normalize_phone(p))
        .filter(|k| !k.is_empty())
        .collect()
}

/// Non-empty email keys of a contact.
pub fn email_keys(contact: &Contact) -> HashSet<String> {
    contact
        .emails
        .iter()
        .map(|e| normalize_email(e))
        .filter(|k| !k.is_empty())
        .collect()
}

/// Name key of a contact's display name.
pub fn name_key(contact: &Contact) -> String {
    normalize_name(&contact.display_name())
}

// Only marks that stack on a base letter (non-zero combining class) are
// dropped. Spacing vowel signs in scripts like Devanagari carry class 0 and
// are part of the letter, so they stay.
fn remove_accents(s: &str) -> String {
    s.nfd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .nfc()
        .collect()
}
