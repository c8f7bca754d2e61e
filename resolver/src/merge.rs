//! Conservative field-level merge.
//!
//! `dst` is the record being enriched and is never downgraded: scalar
//! fields are only filled when empty, multi-valued fields only grow, and
//! notes are appended. `src` is never modified.

use crate::normalize::{normalize_address, normalize_email, normalize_phone, normalize_url};
use shared_types::Contact;
use std::collections::HashSet;

/// Marker placed between the existing note and a merged-in note.
pub const NOTE_SEPARATOR: &str = "\n\n--- Merged ---\n\n";

/// Merges `src` into `dst`. Returns true if any field of `dst` changed.
pub fn merge(dst: &mut Contact, src: &Contact) -> bool {
    !merge_fields(dst, src).is_empty()
}

/// Merges `src` into `dst` and returns the names of the changed fields.
///
/// An empty result means `dst` was left exactly as it was.
pub fn merge_fields(dst: &mut Contact, src: &Contact) -> Vec<&'static str> {
    let mut changed = Vec::new();

    let scalars: [(&'static str, &mut String, &String); 10] = [
        ("formatted_name", &mut dst.formatted_name, &src.formatted_name),
        ("given_name", &mut dst.given_name, &src.given_name),
        ("family_name", &mut dst.family_name, &src.family_name),
        ("middle_name", &mut dst.middle_name, &src.middle_name),
        ("prefix", &mut dst.prefix, &src.prefix),
        ("suffix", &mut dst.suffix, &src.suffix),
        ("organization", &mut dst.organization, &src.organization),
        ("title", &mut dst.title, &src.title),
        ("birthday", &mut dst.birthday, &src.birthday),
        ("photo", &mut dst.photo, &src.photo),
    ];

    for (name, dst_field, src_field) in scalars {
        if dst_field.is_empty() && !src_field.is_empty() {
            *dst_field = src_field.clone();
            changed.push(name);
        }
    }

    if append_missing(&mut dst.emails, &src.emails, |e| or_raw(normalize_email(e), e)) {
        changed.push("emails");
    }
    if append_missing(&mut dst.phones, &src.phones, |p| or_raw(normalize_phone(p), p)) {
        changed.push("phones");
    }
    if append_missing(&mut dst.urls, &src.urls, |u| or_raw(normalize_url(u), u)) {
        changed.push("urls");
    }
    if append_missing(&mut dst.addresses, &src.addresses, normalize_address) {
        changed.push("addresses");
    }

    if merge_note(&mut dst.note, &src.note) {
        changed.push("note");
    }

    if !changed.is_empty() {
        tracing::debug!(
            name = %dst.display_name(),
            fields = ?changed,
            "Merged contact fields"
        );
    }

    changed
}

/// Appends the items of `src` whose key is not yet present in `dst`, keeping
/// the original unnormalized values and `src` order.
fn append_missing<T, F>(dst: &mut Vec<T>, src: &[T], key: F) -> bool
where
    T: Clone,
    F: Fn(&T) -> String,
{
    let mut present: HashSet<String> = dst.iter().map(&key).collect();
    let mut changed = false;

    for item in src {
        if present.insert(key(item)) {
            dst.push(item.clone());
            changed = true;
        }
    }

    changed
}

/// Values without a usable key are told apart by their trimmed text, so
/// unkeyable entries are never collapsed into each other.
fn or_raw(key: String, raw: &str) -> String {
    if key.is_empty() {
        raw.trim().to_string()
    } else {
        key
    }
}

fn merge_note(dst: &mut String, src: &str) -> bool {
    if src.is_empty() || dst.as_str() == src {
        return false;
    }

    if dst.is_empty() {
        *dst = src.to_string();
    } else {
        dst.push_str(NOTE_SEPARATOR);
        dst.push_str(src);
    }

    true
}
