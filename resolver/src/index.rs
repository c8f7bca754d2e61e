//! Candidate index for duplicate lookups.
//!
//! The index owns the contacts it has seen and refers to them by
//! [`ContactId`]. Buckets are append-only: nothing is ever removed for the
//! lifetime of an index, and a bucket may hold several unrelated contacts
//! (a shared office line, a common name).

use crate::classifier::{classify_name_match, MatchReason};
use crate::merge::merge_fields;
use crate::normalize::{name_key, normalize_email, normalize_phone, UNNAMED_NAME_KEY};
use shared_types::Contact;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Stable handle of a contact inside one [`ContactIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(usize);

impl ContactId {
    /// Position of the contact in insertion order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// A classified duplicate candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateMatch {
    pub id: ContactId,
    pub reason: MatchReason,
}

#[derive(Debug, Default)]
pub struct ContactIndex {
    contacts: Vec<Contact>,
    by_phone: HashMap<String, Vec<ContactId>>,
    by_email: HashMap<String, Vec<ContactId>>,
    by_name: HashMap<String, Vec<ContactId>>,
}

impl ContactIndex {
    /// Builds an index over an initial collection of contacts.
    pub fn new(contacts: impl IntoIterator<Item = Contact>) -> Self {
        let mut index = Self::default();
        for contact in contacts {
            index.insert(contact);
        }
        index
    }

    /// Indexes a contact under all of its phone and email keys and its name key.
    pub fn insert(&mut self, contact: Contact) -> ContactId {
        let id = ContactId(self.contacts.len());

        for phone in &contact.phones {
            add_to_bucket(&mut self.by_phone, normalize_phone(phone), id);
        }

        for email in &contact.emails {
            add_to_bucket(&mut self.by_email, normalize_email(email), id);
        }

        add_to_bucket(&mut self.by_name, name_key(&contact), id);

        self.contacts.push(contact);
        id
    }

    /// Returns the classified duplicates of `contact` with the rule that
    /// accepted each one, in the order they were first reached.
    ///
    /// Phone hits come first, then email hits, then name hits that pass the
    /// classifier. A contact reached through several buckets appears once.
    /// If `contact` is itself a reference into this index it is skipped.
    pub fn find_matches(&self, contact: &Contact) -> Vec<CandidateMatch> {
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        let mut add_match = |id: ContactId, reason: MatchReason| {
            if std::ptr::eq(&self.contacts[id.0], contact) {
                return;
            }
            if seen.insert(id) {
                matches.push(CandidateMatch { id, reason });
            }
        };

        for phone in &contact.phones {
            for &id in bucket(&self.by_phone, &normalize_phone(phone)) {
                add_match(id, MatchReason::Phone);
            }
        }

        for email in &contact.emails {
            for &id in bucket(&self.by_email, &normalize_email(email)) {
                add_match(id, MatchReason::Email);
            }
        }

        let key = name_key(contact);
        if key != UNNAMED_NAME_KEY {
            for &id in bucket(&self.by_name, &key) {
                if let Some(reason) = classify_name_match(contact, &self.contacts[id.0]) {
                    add_match(id, reason);
                }
            }
        }

        if !matches.is_empty() {
            tracing::debug!(
                name = %contact.display_name(),
                matches = matches.len(),
                "Found duplicate candidates"
            );
        }

        matches
    }

    /// Ids of the contacts that count as the same entity as `contact`.
    pub fn find_candidates(&self, contact: &Contact) -> Vec<ContactId> {
        self.find_matches(contact).into_iter().map(|m| m.id).collect()
    }

    pub fn is_duplicate(&self, contact: &Contact) -> bool {
        !self.find_matches(contact).is_empty()
    }

    /// Merges `src` into the indexed contact `id` and indexes any phone or
    /// email keys the merge added. When the merge changes the display name,
    /// the contact is also indexed under its new name key; the old bucket
    /// entry stays. Returns the names of the fields that changed.
    pub fn merge_into(&mut self, id: ContactId, src: &Contact) -> Vec<&'static str> {
        let Some(dst) = self.contacts.get_mut(id.0) else {
            return Vec::new();
        };

        let phones_before = dst.phones.len();
        let emails_before = dst.emails.len();
        let name_before = name_key(dst);

        let changed = merge_fields(dst, src);

        let name_after = name_key(dst);
        if name_after != name_before {
            tracing::debug!(id = %id, name = %name_after, "Re-indexed merged contact name");
            add_to_bucket(&mut self.by_name, name_after, id);
        }

        for phone in &dst.phones[phones_before..] {
            add_to_bucket(&mut self.by_phone, normalize_phone(phone), id);
        }

        for email in &dst.emails[emails_before..] {
            add_to_bucket(&mut self.by_email, normalize_email(email), id);
        }

        changed
    }

    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.contacts.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Indexed contacts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ContactId, &Contact)> {
        self.contacts
            .iter()
            .enumerate()
            .map(|(i, contact)| (ContactId(i), contact))
    }

    pub fn into_contacts(self) -> Vec<Contact> {
        self.contacts
    }
}

fn add_to_bucket(map: &mut HashMap<String, Vec<ContactId>>, key: String, id: ContactId) {
    if key.is_empty() {
        return;
    }
    map.entry(key).or_default().push(id);
}

fn bucket<'a>(map: &'a HashMap<String, Vec<ContactId>>, key: &str) -> &'a [ContactId] {
    if key.is_empty() {
        return &[];
    }
    map.get(key).map(Vec::as_slice).unwrap_or(&[])
}
