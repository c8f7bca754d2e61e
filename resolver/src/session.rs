//! Import/dedup session.
//!
//! Feeds incoming records through the index one at a time: records with no
//! classified duplicate are inserted, the rest are merged into (or skipped
//! in favour of) the first duplicate found. The session never persists
//! anything; callers inspect the outcomes and the dirty set to decide what
//! to create or update.

use crate::classifier::MatchReason;
use crate::index::{ContactId, ContactIndex};
use shared_types::Contact;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Check incoming records against the index before inserting them
    pub skip_duplicates: bool,
    /// Merge duplicates into the existing record instead of dropping them
    pub merge: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            skip_duplicates: true,
            merge: true,
        }
    }
}

/// What happened to one incoming record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Inserted(ContactId),
    Merged {
        into: ContactId,
        reason: MatchReason,
        changed_fields: Vec<&'static str>,
    },
    Skipped {
        duplicate_of: ContactId,
        reason: MatchReason,
    },
}

impl ImportOutcome {
    /// Id of the indexed contact this record ended up as or in.
    pub fn contact_id(&self) -> ContactId {
        match self {
            ImportOutcome::Inserted(id) => *id,
            ImportOutcome::Merged { into, .. } => *into,
            ImportOutcome::Skipped { duplicate_of, .. } => *duplicate_of,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    /// Duplicates that changed the existing record
    pub merged: usize,
    /// Duplicates that added nothing to the existing record
    pub unchanged: usize,
    pub skipped: usize,
}

impl ImportSummary {
    pub fn processed(&self) -> usize {
        self.inserted + self.merged + self.unchanged + self.skipped
    }

    pub fn duplicates(&self) -> usize {
        self.merged + self.unchanged + self.skipped
    }
}

#[derive(Debug)]
pub struct ImportSession {
    index: ContactIndex,
    options: ImportOptions,
    summary: ImportSummary,
    existing: usize,
    dirty: BTreeSet<ContactId>,
}

impl ImportSession {
    /// Starts a session over the contacts already known to the caller.
    pub fn new(existing: Vec<Contact>, options: ImportOptions) -> Self {
        let existing_count = existing.len();
        Self {
            index: ContactIndex::new(existing),
            options,
            summary: ImportSummary::default(),
            existing: existing_count,
            dirty: BTreeSet::new(),
        }
    }

    pub fn import(&mut self, contact: Contact) -> ImportOutcome {
        if !self.options.skip_duplicates {
            return self.insert(contact);
        }

        let Some(first) = self.index.find_matches(&contact).into_iter().next() else {
            return self.insert(contact);
        };

        if !self.options.merge {
            tracing::info!(
                name = %contact.display_name(),
                duplicate_of = %first.id,
                reason = %first.reason,
                "Skipping duplicate contact"
            );
            self.summary.skipped += 1;
            return ImportOutcome::Skipped {
                duplicate_of: first.id,
                reason: first.reason,
            };
        }

        let changed_fields = self.index.merge_into(first.id, &contact);
        if changed_fields.is_empty() {
            self.summary.unchanged += 1;
        } else {
            self.summary.merged += 1;
            self.dirty.insert(first.id);
        }

        tracing::info!(
            name = %contact.display_name(),
            into = %first.id,
            reason = %first.reason,
            changed = changed_fields.len(),
            "Merged duplicate contact"
        );

        ImportOutcome::Merged {
            into: first.id,
            reason: first.reason,
            changed_fields,
        }
    }

    pub fn import_all(
        &mut self,
        contacts: impl IntoIterator<Item = Contact>,
    ) -> Vec<ImportOutcome> {
        contacts.into_iter().map(|c| self.import(c)).collect()
    }

    fn insert(&mut self, contact: Contact) -> ImportOutcome {
        let id = self.index.insert(contact);
        self.summary.inserted += 1;
        ImportOutcome::Inserted(id)
    }

    pub fn summary(&self) -> ImportSummary {
        self.summary
    }

    pub fn index(&self) -> &ContactIndex {
        &self.index
    }

    /// True for contacts that were passed to [`ImportSession::new`].
    pub fn is_existing(&self, id: ContactId) -> bool {
        id.index() < self.existing
    }

    /// Ids of contacts changed by a merge since the last call, in id order.
    pub fn take_dirty(&mut self) -> Vec<ContactId> {
        std::mem::take(&mut self.dirty).into_iter().collect()
    }

    pub fn into_contacts(self) -> Vec<Contact> {
        self.index.into_contacts()
    }
}
