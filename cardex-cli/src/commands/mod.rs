pub mod diff;
pub mod import;
pub mod normalize;

use anyhow::{Context, Result};
use serde::Deserialize;
use shared_types::{Contact, PropertyRecord};
use std::path::{Path, PathBuf};

/// A stored contact, either as an object-store record or as a plain contact.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredContact {
    Record(PropertyRecord),
    Contact(Contact),
}

/// Reads a JSON array of stored contacts.
pub fn read_stored(path: &Path) -> Result<Vec<Contact>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let stored: Vec<StoredContact> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse contacts from {}", path.display()))?;

    Ok(stored
        .into_iter()
        .map(|entry| match entry {
            StoredContact::Record(record) => importers::contact_from_record(&record),
            StoredContact::Contact(contact) => contact,
        })
        .collect())
}

/// Reads every input file in order. `.json` files hold stored contacts,
/// anything else is decoded as vCard. Files that fail are logged and skipped.
pub fn read_inputs(files: &[PathBuf]) -> Vec<Contact> {
    let mut contacts = Vec::new();

    for path in files {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed = if is_json {
            read_stored(path)
        } else {
            importers::parse_vcf_file(path).map_err(anyhow::Error::from)
        };

        match parsed {
            Ok(found) => {
                tracing::info!("Parsed {} contact(s) from {}", found.len(), path.display());
                contacts.extend(found);
            }
            Err(e) => tracing::warn!("Skipping {}: {:#}", path.display(), e),
        }
    }

    contacts
}
