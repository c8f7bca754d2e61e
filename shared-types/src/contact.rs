use serde::{Deserialize, Serialize};

/// Display name used when a contact carries no name parts and no organization.
pub const UNNAMED_CONTACT: &str = "Unnamed Contact";

/// A contact record as produced by the vCard decoder or projected from an
/// object store. Fields are stored exactly as received; comparison keys are
/// derived by the resolver and never written back here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub formatted_name: String,
    pub given_name: String,
    pub family_name: String,
    pub middle_name: String,
    pub prefix: String,
    pub suffix: String,
    pub emails: Vec<String>,
    pub phones: Vec<String>,
    pub addresses: Vec<Address>,
    pub organization: String,
    pub title: String,
    pub urls: Vec<String>,
    pub note: String,
    pub birthday: String,
    pub photo: String,
    /// External object id, only used to correlate with a remote store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
}

impl Contact {
    /// Shorthand for a contact that only has a formatted name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            formatted_name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the best available name for the contact.
    ///
    /// Falls back from the formatted name to the structured name parts, then
    /// to the organization, and finally to [`UNNAMED_CONTACT`].
    pub fn display_name(&self) -> String {
        if !self.formatted_name.is_empty() {
            return self.formatted_name.clone();
        }

        let parts: Vec<&str> = [
            &self.prefix,
            &self.given_name,
            &self.middle_name,
            &self.family_name,
            &self.suffix,
        ]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect();

        if !parts.is_empty() {
            return parts.join(" ");
        }

        if !self.organization.is_empty() {
            return self.organization.clone();
        }

        UNNAMED_CONTACT.to_string()
    }

    /// A minimal contact carries little corroborating data: no emails, at
    /// most three phones and no addresses.
    pub fn is_minimal(&self) -> bool {
        self.emails.is_empty() && self.phones.len() <= 3 && self.addresses.is_empty()
    }
}

/// A postal address. Two addresses denote the same location when their five
/// location fields match after case and whitespace normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub country: String,
    /// Free-text rendering kept from the source record
    #[serde(skip_serializing_if = "String::is_empty")]
    pub full: String,
}

impl Address {
    /// Non-empty location parts in street, city, region, postal code, country order.
    pub fn parts(&self) -> Vec<&str> {
        [
            &self.street,
            &self.city,
            &self.region,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .map(String::as_str)
        .filter(|s| !s.is_empty())
        .collect()
    }
}
