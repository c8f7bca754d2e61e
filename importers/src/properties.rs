//! Object-store property projection.
//!
//! Remote records carry a flat list of keyed properties. Multi-valued
//! contact fields map onto numbered key slots (`email`, `email2`, ...) and
//! anything that does not fit a slot is folded into the notes text.

use chrono::{NaiveDate, SecondsFormat};
use shared_types::{Address, Contact, Property, PropertyRecord, UNNAMED_CONTACT};

/// Key slots for a multi-valued field: `base`, `base2`, `base3`, ...
pub fn slot_keys(base: &str, count: usize) -> Vec<String> {
    (1..=count)
        .map(|i| {
            if i == 1 {
                base.to_string()
            } else {
                format!("{}{}", base, i)
            }
        })
        .collect()
}

fn is_slot_key(key: &str, base: &str) -> bool {
    match key.strip_prefix(base) {
        Some("") => true,
        Some(n) => n.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

/// Builds a contact from a remote record's properties.
///
/// Unknown keys are ignored. Address properties all fill the first address.
pub fn contact_from_properties(object_id: Option<&str>, properties: &[Property]) -> Contact {
    let mut contact = Contact {
        object_id: object_id.map(str::to_string),
        ..Contact::default()
    };

    for prop in properties {
        let text = prop.text.clone().unwrap_or_default();

        match prop.key.as_str() {
            "name" => contact.formatted_name = text,
            "given_name" => contact.given_name = text,
            "family_name" => contact.family_name = text,
            "middle_name" => contact.middle_name = text,
            "prefix" => contact.prefix = text,
            "suffix" => contact.suffix = text,
            "organization" => contact.organization = text,
            "title" => contact.title = text,
            "notes" => contact.note = text,
            "birthday" => contact.birthday = prop.date.clone().unwrap_or_default(),
            "url" => push_some(&mut contact.urls, &prop.url),
            "address" | "city" | "region" | "postal_code" | "country" => {
                if text.is_empty() {
                    continue;
                }
                if contact.addresses.is_empty() {
                    contact.addresses.push(Address::default());
                }
                let address = &mut contact.addresses[0];
                match prop.key.as_str() {
                    "address" => {
                        address.full = text.clone();
                        address.street = text;
                    }
                    "city" => address.city = text,
                    "region" => address.region = text,
                    "postal_code" => address.postal_code = text,
                    _ => address.country = text,
                }
            }
            key if is_slot_key(key, "email") => push_some(&mut contact.emails, &prop.email),
            key if is_slot_key(key, "phone") => push_some(&mut contact.phones, &prop.phone),
            key => tracing::trace!("Ignoring property {}", key),
        }
    }

    contact
}

/// Builds a contact from a full record, falling back to the record name when
/// no `name` property is present.
pub fn contact_from_record(record: &PropertyRecord) -> Contact {
    let mut contact = contact_from_properties(record.object_id.as_deref(), &record.properties);
    if contact.formatted_name.is_empty()
        && !record.name.is_empty()
        && record.name != UNNAMED_CONTACT
    {
        contact.formatted_name = record.name.clone();
    }
    contact
}

/// Projects a contact onto remote properties.
///
/// Emails and phones fill the given key slots in order; extra emails end up
/// in the notes, extra phones are dropped.
pub fn build_properties(
    contact: &Contact,
    phone_keys: &[String],
    email_keys: &[String],
) -> Vec<Property> {
    let mut props = Vec::new();

    let name = contact.display_name();
    if name != UNNAMED_CONTACT {
        add_text(&mut props, "name", &name);
    }

    add_text(&mut props, "given_name", &contact.given_name);
    add_text(&mut props, "family_name", &contact.family_name);
    add_text(&mut props, "middle_name", &contact.middle_name);
    add_text(&mut props, "prefix", &contact.prefix);
    add_text(&mut props, "suffix", &contact.suffix);

    for (key, email) in email_keys.iter().zip(&contact.emails) {
        props.push(Property::email(key, email));
    }
    for (key, phone) in phone_keys.iter().zip(&contact.phones) {
        props.push(Property::phone(key, phone));
    }

    if let Some(address) = contact.addresses.first() {
        add_text(&mut props, "address", &address.street);
        add_text(&mut props, "city", &address.city);
        add_text(&mut props, "region", &address.region);
        add_text(&mut props, "postal_code", &address.postal_code);
        add_text(&mut props, "country", &address.country);
    }

    add_text(&mut props, "organization", &contact.organization);
    add_text(&mut props, "title", &contact.title);

    if let Some(url) = contact.urls.first() {
        props.push(Property::url("url", url));
    }

    add_text(&mut props, "notes", &build_notes(contact, email_keys.len()));

    if !contact.birthday.is_empty() {
        props.push(Property::date("birthday", parse_birthday(&contact.birthday)));
    }

    props
}

/// Same as [`build_properties`], wrapped as a record named after the contact.
pub fn build_record(
    contact: &Contact,
    phone_keys: &[String],
    email_keys: &[String],
) -> PropertyRecord {
    PropertyRecord {
        object_id: contact.object_id.clone(),
        name: contact.display_name(),
        properties: build_properties(contact, phone_keys, email_keys),
    }
}

/// The note plus overflow lines for emails past `email_slots` and URLs past
/// the first, separated by blank lines.
pub fn build_notes(contact: &Contact, email_slots: usize) -> String {
    let mut notes = Vec::new();

    if !contact.note.is_empty() {
        notes.push(contact.note.clone());
    }
    if contact.emails.len() > email_slots {
        notes.push(format!("Additional emails: {}", contact.emails[email_slots..].join(", ")));
    }
    if contact.urls.len() > 1 {
        notes.push(format!("Additional URLs: {}", contact.urls[1..].join(", ")));
    }

    notes.join("\n\n")
}

/// Converts `YYYYMMDD` or `YYYY-MM-DD` to an RFC 3339 timestamp at midnight
/// UTC. Anything else is returned unchanged.
pub fn parse_birthday(bday: &str) -> String {
    for format in ["%Y%m%d", "%Y-%m-%d"] {
        let Ok(date) = NaiveDate::parse_from_str(bday, format) else {
            continue;
        };
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return midnight.and_utc().to_rfc3339_opts(SecondsFormat::Secs, true);
        }
    }
    bday.to_string()
}

fn add_text(props: &mut Vec<Property>, key: &str, value: &str) {
    if !value.is_empty() {
        props.push(Property::text(key, value));
    }
}

fn push_some(values: &mut Vec<String>, value: &Option<String>) {
    if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_contact() -> Contact {
        Contact {
            formatted_name: "John Doe".to_string(),
            given_name: "John".to_string(),
            family_name: "Doe".to_string(),
            emails: vec![
                "a@example.com".to_string(),
                "b@example.com".to_string(),
                "c@example.com".to_string(),
                "d@example.com".to_string(),
            ],
            phones: vec!["+1 555 111 1111".to_string(), "+1 555 222 2222".to_string()],
            addresses: vec![
                Address {
                    street: "1 Main St".to_string(),
                    city: "Springfield".to_string(),
                    ..Address::default()
                },
                Address {
                    street: "2 Elm St".to_string(),
                    ..Address::default()
                },
            ],
            organization: "Acme".to_string(),
            urls: vec![
                "https://example.com/john".to_string(),
                "https://blog.example.com".to_string(),
            ],
            note: "Met at conference".to_string(),
            birthday: "19800115".to_string(),
            ..Contact::default()
        }
    }

    fn keys(props: &[Property]) -> Vec<&str> {
        props.iter().map(|p| p.key.as_str()).collect()
    }

    #[test]
    fn test_slot_keys() {
        assert_eq!(slot_keys("phone", 3), vec!["phone", "phone2", "phone3"]);
        assert!(slot_keys("email", 0).is_empty());
        assert!(is_slot_key("email12", "email"));
        assert!(!is_slot_key("email_work", "email"));
    }

    #[test]
    fn test_parse_birthday() {
        assert_eq!(parse_birthday("19800115"), "1980-01-15T00:00:00Z");
        assert_eq!(parse_birthday("1980-01-15"), "1980-01-15T00:00:00Z");
        assert_eq!(parse_birthday("--0115"), "--0115");
        assert_eq!(parse_birthday("January 15"), "January 15");
    }

    #[test]
    fn test_build_notes_overflow() {
        let contact = sample_contact();
        assert_eq!(
            build_notes(&contact, 3),
            "Met at conference\n\nAdditional emails: d@example.com\n\nAdditional URLs: https://blog.example.com"
        );

        let plain = Contact::named("A");
        assert_eq!(build_notes(&plain, 3), "");
    }

    #[test]
    fn test_build_properties() {
        let contact = sample_contact();
        let props = build_properties(&contact, &slot_keys("phone", 3), &slot_keys("email", 3));

        assert_eq!(
            keys(&props),
            vec![
                "name",
                "given_name",
                "family_name",
                "email",
                "email2",
                "email3",
                "phone",
                "phone2",
                "address",
                "city",
                "organization",
                "url",
                "notes",
                "birthday",
            ]
        );

        let birthday = props.iter().find(|p| p.key == "birthday").unwrap();
        assert_eq!(birthday.date.as_deref(), Some("1980-01-15T00:00:00Z"));

        let url = props.iter().find(|p| p.key == "url").unwrap();
        assert_eq!(url.url.as_deref(), Some("https://example.com/john"));
    }

    #[test]
    fn test_build_properties_omits_unnamed() {
        let contact = Contact {
            phones: vec!["555-123-4567".to_string()],
            ..Contact::default()
        };
        let props = build_properties(&contact, &slot_keys("phone", 1), &[]);
        assert_eq!(keys(&props), vec!["phone"]);

        let record = build_record(&contact, &slot_keys("phone", 1), &[]);
        assert_eq!(record.name, UNNAMED_CONTACT);
    }

    #[test]
    fn test_contact_from_properties() {
        let props = vec![
            Property::text("name", "Ana López"),
            Property::text("given_name", "Ana"),
            Property::email("email", "ana@example.com"),
            Property::email("email2", ""),
            Property::phone("phone3", "+34 612 345 678"),
            Property::url("url", "https://ana.example.com"),
            Property::text("city", "Madrid"),
            Property::text("address", "Gran Vía 1"),
            Property::date("birthday", "1990-05-01T00:00:00Z"),
            Property::text("favourite_color", "blue"),
        ];

        let contact = contact_from_properties(Some("obj-1"), &props);
        assert_eq!(contact.object_id.as_deref(), Some("obj-1"));
        assert_eq!(contact.formatted_name, "Ana López");
        assert_eq!(contact.given_name, "Ana");
        assert_eq!(contact.emails, vec!["ana@example.com"]);
        assert_eq!(contact.phones, vec!["+34 612 345 678"]);
        assert_eq!(contact.urls, vec!["https://ana.example.com"]);
        assert_eq!(contact.addresses.len(), 1);
        assert_eq!(contact.addresses[0].street, "Gran Vía 1");
        assert_eq!(contact.addresses[0].city, "Madrid");
        assert_eq!(contact.birthday, "1990-05-01T00:00:00Z");
    }

    #[test]
    fn test_contact_from_record_uses_record_name() {
        let record = PropertyRecord {
            object_id: Some("obj-2".to_string()),
            name: "Bob Johnson".to_string(),
            properties: vec![Property::phone("phone", "555-333-3333")],
        };
        let contact = contact_from_record(&record);
        assert_eq!(contact.display_name(), "Bob Johnson");

        let unnamed = PropertyRecord {
            name: UNNAMED_CONTACT.to_string(),
            ..record
        };
        assert_eq!(contact_from_record(&unnamed).formatted_name, "");
    }

    #[test]
    fn test_projection_keeps_identity_keys() {
        let contact = sample_contact();
        let phone_keys = slot_keys("phone", 3);
        let email_keys = slot_keys("email", 3);
        let props = build_properties(&contact, &phone_keys, &email_keys);
        let back = contact_from_properties(None, &props);

        assert_eq!(back.display_name(), contact.display_name());
        assert_eq!(back.phones, contact.phones);
        assert_eq!(back.emails, contact.emails[..3].to_vec());
        assert!(back.note.contains("Additional emails: d@example.com"));
    }
}
