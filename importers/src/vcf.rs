use ical::parser::vcard::component::VcardContact;
use ical::property::Property;
use shared_types::{Address, Contact, ImportError};
use std::fs;
use std::path::Path;

/// Decodes vCard (2.1, 3.0 and 4.0) text into contacts.
///
/// Content lines are read by `ical`. Values are kept as written apart from
/// quoted-printable decoding, vCard escaping and the `mailto:` / `tel:` URI
/// prefixes; no normalization happens here.
pub struct VcfParser;

impl VcfParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &[u8], filename: &str) -> Result<Vec<Contact>, ImportError> {
        let content_str = String::from_utf8(content.to_vec())
            .map_err(|e| ImportError::Parse(format!("{} is not valid UTF-8: {}", filename, e)))?;

        if content_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        if !content_str.to_ascii_uppercase().contains("BEGIN:VCARD") {
            return Err(ImportError::InvalidInput(format!(
                "{} contains no BEGIN:VCARD",
                filename
            )));
        }

        let reader = ical::VcardParser::new(content_str.as_bytes());
        let mut contacts = Vec::new();

        for card in reader {
            let card = card.map_err(|e| ImportError::Parse(format!("{}: {}", filename, e)))?;

            match self.parse_vcard(&card) {
                Some(contact) => contacts.push(contact),
                None => tracing::debug!("Dropping empty vCard in {}", filename),
            }
        }

        Ok(contacts)
    }

    fn parse_vcard(&self, card: &VcardContact) -> Option<Contact> {
        let mut contact = Contact::default();
        let mut has_fields = false;

        for prop in &card.properties {
            let Some(raw) = prop.value.as_deref() else {
                continue;
            };

            // Groups (item1.EMAIL) carry no meaning here
            let name = prop.name.rsplit('.').next().unwrap_or_default().to_uppercase();

            let decoded = if is_quoted_printable(prop) {
                decode_quoted_printable(raw)
            } else {
                raw.to_string()
            };
            let value = decoded.trim();
            if value.is_empty() {
                continue;
            }

            match name.as_str() {
                "FN" => set_once(&mut contact.formatted_name, unescape(value)),
                "N" => {
                    let parts = split_components(value);
                    let part = |i: usize| parts.get(i).cloned().unwrap_or_default();
                    set_once(&mut contact.family_name, part(0));
                    set_once(&mut contact.given_name, part(1));
                    set_once(&mut contact.middle_name, part(2));
                    set_once(&mut contact.prefix, part(3));
                    set_once(&mut contact.suffix, part(4));
                }
                "EMAIL" => push_value(&mut contact.emails, strip_scheme(value, "mailto:")),
                "TEL" => push_value(&mut contact.phones, strip_scheme(value, "tel:")),
                "URL" => push_value(&mut contact.urls, unescape(value)),
                "ADR" => {
                    if let Some(address) = parse_address(value) {
                        contact.addresses.push(address);
                    }
                }
                "ORG" => {
                    let org = split_components(value).into_iter().next().unwrap_or_default();
                    set_once(&mut contact.organization, org);
                }
                "TITLE" => set_once(&mut contact.title, unescape(value)),
                "NOTE" => set_once(&mut contact.note, unescape(value)),
                "BDAY" => set_once(&mut contact.birthday, value.to_string()),
                "PHOTO" => set_once(&mut contact.photo, value.to_string()),
                _ => continue,
            }

            has_fields = true;
        }

        has_fields.then_some(contact)
    }
}

impl Default for VcfParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads and decodes a vCard file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Contact>, ImportError> {
    let path = path.as_ref();
    let content = fs::read(path)?;
    VcfParser::new().parse(&content, &path.display().to_string())
}

/// vCard 2.1 `ENCODING=QUOTED-PRINTABLE` parameter.
fn is_quoted_printable(prop: &Property) -> bool {
    prop.params.iter().flatten().any(|(key, values)| {
        key.eq_ignore_ascii_case("ENCODING")
            && values.iter().any(|v| v.eq_ignore_ascii_case("QUOTED-PRINTABLE"))
    })
}

/// Decodes `=XX` hex escapes as UTF-8 bytes. Malformed escapes are kept
/// verbatim.
fn decode_quoted_printable(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'=' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(byte) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                out.push(byte);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Splits a structured value on unescaped `;` and unescapes each component.
fn split_components(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                current.push(c);
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            ';' => parts.push(unescape(&std::mem::take(&mut current))),
            _ => current.push(c),
        }
    }
    parts.push(unescape(&current));

    parts
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out.trim().to_string()
}

fn parse_address(value: &str) -> Option<Address> {
    let parts = split_components(value);
    let part = |i: usize| parts.get(i).cloned().unwrap_or_default();

    let mut street = part(2);
    if street.is_empty() {
        street = part(1);
    }

    let address = Address {
        full: street.clone(),
        street,
        city: part(3),
        region: part(4),
        postal_code: part(5),
        country: part(6),
    };

    if address.parts().is_empty() {
        return None;
    }
    Some(address)
}

fn strip_scheme(value: &str, scheme: &str) -> String {
    let value = unescape(value);
    match value.get(..scheme.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(scheme) => {
            value[scheme.len()..].trim().to_string()
        }
        _ => value,
    }
}

fn set_once(field: &mut String, value: String) {
    if field.is_empty() {
        *field = value;
    }
}

fn push_value(values: &mut Vec<String>, value: String) {
    if !value.is_empty() {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_VCF: &str = r#"BEGIN:VCARD
VERSION:3.0
FN:John Doe
N:Doe;John;Quincy;Dr.;PhD
EMAIL;TYPE=work:john@example.com
EMAIL;TYPE=home:mailto:John.Doe@Gmail.com
TEL;TYPE=cell:+1 555 123 4567
TEL;VALUE=uri:tel:+1-555-987-6543
ORG:Acme Corp;Engineering
TITLE:Principal Engineer
ADR;TYPE=work:;;1 Main St;Springfield;IL;62701;USA
URL:https://example.com/john
BDAY:19800115
NOTE:Met at RustConf\, 2023\nLikes coffee
END:VCARD"#;

    #[test]
    fn test_parse_vcf() {
        let parser = VcfParser::new();
        let contacts = parser.parse(SAMPLE_VCF.as_bytes(), "contact.vcf").unwrap();

        assert_eq!(contacts.len(), 1);

        let contact = &contacts[0];
        assert_eq!(contact.formatted_name, "John Doe");
        assert_eq!(contact.family_name, "Doe");
        assert_eq!(contact.given_name, "John");
        assert_eq!(contact.middle_name, "Quincy");
        assert_eq!(contact.prefix, "Dr.");
        assert_eq!(contact.suffix, "PhD");
        assert_eq!(contact.emails, vec!["john@example.com", "John.Doe@Gmail.com"]);
        assert_eq!(contact.phones, vec!["+1 555 123 4567", "+1-555-987-6543"]);
        assert_eq!(contact.organization, "Acme Corp");
        assert_eq!(contact.title, "Principal Engineer");
        assert_eq!(contact.urls, vec!["https://example.com/john"]);
        assert_eq!(contact.birthday, "19800115");
        assert_eq!(contact.note, "Met at RustConf, 2023\nLikes coffee");

        assert_eq!(contact.addresses.len(), 1);
        let address = &contact.addresses[0];
        assert_eq!(address.street, "1 Main St");
        assert_eq!(address.city, "Springfield");
        assert_eq!(address.region, "IL");
        assert_eq!(address.postal_code, "62701");
        assert_eq!(address.country, "USA");
        assert_eq!(address.full, "1 Main St");
    }

    #[test]
    fn test_parse_multiple_vcards() {
        let multi_vcf = "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Alice Smith\r\nEMAIL:alice@example.com\r\nEND:VCARD\r\nBEGIN:VCARD\r\nVERSION:3.0\r\nFN:Bob Jones\r\nEMAIL:bob@example.com\r\nEND:VCARD\r\n";

        let parser = VcfParser::new();
        let contacts = parser.parse(multi_vcf.as_bytes(), "contacts.vcf").unwrap();

        assert_eq!(contacts.len(), 2);
        assert_eq!(contacts[0].formatted_name, "Alice Smith");
        assert_eq!(contacts[1].formatted_name, "Bob Jones");
        assert_eq!(contacts[1].emails, vec!["bob@example.com"]);
    }

    #[test]
    fn test_folded_lines_and_groups() {
        let vcf = "BEGIN:VCARD\nVERSION:4.0\nFN:Very Long\n  Name\nitem1.EMAIL;type=INTERNET:grouped@example.com\nitem1.X-ABLabel:Work\nEND:VCARD\n";

        let contacts = VcfParser::new().parse(vcf.as_bytes(), "folded.vcf").unwrap();
        assert_eq!(contacts[0].formatted_name, "Very Long Name");
        assert_eq!(contacts[0].emails, vec!["grouped@example.com"]);
    }

    #[test]
    fn test_card_without_name_is_kept() {
        let vcf = "BEGIN:VCARD\nVERSION:3.0\nTEL:555-123-4567\nEND:VCARD\nBEGIN:VCARD\nVERSION:3.0\nEND:VCARD\n";

        let contacts = VcfParser::new().parse(vcf.as_bytes(), "nameless.vcf").unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].display_name(), shared_types::UNNAMED_CONTACT);
        assert_eq!(contacts[0].phones, vec!["555-123-4567"]);
    }

    #[test]
    fn test_address_street_falls_back_to_extended() {
        let vcf = "BEGIN:VCARD\nFN:A\nADR:;Suite 5;;Madrid;;28001;Spain\nADR:;;;;;;\nEND:VCARD\n";

        let contacts = VcfParser::new().parse(vcf.as_bytes(), "adr.vcf").unwrap();
        assert_eq!(contacts[0].addresses.len(), 1);
        assert_eq!(contacts[0].addresses[0].street, "Suite 5");
        assert_eq!(contacts[0].addresses[0].country, "Spain");
    }

    #[test]
    fn test_quoted_printable_values_are_decoded() {
        let vcf = "BEGIN:VCARD\r\nVERSION:2.1\r\nFN;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:Jos=C3=A9 Garc=C3=ADa\r\nN;ENCODING=QUOTED-PRINTABLE:Garc=C3=ADa;Jos=C3=A9;;;\r\nNOTE:50=50 split\r\nEND:VCARD\r\n";

        let contacts = VcfParser::new().parse(vcf.as_bytes(), "legacy.vcf").unwrap();
        assert_eq!(contacts[0].formatted_name, "José García");
        assert_eq!(contacts[0].family_name, "García");
        assert_eq!(contacts[0].given_name, "José");
        // Only encoded properties are decoded
        assert_eq!(contacts[0].note, "50=50 split");
    }

    #[test]
    fn test_decode_quoted_printable_keeps_malformed_escapes() {
        assert_eq!(decode_quoted_printable("a=3Db"), "a=b");
        assert_eq!(decode_quoted_printable("100%=ZZ"), "100%=ZZ");
        assert_eq!(decode_quoted_printable("trailing="), "trailing=");
    }

    #[test]
    fn test_quoted_parameter_with_colon() {
        let vcf = "BEGIN:VCARD\nVERSION:4.0\nFN:Ana\nEMAIL;PID=\"x:1\":ana@example.com\nEND:VCARD\n";

        let contacts = VcfParser::new().parse(vcf.as_bytes(), "quoted.vcf").unwrap();
        assert_eq!(contacts[0].emails, vec!["ana@example.com"]);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let result = VcfParser::new().parse(&[0xff, 0xfe, 0x00], "broken.vcf");
        assert!(matches!(result, Err(ImportError::Parse(_))));
    }

    #[test]
    fn test_non_vcard_text_is_invalid_input() {
        let parser = VcfParser::new();
        let result = parser.parse(b"name,phone\nJohn,555\n", "contacts.csv");
        assert!(matches!(result, Err(ImportError::InvalidInput(_))));

        assert!(parser.parse(b"\n\n", "empty.vcf").unwrap().is_empty());
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE_VCF.as_bytes()).unwrap();

        let contacts = parse_file(file.path()).unwrap();
        assert_eq!(contacts.len(), 1);

        let missing = parse_file("/definitely/not/here.vcf");
        assert!(matches!(missing, Err(ImportError::Io(_))));
    }
}
