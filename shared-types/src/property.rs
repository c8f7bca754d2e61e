use serde::{Deserialize, Serialize};

/// A single key/value property of a remote object-store record.
///
/// Only one of the value fields is normally set, depending on the property
/// format (text, email, phone, url or date).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl Property {
    pub fn text(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn email(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            email: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn phone(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            phone: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn url(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn date(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            date: Some(value.into()),
            ..Self::default()
        }
    }
}

/// An object-store record: its id, display name and property list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PropertyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    pub name: String,
    pub properties: Vec<Property>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_serialization_skips_unset_values() {
        let prop = Property::phone("phone2", "+1 555 123 4567");
        let json = serde_json::to_string(&prop).unwrap();
        assert_eq!(json, r#"{"key":"phone2","phone":"+1 555 123 4567"}"#);

        let parsed: Property = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, prop);
    }
}
