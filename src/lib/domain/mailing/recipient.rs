//! Recipients and the fields that address them

use std::collections::HashMap;

use lettre::{message::Mailbox, Address};
use serde::{Deserialize, Serialize};

use super::errors::SendError;

/// Which recipient keys hold the To display name and address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    name: String,
    mail: String,
}

impl FieldMapping {
    /// Uses `name` and `mail` as the display name and address keys
    pub fn new(name: &str, mail: &str) -> Self {
        Self {
            name: name.to_string(),
            mail: mail.to_string(),
        }
    }

    /// The key holding the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The key holding the email address
    pub fn mail(&self) -> &str {
        &self.mail
    }
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::new("NAME", "MAIL")
    }
}

/// Per-recipient fields: the To address and the template variables
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipient(HashMap<String, String>);

impl Recipient {
    /// Looks up a field
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Builds the To mailbox from the mapped fields.
    ///
    /// The address field is required; a missing or empty name field gives a bare address.
    pub fn mailbox(&self, fields: &FieldMapping) -> Result<Mailbox, SendError> {
        let raw = self
            .get(fields.mail())
            .ok_or_else(|| SendError::MissingField(fields.mail().to_string()))?;

        let address = raw
            .trim()
            .parse::<Address>()
            .map_err(|source| SendError::InvalidAddress {
                address: raw.to_string(),
                source,
            })?;

        let name = self
            .get(fields.name())
            .filter(|name| !name.trim().is_empty())
            .map(ToString::to_string);

        Ok(Mailbox::new(name, address))
    }

    /// A label for error reports: the resolved address, or the raw field when it does not parse
    pub fn label(&self, fields: &FieldMapping) -> String {
        match (self.mailbox(fields), self.get(fields.mail())) {
            (Ok(mailbox), _) => mailbox.email.to_string(),
            (Err(_), Some(raw)) => raw.to_string(),
            (Err(_), None) => format!("<no {} field>", fields.mail()),
        }
    }
}

impl From<HashMap<String, String>> for Recipient {
    fn from(fields: HashMap<String, String>) -> Self {
        Self(fields)
    }
}

impl<K, V> FromIterator<(K, V)> for Recipient
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn test_default_fields_build_mailbox() -> TestResult {
        let recipient = Recipient::from_iter([("NAME", "Ann"), ("MAIL", "ann@x.com")]);

        let mailbox = recipient.mailbox(&FieldMapping::default())?;

        assert_eq!(mailbox.to_string(), "Ann <ann@x.com>");

        Ok(())
    }

    #[test]
    fn test_custom_fields_build_mailbox() -> TestResult {
        let recipient = Recipient::from_iter([
            ("NAME", "Wrong"),
            ("MAIL", "wrong@x.com"),
            ("FullName", "Ann Smith"),
            ("EmailAddr", "ann@x.com"),
        ]);

        let mailbox = recipient.mailbox(&FieldMapping::new("FullName", "EmailAddr"))?;

        assert_eq!(mailbox.name.as_deref(), Some("Ann Smith"));
        assert_eq!(mailbox.email.to_string(), "ann@x.com");

        Ok(())
    }

    #[test]
    fn test_missing_name_gives_bare_address() -> TestResult {
        let recipient = Recipient::from_iter([("MAIL", "ann@x.com")]);

        let mailbox = recipient.mailbox(&FieldMapping::default())?;

        assert!(mailbox.name.is_none());
        assert_eq!(mailbox.email.to_string(), "ann@x.com");

        Ok(())
    }

    #[test]
    fn test_missing_address_field() {
        let recipient = Recipient::from_iter([("NAME", "Ann")]);

        let result = recipient.mailbox(&FieldMapping::default());

        assert!(matches!(result, Err(SendError::MissingField(field)) if field == "MAIL"));
        assert_eq!(recipient.label(&FieldMapping::default()), "<no MAIL field>");
    }

    #[test]
    fn test_invalid_address() {
        let recipient = Recipient::from_iter([("MAIL", "not an address")]);

        let result = recipient.mailbox(&FieldMapping::default());

        assert!(matches!(result, Err(SendError::InvalidAddress { .. })));
    }

    #[test]
    fn test_label_uses_resolved_address() {
        let recipient = Recipient::from_iter([("NAME", "Ann"), ("MAIL", "  ann@x.com ")]);

        assert_eq!(recipient.label(&FieldMapping::default()), "ann@x.com");
    }

    #[test]
    fn test_label_falls_back_to_raw_field() {
        let recipient = Recipient::from_iter([("MAIL", "not an address")]);

        assert_eq!(recipient.label(&FieldMapping::default()), "not an address");
    }

    #[test]
    fn test_deserialize_from_json_object() -> TestResult {
        let recipient: Recipient =
            serde_json::from_str(r#"{"NAME": "Ann", "MAIL": "ann@x.com", "CODE": "42"}"#)?;

        assert_eq!(recipient.get("CODE"), Some("42"));

        Ok(())
    }
}
