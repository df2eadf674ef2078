//! NFC chip identity for artwork authentication.

use std::fmt;

use serde::Deserialize;

use crate::domain::error::DomainError;

/// A validated NTAG216 chip UID: exactly 14 hex characters, stored
/// uppercase regardless of how the tag URL was typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChipUid(String);

impl ChipUid {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.len() != 14 || !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DomainError::validation("invalid chip identifier"));
        }
        Ok(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChipUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A registered chip row as stored in the `nfc_chips` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChipRecord {
    pub uid: String,
    pub artwork_title: Option<String>,
    pub edition_number: Option<i64>,
    pub registered_at: Option<String>,
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uppercases_on_parse() {
        let uid = ChipUid::parse("04a1b2c3d4e5f6").unwrap();
        assert_eq!(uid.as_str(), "04A1B2C3D4E5F6");
    }

    #[test]
    fn rejects_wrong_length_and_non_hex() {
        assert!(ChipUid::parse("").is_err());
        assert!(ChipUid::parse("04A1B2C3D4E5").is_err());
        assert!(ChipUid::parse("04A1B2C3D4E5F6AA").is_err());
        assert!(ChipUid::parse("04A1B2C3D4EZZZ").is_err());
    }
}
