//! Email address validation shared by every form endpoint.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::domain::error::DomainError;

// Deliberately loose: one `@`, no whitespace, a dot somewhere in the
// domain part. Deliverability is the mail provider's problem.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern"));

/// A syntactically plausible email address, trimmed and lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("email is required"));
        }
        if !EMAIL_RE.is_match(&normalized) {
            return Err(DomainError::validation("invalid email address"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        let email = EmailAddress::parse("Collector@Example.COM").unwrap();
        assert_eq!(email.as_str(), "collector@example.com");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let email = EmailAddress::parse("  bidder@zyborn.art \n").unwrap();
        assert_eq!(email.as_str(), "bidder@zyborn.art");
    }

    #[test]
    fn rejects_malformed_addresses() {
        for raw in ["", "   ", "no-at-sign", "two@@example.com", "a@b", "a b@example.com"] {
            assert!(EmailAddress::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }
}
