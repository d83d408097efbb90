//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. They are defined entirely by their
//! attribute values, so two value objects with the same values are equal.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
///
/// - **Value Object**: `Email("ada@example.com")`, two equal addresses are the same value
/// - **Entity**: `Contact { id: ContactId(...), .. }`, identity survives state changes
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

// local@domain.tld: no whitespace, exactly one '@', at least one dot in the domain.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("email pattern is valid")
});

/// A syntactically valid email address, normalized to trimmed lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl ValueObject for Email {}

impl Email {
    /// Parse and normalize an address.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_lowercase();
        if EMAIL_PATTERN.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(DomainError::validation("\"email\" must be a valid email"))
        }
    }

    /// True if `raw` would be accepted by [`Email::parse`].
    pub fn is_valid(raw: &str) -> bool {
        EMAIL_PATTERN.is_match(&raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = Email::parse("  Tony.Stark@Stark-Industries.COM ").unwrap();
        assert_eq!(email.as_str(), "tony.stark@stark-industries.com");
    }

    #[test]
    fn rejects_missing_at_or_domain_segment() {
        for raw in ["tony", "tony@", "@stark.com", "tony@stark", "tony@@stark.com", "to ny@stark.com", "tony@stark."] {
            assert!(Email::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn accepts_subdomains() {
        assert!(Email::is_valid("pepper@mail.stark.co.uk"));
    }

    #[test]
    fn deserialization_goes_through_parse() {
        let email: Email = serde_json::from_str("\"HAPPY@Stark.com\"").unwrap();
        assert_eq!(email.as_str(), "happy@stark.com");

        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn strings_without_at_sign_are_rejected(raw in "[a-zA-Z0-9._ -]{0,40}") {
                prop_assert!(Email::parse(&raw).is_err());
            }

            #[test]
            fn domains_without_dot_are_rejected(local in "[a-z0-9]{1,12}", domain in "[a-z0-9]{1,12}") {
                let raw = format!("{local}@{domain}");
                prop_assert!(Email::parse(&raw).is_err());
            }
        }
    }
}
