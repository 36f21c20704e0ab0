//! Shared types used across repscout.
//!
//! This module defines common newtypes that provide type safety
//! and clear domain modeling.

use crate::error::RepscoutError;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use uuid::Uuid;

/// Newtype for target slugs with validation.
///
/// Slugs must be lowercase alphanumeric with hyphens, 3-50 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetSlug(String);

impl TargetSlug {
    /// Create a new `TargetSlug` from a string.
    ///
    /// # Errors
    /// Returns error if the slug doesn't match the required format.
    pub fn new(slug: impl Into<String>) -> Result<Self, RepscoutError> {
        let slug = slug.into();
        Self::validate(&slug)?;
        Ok(Self(slug))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate slug format: lowercase alphanumeric with hyphens, 3-50 chars.
    fn validate(slug: &str) -> Result<(), RepscoutError> {
        static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = SLUG_REGEX
            .get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid regex"));

        if slug.len() < 3 || slug.len() > 50 {
            return Err(RepscoutError::InvalidSlug {
                slug: slug.to_string(),
                reason: format!("must be 3-50 characters, got {}", slug.len()),
            });
        }

        if regex.is_match(slug) {
            Ok(())
        } else {
            Err(RepscoutError::InvalidSlug {
                slug: slug.to_string(),
                reason: "must be lowercase alphanumeric with hyphens".to_string(),
            })
        }
    }
}

impl fmt::Display for TargetSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TargetSlug {
    type Error = RepscoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetSlug> for String {
    fn from(slug: TargetSlug) -> Self {
        slug.0
    }
}

/// Deterministic record identifier.
///
/// Derived from the owning target's name and the person's first and last name,
/// so re-running a collection recognizes the same person by identity rather
/// than by content. Inputs are trimmed and lowercased before hashing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordId(String);

impl RecordId {
    /// Derive the identifier for a `(target, first, last)` triple.
    #[must_use]
    pub fn derive(target_name: &str, first_name: &str, last_name: &str) -> Self {
        let namespace = Uuid::new_v5(&Uuid::NAMESPACE_URL, b"https://repscout.dev/records");
        let key = format!(
            "{}|{}|{}",
            normalize(target_name),
            normalize(first_name),
            normalize(last_name)
        );
        Self(Uuid::new_v5(&namespace, key.as_bytes()).to_string())
    }

    /// Wrap an identifier read back from storage.
    #[must_use]
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize(part: &str) -> String {
    part.trim().to_lowercase()
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wrapper around `chrono::DateTime<Utc>` for consistent timestamp handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a timestamp representing the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Format as RFC3339 string.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339()
    }

    /// Compact form safe for file names, e.g. `2025-05-01T10-30-00`.
    #[must_use]
    pub fn file_stamp(&self) -> String {
        self.0.format("%Y-%m-%dT%H-%M-%S").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_slug_valid() {
        for slug in ["mary-kay", "avon", "rodan-fields", "thirty-one", "cabi"] {
            assert!(TargetSlug::new(slug).is_ok(), "Failed for: {slug}");
        }
    }

    #[test]
    fn test_target_slug_invalid() {
        let too_long = "a".repeat(51);
        let invalid = vec![
            "ab",              // Too short
            "Mary-Kay",        // Uppercase
            "mary_kay",        // Underscore
            "mary kay",        // Space
            "-avon",           // Starts with hyphen
            "avon-",           // Ends with hyphen
            too_long.as_str(), // Too long
        ];

        for slug in invalid {
            assert!(TargetSlug::new(slug).is_err(), "Should fail for: {slug}");
        }
    }

    #[test]
    fn test_target_slug_deserialize_validates() {
        let ok: TargetSlug = serde_json::from_str("\"scentsy\"").expect("valid slug");
        assert_eq!(ok.as_str(), "scentsy");

        let bad: Result<TargetSlug, _> = serde_json::from_str("\"Not A Slug\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_record_id_deterministic() {
        let a = RecordId::derive("Mary Kay", "Jane", "Doe");
        let b = RecordId::derive("Mary Kay", "Jane", "Doe");
        assert_eq!(a, b);
        assert!(uuid::Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_record_id_normalizes_case_and_whitespace() {
        assert_eq!(
            RecordId::derive("Mary Kay", "Jane", "Doe"),
            RecordId::derive(" mary kay ", "JANE", "doe ")
        );
    }

    #[test]
    fn test_record_id_distinguishes_inputs() {
        let base = RecordId::derive("Mary Kay", "Jane", "Doe");
        assert_ne!(base, RecordId::derive("Avon", "Jane", "Doe"));
        assert_ne!(base, RecordId::derive("Mary Kay", "John", "Doe"));
        assert_ne!(base, RecordId::derive("Mary Kay", "Jane", "Smith"));
        assert_ne!(
            RecordId::derive("A", "B C", ""),
            RecordId::derive("A", "B", "C")
        );
    }

    #[test]
    fn test_timestamp_rfc3339_is_utc() {
        let rendered = Timestamp::now().to_rfc3339();
        assert!(rendered.ends_with("+00:00"), "{rendered}");
        assert!(rendered.contains('T'));
    }

    #[test]
    fn test_timestamp_file_stamp_has_no_colons() {
        let stamp = Timestamp::now().file_stamp();
        assert!(!stamp.contains(':'));
        assert_eq!(stamp.len(), 19);
    }
}
