//! Collected records and per-run results.

use repscout_core::{RecordId, Timestamp};
use repscout_targets::TargetConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Social platforms recognized in page markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    /// facebook.com
    Facebook,
    /// instagram.com
    Instagram,
    /// linkedin.com
    Linkedin,
    /// twitter.com / x.com
    Twitter,
    /// pinterest.com
    Pinterest,
    /// youtube.com
    Youtube,
    /// tiktok.com
    Tiktok,
}

impl SocialPlatform {
    /// Every platform, in display order.
    pub const ALL: [Self; 7] = [
        Self::Facebook,
        Self::Instagram,
        Self::Linkedin,
        Self::Twitter,
        Self::Pinterest,
        Self::Youtube,
        Self::Tiktok,
    ];

    /// Lowercase platform name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Facebook => "facebook",
            Self::Instagram => "instagram",
            Self::Linkedin => "linkedin",
            Self::Twitter => "twitter",
            Self::Pinterest => "pinterest",
            Self::Youtube => "youtube",
            Self::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for SocialPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile links keyed by platform.
pub type SocialLinks = BTreeMap<SocialPlatform, String>;

/// Fields a strategy managed to pull off a page, before acceptance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    /// Given name
    pub first_name: Option<String>,
    /// Family name
    pub last_name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Formatted phone number
    pub phone: Option<String>,
    /// City
    pub city: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    /// Five-digit ZIP code
    pub zip_code: Option<String>,
    /// Page the data was read from
    pub profile_url: Option<String>,
    /// Personal site
    pub personal_website: Option<String>,
    /// Social profiles
    pub social_links: SocialLinks,
}

impl CandidateRecord {
    /// A candidate needs at least a name or an email to be kept.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        let has = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        has(&self.first_name) || has(&self.last_name) || has(&self.email)
    }
}

/// An accepted record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Deterministic identity over target and name
    pub id: RecordId,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Contact email, lowercase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Formatted phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Display name of the target the record belongs to
    pub company: String,
    /// City
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Two-letter state code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Five-digit ZIP code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    /// Page the data was read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
    /// Personal site
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personal_website: Option<String>,
    /// Social profiles
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub social_links: SocialLinks,
    /// When the record was accepted
    pub scraped_at: Timestamp,
    /// Base URL of the target
    pub source: String,
}

impl Record {
    /// Build a record from a candidate, stamping identity and provenance.
    #[must_use]
    pub fn from_candidate(candidate: CandidateRecord, target: &TargetConfig) -> Self {
        let first_name = candidate.first_name.unwrap_or_default();
        let last_name = candidate.last_name.unwrap_or_default();
        Self {
            id: RecordId::derive(&target.name, &first_name, &last_name),
            first_name,
            last_name,
            email: candidate.email.map(|e| e.trim().to_lowercase()),
            phone: candidate.phone,
            company: target.name.clone(),
            city: candidate.city,
            state: candidate.state,
            zip_code: candidate.zip_code,
            profile_url: candidate.profile_url,
            personal_website: candidate.personal_website,
            social_links: candidate.social_links,
            scraped_at: Timestamp::now(),
            source: target.base_url.clone(),
        }
    }

    /// Case-insensitive deduplication key.
    #[must_use]
    pub fn email_key(&self) -> Option<String> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_lowercase)
    }

    /// "First Last", trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Outcome of one run against one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Target display name
    pub target: String,
    /// Whether the run accomplished any of its work
    pub success: bool,
    /// Accepted record count
    pub records_found: usize,
    /// Accepted records carrying an email
    pub emails_found: usize,
    /// Non-fatal and fatal errors, prefixed with the target name
    pub errors: Vec<String>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Accepted records
    pub records: Vec<Record>,
}

impl RunResult {
    /// Build a result, deriving the counts from `records`.
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        success: bool,
        records: Vec<Record>,
        errors: Vec<String>,
        duration: Duration,
    ) -> Self {
        Self {
            target: target.into(),
            success,
            records_found: records.len(),
            emails_found: records.iter().filter(|r| r.email_key().is_some()).count(),
            errors,
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
            records,
        }
    }

    /// Run duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
