//! Extraction toolkit.
//!
//! Pure functions over page text: email discovery with obfuscation handling,
//! phone normalization, social profile links, plus the randomized pause used
//! between page actions.

use crate::record::{SocialLinks, SocialPlatform};
use rand::Rng;
use regex::Regex;
use repscout_core::config::DelayRange;
use repscout_core::RecordId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

/// Characters of surrounding text kept on each side of an email.
const CONTEXT_RADIUS: usize = 50;

/// How much an email's spelling on the page can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Heavily obfuscated, reassembled from parts
    Low,
    /// Spaced out or partially obfuscated
    Medium,
    /// Written as a plain address
    High,
}

/// An email found in page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedEmail {
    /// Normalized lowercase address
    pub email: String,
    /// Trust in the spelling
    pub confidence: Confidence,
    /// Page the text came from
    pub source: String,
    /// Surrounding text
    pub context: String,
}

struct EmailPattern {
    regex: Regex,
    confidence: Confidence,
}

fn email_patterns() -> &'static [EmailPattern] {
    static PATTERNS: OnceLock<Vec<EmailPattern>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                Confidence::High,
            ),
            (
                r"\b[A-Za-z0-9._%+-]+\s+@\s*[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b|\b[A-Za-z0-9._%+-]+\s*@\s+[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                Confidence::Medium,
            ),
            (
                r"(?i)\b[A-Za-z0-9._%+-]+\s*[\[(]at[\])]\s*[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
                Confidence::Medium,
            ),
            (
                r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\s*[\[(]dot[\])]\s*[A-Za-z0-9-]+)+\b",
                Confidence::Medium,
            ),
            (
                r"(?i)\b[A-Za-z0-9._%+-]+\s*[\[(]at[\])]\s*[A-Za-z0-9-]+(?:\s*[\[(]dot[\])]\s*[A-Za-z0-9-]+)+\b",
                Confidence::Low,
            ),
        ]
        .into_iter()
        .map(|(pattern, confidence)| EmailPattern {
            regex: Regex::new(pattern).expect("valid email pattern"),
            confidence,
        })
        .collect()
    })
}

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("valid pattern"))
}

fn at_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)\s*[\[(]at[\])]\s*")
}

fn dot_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"(?i)\s*[\[(]dot[\])]\s*")
}

/// Rewrite an obfuscated address into plain lowercase form.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let with_at = at_token().replace_all(&lowered, "@");
    let with_dot = dot_token().replace_all(&with_at, ".");
    with_dot.chars().filter(|c| !c.is_whitespace()).collect()
}

const ROLE_LOCAL_PARTS: &[&str] = &[
    "noreply",
    "no-reply",
    "donotreply",
    "support",
    "info",
    "admin",
    "webmaster",
    "contact",
    "sales",
    "help",
];

const ASSET_SUFFIXES: &[&str] = &[".png", ".jpg", ".jpeg", ".gif", ".svg", ".css", ".js"];

const PLACEHOLDER_HOSTS: &[&str] = &["test", "localhost", "sentry"];

const SUSPICIOUS_TLDS: &[&str] = &[".test", ".local", ".invalid", ".example"];

/// Corporate domains of the catalog's parent companies; addresses there are
/// never an individual's.
const COMPANY_DOMAINS: &[&str] = &[
    "marykay.com",
    "avon.com",
    "tupperware.com",
    "pamperedchef.com",
    "scentsy.com",
    "youngliving.com",
    "doterra.com",
    "herbalife.com",
    "amway.com",
];

const PERSONAL_DOMAINS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "aol.com",
    "icloud.com",
    "me.com",
    "mail.com",
    "protonmail.com",
    "zoho.com",
    "ymail.com",
    "live.com",
    "msn.com",
    "comcast.net",
    "verizon.net",
    "att.net",
    "sbcglobal.net",
    "cox.net",
    "charter.net",
];

fn email_format() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
}

fn hash_like() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    regex(&RE, r"^[a-f0-9]{32,}@")
}

/// Whether a normalized address is plausible as an individual's contact.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if !email_format().is_match(email) {
        return false;
    }
    let lower = email.to_lowercase();
    let Some((local, domain)) = lower.rsplit_once('@') else {
        return false;
    };

    if ROLE_LOCAL_PARTS.contains(&local) {
        return false;
    }
    if ASSET_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix)) {
        return false;
    }
    if PLACEHOLDER_HOSTS
        .iter()
        .any(|host| domain.starts_with(&format!("{host}.")))
    {
        return false;
    }
    if hash_like().is_match(&lower) {
        return false;
    }
    if COMPANY_DOMAINS.contains(&domain) {
        return false;
    }
    !SUSPICIOUS_TLDS.iter().any(|tld| domain.ends_with(tld))
}

/// Whether the address is on a consumer mail provider.
#[must_use]
pub fn is_personal_email(email: &str) -> bool {
    email
        .rsplit_once('@')
        .is_some_and(|(_, domain)| PERSONAL_DOMAINS.contains(&domain.to_lowercase().as_str()))
}

/// Find every valid email in `text`, deduplicated by normalized form.
///
/// Plain spellings are scanned first so an address that appears both plainly
/// and obfuscated keeps the higher confidence.
#[must_use]
pub fn extract_emails(text: &str, source: &str) -> Vec<ExtractedEmail> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for pattern in email_patterns() {
        for m in pattern.regex.find_iter(text) {
            let email = normalize_email(m.as_str());
            if !is_valid_email(&email) || !seen.insert(email.clone()) {
                continue;
            }
            found.push(ExtractedEmail {
                email,
                confidence: pattern.confidence,
                source: source.to_string(),
                context: context_window(text, m.start(), m.end()),
            });
        }
    }

    found
}

fn context_window(text: &str, start: usize, end: usize) -> String {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_RADIUS - 1)
        .map_or(0, |(i, _)| i);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_RADIUS)
        .map_or(text.len(), |(i, _)| end + i);

    let snippet = text[from..to].split_whitespace().collect::<Vec<_>>().join(" ");
    let prefix = if from > 0 { "..." } else { "" };
    let suffix = if to < text.len() { "..." } else { "" };
    format!("{prefix}{snippet}{suffix}")
}

fn phone_patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"\+1[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid pattern"),
            Regex::new(r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("valid pattern"),
        ]
    })
}

/// Find US phone numbers, formatted `(xxx) xxx-xxxx` and deduplicated.
///
/// Digit runs that continue past the match (timestamps, ids) are ignored.
#[must_use]
pub fn extract_phones(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut phones = Vec::new();

    for pattern in phone_patterns() {
        for m in pattern.find_iter(text) {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            if before.is_some_and(|c| c.is_ascii_digit()) || after.is_some_and(|c| c.is_ascii_digit()) {
                continue;
            }
            let Some(phone) = format_phone(m.as_str()) else {
                continue;
            };
            if seen.insert(phone.clone()) {
                phones.push(phone);
            }
        }
    }

    phones
}

/// Format a raw number as `(xxx) xxx-xxxx`; `None` unless it has ten digits
/// or eleven starting with the country code.
#[must_use]
pub fn format_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    let national = match digits.len() {
        10 => digits.as_str(),
        11 if digits.starts_with('1') => &digits[1..],
        _ => return None,
    };
    Some(format!(
        "({}) {}-{}",
        &national[..3],
        &national[3..6],
        &national[6..]
    ))
}

fn social_patterns() -> &'static [(SocialPlatform, Regex)] {
    static PATTERNS: OnceLock<Vec<(SocialPlatform, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (
                SocialPlatform::Facebook,
                r"(?i)https?://(?:www\.)?facebook\.com/[a-zA-Z0-9._-]+",
            ),
            (
                SocialPlatform::Instagram,
                r"(?i)https?://(?:www\.)?instagram\.com/[a-zA-Z0-9._]+",
            ),
            (
                SocialPlatform::Linkedin,
                r"(?i)https?://(?:www\.)?linkedin\.com/(?:in|company)/[a-zA-Z0-9._-]+",
            ),
            (
                SocialPlatform::Twitter,
                r"(?i)https?://(?:www\.)?(?:twitter|x)\.com/[a-zA-Z0-9_]+",
            ),
            (
                SocialPlatform::Pinterest,
                r"(?i)https?://(?:www\.)?pinterest\.com/[a-zA-Z0-9._-]+",
            ),
            (
                SocialPlatform::Youtube,
                r"(?i)https?://(?:www\.)?youtube\.com/(?:c|channel|user)/[a-zA-Z0-9._-]+",
            ),
            (
                SocialPlatform::Tiktok,
                r"(?i)https?://(?:www\.)?tiktok\.com/@[a-zA-Z0-9._-]+",
            ),
        ]
        .into_iter()
        .map(|(platform, pattern)| (platform, Regex::new(pattern).expect("valid social pattern")))
        .collect()
    })
}

/// First profile link per platform found in `html`.
#[must_use]
pub fn extract_social_links(html: &str) -> SocialLinks {
    social_patterns()
        .iter()
        .filter_map(|(platform, regex)| {
            regex
                .find(html)
                .map(|m| (*platform, m.as_str().to_string()))
        })
        .collect()
}

/// Sleep for a uniformly random duration within `range`.
pub async fn random_delay(range: DelayRange) {
    let ms = if range.max_ms > range.min_ms {
        rand::thread_rng().gen_range(range.min_ms..=range.max_ms)
    } else {
        range.min_ms
    };
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Stable record identifier for a person at a target.
#[must_use]
pub fn generate_id(target_name: &str, first_name: &str, last_name: &str) -> RecordId {
    RecordId::derive(target_name, first_name, last_name)
}
