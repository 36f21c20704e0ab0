//! Person-name parsing from headings, page titles and email addresses.
//!
//! A [`NameCleaner`] strips boilerplate (job titles, the target's brand,
//! platform names) from a piece of text and splits what is left into first and
//! last name. Each strategy uses one of the presets, since a profile heading, a
//! search hit heading and a page title carry different noise.

use regex::{Regex, RegexBuilder};
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// A parsed person name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    /// Given name, capitalized
    pub first: String,
    /// Family name(s), capitalized; empty for a single-token name
    pub last: String,
}

/// Strips boilerplate from text and splits it into a name.
#[derive(Debug, Clone)]
pub struct NameCleaner {
    strip: Vec<Regex>,
    input_chars: Option<RangeInclusive<usize>>,
    token_chars: RangeInclusive<usize>,
    single_token_min: usize,
}

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("valid name pattern")
}

fn consultant_titles() -> [Regex; 2] {
    [ci(r"independent (?:beauty )?consultant"), ci(r"consultant")]
}

impl NameCleaner {
    /// Cleaner with no strip rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strip: Vec::new(),
            input_chars: None,
            token_chars: 2..=usize::MAX,
            single_token_min: 2,
        }
    }

    /// Remove every case-insensitive match of `pattern`.
    pub fn strip_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.strip.push(RegexBuilder::new(pattern).case_insensitive(true).build()?);
        Ok(self)
    }

    /// Remove every case-insensitive occurrence of `text`.
    #[must_use]
    pub fn strip_literal(mut self, text: &str) -> Self {
        if !text.trim().is_empty() {
            self.strip.push(ci(&regex::escape(text.trim())));
        }
        self
    }

    /// Only consider inputs whose trimmed length is within `range`.
    #[must_use]
    pub fn input_chars(mut self, range: RangeInclusive<usize>) -> Self {
        self.input_chars = Some(range);
        self
    }

    /// Keep only tokens whose length is within `range`.
    #[must_use]
    pub fn token_chars(mut self, range: RangeInclusive<usize>) -> Self {
        self.token_chars = range;
        self
    }

    /// A lone remaining token must be at least this long.
    #[must_use]
    pub fn single_token_min(mut self, min: usize) -> Self {
        self.single_token_min = min;
        self
    }

    /// Cleaner for a heading on a locator profile page.
    #[must_use]
    pub fn profile_heading(target_name: &str) -> Self {
        let mut cleaner = Self::new()
            .input_chars(3..=49)
            .token_chars(2..=usize::MAX)
            .single_token_min(3);
        cleaner.strip.extend(consultant_titles());
        cleaner.strip_literal(target_name)
    }

    /// Cleaner for a heading on a page found through a search engine.
    #[must_use]
    pub fn search_heading(target_name: &str) -> Self {
        let mut cleaner = Self::new().token_chars(2..=19);
        cleaner.strip.push(consultant_titles()[0].clone());
        cleaner = cleaner.strip_literal(target_name);
        cleaner.strip.push(ci(r#"['"]s?\s*(?:website|site|page)"#));
        cleaner
    }

    /// Cleaner for a document title such as `Jane Doe - Brand | Facebook`.
    #[must_use]
    pub fn page_title(target_name: &str) -> Self {
        let mut cleaner = Self::new().token_chars(2..=19);
        cleaner.strip.push(ci(r"\s*[-|–]\s*.*"));
        cleaner.strip.push(ci(r"facebook"));
        cleaner = cleaner.strip_literal(target_name);
        cleaner.strip.extend(consultant_titles());
        cleaner.strip.push(ci(r"'s?\s*(?:page|website|site)?"));
        cleaner
    }

    /// Parse a name out of `text`, or `None` when nothing usable remains.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<ParsedName> {
        let text = text.trim();
        if let Some(range) = &self.input_chars {
            if !range.contains(&text.chars().count()) {
                return None;
            }
        }

        let mut cleaned = text.to_string();
        for rule in &self.strip {
            cleaned = rule.replace_all(&cleaned, " ").into_owned();
        }

        let tokens: Vec<&str> = cleaned
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| c.is_ascii_punctuation()))
            .filter(|t| self.token_chars.contains(&t.chars().count()))
            .collect();

        match tokens.as_slice() {
            [] => None,
            [only] if only.chars().count() < self.single_token_min => None,
            [only] => Some(ParsedName {
                first: capitalize(only),
                last: String::new(),
            }),
            [first, rest @ ..] => Some(ParsedName {
                first: capitalize(first),
                last: rest.iter().map(|t| capitalize(t)).collect::<Vec<_>>().join(" "),
            }),
        }
    }
}

impl Default for NameCleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Uppercase the first character and lowercase the rest.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn local_part_separators() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[._-]").expect("valid pattern"))
}

/// Guess a name from an address like `jane.doe@host`.
///
/// Needs at least two local-part segments longer than one character.
#[must_use]
pub fn name_from_email(email: &str) -> Option<ParsedName> {
    let (local, _) = email.split_once('@')?;
    let parts: Vec<&str> = local_part_separators()
        .split(local)
        .filter(|p| p.chars().count() > 1)
        .collect();
    match parts.as_slice() {
        [first, second, ..] => Some(ParsedName {
            first: capitalize(first),
            last: capitalize(second),
        }),
        _ => None,
    }
}
