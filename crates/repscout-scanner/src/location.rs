//! Search locations and postal-address parsing.

use regex::Regex;
use std::sync::OnceLock;

/// A city and its two-letter state code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityState {
    /// City name
    pub city: &'static str,
    /// Two-letter state code
    pub state: &'static str,
}

const fn at(city: &'static str, state: &'static str) -> CityState {
    CityState { city, state }
}

/// Two-letter codes of the fifty states, alphabetical by state name.
pub const US_STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

/// Largest US cities by population, in search order.
pub const MAJOR_CITIES: [CityState; 25] = [
    at("New York", "NY"),
    at("Los Angeles", "CA"),
    at("Chicago", "IL"),
    at("Houston", "TX"),
    at("Phoenix", "AZ"),
    at("Philadelphia", "PA"),
    at("San Antonio", "TX"),
    at("San Diego", "CA"),
    at("Dallas", "TX"),
    at("Austin", "TX"),
    at("Jacksonville", "FL"),
    at("San Francisco", "CA"),
    at("Columbus", "OH"),
    at("Charlotte", "NC"),
    at("Indianapolis", "IN"),
    at("Seattle", "WA"),
    at("Denver", "CO"),
    at("Boston", "MA"),
    at("Nashville", "TN"),
    at("Detroit", "MI"),
    at("Portland", "OR"),
    at("Las Vegas", "NV"),
    at("Atlanta", "GA"),
    at("Miami", "FL"),
    at("Minneapolis", "MN"),
];

/// Whether `code` is one of [`US_STATES`].
#[must_use]
pub fn is_state_code(code: &str) -> bool {
    US_STATES.contains(&code)
}

/// Location fields found in free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLocation {
    /// City, when a "City, ST" pair was found
    pub city: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    /// Five-digit ZIP, when a "ST 12345" pair was found
    pub zip_code: Option<String>,
}

fn state_zip() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b([A-Z]{2})\s+(\d{5})\b").expect("valid pattern"))
}

fn city_state() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b([A-Z][a-z]+(?:[ ][A-Z][a-z]+){0,2}),\s*([A-Z]{2})\b").expect("valid pattern")
    })
}

/// Words that begin multi-word city names ("San Antonio", "Fort Worth").
const CITY_PREFIXES: &[&str] = &[
    "San", "Santa", "Los", "Las", "La", "El", "New", "Fort", "Saint", "St", "Salt", "Long",
    "Palm", "Grand", "Cedar", "Baton", "Corpus", "Little", "Port", "Mount", "Palo", "Sioux",
    "Des", "Boca", "Ann", "Virginia", "Colorado", "Oklahoma", "Kansas", "Jersey", "Winston",
    "North", "South", "East", "West", "Round", "Overland", "Thousand",
];

/// Words that end multi-word city names ("Round Rock", "Kansas City").
const CITY_SUFFIXES: &[&str] = &[
    "City", "Springs", "Beach", "Falls", "Park", "Heights", "Rapids", "Rock", "Lake", "Creek",
    "Valley", "Hills", "Grove", "Harbor", "Island", "Bluffs", "Oaks",
];

/// The city at the end of a run of capitalized words, so that
/// "Visit Round Rock" yields "Round Rock" and "Serving Austin" yields "Austin".
fn trim_city(words: &str) -> String {
    let words: Vec<&str> = words.split(' ').collect();
    let mut start = words.len().saturating_sub(1);
    if start > 0 && CITY_SUFFIXES.contains(&words[start]) {
        start -= 1;
    }
    while start > 0 && CITY_PREFIXES.contains(&words[start - 1]) {
        start -= 1;
    }
    words[start..].join(" ")
}

/// Find a location in visible page text.
///
/// A "ST 12345" pair wins over a "City, ST" pair. Only real state codes are
/// accepted.
#[must_use]
pub fn extract_location(text: &str) -> ParsedLocation {
    if let Some(caps) = state_zip()
        .captures_iter(text)
        .find(|caps| is_state_code(&caps[1]))
    {
        return ParsedLocation {
            city: None,
            state: Some(caps[1].to_string()),
            zip_code: Some(caps[2].to_string()),
        };
    }

    if let Some(caps) = city_state()
        .captures_iter(text)
        .find(|caps| is_state_code(&caps[2]))
    {
        return ParsedLocation {
            city: Some(trim_city(&caps[1])),
            state: Some(caps[2].to_string()),
            zip_code: None,
        };
    }

    ParsedLocation::default()
}
