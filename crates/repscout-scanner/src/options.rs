//! Per-run options.

use crate::location::{CityState, MAJOR_CITIES, US_STATES};

/// Caller-supplied knobs for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Stop once this many records are accepted
    pub max_records: usize,
    /// Restrict searches to these two-letter state codes, uppercase
    pub states: Option<Vec<String>>,
    /// Use the short location and query lists
    pub test_mode: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_records: 100,
            states: None,
            test_mode: false,
        }
    }
}

impl RunOptions {
    /// Options with the given cap.
    #[must_use]
    pub fn with_max_records(max_records: usize) -> Self {
        Self {
            max_records,
            ..Self::default()
        }
    }

    /// Restrict to `states`; codes are uppercased and blanks dropped.
    #[must_use]
    pub fn states<I, S>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let states: Vec<String> = states
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        self.states = (!states.is_empty()).then_some(states);
        self
    }

    /// Enable test mode.
    #[must_use]
    pub fn test_mode(mut self, enabled: bool) -> Self {
        self.test_mode = enabled;
        self
    }

    /// Same options with a smaller cap.
    #[must_use]
    pub fn with_remaining(&self, max_records: usize) -> Self {
        Self {
            max_records,
            ..self.clone()
        }
    }

    /// Whether `state` passes the state filter.
    #[must_use]
    pub fn allows_state(&self, state: &str) -> bool {
        self.states
            .as_ref()
            .map_or(true, |states| states.iter().any(|s| s == state))
    }

    /// The first `normal` (or `test` in test mode) major cities, narrowed by
    /// the state filter.
    #[must_use]
    pub fn cities(&self, normal: usize, test: usize) -> Vec<CityState> {
        let take = if self.test_mode { test } else { normal };
        MAJOR_CITIES
            .iter()
            .take(take)
            .filter(|c| self.allows_state(c.state))
            .copied()
            .collect()
    }

    /// The state filter, or the first `normal` (`test`) states.
    #[must_use]
    pub fn search_states(&self, normal: usize, test: usize) -> Vec<String> {
        match &self.states {
            Some(states) => states.clone(),
            None => {
                let take = if self.test_mode { test } else { normal };
                US_STATES.iter().take(take).map(|s| (*s).to_string()).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_states_normalized() {
        let options = RunOptions::default().states(["tx", " ca ", ""]);
        assert_eq!(options.states, Some(vec!["TX".to_string(), "CA".to_string()]));
        assert!(options.allows_state("TX"));
        assert!(!options.allows_state("NY"));

        let options = RunOptions::default().states(Vec::<String>::new());
        assert_eq!(options.states, None);
        assert!(options.allows_state("NY"));
    }

    #[test]
    fn test_cities_respect_mode_and_filter() {
        let all = RunOptions::default();
        assert_eq!(all.cities(25, 3).len(), 25);
        assert_eq!(all.clone().test_mode(true).cities(25, 3).len(), 3);

        let texas = RunOptions::default().states(["TX"]);
        let cities: Vec<&str> = texas.cities(25, 3).iter().map(|c| c.city).collect();
        assert_eq!(cities, vec!["Houston", "San Antonio", "Dallas", "Austin"]);
    }

    #[test]
    fn test_search_states() {
        assert_eq!(RunOptions::default().search_states(10, 2).len(), 10);
        assert_eq!(
            RunOptions::default().test_mode(true).search_states(10, 2),
            vec!["AL".to_string(), "AK".to_string()]
        );
        assert_eq!(
            RunOptions::default().states(["or"]).search_states(10, 2),
            vec!["OR".to_string()]
        );
    }

    #[test]
    fn test_with_remaining_keeps_filters() {
        let options = RunOptions::with_max_records(50).states(["TX"]).test_mode(true);
        let rest = options.with_remaining(7);
        assert_eq!(rest.max_records, 7);
        assert_eq!(rest.states, options.states);
        assert!(rest.test_mode);
    }
}
