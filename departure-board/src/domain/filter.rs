//! Destination filtering for the departure list.

use std::sync::LazyLock;

use regex::Regex;

use super::Departure;

/// Place name used by the Helsinki-only toggle.
pub const HELSINKI: &str = "helsinki";

static HELSINKI_RULE: LazyLock<DestinationRule> = LazyLock::new(|| DestinationRule::new(HELSINKI));

/// Case-insensitive whole-word match against a departure's destination.
///
/// "Helsinki" and "HELSINKI asema" match the pattern `helsinki`;
/// "Helsinkiläinen" does not. Word boundaries are Unicode-aware so
/// Finnish letters count as part of a word.
#[derive(Debug, Clone)]
pub struct DestinationRule {
    regex: Regex,
}

impl DestinationRule {
    /// Compile a rule for a place name. The name is matched literally.
    pub fn new(place: &str) -> Self {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(place));
        // SAFETY: the place name is escaped, so the pattern is always valid
        let regex = Regex::new(&pattern).unwrap();
        Self { regex }
    }

    /// Whether the departure's destination contains the place as a word.
    ///
    /// A departure without a destination never matches.
    pub fn matches(&self, departure: &Departure) -> bool {
        departure
            .destination
            .as_deref()
            .is_some_and(|dest| self.regex.is_match(dest))
    }
}

/// Match a departure's destination against a place name.
pub fn is_destination_match(departure: &Departure, pattern: &str) -> bool {
    if pattern.eq_ignore_ascii_case(HELSINKI) {
        return HELSINKI_RULE.matches(departure);
    }
    DestinationRule::new(pattern).matches(departure)
}

/// Departures to show for the current toggle state.
///
/// Identity when the filter is off; otherwise the Helsinki-bound
/// departures in their original order.
pub fn visible_departures(departures: &[Departure], helsinki_only: bool) -> Vec<Departure> {
    if !helsinki_only {
        return departures.to_vec();
    }
    departures
        .iter()
        .filter(|d| HELSINKI_RULE.matches(d))
        .cloned()
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{DateTime, Duration};
    use proptest::prelude::*;

    fn destination() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("Helsinki".to_string())),
            Just(Some("helsinki".to_string())),
            Just(Some("Lahti".to_string())),
            Just(Some("Kerava".to_string())),
            Just(Some("Helsinkiläinen".to_string())),
            "[A-Za-z ]{0,12}".prop_map(Some),
        ]
    }

    fn departures() -> impl Strategy<Value = Vec<Departure>> {
        proptest::collection::vec(destination(), 0..12).prop_map(|dests| {
            let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
            dests
                .into_iter()
                .enumerate()
                .map(|(i, destination)| {
                    let mut d = Departure::new(base + Duration::minutes(i as i64))
                        .with_line(format!("L{i}"));
                    d.destination = destination;
                    d
                })
                .collect()
        })
    }

    proptest! {
        /// Filter off returns the list unchanged
        #[test]
        fn identity_when_off(deps in departures()) {
            prop_assert_eq!(visible_departures(&deps, false), deps);
        }

        /// Filter on yields an order-preserving subsequence of matches
        #[test]
        fn subsequence_when_on(deps in departures()) {
            let visible = visible_departures(&deps, true);
            let re = Regex::new(r"(?i)\bhelsinki\b").unwrap();

            let expected: Vec<Departure> = deps
                .iter()
                .filter(|d| d.destination.as_deref().is_some_and(|s| re.is_match(s)))
                .cloned()
                .collect();
            prop_assert_eq!(visible, expected);
        }
    }
}
