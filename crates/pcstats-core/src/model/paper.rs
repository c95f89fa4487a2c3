#![allow(clippy::module_name_repetitions)]

use std::{fmt, str::FromStr};

/// Globally unique paper identifier: cycle number plus in-cycle paper number.
///
/// Rendered as a single `"<cycle>-<number>"` token (e.g. `"2-57"`) so paper
/// identifiers stay unique when a venue runs multiple submission cycles.
/// Ordering is numeric on `(cycle, number)`, never lexical on the rendered
/// string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaperKey {
    pub cycle: u32,
    pub number: u32,
}

impl PaperKey {
    #[must_use]
    pub const fn new(cycle: u32, number: u32) -> Self {
        Self { cycle, number }
    }
}

impl fmt::Display for PaperKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.cycle, self.number)
    }
}

/// Error returned when parsing a `"<cycle>-<number>"` token fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid paper key '{raw}': expected '<cycle>-<number>' with numeric parts")]
pub struct ParsePaperKeyError {
    pub raw: String,
}

impl FromStr for PaperKey {
    type Err = ParsePaperKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePaperKeyError { raw: s.to_string() };
        let (cycle, number) = s.split_once('-').ok_or_else(err)?;
        Ok(Self {
            cycle: cycle.parse().map_err(|_| err())?,
            number: number.parse().map_err(|_| err())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::PaperKey;
    use std::str::FromStr;

    #[test]
    fn display_renders_cycle_dash_number() {
        assert_eq!(PaperKey::new(2, 57).to_string(), "2-57");
        assert_eq!(PaperKey::new(1, 104).to_string(), "1-104");
    }

    #[test]
    fn parse_roundtrips() {
        for key in [PaperKey::new(1, 1), PaperKey::new(2, 57), PaperKey::new(10, 0)] {
            let reparsed = PaperKey::from_str(&key.to_string()).expect("roundtrip parses");
            assert_eq!(key, reparsed);
        }
    }

    #[test]
    fn parse_rejects_damage() {
        assert!(PaperKey::from_str("57").is_err());
        assert!(PaperKey::from_str("2-").is_err());
        assert!(PaperKey::from_str("-57").is_err());
        assert!(PaperKey::from_str("two-57").is_err());
        assert!(PaperKey::from_str("").is_err());
    }

    #[test]
    fn ordering_is_numeric_not_lexical() {
        // Lexically "1-9" > "1-10"; numerically it is smaller.
        assert!(PaperKey::new(1, 9) < PaperKey::new(1, 10));
        assert!(PaperKey::new(1, 104) < PaperKey::new(2, 3));

        let mut keys = vec![
            PaperKey::new(2, 3),
            PaperKey::new(1, 10),
            PaperKey::new(1, 9),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                PaperKey::new(1, 9),
                PaperKey::new(1, 10),
                PaperKey::new(2, 3),
            ]
        );
    }
}
