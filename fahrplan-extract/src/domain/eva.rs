//! Station code types.

use std::fmt;

/// Error returned when parsing an invalid EVA number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid EVA number: {reason}")]
pub struct InvalidEva {
    reason: &'static str,
}

/// A station's EVA number.
///
/// EVA numbers are the numeric identifiers Deutsche Bahn uses for stations
/// (e.g. `8000105` for Frankfurt (Main) Hbf). This type guarantees that any
/// `EvaNumber` is a non-empty string of ASCII digits.
///
/// # Examples
///
/// ```
/// use fahrplan_extract::domain::EvaNumber;
///
/// let fra = EvaNumber::parse("8000105").unwrap();
/// assert_eq!(fra.as_str(), "8000105");
///
/// // Surrounding whitespace from CSV cells is trimmed
/// assert_eq!(EvaNumber::parse(" 8000105 ").unwrap().as_str(), "8000105");
///
/// assert!(EvaNumber::parse("").is_err());
/// assert!(EvaNumber::parse("80A0105").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EvaNumber(String);

impl EvaNumber {
    /// Parse an EVA number, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, InvalidEva> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidEva {
                reason: "cannot be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidEva {
                reason: "must contain only ASCII digits",
            });
        }

        Ok(EvaNumber(s.to_string()))
    }

    /// Returns the EVA number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EvaNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EvaNumber({})", self.0)
    }
}

impl fmt::Display for EvaNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_eva() {
        assert!(EvaNumber::parse("8000105").is_ok());
        assert!(EvaNumber::parse("8011160").is_ok());
        assert!(EvaNumber::parse("1").is_ok());
    }

    #[test]
    fn reject_empty() {
        assert!(EvaNumber::parse("").is_err());
        assert!(EvaNumber::parse("   ").is_err());
    }

    #[test]
    fn reject_non_digits() {
        assert!(EvaNumber::parse("FRA").is_err());
        assert!(EvaNumber::parse("8000-105").is_err());
        assert!(EvaNumber::parse("8000105.0").is_err());
        assert!(EvaNumber::parse("８000105").is_err());
    }

    #[test]
    fn trims_whitespace() {
        let eva = EvaNumber::parse("\t8000105 ").unwrap();
        assert_eq!(eva.as_str(), "8000105");
    }

    #[test]
    fn display_and_debug() {
        let eva = EvaNumber::parse("8000261").unwrap();
        assert_eq!(format!("{}", eva), "8000261");
        assert_eq!(format!("{:?}", eva), "EvaNumber(8000261)");
    }
}
