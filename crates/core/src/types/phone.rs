//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty or whitespace.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("phone number must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains no digits at all.
    #[error("phone number must contain at least one digit")]
    NoDigits,
}

/// A phone number as entered by a user.
///
/// Accounts are keyed by phone number and orders are handed off to WhatsApp,
/// so this type keeps the raw user input (spaces, dashes, parentheses and a
/// leading `+` are all common) and exposes [`Phone::wa_digits`] for the
/// strict digits-and-plus form that `wa.me` links require.
///
/// ## Examples
///
/// ```
/// use mercado_barrio_core::Phone;
///
/// let phone = Phone::parse("+57 (300) 111-2233").unwrap();
/// assert_eq!(phone.wa_digits(), "+573001112233");
///
/// assert!(Phone::parse("").is_err());
/// assert!(Phone::parse("ext. office").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Maximum length of a stored phone number.
    pub const MAX_LENGTH: usize = 32;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank, longer than
    /// [`Phone::MAX_LENGTH`] characters, or contains no digits.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }
        if trimmed.len() > Self::MAX_LENGTH {
            return Err(PhoneError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if !trimmed.chars().any(|c| c.is_ascii_digit()) {
            return Err(PhoneError::NoDigits);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as entered.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The number reduced to digits and `+`, as `wa.me` URLs expect.
    #[must_use]
    pub fn wa_digits(&self) -> String {
        wa_digits(&self.0)
    }
}

/// Reduce any phone-ish string to digits and `+`.
///
/// Used directly for wire records whose phone fields were never validated.
#[must_use]
pub fn wa_digits(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_phones() {
        assert!(Phone::parse("+573001112233").is_ok());
        assert!(Phone::parse("300 111 2233").is_ok());
        assert!(Phone::parse("(300) 111-2233").is_ok());
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(Phone::parse(""), Err(PhoneError::Empty)));
        assert!(matches!(Phone::parse("   "), Err(PhoneError::Empty)));
    }

    #[test]
    fn test_parse_too_long() {
        let long = "3".repeat(40);
        assert!(matches!(
            Phone::parse(&long),
            Err(PhoneError::TooLong { .. })
        ));
    }

    #[test]
    fn test_parse_no_digits() {
        assert!(matches!(
            Phone::parse("call me maybe"),
            Err(PhoneError::NoDigits)
        ));
    }

    #[test]
    fn test_wa_digits_strips_formatting() {
        let phone = Phone::parse("+57 (300) 111-2233").unwrap();
        assert_eq!(phone.wa_digits(), "+573001112233");
    }

    #[test]
    fn test_wa_digits_on_raw_strings() {
        assert_eq!(wa_digits("tel: 300-111"), "300111");
        assert_eq!(wa_digits(""), "");
    }

    #[test]
    fn test_input_is_trimmed_but_preserved() {
        let phone = Phone::parse("  300 111 2233 ").unwrap();
        assert_eq!(phone.as_str(), "300 111 2233");
    }

    #[test]
    fn test_serde_roundtrip() {
        let phone = Phone::parse("+573001112233").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+573001112233\"");
        let parsed: Phone = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, phone);
    }
}
