use std::fmt;
use std::str::FromStr;

use crate::Result;
use crate::error::Error;

pub(crate) const INVALID_POSTCODE: &str = "Invalid Postcode! Expected format: XXXXXXX";

const POSTCODE_LEN: usize = 7;

/// Portuguese postcode in the compact 7-digit form the API expects
/// (`1234567`, not `1234-567`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Postcode(String);

impl Postcode {
    pub fn parse(value: &str) -> Result<Postcode> {
        if value.len() == POSTCODE_LEN && value.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Postcode(value.to_owned()))
        } else {
            Err(Error::validation(INVALID_POSTCODE))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Postcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Postcode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Postcode::parse(s)
    }
}

impl TryFrom<&str> for Postcode {
    type Error = Error;

    fn try_from(value: &str) -> std::result::Result<Self, Self::Error> {
        Postcode::parse(value)
    }
}

impl TryFrom<String> for Postcode {
    type Error = Error;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Postcode::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn accepts_seven_ascii_digits() {
        for value in ["1234567", "0000000", "9999999", "1000001"] {
            let postcode = Postcode::parse(value).expect("valid postcode");
            assert_eq!(postcode.as_str(), value);
        }
    }

    #[test]
    fn rejects_other_shapes() {
        for value in [
            "", "123", "123456", "12345678", "1234-567", "123456a", " 1234567", "1234567 ",
            "١٢٣٤٥٦٧",
        ] {
            let err = Postcode::parse(value).expect_err(value);
            assert_eq!(err.kind(), Kind::Validation);
            assert_eq!(err.to_string(), INVALID_POSTCODE);
        }
    }

    #[test]
    fn from_str_and_try_from_agree() {
        let parsed: Postcode = "1234567".parse().expect("valid postcode");
        let converted = Postcode::try_from(String::from("1234567")).expect("valid postcode");

        assert_eq!(parsed, converted);
        assert!(Postcode::try_from("12").is_err());
    }
}
