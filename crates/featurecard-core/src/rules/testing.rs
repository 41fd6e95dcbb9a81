use crate::domain::{LineType, PhoneNumbers};
use crate::error::PhoneParseError;

/// Small stand-in for a real numbering-plan database. Knows AT and DE;
/// numbers starting with 6 are mobile, 5 universal access, 800 toll free.
pub(crate) struct FakePhones;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FakeNumber {
    country_code: &'static str,
    national: String,
}

fn country_code(region: &str) -> Option<&'static str> {
    match region {
        "AT" => Some("43"),
        "DE" => Some("49"),
        _ => None,
    }
}

impl PhoneNumbers for FakePhones {
    type Number = FakeNumber;

    fn parse_phone(&self, text: &str, region: &str) -> Result<FakeNumber, PhoneParseError> {
        let default_cc =
            country_code(region).ok_or_else(|| PhoneParseError::UnknownRegion(region.to_string()))?;
        let trimmed = text.trim();
        if trimmed
            .chars()
            .any(|ch| !(ch.is_ascii_digit() || matches!(ch, '+' | ' ' | '-' | '/' | '(' | ')')))
        {
            return Err(PhoneParseError::Rejected("not a number".to_string()));
        }
        let digits: String = trimmed.chars().filter(|ch| ch.is_ascii_digit()).collect();
        let international = if trimmed.starts_with('+') {
            Some(digits.as_str())
        } else {
            digits.strip_prefix("00")
        };
        match international {
            Some(rest) => {
                for cc in ["43", "49"] {
                    if let Some(national) = rest.strip_prefix(cc) {
                        return Ok(FakeNumber {
                            country_code: cc,
                            national: national.to_string(),
                        });
                    }
                }
                Err(PhoneParseError::Rejected("invalid country code".to_string()))
            }
            None => {
                let national = digits.strip_prefix('0').unwrap_or(&digits);
                if national.len() < 2 {
                    return Err(PhoneParseError::Rejected("too short".to_string()));
                }
                Ok(FakeNumber {
                    country_code: default_cc,
                    national: national.to_string(),
                })
            }
        }
    }

    fn is_valid(&self, number: &FakeNumber) -> bool {
        (6..=12).contains(&number.national.len()) && !number.national.starts_with('0')
    }

    fn canonical(&self, number: &FakeNumber) -> String {
        format!("+{}{}", number.country_code, number.national)
    }

    fn classify(&self, number: &FakeNumber) -> LineType {
        if number.national.starts_with("800") {
            LineType::TollFree
        } else if number.national.starts_with('6') {
            LineType::Mobile
        } else if number.national.starts_with('5') {
            LineType::Uan
        } else {
            LineType::FixedLine
        }
    }
}
