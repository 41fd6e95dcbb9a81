//! [`PhoneNumbers`] backed by the libphonenumber metadata shipped with the
//! `phonenumber` crate.

use featurecard_core::{LineType, PhoneNumbers, PhoneParseError};
use phonenumber::country;
use phonenumber::metadata::DATABASE;
use phonenumber::{Mode, PhoneNumber, Type};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhoneError {
    #[error("unknown region code: {0}")]
    UnknownRegion(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Libphonenumber;

impl Libphonenumber {
    /// Fails when `region` is not a region the metadata knows about.
    pub fn check_region(&self, region: &str) -> Result<(), PhoneError> {
        region_id(region)
            .map(|_| ())
            .map_err(|_| PhoneError::UnknownRegion(region.to_string()))
    }
}

fn region_id(region: &str) -> Result<country::Id, PhoneParseError> {
    region
        .trim()
        .to_ascii_uppercase()
        .parse::<country::Id>()
        .map_err(|_| PhoneParseError::UnknownRegion(region.to_string()))
}

impl PhoneNumbers for Libphonenumber {
    type Number = PhoneNumber;

    fn parse_phone(&self, text: &str, region: &str) -> Result<PhoneNumber, PhoneParseError> {
        let region = region_id(region)?;
        phonenumber::parse(Some(region), text.trim())
            .map_err(|err| PhoneParseError::Rejected(err.to_string()))
    }

    fn is_valid(&self, number: &PhoneNumber) -> bool {
        phonenumber::is_valid(number)
    }

    fn canonical(&self, number: &PhoneNumber) -> String {
        number.format().mode(Mode::E164).to_string()
    }

    fn classify(&self, number: &PhoneNumber) -> LineType {
        match number.number_type(&DATABASE) {
            Type::FixedLine => LineType::FixedLine,
            Type::Mobile => LineType::Mobile,
            Type::FixedLineOrMobile => LineType::FixedLineOrMobile,
            Type::TollFree => LineType::TollFree,
            Type::PremiumRate => LineType::PremiumRate,
            Type::SharedCost => LineType::SharedCost,
            Type::Voip => LineType::Voip,
            Type::PersonalNumber => LineType::PersonalNumber,
            Type::Pager => LineType::Pager,
            Type::Uan => LineType::Uan,
            Type::Voicemail => LineType::Voicemail,
            _ => LineType::Unknown,
        }
    }
}
