use crate::domain::contact::Param;
use crate::error::PhoneParseError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TelType {
    Home,
    Work,
    Cell,
    Voice,
    Fax,
    Msg,
    Pref,
    Pager,
    Bbs,
    Modem,
    Car,
    Isdn,
    Video,
    Other(String),
}

impl TelType {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let upper = trimmed.to_ascii_uppercase();
        Some(match upper.as_str() {
            "HOME" => TelType::Home,
            "WORK" => TelType::Work,
            "CELL" => TelType::Cell,
            "VOICE" => TelType::Voice,
            "FAX" => TelType::Fax,
            "MSG" => TelType::Msg,
            "PREF" => TelType::Pref,
            "PAGER" => TelType::Pager,
            "BBS" => TelType::Bbs,
            "MODEM" => TelType::Modem,
            "CAR" => TelType::Car,
            "ISDN" => TelType::Isdn,
            "VIDEO" => TelType::Video,
            _ => TelType::Other(upper),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            TelType::Home => "HOME",
            TelType::Work => "WORK",
            TelType::Cell => "CELL",
            TelType::Voice => "VOICE",
            TelType::Fax => "FAX",
            TelType::Msg => "MSG",
            TelType::Pref => "PREF",
            TelType::Pager => "PAGER",
            TelType::Bbs => "BBS",
            TelType::Modem => "MODEM",
            TelType::Car => "CAR",
            TelType::Isdn => "ISDN",
            TelType::Video => "VIDEO",
            TelType::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    pub group: Option<String>,
    pub text: String,
    pub types: BTreeSet<TelType>,
    /// Parameters other than `TYPE`.
    pub params: Vec<Param>,
}

impl PhoneEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_types(mut self, types: impl IntoIterator<Item = TelType>) -> Self {
        self.types.extend(types);
        self
    }

    /// True when the entry carries no text at all.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Line type as reported by the phone number metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    FixedLine,
    Mobile,
    FixedLineOrMobile,
    TollFree,
    PremiumRate,
    SharedCost,
    Voip,
    PersonalNumber,
    Pager,
    Uan,
    Voicemail,
    Unknown,
}

/// The three buckets the target handset distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineClass {
    Mobile,
    Uan,
    Landline,
}

impl LineType {
    pub fn class(self) -> LineClass {
        match self {
            LineType::Mobile => LineClass::Mobile,
            LineType::Uan => LineClass::Uan,
            LineType::FixedLine
            | LineType::FixedLineOrMobile
            | LineType::TollFree
            | LineType::PremiumRate
            | LineType::SharedCost
            | LineType::Voip
            | LineType::PersonalNumber
            | LineType::Pager
            | LineType::Voicemail
            | LineType::Unknown => LineClass::Landline,
        }
    }
}

impl LineClass {
    pub fn tel_type(self) -> TelType {
        match self {
            LineClass::Mobile => TelType::Cell,
            LineClass::Uan => TelType::Work,
            LineClass::Landline => TelType::Home,
        }
    }
}

/// Phone number parsing capability used by the normalizer.
pub trait PhoneNumbers {
    type Number;

    fn parse_phone(&self, text: &str, region: &str) -> Result<Self::Number, PhoneParseError>;

    fn is_valid(&self, number: &Self::Number) -> bool;

    /// International dial format: leading `+`, country code, national
    /// number, no separators.
    fn canonical(&self, number: &Self::Number) -> String;

    fn classify(&self, number: &Self::Number) -> LineType;
}
