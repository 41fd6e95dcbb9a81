use crate::domain::phone::LineClass;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REGION: &str = "AT";
pub const DEFAULT_MOBILE_SUFFIX: &str = "";
pub const DEFAULT_FIXED_LINE_SUFFIX: &str = "(Home)";
pub const DEFAULT_UAN_SUFFIX: &str = "(Work)";
pub const DEFAULT_STRIPPED_PROPERTIES: [&str; 2] = ["X-ACCOUNT", "X-IRMC-LUID"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suffixes {
    pub mobile: String,
    pub fixed_line: String,
    pub uan: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            mobile: DEFAULT_MOBILE_SUFFIX.to_string(),
            fixed_line: DEFAULT_FIXED_LINE_SUFFIX.to_string(),
            uan: DEFAULT_UAN_SUFFIX.to_string(),
        }
    }
}

impl Suffixes {
    pub fn for_class(&self, class: LineClass) -> &str {
        match class {
            LineClass::Mobile => &self.mobile,
            LineClass::Uan => &self.uan,
            LineClass::Landline => &self.fixed_line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    pub region: String,
    pub suffixes: Suffixes,
    /// Extension properties removed from every record, upper-case.
    pub strip_properties: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            suffixes: Suffixes::default(),
            strip_properties: DEFAULT_STRIPPED_PROPERTIES
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }
}

pub fn normalize_region(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(CoreError::InvalidRegion(raw.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

pub fn normalize_property_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || !trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
    {
        return Err(CoreError::InvalidPropertyName(raw.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::{normalize_property_name, normalize_region, ConvertOptions, Suffixes};
    use crate::domain::phone::LineClass;

    #[test]
    fn defaults_match_legacy_handset_labels() {
        let options = ConvertOptions::default();
        assert_eq!(options.region, "AT");
        assert_eq!(options.suffixes.for_class(LineClass::Mobile), "");
        assert_eq!(options.suffixes.for_class(LineClass::Landline), "(Home)");
        assert_eq!(options.suffixes.for_class(LineClass::Uan), "(Work)");
        assert_eq!(options.strip_properties, vec!["X-ACCOUNT", "X-IRMC-LUID"]);
    }

    #[test]
    fn normalize_region_uppercases() {
        assert_eq!(normalize_region(" de ").unwrap(), "DE");
    }

    #[test]
    fn normalize_region_rejects_bad_codes() {
        assert!(normalize_region("AUT").is_err());
        assert!(normalize_region("4T").is_err());
        assert!(normalize_region("").is_err());
    }

    #[test]
    fn normalize_property_name_checks_charset() {
        assert_eq!(normalize_property_name("x-phonetic").unwrap(), "X-PHONETIC");
        assert!(normalize_property_name("X ACCOUNT").is_err());
        let suffixes = Suffixes::default();
        assert_eq!(suffixes.uan, "(Work)");
    }
}
