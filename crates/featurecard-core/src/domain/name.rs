use serde::{Deserialize, Serialize};

/// The components of an `N` property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredName {
    pub family: String,
    pub given: String,
    pub additional: Vec<String>,
    pub prefixes: Vec<String>,
    pub suffixes: Vec<String>,
}

impl StructuredName {
    pub fn display_name(&self) -> String {
        let given = self.given.trim();
        let family = self.family.trim();
        format!("{given} {family}").trim().to_string()
    }

    /// Appends `suffix` to the given name (space separated) and to the
    /// suffix list.
    pub fn append_suffix(&mut self, suffix: &str) {
        if self.given.is_empty() {
            self.given = suffix.to_string();
        } else {
            self.given.push(' ');
            self.given.push_str(suffix);
        }
        self.suffixes.push(suffix.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::StructuredName;

    #[test]
    fn append_suffix_extends_given_and_suffixes() {
        let mut name = StructuredName {
            given: "Ada".to_string(),
            ..StructuredName::default()
        };
        name.append_suffix("(Home)");
        assert_eq!(name.given, "Ada (Home)");
        assert_eq!(name.suffixes, vec!["(Home)".to_string()]);
    }

    #[test]
    fn append_suffix_on_empty_given_has_no_leading_space() {
        let mut name = StructuredName::default();
        name.append_suffix("(Work)");
        assert_eq!(name.given, "(Work)");
    }

    #[test]
    fn display_name_trims_missing_parts() {
        let name = StructuredName {
            family: "Hopper".to_string(),
            ..StructuredName::default()
        };
        assert_eq!(name.display_name(), "Hopper");
        assert_eq!(StructuredName::default().display_name(), "");
    }
}
