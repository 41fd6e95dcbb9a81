use crate::domain::name::StructuredName;
use crate::domain::phone::PhoneEntry;
use serde::{Deserialize, Serialize};

/// A property parameter. Bare vCard 2.1 parameters (`TEL;CELL`) are stored
/// under `TYPE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub values: Vec<String>,
}

impl Param {
    pub fn new<I, S>(name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_ascii_uppercase(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A property the converter does not interpret. Its value is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub group: Option<String>,
    pub name: String,
    pub params: Vec<Param>,
    pub value: String,
}

impl Property {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            group: None,
            name: name.to_ascii_uppercase(),
            params: Vec::new(),
            value: value.into(),
        }
    }

    pub fn with_param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|param| param.is(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub name: Option<StructuredName>,
    pub phones: Vec<PhoneEntry>,
    pub properties: Vec<Property>,
}

impl ContactRecord {
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.is(name))
    }

    /// Name used in progress output: the structured name when present,
    /// otherwise the formatted name.
    pub fn display_name(&self) -> String {
        let structured = self
            .name
            .as_ref()
            .map(StructuredName::display_name)
            .unwrap_or_default();
        if !structured.is_empty() {
            return structured;
        }
        self.property("FN")
            .map(|property| property.value.trim().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{ContactRecord, Param, Property};
    use crate::domain::name::StructuredName;

    #[test]
    fn display_name_prefers_structured_name() {
        let record = ContactRecord {
            name: Some(StructuredName {
                given: "Ada".to_string(),
                family: "Lovelace".to_string(),
                ..StructuredName::default()
            }),
            phones: Vec::new(),
            properties: vec![Property::new("FN", "Countess of Lovelace")],
        };
        assert_eq!(record.display_name(), "Ada Lovelace");
    }

    #[test]
    fn display_name_falls_back_to_formatted_name() {
        let record = ContactRecord {
            name: None,
            phones: Vec::new(),
            properties: vec![Property::new("fn", " Grace Hopper ")],
        };
        assert_eq!(record.display_name(), "Grace Hopper");
    }

    #[test]
    fn param_names_are_case_insensitive() {
        let property = Property::new("email", "ada@example.com")
            .with_param(Param::new("type", ["INTERNET"]));
        assert_eq!(property.name, "EMAIL");
        assert!(property.param("TYPE").is_some());
        assert!(property.is("Email"));
    }
}
