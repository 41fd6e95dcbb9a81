use crate::domain::{
    ContactRecord, ConvertOptions, LineType, PhoneEntry, PhoneNumbers, StructuredName, TelType,
};
use crate::error::PhoneParseError;
use serde::Serialize;
use std::collections::BTreeSet;

/// Where a record's phone entry ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum PhoneOutcome {
    NoPhone,
    /// More than one entry; records must be split first.
    MultiplePhones(usize),
    Blank,
    Unparseable(PhoneParseError),
    Invalid,
    Classified(LineType),
    /// Reformatted, but the canonical text could not be parsed again.
    Unclassified(PhoneParseError),
}

impl PhoneOutcome {
    /// Describes outcomes that deserve a diagnostic.
    pub fn problem(&self) -> Option<String> {
        match self {
            PhoneOutcome::NoPhone | PhoneOutcome::Blank | PhoneOutcome::Classified(_) => None,
            PhoneOutcome::MultiplePhones(count) => {
                Some(format!("record carries {count} phone numbers"))
            }
            PhoneOutcome::Unparseable(err) => Some(format!("unparseable phone number: {err}")),
            PhoneOutcome::Invalid => Some("invalid phone number".to_string()),
            PhoneOutcome::Unclassified(err) => Some(format!("classification failed: {err}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub record: ContactRecord,
    pub outcome: PhoneOutcome,
}

fn baseline_types() -> BTreeSet<TelType> {
    BTreeSet::from([TelType::Cell, TelType::Voice])
}

/// Rewrites the single phone entry of `record` to international format,
/// tags it by line type and appends the matching name suffix.
pub fn normalize<P: PhoneNumbers>(
    record: ContactRecord,
    options: &ConvertOptions,
    phones: &P,
) -> Normalized {
    let mut record = record;
    let outcome = match record.phones.as_mut_slice() {
        [] => PhoneOutcome::NoPhone,
        [entry] => normalize_entry(entry, &options.region, phones),
        entries => PhoneOutcome::MultiplePhones(entries.len()),
    };

    if let PhoneOutcome::Classified(line_type) = outcome {
        let suffix = options.suffixes.for_class(line_type.class());
        if !suffix.is_empty() {
            record
                .name
                .get_or_insert_with(StructuredName::default)
                .append_suffix(suffix);
        }
    }

    Normalized { record, outcome }
}

fn normalize_entry<P: PhoneNumbers>(
    entry: &mut PhoneEntry,
    region: &str,
    phones: &P,
) -> PhoneOutcome {
    if entry.is_blank() {
        return PhoneOutcome::Blank;
    }

    entry.types = baseline_types();

    let number = match phones.parse_phone(&entry.text, region) {
        Ok(number) => number,
        Err(err) => return PhoneOutcome::Unparseable(err),
    };
    if !phones.is_valid(&number) {
        return PhoneOutcome::Invalid;
    }
    entry.text = phones.canonical(&number);

    let line_type = match phones.parse_phone(&entry.text, region) {
        Ok(canonical) => phones.classify(&canonical),
        Err(err) => return PhoneOutcome::Unclassified(err),
    };

    entry.types.remove(&TelType::Cell);
    entry.types.insert(line_type.class().tel_type());
    PhoneOutcome::Classified(line_type)
}
