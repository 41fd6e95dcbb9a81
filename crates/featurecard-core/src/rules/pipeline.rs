use crate::domain::{ContactRecord, ConvertOptions, PhoneNumbers};
use crate::dto::PhoneIssue;
use crate::rules::normalize::normalize;
use crate::rules::split::clean_and_split;

/// Result of pushing one input record through the splitter and normalizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordConversion {
    pub name: String,
    /// Number of phone entries the input carried.
    pub phone_count: usize,
    pub records: Vec<ContactRecord>,
    pub issues: Vec<PhoneIssue>,
}

impl RecordConversion {
    pub fn was_split(&self) -> bool {
        self.records.len() > 1
    }
}

pub fn convert_record<P: PhoneNumbers>(
    record: &ContactRecord,
    options: &ConvertOptions,
    phones: &P,
) -> RecordConversion {
    let name = record.display_name();
    let mut records = Vec::new();
    let mut issues = Vec::new();

    for single in clean_and_split(record, options) {
        let phone = single
            .phones
            .first()
            .map(|entry| entry.text.clone())
            .unwrap_or_default();
        let normalized = normalize(single, options, phones);
        if let Some(problem) = normalized.outcome.problem() {
            issues.push(PhoneIssue {
                contact: name.clone(),
                phone,
                problem,
            });
        }
        records.push(normalized.record);
    }

    RecordConversion {
        name,
        phone_count: record.phones.len(),
        records,
        issues,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub read: usize,
    pub split: usize,
    pub records: Vec<ContactRecord>,
    pub issues: Vec<PhoneIssue>,
}

/// Converts every record in order. `on_record` sees each record's result
/// before it is merged into the totals.
pub fn convert_all<P, F>(
    records: &[ContactRecord],
    options: &ConvertOptions,
    phones: &P,
    mut on_record: F,
) -> Conversion
where
    P: PhoneNumbers,
    F: FnMut(&RecordConversion),
{
    let mut conversion = Conversion {
        read: records.len(),
        ..Conversion::default()
    };
    for record in records {
        let converted = convert_record(record, options, phones);
        on_record(&converted);
        if converted.was_split() {
            conversion.split += 1;
        }
        conversion.records.extend(converted.records);
        conversion.issues.extend(converted.issues);
    }
    conversion
}
