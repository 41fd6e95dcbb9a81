use crate::domain::{ContactRecord, ConvertOptions};

/// Properties the target dialect never receives.
pub const ALWAYS_STRIPPED: [&str; 2] = ["CATEGORIES", "FN"];

/// Returns a copy of `record` without grouping categories, the formatted
/// name cache and the configured extension properties.
pub fn clean(record: &ContactRecord, options: &ConvertOptions) -> ContactRecord {
    let mut cleaned = record.clone();
    cleaned.properties.retain(|property| {
        !ALWAYS_STRIPPED.iter().any(|name| property.is(name))
            && !options
                .strip_properties
                .iter()
                .any(|name| property.name == *name)
    });
    cleaned
}

/// Cleans `record` and fans it out into one record per phone entry.
/// Records with zero or one phone come back as a single cleaned record.
pub fn clean_and_split(record: &ContactRecord, options: &ConvertOptions) -> Vec<ContactRecord> {
    let mut cleaned = clean(record, options);
    if cleaned.phones.len() <= 1 {
        return vec![cleaned];
    }

    let phones = std::mem::take(&mut cleaned.phones);
    phones
        .into_iter()
        .map(|phone| {
            let mut single = cleaned.clone();
            single.phones.push(phone);
            single
        })
        .collect()
}
