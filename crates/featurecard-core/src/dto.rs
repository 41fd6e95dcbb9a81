use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhoneIssue {
    pub contact: String,
    pub phone: String,
    pub problem: String,
}

/// Summary of one conversion run, printed with `--json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub input: String,
    pub output: String,
    pub read: usize,
    pub written: usize,
    pub split: usize,
    pub issues: Vec<PhoneIssue>,
    pub dropped: Vec<String>,
    pub parse_warnings: Vec<String>,
}
