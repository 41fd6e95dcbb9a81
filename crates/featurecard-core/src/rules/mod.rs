pub mod normalize;
pub mod pipeline;
pub mod split;

#[cfg(test)]
pub(crate) mod testing;

pub use normalize::{normalize, Normalized, PhoneOutcome};
pub use pipeline::{convert_all, convert_record, Conversion, RecordConversion};
pub use split::{clean, clean_and_split, ALWAYS_STRIPPED};
