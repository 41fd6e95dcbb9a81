pub mod contact;
pub mod name;
pub mod options;
pub mod phone;

pub use contact::{ContactRecord, Param, Property};
pub use name::StructuredName;
pub use options::{
    normalize_property_name, normalize_region, ConvertOptions, Suffixes, DEFAULT_FIXED_LINE_SUFFIX,
    DEFAULT_MOBILE_SUFFIX, DEFAULT_REGION, DEFAULT_STRIPPED_PROPERTIES, DEFAULT_UAN_SUFFIX,
};
pub use phone::{LineClass, LineType, PhoneEntry, PhoneNumbers, TelType};
