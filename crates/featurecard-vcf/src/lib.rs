pub mod encoding;
pub mod error;
pub mod parse;
pub mod write;

pub use error::{Result, VcfError};
pub use parse::{parse_contacts, ParsedContacts};
pub use write::{serialize_contacts, Dialect, Rendered, Strictness, VERSION};
