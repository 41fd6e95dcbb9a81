use crate::encoding::{encode_quoted_printable, escape_component, needs_quoted_printable};
use crate::error::{Result, VcfError};
use featurecard_core::{ContactRecord, Param, PhoneEntry, Property, StructuredName};

pub const VERSION: &str = "2.1";

const MAX_LINE: usize = 75;

const V21_PROPERTIES: [&str; 21] = [
    "ADR", "AGENT", "BDAY", "EMAIL", "FN", "GEO", "KEY", "LABEL", "LOGO", "MAILER", "NOTE", "ORG",
    "PHOTO", "REV", "ROLE", "SOUND", "TEL", "TITLE", "TZ", "UID", "URL",
];

const V21_TYPES: [&str; 50] = [
    "DOM", "INTL", "POSTAL", "PARCEL", "HOME", "WORK", "PREF", "VOICE", "FAX", "MSG", "CELL",
    "PAGER", "BBS", "MODEM", "CAR", "ISDN", "VIDEO", "AOL", "APPLELINK", "ATTMAIL", "CIS",
    "EWORLD", "INTERNET", "IBMMAIL", "MCIMAIL", "POWERSHARE", "PRODIGY", "TLX", "X400", "GIF",
    "CGM", "WMF", "BMP", "MET", "PMB", "DIB", "PICT", "TIFF", "PDF", "PS", "JPEG", "QTIME",
    "MPEG", "MPEG2", "AVI", "WAVE", "AIFF", "PCM", "X509", "PGP",
];

const V21_VALUES: [&str; 4] = ["INLINE", "URL", "CONTENT-ID", "CID"];

/// Value types later versions spell out but 2.1 leaves implicit.
const IMPLICIT_VALUES: [&str; 11] = [
    "TEXT",
    "DATE",
    "DATE-TIME",
    "DATE-AND-OR-TIME",
    "TIME",
    "TIMESTAMP",
    "UTC-OFFSET",
    "INTEGER",
    "FLOAT",
    "BOOLEAN",
    "LANGUAGE-TAG",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Anything 2.1 cannot carry aborts the write.
    #[default]
    Fail,
    /// Unsupported items are left out and reported.
    Drop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dialect {
    pub strictness: Strictness,
}

impl Dialect {
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Fail,
        }
    }

    pub fn dropping_unsupported() -> Self {
        Self {
            strictness: Strictness::Drop,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub data: String,
    /// Items left out under [`Strictness::Drop`].
    pub dropped: Vec<String>,
}

/// Writes `contacts` as vCard 2.1 without a `PRODID` line.
pub fn serialize_contacts(contacts: &[ContactRecord], dialect: &Dialect) -> Result<Rendered> {
    let mut writer = Writer {
        dialect,
        out: String::new(),
        dropped: Vec::new(),
        contact: String::new(),
    };
    for contact in contacts {
        writer.card(contact)?;
    }
    Ok(Rendered {
        data: writer.out,
        dropped: writer.dropped,
    })
}

enum OutParam {
    Bare(String),
    Named(String, String),
}

enum Encoding {
    Plain,
    QuotedPrintable,
    Base64,
}

struct Writer<'a> {
    dialect: &'a Dialect,
    out: String,
    dropped: Vec<String>,
    contact: String,
}

impl Writer<'_> {
    fn card(&mut self, contact: &ContactRecord) -> Result<()> {
        self.contact = contact.display_name();
        self.raw_line("BEGIN:VCARD");
        self.raw_line(&format!("VERSION:{VERSION}"));

        let empty = StructuredName::default();
        self.name(contact.name.as_ref().unwrap_or(&empty));
        for phone in &contact.phones {
            self.phone(phone)?;
        }
        for property in &contact.properties {
            self.property(property)?;
        }

        self.raw_line("END:VCARD");
        Ok(())
    }

    fn name(&mut self, name: &StructuredName) {
        let join = |items: &[String]| {
            items
                .iter()
                .map(|item| escape_component(item))
                .collect::<Vec<_>>()
                .join(",")
        };
        let value = [
            escape_component(&name.family),
            escape_component(&name.given),
            join(&name.additional),
            join(&name.prefixes),
            join(&name.suffixes),
        ]
        .join(";");
        self.value_line(None, "N", Vec::new(), &value, Encoding::Plain);
    }

    fn phone(&mut self, phone: &PhoneEntry) -> Result<()> {
        let group = self.group(phone.group.as_deref())?;
        let mut params = Vec::new();
        for tel_type in &phone.types {
            let value = tel_type.as_str();
            if is_v21_type(value) {
                params.push(OutParam::Bare(value.to_string()));
            } else {
                self.unsupported(format!("TEL type {value}"))?;
            }
        }
        let (extra, encoding) = self.params(&phone.params)?;
        params.extend(extra);
        self.value_line(group, "TEL", params, &phone.text, encoding);
        Ok(())
    }

    fn property(&mut self, property: &Property) -> Result<()> {
        if property.is("PRODID") || property.is("VERSION") {
            return Ok(());
        }
        ensure_token(&self.contact, "property name", &property.name)?;
        if !is_v21_property(&property.name) {
            return self.unsupported(format!("property {}", property.name));
        }

        let group = self.group(property.group.as_deref())?;
        let (params, encoding) = self.params(&property.params)?;
        self.value_line(group, &property.name, params, &property.value, encoding);
        Ok(())
    }

    fn group<'g>(&self, group: Option<&'g str>) -> Result<Option<&'g str>> {
        if let Some(group) = group {
            ensure_token(&self.contact, "group", group)?;
        }
        Ok(group)
    }

    /// Translates parameters to their 2.1 spelling.
    fn params(&mut self, params: &[Param]) -> Result<(Vec<OutParam>, Encoding)> {
        let mut out = Vec::new();
        let mut encoding = Encoding::Plain;
        for param in params {
            ensure_token(&self.contact, "parameter name", &param.name)?;
            let upper: Vec<String> = param
                .values
                .iter()
                .map(|value| value.to_ascii_uppercase())
                .collect();
            match param.name.as_str() {
                "TYPE" => {
                    for value in upper {
                        if is_v21_type(&value) {
                            ensure_param_value(&self.contact, &param.name, &value)?;
                            out.push(OutParam::Bare(value));
                        } else {
                            self.unsupported(format!("type {value}"))?;
                        }
                    }
                }
                "PREF" => out.push(OutParam::Bare("PREF".to_string())),
                "VALUE" => {
                    for value in upper {
                        if value == "URI" {
                            out.push(OutParam::Named("VALUE".to_string(), "URL".to_string()));
                        } else if V21_VALUES.contains(&value.as_str()) {
                            out.push(OutParam::Named("VALUE".to_string(), value));
                        } else if !IMPLICIT_VALUES.contains(&value.as_str()) {
                            self.unsupported(format!("value type {value}"))?;
                        }
                    }
                }
                "ENCODING" => {
                    for value in upper {
                        match value.as_str() {
                            "B" | "BASE64" => encoding = Encoding::Base64,
                            "7BIT" | "8BIT" => {}
                            _ => self.unsupported(format!("encoding {value}"))?,
                        }
                    }
                }
                "CHARSET" | "LANGUAGE" => {
                    for value in &param.values {
                        ensure_param_value(&self.contact, &param.name, value)?;
                        out.push(OutParam::Named(param.name.clone(), value.clone()));
                    }
                }
                name if name.starts_with("X-") => {
                    for value in &param.values {
                        ensure_param_value(&self.contact, &param.name, value)?;
                        out.push(OutParam::Named(param.name.clone(), value.clone()));
                    }
                }
                name => self.unsupported(format!("parameter {name}"))?,
            }
        }
        Ok((out, encoding))
    }

    fn unsupported(&mut self, item: String) -> Result<()> {
        match self.dialect.strictness {
            Strictness::Fail => Err(VcfError::Unsupported {
                contact: self.contact.clone(),
                item,
            }),
            Strictness::Drop => {
                self.dropped
                    .push(format!("contact '{}': dropped {item}", self.contact));
                Ok(())
            }
        }
    }

    fn value_line(
        &mut self,
        group: Option<&str>,
        name: &str,
        mut params: Vec<OutParam>,
        value: &str,
        encoding: Encoding,
    ) {
        let encoding = match encoding {
            Encoding::Plain if needs_quoted_printable(value) => Encoding::QuotedPrintable,
            other => other,
        };

        match encoding {
            Encoding::QuotedPrintable => {
                params.retain(
                    |param| !matches!(param, OutParam::Named(name, _) if name == "CHARSET"),
                );
                params.push(OutParam::Named("CHARSET".to_string(), "UTF-8".to_string()));
                params.push(OutParam::Named(
                    "ENCODING".to_string(),
                    "QUOTED-PRINTABLE".to_string(),
                ));
            }
            Encoding::Base64 => {
                params.push(OutParam::Named("ENCODING".to_string(), "BASE64".to_string()));
            }
            Encoding::Plain => {}
        }

        let mut head = String::new();
        if let Some(group) = group {
            head.push_str(group);
            head.push('.');
        }
        head.push_str(name);
        for param in &params {
            head.push(';');
            match param {
                OutParam::Bare(value) => head.push_str(value),
                OutParam::Named(name, value) => {
                    head.push_str(name);
                    head.push('=');
                    head.push_str(value);
                }
            }
        }
        head.push(':');

        match encoding {
            Encoding::Plain => {
                head.push_str(value);
                self.raw_line(&head);
            }
            Encoding::QuotedPrintable => self.quoted_printable_line(head, value),
            Encoding::Base64 => self.base64_line(head, value),
        }
    }

    /// Soft line breaks keep every physical line within 76 characters.
    fn quoted_printable_line(&mut self, head: String, value: &str) {
        let mut line = head;
        for token in encode_quoted_printable(value) {
            if line.len() + token.len() > MAX_LINE {
                line.push('=');
                self.raw_line(&line);
                line.clear();
            }
            line.push_str(&token);
        }
        self.raw_line(&line);
    }

    /// Folded base64 data followed by the empty line 2.1 readers expect.
    fn base64_line(&mut self, head: String, value: &str) {
        let data: String = value.chars().filter(|ch| !ch.is_whitespace()).collect();
        let mut line = head;
        for ch in data.chars() {
            if line.len() >= MAX_LINE {
                self.raw_line(&line);
                line = String::from(" ");
            }
            line.push(ch);
        }
        self.raw_line(&line);
        self.raw_line("");
    }

    fn raw_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push_str("\r\n");
    }
}

fn is_v21_property(name: &str) -> bool {
    name.starts_with("X-") || V21_PROPERTIES.contains(&name)
}

fn is_v21_type(value: &str) -> bool {
    let upper = value.to_ascii_uppercase();
    upper.starts_with("X-") || V21_TYPES.contains(&upper.as_str())
}

fn ensure_token(contact: &str, item: &str, value: &str) -> Result<()> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(VcfError::Malformed {
            contact: contact.to_string(),
            item: format!("{item} '{value}'"),
        })
    }
}

fn ensure_param_value(contact: &str, param: &str, value: &str) -> Result<()> {
    if value
        .chars()
        .any(|ch| matches!(ch, ';' | ':' | '"' | '\r' | '\n'))
    {
        return Err(VcfError::Malformed {
            contact: contact.to_string(),
            item: format!("{param} parameter value '{value}'"),
        });
    }
    Ok(())
}
