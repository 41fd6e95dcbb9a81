use crate::encoding::{
    decode_charset, decode_input, decode_quoted_printable, escape_component,
    normalize_line_endings, split_unescaped, unescape_value,
};
use crate::error::{Result, VcfError};
use featurecard_core::{ContactRecord, Param, PhoneEntry, Property, StructuredName, TelType};

/// Encodings 2.1 allows as a bare parameter (`PHOTO;BASE64:`).
const BARE_ENCODINGS: [&str; 5] = ["QUOTED-PRINTABLE", "BASE64", "B", "8BIT", "7BIT"];

#[derive(Debug, Clone, Default)]
pub struct ParsedContacts {
    pub contacts: Vec<ContactRecord>,
    pub warnings: Vec<String>,
}

/// Properties whose values are `;`-separated components.
const COMPOUND_PROPERTIES: [&str; 3] = ["ADR", "ORG", "GEO"];

/// How a card escapes special characters in its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escaping {
    /// 2.1 only escapes `;` inside compound values.
    Legacy,
    /// 3.0 and 4.0 backslash-escape line breaks, `,`, `;`, `:` and `\`.
    Backslash,
}

impl Escaping {
    fn for_version(version: Option<&str>) -> Self {
        match version {
            Some(version) if version.starts_with("2.") || version.starts_with("1.") => {
                Escaping::Legacy
            }
            _ => Escaping::Backslash,
        }
    }
}

/// Parses vCard 2.1, 3.0 and 4.0 data into contact records.
///
/// Opaque property values come back in 2.1 form: plain text is unescaped,
/// compound values keep `;` between components and `\;` inside them.
pub fn parse_contacts(data: &[u8]) -> Result<ParsedContacts> {
    if data.contains(&0) {
        return Err(VcfError::Parse("input contains binary data".to_string()));
    }

    let text = decode_input(data);
    let mut parsed = ParsedContacts::default();
    let mut current: Option<Vec<RawProperty>> = None;

    for line in unfold_lines(&text) {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("BEGIN:VCARD") {
            if let Some(properties) = current.take() {
                parsed
                    .warnings
                    .push("nested BEGIN:VCARD encountered".to_string());
                let card = build_card(properties, &mut parsed.warnings);
                parsed.contacts.push(card);
            }
            current = Some(Vec::new());
            continue;
        }

        if trimmed.eq_ignore_ascii_case("END:VCARD") {
            match current.take() {
                Some(properties) => {
                    let card = build_card(properties, &mut parsed.warnings);
                    parsed.contacts.push(card);
                }
                None => parsed
                    .warnings
                    .push("END:VCARD without matching BEGIN:VCARD".to_string()),
            }
            continue;
        }

        let Some(properties) = current.as_mut() else {
            continue;
        };

        if trimmed.is_empty() {
            continue;
        }

        let Some(raw) = split_property(trimmed) else {
            parsed
                .warnings
                .push(format!("ignoring malformed line: {trimmed}"));
            continue;
        };

        properties.push(raw);
    }

    if let Some(properties) = current.take() {
        parsed
            .warnings
            .push("missing END:VCARD at end of file".to_string());
        let card = build_card(properties, &mut parsed.warnings);
        parsed.contacts.push(card);
    }

    Ok(parsed)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RawProperty {
    group: Option<String>,
    name: String,
    params: Vec<Param>,
    value: String,
}

fn build_card(properties: Vec<RawProperty>, warnings: &mut Vec<String>) -> ContactRecord {
    let version = properties
        .iter()
        .find(|raw| raw.name == "VERSION")
        .map(|raw| raw.value.trim());
    let escaping = Escaping::for_version(version);

    let mut card = ContactRecord::default();
    for raw in properties {
        apply_property(&mut card, raw, escaping, warnings);
    }
    card
}

fn apply_property(
    card: &mut ContactRecord,
    raw: RawProperty,
    escaping: Escaping,
    warnings: &mut Vec<String>,
) {
    let RawProperty {
        group,
        name,
        mut params,
        value,
    } = raw;
    let value = decode_value(&mut params, value);

    match name.as_str() {
        "VERSION" => {}
        "N" => {
            if card.name.is_some() {
                warnings.push("multiple N properties; keeping the first".to_string());
                return;
            }
            card.name = Some(parse_structured_name(&value));
        }
        "TEL" => card.phones.push(parse_phone(group, params, &value)),
        _ => {
            let value = match escaping {
                Escaping::Legacy => value,
                Escaping::Backslash if COMPOUND_PROPERTIES.contains(&name.as_str()) => {
                    legacy_compound(&value)
                }
                Escaping::Backslash => unescape_value(&value),
            };
            card.properties.push(Property {
                group,
                name,
                params,
                value,
            });
        }
    }
}

/// Rewrites a backslash-escaped compound value with 2.1 component escaping.
fn legacy_compound(value: &str) -> String {
    split_unescaped(value, ';')
        .iter()
        .map(|component| escape_component(&unescape_value(component)))
        .collect::<Vec<_>>()
        .join(";")
}

/// Resolves quoted-printable values to text and removes the transfer
/// parameters that described them.
fn decode_value(params: &mut Vec<Param>, value: String) -> String {
    let quoted_printable = params.iter().any(|param| {
        param.is("ENCODING")
            && param
                .values
                .iter()
                .any(|value| value.eq_ignore_ascii_case("QUOTED-PRINTABLE"))
    });
    if !quoted_printable {
        return value;
    }

    let charset = params
        .iter()
        .find(|param| param.is("CHARSET"))
        .and_then(|param| param.values.first().cloned());
    let bytes = decode_quoted_printable(&value);
    params.retain(|param| !param.is("ENCODING") && !param.is("CHARSET"));
    decode_charset(&bytes, charset.as_deref())
}

fn parse_structured_name(value: &str) -> StructuredName {
    let mut components = split_unescaped(value, ';').into_iter();
    let mut next_list = || -> Vec<String> {
        components
            .next()
            .map(|component| {
                split_unescaped(&component, ',')
                    .iter()
                    .map(|item| unescape_value(item))
                    .filter(|item| !item.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    };

    let family = next_list().join(",");
    let given = next_list().join(",");
    StructuredName {
        family,
        given,
        additional: next_list(),
        prefixes: next_list(),
        suffixes: next_list(),
    }
}

fn parse_phone(group: Option<String>, params: Vec<Param>, value: &str) -> PhoneEntry {
    let mut entry = PhoneEntry {
        group,
        ..PhoneEntry::default()
    };
    for param in params {
        if param.is("TYPE") {
            entry
                .types
                .extend(param.values.iter().filter_map(|raw| TelType::parse(raw)));
        } else if param.is("VALUE")
            && param
                .values
                .iter()
                .any(|value| value.eq_ignore_ascii_case("uri"))
        {
            // tel: URIs are stored as plain text
        } else {
            entry.params.push(param);
        }
    }

    let text = unescape_value(value.trim());
    entry.text = strip_tel_scheme(&text)
        .map(str::to_string)
        .unwrap_or(text);
    entry
}

fn strip_tel_scheme(value: &str) -> Option<&str> {
    let prefix = value.get(..4)?;
    if prefix.eq_ignore_ascii_case("tel:") {
        Some(&value[4..])
    } else {
        None
    }
}

fn unfold_lines(input: &str) -> Vec<String> {
    let input = normalize_line_endings(input);
    let mut lines: Vec<String> = Vec::new();
    let mut soft_break = false;
    for line in input.lines() {
        if soft_break {
            if let Some(last) = lines.last_mut() {
                last.pop();
                last.push_str(line);
                soft_break = continues_quoted_printable(last);
                continue;
            }
        }

        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(&line[1..]);
                soft_break = continues_quoted_printable(last);
                continue;
            }
        }

        lines.push(line.to_string());
        soft_break = lines.last().is_some_and(|last| continues_quoted_printable(last));
    }
    lines
}

/// A quoted-printable line ending in `=` continues on the next line.
fn continues_quoted_printable(line: &str) -> bool {
    if !line.ends_with('=') {
        return false;
    }
    match line.split_once(':') {
        Some((head, _)) => head.to_ascii_uppercase().contains("QUOTED-PRINTABLE"),
        None => false,
    }
}

fn split_property(line: &str) -> Option<RawProperty> {
    let mut in_quotes = false;
    let mut colon = None;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ':' if !in_quotes => {
                colon = Some(index);
                break;
            }
            _ => {}
        }
    }
    let colon = colon?;
    let (head, value) = (&line[..colon], &line[colon + 1..]);

    let mut segments = split_outside_quotes(head, ';').into_iter();
    let full_name = segments.next()?;
    let full_name = full_name.trim();
    let (group, name) = match full_name.rsplit_once('.') {
        Some((group, name)) => (Some(group.to_string()), name),
        None => (None, full_name),
    };
    if name.is_empty() {
        return None;
    }

    let params = segments.filter_map(|segment| parse_param(&segment)).collect();

    Some(RawProperty {
        group,
        name: name.to_ascii_uppercase(),
        params,
        value: value.to_string(),
    })
}

fn parse_param(segment: &str) -> Option<Param> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    match segment.split_once('=') {
        Some((name, raw_values)) => {
            let name = name.trim().to_ascii_uppercase();
            let values = if name == "TYPE" {
                split_outside_quotes(raw_values, ',')
                    .iter()
                    .flat_map(|value| {
                        strip_quotes(value)
                            .split(',')
                            .map(|item| item.trim().to_string())
                            .collect::<Vec<_>>()
                    })
                    .filter(|value| !value.is_empty())
                    .collect()
            } else {
                vec![strip_quotes(raw_values).to_string()]
            };
            Some(Param::new(&name, values))
        }
        None => {
            let upper = segment.to_ascii_uppercase();
            let name = if BARE_ENCODINGS.contains(&upper.as_str()) {
                "ENCODING"
            } else {
                "TYPE"
            };
            Some(Param::new(name, [segment.to_string()]))
        }
    }
}

fn strip_quotes(value: &str) -> &str {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed)
}

fn split_outside_quotes(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in value.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        }
        if ch == separator && !in_quotes {
            items.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    items.push(current);
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(data: &str) -> ParsedContacts {
        parse_contacts(data.as_bytes()).expect("parse")
    }

    #[test]
    fn parse_contacts_basic_v3() {
        let data = "BEGIN:VCARD\nVERSION:3.0\nN:Doe;Jane;;;\nFN:Jane Doe\nEMAIL;TYPE=INTERNET:jane@example.com\nTEL;TYPE=CELL,VOICE:0664 123456\nTEL;TYPE=home:01 234567\nCATEGORIES:Friends,Work\nEND:VCARD\n";
        let parsed = parse(data);
        assert_eq!(parsed.contacts.len(), 1);
        assert!(parsed.warnings.is_empty());
        let contact = &parsed.contacts[0];
        let name = contact.name.as_ref().expect("name");
        assert_eq!(name.family, "Doe");
        assert_eq!(name.given, "Jane");
        assert_eq!(contact.phones.len(), 2);
        assert_eq!(contact.phones[0].text, "0664 123456");
        assert!(contact.phones[0].types.contains(&TelType::Cell));
        assert!(contact.phones[0].types.contains(&TelType::Voice));
        assert!(contact.phones[1].types.contains(&TelType::Home));
        assert_eq!(contact.property("FN").expect("fn").value, "Jane Doe");
        assert_eq!(
            contact.property("CATEGORIES").expect("categories").value,
            "Friends,Work"
        );
        assert!(contact.property("VERSION").is_none());
    }

    #[test]
    fn parse_contacts_v21_bare_params_and_quoted_printable() {
        let data = "BEGIN:VCARD\r\nVERSION:2.1\r\nN;CHARSET=UTF-8;ENCODING=QUOTED-PRINTABLE:M=C3=BCller;J=\r\n=C3=BCrgen;;;\r\nTEL;CELL;PREF:+43 664 123456\r\nNOTE;QUOTED-PRINTABLE:line one=0D=0Aline two\r\nEND:VCARD\r\n";
        let parsed = parse(data);
        assert_eq!(parsed.contacts.len(), 1);
        let contact = &parsed.contacts[0];
        let name = contact.name.as_ref().expect("name");
        assert_eq!(name.family, "Müller");
        assert_eq!(name.given, "Jürgen");
        let phone = &contact.phones[0];
        assert!(phone.types.contains(&TelType::Cell));
        assert!(phone.types.contains(&TelType::Pref));
        let note = contact.property("NOTE").expect("note");
        assert_eq!(note.value, "line one\r\nline two");
        assert!(note.params.is_empty());
    }

    #[test]
    fn parse_contacts_unfolds_continuation_lines() {
        let data = "BEGIN:VCARD\nVERSION:3.0\nN:Doe;Jane\nNOTE:This is a long\n  note\nEND:VCARD\n";
        let parsed = parse(data);
        let note = parsed.contacts[0].property("NOTE").expect("note");
        assert_eq!(note.value, "This is a long note");
    }

    #[test]
    fn parse_contacts_handles_groups_and_quoted_params() {
        let data = "BEGIN:VCARD\nVERSION:4.0\nitem1.TEL;TYPE=\"work,voice\";VALUE=uri:tel:+43-1-234567\nitem1.X-ABLABEL:Office\nADR;LABEL=\"Main St: 1\":;;Main St 1;Vienna;;1010;Austria\nEND:VCARD\n";
        let parsed = parse(data);
        let contact = &parsed.contacts[0];
        let phone = &contact.phones[0];
        assert_eq!(phone.group.as_deref(), Some("item1"));
        assert_eq!(phone.text, "+43-1-234567");
        assert!(phone.types.contains(&TelType::Work));
        assert!(phone.types.contains(&TelType::Voice));
        assert!(phone.params.is_empty());
        let label = contact.property("X-ABLABEL").expect("label");
        assert_eq!(label.group.as_deref(), Some("item1"));
        let adr = contact.property("ADR").expect("adr");
        assert_eq!(adr.param("LABEL").expect("label").values, vec!["Main St: 1"]);
        assert_eq!(adr.value, ";;Main St 1;Vienna;;1010;Austria");
    }

    #[test]
    fn parse_contacts_unescapes_later_version_text() {
        let data = "BEGIN:VCARD\nVERSION:3.0\nN:Doe;Jane;;;\nNOTE:first\\nsecond\\, really\nORG:Foo\\, Inc.;Sales\nADR:;;Main St 1\\; Top 3;Vienna;;1010;Austria\nEND:VCARD\n";
        let parsed = parse(data);
        let contact = &parsed.contacts[0];
        assert_eq!(contact.property("NOTE").expect("note").value, "first\nsecond, really");
        assert_eq!(contact.property("ORG").expect("org").value, "Foo, Inc.;Sales");
        assert_eq!(
            contact.property("ADR").expect("adr").value,
            ";;Main St 1\\; Top 3;Vienna;;1010;Austria"
        );
    }

    #[test]
    fn parse_contacts_keeps_v21_text_verbatim() {
        let data = "BEGIN:VCARD\nVERSION:2.1\nN:Doe;Jane\nNOTE:C:\\temp\\new\nEND:VCARD\n";
        let parsed = parse(data);
        let note = parsed.contacts[0].property("NOTE").expect("note");
        assert_eq!(note.value, "C:\\temp\\new");
    }

    #[test]
    fn parse_contacts_keeps_cards_without_names_or_phones() {
        let data = "BEGIN:VCARD\nVERSION:3.0\nEMAIL:foo@example.com\nEND:VCARD\nBEGIN:VCARD\nVERSION:3.0\nEND:VCARD\n";
        let parsed = parse(data);
        assert_eq!(parsed.contacts.len(), 2);
        assert!(parsed.contacts[0].name.is_none());
        assert!(parsed.contacts[1].phones.is_empty());
    }

    #[test]
    fn parse_contacts_warns_on_structure_problems() {
        let data = "END:VCARD\nBEGIN:VCARD\nN:A;B\nBEGIN:VCARD\nN:C;D\nno colon here\n";
        let parsed = parse(data);
        assert_eq!(parsed.contacts.len(), 2);
        assert_eq!(parsed.warnings.len(), 4);
        assert!(parsed
            .warnings
            .iter()
            .any(|warning| warning.contains("missing END:VCARD")));
    }

    #[test]
    fn parse_contacts_empty_input() {
        let parsed = parse("");
        assert!(parsed.contacts.is_empty());
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn parse_contacts_rejects_binary_input() {
        let err = parse_contacts(b"BEGIN:VCARD\0").unwrap_err();
        assert!(matches!(err, VcfError::Parse(_)));
    }

    #[test]
    fn parse_contacts_handles_cr_only_line_endings() {
        let data = "BEGIN:VCARD\rVERSION:3.0\rN:Doe;Jane\rTEL:555-1234\rEND:VCARD\r";
        let parsed = parse(data);
        assert_eq!(parsed.contacts.len(), 1);
        assert_eq!(parsed.contacts[0].phones[0].text, "555-1234");
    }

    #[test]
    fn parse_structured_name_lists_and_escapes() {
        let name = parse_structured_name("O\\;Brien;John;Paul,George;Dr.;Jr.,PhD");
        assert_eq!(name.family, "O;Brien");
        assert_eq!(name.given, "John");
        assert_eq!(name.additional, vec!["Paul", "George"]);
        assert_eq!(name.prefixes, vec!["Dr."]);
        assert_eq!(name.suffixes, vec!["Jr.", "PhD"]);
    }

    #[test]
    fn parse_param_maps_bare_encodings() {
        let param = parse_param("BASE64").expect("param");
        assert!(param.is("ENCODING"));
        let param = parse_param("home").expect("param");
        assert!(param.is("TYPE"));
        assert_eq!(param.values, vec!["home"]);
    }
}
