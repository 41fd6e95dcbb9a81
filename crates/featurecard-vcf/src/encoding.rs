//! Text-level helpers shared by the reader and the writer: escaping,
//! component splitting and quoted-printable.

use std::borrow::Cow;

pub(crate) fn normalize_line_endings(input: &str) -> Cow<'_, str> {
    if !input.contains('\r') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\r' {
            if matches!(chars.peek(), Some('\n')) {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Decodes the raw file contents. Anything that is not UTF-8 is taken to
/// be Latin-1, the usual encoding of old handset exports.
pub(crate) fn decode_input(data: &[u8]) -> Cow<'_, str> {
    let text = match std::str::from_utf8(data) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(data.iter().map(|&byte| byte as char).collect()),
    };
    match text {
        Cow::Borrowed(text) => Cow::Borrowed(text.strip_prefix('\u{feff}').unwrap_or(text)),
        Cow::Owned(text) => Cow::Owned(text),
    }
}

pub(crate) fn decode_charset(bytes: &[u8], charset: Option<&str>) -> String {
    let latin = charset.is_some_and(|charset| {
        matches!(
            charset.to_ascii_uppercase().as_str(),
            "ISO-8859-1" | "ISO-8859-15" | "LATIN1" | "WINDOWS-1252" | "CP1252"
        )
    });
    if latin {
        bytes.iter().map(|&byte| byte as char).collect()
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Splits on `separator` unless it is escaped with a backslash. Escapes are
/// preserved in the returned parts.
pub(crate) fn split_unescaped(value: &str, separator: char) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut escape = false;

    for ch in value.chars() {
        if escape {
            current.push(ch);
            escape = false;
            continue;
        }

        if ch == '\\' {
            current.push(ch);
            escape = true;
            continue;
        }

        if ch == separator {
            items.push(current);
            current = String::new();
        } else {
            current.push(ch);
        }
    }

    items.push(current);
    items
}

pub(crate) fn unescape_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') | Some('N') => out.push('\n'),
                Some('\\') => out.push('\\'),
                Some(';') => out.push(';'),
                Some(',') => out.push(','),
                Some(':') => out.push(':'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

/// Escapes a structured-value component for vCard 2.1, where only the
/// component separator and the escape character itself are special.
pub(crate) fn escape_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn decode_quoted_printable(value: &str) -> Vec<u8> {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'=' {
            let high = bytes.get(index + 1).and_then(|byte| hex_value(*byte));
            let low = bytes.get(index + 2).and_then(|byte| hex_value(*byte));
            if let (Some(high), Some(low)) = (high, low) {
                out.push(high << 4 | low);
                index += 3;
                continue;
            }
        }
        out.push(bytes[index]);
        index += 1;
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        _ => None,
    }
}

pub(crate) fn needs_quoted_printable(value: &str) -> bool {
    value
        .chars()
        .any(|ch| !ch.is_ascii() || ch == '\n' || ch == '\r' || (ch.is_ascii_control() && ch != '\t'))
}

/// Encodes `value` as UTF-8 quoted-printable. Line breaks become `=0D=0A`.
pub(crate) fn encode_quoted_printable(value: &str) -> Vec<String> {
    let value = normalize_line_endings(value);
    let bytes = value.as_bytes();
    let mut tokens = Vec::with_capacity(bytes.len());
    for (index, &byte) in bytes.iter().enumerate() {
        let last = index + 1 == bytes.len();
        let token = match byte {
            b'\n' => "=0D=0A".to_string(),
            b'=' => "=3D".to_string(),
            b' ' | b'\t' if last => format!("={byte:02X}"),
            b' ' | b'\t' | 33..=126 => (byte as char).to_string(),
            _ => format!("={byte:02X}"),
        };
        tokens.push(token);
    }
    tokens
}
