//! Canonical JSON encoding of action content.
//!
//! The proof hash is computed over these bytes, so the encoding is frozen:
//! - Object keys sorted by byte comparison
//! - No whitespace; `,` between members and `:` after keys
//! - Every content field present; absent optionals are the literal `null`
//! - Strings escaped to pure ASCII (`\uXXXX`, surrogate pairs above U+FFFF)
//! - Numbers in shortest round-trip form, always with a fraction or exponent
//!
//! Attestation fields, timestamps and the record id are never encoded.

use std::fmt::Write;

use crate::action::ActionContent;

/// Content field keys.
mod keys {
    pub const ACTOR: &str = "actor";
    pub const CATEGORY: &str = "category";
    pub const DESCRIPTION: &str = "description";
    pub const EVIDENCE_URL: &str = "evidence_url";
    pub const LOCATION: &str = "location";
    pub const QUANTITY: &str = "quantity";
    pub const TITLE: &str = "title";
    pub const UNIT: &str = "unit";
}

/// A JSON scalar as it appears in encoded content.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value<'a> {
    Null,
    Text(&'a str),
    Number(f64),
}

impl<'a> Value<'a> {
    fn optional(text: Option<&'a str>) -> Self {
        text.map_or(Value::Null, Value::Text)
    }
}

/// Encode action content to canonical bytes.
pub fn canonical_content(content: &ActionContent) -> Vec<u8> {
    // Listed in declaration order; the encoder sorts.
    let entries = [
        (keys::ACTOR, Value::Text(&content.actor)),
        (keys::TITLE, Value::Text(&content.title)),
        (keys::DESCRIPTION, Value::optional(content.description.as_deref())),
        (keys::CATEGORY, Value::Text(content.category.as_str())),
        (keys::QUANTITY, Value::Number(content.quantity)),
        (keys::UNIT, Value::Text(&content.unit)),
        (keys::LOCATION, Value::optional(content.location.as_deref())),
        (keys::EVIDENCE_URL, Value::optional(content.evidence_url.as_deref())),
    ];

    let mut buf = String::with_capacity(256);
    encode_object_canonical(&mut buf, &entries);
    buf.into_bytes()
}

/// Encode an object with keys sorted by byte comparison.
fn encode_object_canonical(buf: &mut String, entries: &[(&str, Value<'_>)]) {
    let mut sorted: Vec<&(&str, Value<'_>)> = entries.iter().collect();
    sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    buf.push('{');
    for (i, (key, value)) in sorted.into_iter().enumerate() {
        if i > 0 {
            buf.push(',');
        }
        encode_text(buf, key);
        buf.push(':');
        encode_value(buf, value);
    }
    buf.push('}');
}

fn encode_value(buf: &mut String, value: &Value<'_>) {
    match value {
        Value::Null => buf.push_str("null"),
        Value::Text(s) => encode_text(buf, s),
        Value::Number(n) => buf.push_str(&format_number(*n)),
    }
}

/// Encode a quoted, ASCII-only string.
fn encode_text(buf: &mut String, s: &str) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\u{08}' => buf.push_str("\\b"),
            '\u{0c}' => buf.push_str("\\f"),
            ' '..='~' => buf.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(buf, "\\u{:04x}", unit);
                }
            }
        }
    }
    buf.push('"');
}

/// Format a number in shortest round-trip form.
///
/// Decimal exponents in `[-4, 16)` are written positionally with at least
/// one fractional digit; anything else uses `d.ddde±XX`. Non-finite values
/// become `NaN`, `Infinity` and `-Infinity`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    // `{:e}` yields the shortest digits that round-trip, e.g. "1.25e1".
    let sci = format!("{:e}", n.abs());
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    let mut out = String::with_capacity(digits.len() + 8);
    if n.is_sign_negative() {
        out.push('-');
    }

    if (-4..16).contains(&exponent) {
        if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.extend(std::iter::repeat('0').take(int_len - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat('0').take((-exponent - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{}{:02}", sign, exponent.abs());
    }
    out
}
