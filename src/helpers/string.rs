//! Text utilities shared by the extractor and the sheet writer: markup
//! cleanup, entity decoding and locale-aware number recognition.

use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::Timelike;
use regex::Regex;
use std::sync::LazyLock;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Hardcode regex pattern"));

static ENTITY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("Hardcode regex pattern")
});

// Optional sign, integer part either plain or grouped by three, optional
// fraction and exponent.
static NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d{1,3}(,\d{3})+|\d+)?(\.\d+)?([eE][+-]?\d+)?$")
        .expect("Hardcode regex pattern")
});

static DATE_PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}").expect("Hardcode regex pattern"));

/// Removes every `<...>` tag from a fragment of markup.
pub fn strip_tags(s: &str) -> String {
    TAG_PATTERN.replace_all(s, "").into_owned()
}

/// Decodes the character references SQL*Plus emits in HTML markup.
/// Unknown named entities are left untouched.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_owned();
    }
    ENTITY_PATTERN
        .replace_all(s, |captures: &regex::Captures| {
            let raw = &captures[1];
            let resolved = if let Some(number) = raw.strip_prefix('#') {
                let code = if let Some(hex) = number.strip_prefix(|c: char| c == 'x' || c == 'X') {
                    u32::from_str_radix(hex, 16).ok()
                } else {
                    number.parse::<u32>().ok()
                };
                code.and_then(char::from_u32).map(String::from)
            } else {
                match raw {
                    "nbsp" => Some(" ".to_owned()),
                    "lt" => Some("<".to_owned()),
                    "gt" => Some(">".to_owned()),
                    "amp" => Some("&".to_owned()),
                    "quot" => Some("\"".to_owned()),
                    "apos" => Some("'".to_owned()),
                    _ => None,
                }
            };
            resolved.unwrap_or_else(|| captures[0].to_owned())
        })
        .into_owned()
}

/// Textual content of a table cell: tags stripped, entities decoded, trimmed.
pub fn cell_text(inner_html: &str) -> String {
    decode_entities(&strip_tags(inner_html)).trim().to_owned()
}

/// Parses a trimmed cell value as a number, accepting `,` thousands
/// separators placed in groups of three. Returns `None` for anything else,
/// including `inf`/`nan` spellings that `f64::from_str` would accept.
pub fn parse_number(value: &str) -> Option<f64> {
    let value = value.trim();
    if !value.bytes().any(|byte| byte.is_ascii_digit()) || !NUMBER_PATTERN.is_match(value) {
        return None;
    }
    value.replace(',', "").parse::<f64>().ok()
}

/// Parses `YYYY-MM-DD[ HH:MM[:SS]]` (space or `T` separated).
/// The boolean is true when the value carries a time of day other than midnight.
pub fn parse_date_time(value: &str) -> Option<(NaiveDateTime, bool)> {
    let value = value.trim();
    if value.len() < 10 || !DATE_PREFIX_PATTERN.is_match(value) {
        return None;
    }
    if value.len() == 10 {
        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
        return Some((date.and_hms_opt(0, 0, 0)?, false));
    }
    let normalized = value.replacen('T', " ", 1);
    let datetime = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M"))
        .ok()?;
    let has_time = datetime.time().num_seconds_from_midnight() != 0;
    Some((datetime, has_time))
}
