//! Lexical classification and quoting of configuration strings.
//!
//! The consumer of script configuration text is a generic YAML loader that
//! infers scalar types from their spelling. Any string that such a loader
//! could read back as something other than the same string is quoted here,
//! regardless of whether a particular YAML emitter would have quoted it.
//! The rules are conservative and cover the YAML 1.1 spellings
//! (`yes`, `on`, sexagesimal numbers) as well as the YAML 1.2 core schema.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Quote character used for strings that cannot be written plain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

/// Why a string has to be quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteReason {
    Empty,
    Null,
    Boolean,
    Numeric,
    /// Base-60 notation such as `+01:23:45` or `10:00:00`.
    Sexagesimal,
    /// Indicator characters, whitespace or anything outside the plain subset.
    Special,
}

static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)^[-+]?(?:
            [0-9][0-9_]*(?:\.[0-9_]*)?(?:[eE][-+]?[0-9]+)?
          | \.[0-9][0-9_]*(?:[eE][-+]?[0-9]+)?
          | 0[xX][0-9a-fA-F_]+
          | 0[oO][0-7_]+
          | 0[bB][01_]+
          | \.?(?i:inf|infinity|nan)
        )$",
    )
    .expect("numeric pattern is valid")
});

static SEXAGESIMAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[-+]?[0-9][0-9_]*(?::[0-9_]+)+(?:\.[0-9_]*)?$")
        .expect("sexagesimal pattern is valid")
});

const NULL_WORDS: [&str; 2] = ["null", "~"];
const BOOL_WORDS: [&str; 8] = ["true", "false", "yes", "no", "on", "off", "y", "n"];

/// Returns the reason `s` must be quoted, or `None` if it is safe to write plain.
pub fn quoting_reason(s: &str) -> Option<QuoteReason> {
    if s.is_empty() {
        return Some(QuoteReason::Empty);
    }
    let lower = s.to_ascii_lowercase();
    if NULL_WORDS.contains(&lower.as_str()) {
        return Some(QuoteReason::Null);
    }
    if BOOL_WORDS.contains(&lower.as_str()) {
        return Some(QuoteReason::Boolean);
    }
    if SEXAGESIMAL.is_match(s) {
        return Some(QuoteReason::Sexagesimal);
    }
    if NUMERIC.is_match(s) {
        return Some(QuoteReason::Numeric);
    }
    if !is_safe_plain(s) {
        return Some(QuoteReason::Special);
    }
    None
}

pub fn requires_quotes(s: &str) -> bool {
    quoting_reason(s).is_some()
}

/// Plain scalars are restricted to a subset that no YAML loader treats specially.
fn is_safe_plain(s: &str) -> bool {
    let mut chars = s.chars();
    let first_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '/');
    first_ok
        && !s.ends_with(' ')
        && !s.contains("  ")
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ' ' | '(' | ')'))
}

/// Render `s` as a YAML scalar, quoting it when [`requires_quotes`] says so.
pub fn render_string(s: &str, style: QuoteStyle) -> String {
    if !requires_quotes(s) {
        return s.to_string();
    }
    match style {
        QuoteStyle::Single if !s.chars().any(needs_escape) => single_quoted(s),
        _ => double_quoted(s),
    }
}

/// Characters outside the YAML printable set, plus the Unicode line breaks
/// a loader would fold inside a quoted scalar.
fn needs_escape(c: char) -> bool {
    let printable = matches!(c,
        ' '..='~' | '\u{a0}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}' | '\u{10000}'..='\u{10ffff}');
    !printable || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\0' => out.push_str("\\0"),
            c if (c as u32) < 0x100 && needs_escape(c) => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c if (c as u32) < 0x10000 && needs_escape(c) => {
                let _ = write!(out, "\\u{:04X}", c as u32);
            }
            c if needs_escape(c) => {
                let _ = write!(out, "\\U{:08X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
