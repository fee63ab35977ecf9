//! Block-style YAML rendering of configuration values.
//!
//! Output follows the layout script authors are used to from PyYAML with
//! `default_flow_style=False`: nested mappings are indented by two spaces,
//! sequences under a mapping key are not indented, and collections inside a
//! sequence item start on the dash line. Scalars go through
//! [`quoting::render_string`](super::quoting::render_string) so that the text
//! does not depend on the heuristics of whatever YAML library reads it.

use indexmap::IndexMap;

use super::quoting::render_string;
use super::serializer::SerializerOptions;
use crate::error::FormatError;
use crate::models::value::{from_yaml, Value};

const INDENT: usize = 2;

/// Render a non-empty top-level mapping.
pub fn render_mapping(map: &IndexMap<String, Value>, options: &SerializerOptions) -> String {
    let mut out = String::new();
    Emitter { options, out: &mut out }.mapping(map, 0, false);
    out
}

/// Render a scalar or empty collection on a single line.
pub fn render_inline(value: &Value, options: &SerializerOptions) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => render_float(*f),
        Value::String(s) => render_string(s, options.quote_style),
        Value::Sequence(items) => {
            let items: Vec<String> = items.iter().map(|item| render_inline(item, options)).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Mapping(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", render_string(k, options.quote_style), render_inline(v, options)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// `Debug` always keeps a fraction or an exponent, so `30.0` never reads back as `30`.
fn render_float(f: f64) -> String {
    format!("{:?}", f)
}

struct Emitter<'a> {
    options: &'a SerializerOptions,
    out: &'a mut String,
}

impl Emitter<'_> {
    fn pad(&mut self, column: usize, inline: bool) {
        if !inline {
            self.out.extend(std::iter::repeat(' ').take(column));
        }
    }

    fn mapping(&mut self, map: &IndexMap<String, Value>, column: usize, first_inline: bool) {
        for (i, (key, value)) in map.iter().enumerate() {
            self.pad(column, first_inline && i == 0);
            let key = render_string(key, self.options.quote_style);
            self.out.push_str(&key);
            self.out.push(':');
            match value {
                Value::Mapping(nested) if !nested.is_empty() => {
                    self.out.push('\n');
                    self.mapping(nested, column + INDENT, false);
                }
                Value::Sequence(items) if !items.is_empty() => {
                    let prefix = column + key.chars().count() + 2;
                    if let Some(flow) = self.flow_sequence(items, prefix) {
                        self.out.push(' ');
                        self.out.push_str(&flow);
                        self.out.push('\n');
                    } else {
                        self.out.push('\n');
                        self.sequence(items, column, false);
                    }
                }
                scalar => {
                    self.out.push(' ');
                    self.out.push_str(&render_inline(scalar, self.options));
                    self.out.push('\n');
                }
            }
        }
    }

    fn sequence(&mut self, items: &[Value], column: usize, first_inline: bool) {
        for (i, item) in items.iter().enumerate() {
            self.pad(column, first_inline && i == 0);
            self.out.push_str("- ");
            match item {
                Value::Mapping(nested) if !nested.is_empty() => {
                    self.mapping(nested, column + INDENT, true);
                }
                Value::Sequence(nested) if !nested.is_empty() => {
                    self.sequence(nested, column + INDENT, true);
                }
                scalar => {
                    self.out.push_str(&render_inline(scalar, self.options));
                    self.out.push('\n');
                }
            }
        }
    }

    /// Flow form of a scalar-only sequence, if a line width is configured and it fits.
    fn flow_sequence(&self, items: &[Value], prefix: usize) -> Option<String> {
        let width = self.options.line_width?;
        if !items.iter().all(Value::is_scalar) {
            return None;
        }
        let flow = render_inline(&Value::Sequence(items.to_vec()), self.options);
        (prefix + flow.chars().count() <= width).then_some(flow)
    }
}

/// Parse configuration text into its top-level mapping.
///
/// Standard `!!` tags are resolved by the YAML loader before values are
/// converted: `!!str`, `!!int`, `!!float`, `!!bool` and `!!null` give the
/// corresponding scalar, and `!!binary` gives its base64 text as a string.
/// Any other tag is rejected.
pub fn parse_mapping(text: &str) -> Result<IndexMap<String, Value>, FormatError> {
    let raw: serde_yaml::Value = serde_yaml::from_str(text)
        .map_err(|e| FormatError::document(format!("Invalid YAML: {}", e)))?;

    if !raw.is_mapping() {
        return Err(FormatError::document(format!(
            "Configuration must be a mapping, found {}",
            yaml_type_name(&raw)
        )));
    }

    match from_yaml(raw, "$") {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(_) => Err(FormatError::document("Configuration must be a mapping")),
        Err(e) => Err(FormatError::document(e.to_string())),
    }
}

fn yaml_type_name(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}
