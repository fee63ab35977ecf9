//! Keyword arguments handed to an observing script.

use indexmap::IndexMap;

use super::value::{check_key, from_json, Value};
use crate::error::{FormatError, ValidationError};
use crate::serialization::serializer::SerializerOptions;
use crate::serialization::yaml;

/// Ordered mapping from parameter name to [`Value`].
///
/// An empty configuration is a distinct state: it renders to the empty
/// string, because the script queue treats any non-empty text (including
/// `{}`) as "configuration present".
///
/// # Examples
///
/// ```
/// use ts_observing::models::{ScriptConfiguration, Value};
///
/// let config = ScriptConfiguration::build([
///     ("dec", Value::from("+01:23:45")),
///     ("ra", Value::from("10:00:00")),
/// ])
/// .unwrap();
///
/// assert_eq!(config.render(), "dec: \"+01:23:45\"\nra: \"10:00:00\"\n");
/// assert_eq!(ScriptConfiguration::empty().render(), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptConfiguration {
    parameters: IndexMap<String, Value>,
}

impl ScriptConfiguration {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a configuration from `(name, value)` pairs, keeping their order.
    ///
    /// Fails if a name repeats, a name or nested key is longer than
    /// [`MAX_KEY_CHARS`](super::value::MAX_KEY_CHARS), or a value holds a
    /// non-finite float.
    pub fn build<K, I>(pairs: I) -> Result<Self, ValidationError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut parameters = IndexMap::new();
        for (name, value) in pairs {
            let name = name.into();
            check_key(&name, &name)?;
            value.validate(&name)?;
            if parameters.contains_key(&name) {
                return Err(ValidationError::DuplicateParameter(name));
            }
            parameters.insert(name, value);
        }
        Ok(Self { parameters })
    }

    /// Build from a JSON object such as the `parameters` of a request.
    pub fn from_json(raw: serde_json::Value) -> Result<Self, ValidationError> {
        match raw {
            serde_json::Value::Object(map) => {
                let pairs = map
                    .into_iter()
                    .map(|(name, value)| {
                        let value = from_json(value, &name)?;
                        Ok((name, value))
                    })
                    .collect::<Result<Vec<_>, ValidationError>>()?;
                Self::build(pairs)
            }
            other => Err(ValidationError::NotAMapping(json_type_name(&other).to_string())),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render with the default [`SerializerOptions`].
    pub fn render(&self) -> String {
        self.render_with(&SerializerOptions::default())
    }

    /// Render as YAML text, or the empty string when there are no parameters.
    pub fn render_with(&self, options: &SerializerOptions) -> String {
        if self.parameters.is_empty() {
            return String::new();
        }
        yaml::render_mapping(&self.parameters, options)
    }

    /// Inverse of [`render`](Self::render). The empty string is the empty configuration.
    ///
    /// Tags follow [`yaml::parse_mapping`]: standard `!!` tags resolve to
    /// plain values, others are a [`FormatError`].
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        if text.is_empty() {
            return Ok(Self::empty());
        }
        let parameters = yaml::parse_mapping(text)?;
        Ok(Self { parameters })
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_configuration_renders_empty_string() {
        assert_eq!(ScriptConfiguration::empty().render(), "");
        assert_eq!(ScriptConfiguration::build(Vec::<(String, Value)>::new()).unwrap().render(), "");
        assert_eq!(ScriptConfiguration::from_json(json!({})).unwrap().render(), "");
    }

    #[test]
    fn test_empty_nested_structure_is_not_empty_configuration() {
        let config = ScriptConfiguration::from_json(json!({"options": {}})).unwrap();
        assert!(!config.is_empty());
        assert_eq!(config.render(), "options: {}\n");
    }

    #[test]
    fn test_parse_empty_string() {
        let config = ScriptConfiguration::parse("").unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let err = ScriptConfiguration::build([("exptime", Value::from(30.0)), ("exptime", Value::from(15.0))])
            .unwrap_err();
        assert_eq!(err, ValidationError::DuplicateParameter("exptime".to_string()));
    }

    #[test]
    fn test_from_json_requires_object() {
        let err = ScriptConfiguration::from_json(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::NotAMapping(_)));
    }

    #[test]
    fn test_parse_rejects_non_mapping() {
        assert!(ScriptConfiguration::parse("- a\n- b\n").is_err());
        assert!(ScriptConfiguration::parse("just text").is_err());
        assert!(ScriptConfiguration::parse("key: [unclosed").is_err());
    }

    #[test]
    fn test_parse_rejects_duplicate_keys() {
        assert!(ScriptConfiguration::parse("a: 1\na: 2\n").is_err());
    }

    #[test]
    fn test_binary_tag_reads_as_base64_text() {
        let config = ScriptConfiguration::parse("x: !!binary aGk=\n").unwrap();
        assert_eq!(config.get("x"), Some(&Value::String("aGk=".to_string())));
        assert_eq!(config.render(), "x: \"aGk=\"\n");
    }

    #[test]
    fn test_custom_tag_rejected() {
        assert!(ScriptConfiguration::parse("angle: !degrees 10\n").is_err());
    }

    #[test]
    fn test_render_keeps_insertion_order() {
        let config = ScriptConfiguration::from_json(json!({"target": "W48", "exptime": 30.0, "nexp": 3})).unwrap();
        assert_eq!(config.render(), "target: W48\nexptime: 30.0\nnexp: 3\n");
    }
}
