//! Python bindings for the script queue tooling.
//!
//! The functions take and return text so the Python side keeps using its
//! own JSON and YAML libraries for everything else.
//!
//! Example:
//!     >>> import ts_observing
//!     >>> ts_observing.script_configuration_text('{"dec": "+01:23:45"}')
//!     'dec: "+01:23:45"\n'

use once_cell::sync::Lazy;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::config::ObservingConfig;
use crate::models::ScriptConfiguration;
use crate::serialization::Serializer;

/// Read `observing.toml` on first use; a bad file is reported on every call.
static SERIALIZER: Lazy<Result<Serializer, String>> = Lazy::new(|| {
    ObservingConfig::from_default_location()
        .map(|config| Serializer::from_config(&config))
        .map_err(|e| e.to_string())
});

fn serializer() -> PyResult<&'static Serializer> {
    SERIALIZER
        .as_ref()
        .map_err(|e| PyValueError::new_err(format!("Invalid configuration: {}", e)))
}

/// Render script parameters (a JSON object) as configuration text
///
/// Args:
///     parameters_json: JSON object with the script parameters
///
/// Returns:
///     str: YAML text, empty for an empty object
#[pyfunction]
pub fn script_configuration_text(parameters_json: &str) -> PyResult<String> {
    let raw: serde_json::Value = serde_json::from_str(parameters_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid JSON: {}", e)))?;
    let configuration = ScriptConfiguration::from_json(raw)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(configuration.render_with(serializer()?.options()))
}

/// Load a block document and dump it again with the configured formatting
///
/// Args:
///     text: Observing block document
///
/// Returns:
///     str: Normalized document
#[pyfunction]
pub fn normalize_block(text: &str) -> PyResult<String> {
    let serializer = serializer()?;
    let block = serializer
        .load(text)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    serializer
        .dump(&block)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Check a block document, raising ValueError with the offending field if malformed
#[pyfunction]
pub fn validate_block(text: &str) -> PyResult<()> {
    serializer()?
        .load(text)
        .map(|_| ())
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// ts_observing - observing block serialization
#[pymodule]
fn ts_observing(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(script_configuration_text, m)?)?;
    m.add_function(wrap_pyfunction!(normalize_block, m)?)?;
    m.add_function(wrap_pyfunction!(validate_block, m)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_is_loaded_once() {
        let first = serializer().unwrap();
        let second = serializer().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_script_configuration_text() {
        let text = script_configuration_text(r#"{"dec": "+01:23:45"}"#).unwrap();
        assert!(text.starts_with("dec: "));
        assert_eq!(script_configuration_text("{}").unwrap(), "");
        assert!(script_configuration_text("[1, 2]").is_err());
    }
}
