use super::configuration::ScriptConfiguration;
use crate::error::ValidationError;
use crate::serialization::serializer::SerializerOptions;

/// A single observing script with the parameters it is launched with.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservingScript {
    name: String,
    standard: bool,
    configuration: ScriptConfiguration,
}

impl ObservingScript {
    /// Create a script entry.
    ///
    /// # Arguments
    /// * `name` - Script path as known to the script queue (e.g. `maintel/track_target.py`)
    /// * `standard` - `true` for the standard script package, `false` for the external one
    /// * `configuration` - Keyword arguments, possibly empty
    pub fn new(
        name: impl Into<String>,
        standard: bool,
        configuration: ScriptConfiguration,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName("Script name"));
        }
        Ok(Self {
            name,
            standard,
            configuration,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_standard(&self) -> bool {
        self.standard
    }

    pub fn configuration(&self) -> &ScriptConfiguration {
        &self.configuration
    }

    /// Swap the whole configuration; scripts are never edited parameter by parameter.
    pub fn with_configuration(self, configuration: ScriptConfiguration) -> Self {
        Self { configuration, ..self }
    }

    /// `(standard, name)` pair the script queue uses to find the executable.
    pub fn identity(&self) -> (bool, &str) {
        (self.standard, &self.name)
    }

    pub fn configuration_text(&self) -> String {
        self.configuration.render()
    }

    pub fn configuration_text_with(&self, options: &SerializerOptions) -> String {
        self.configuration.render_with(options)
    }
}
