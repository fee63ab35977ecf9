//! Observing block documents.
//!
//! A block is written as a JSON document whose script `configuration`
//! fields hold the YAML text produced by [`ScriptConfiguration::render_with`].
//! The JSON layer only ever sees that text as an opaque string, so whatever
//! the YAML layer quoted stays quoted:
//!
//! ```json
//! {
//!   "name": "BLOCK-1",
//!   "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
//!   "constraints": [{"name": "airmass", "max": 1.5}],
//!   "scripts": [
//!     {"name": "track_target", "standard": true, "configuration": "dec: \"+01:23:45\"\nra: \"10:00:00\"\n"}
//!   ]
//! }
//! ```

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::quoting::QuoteStyle;
use crate::config::ObservingConfig;
use crate::error::{FormatError, ObservingResult, ValidationError};
use crate::models::{
    AirmassConstraint, AltitudeConstraint, CloudExtinctionConstraint, MoonBrightnessConstraint, MoonDistanceConstraint,
    ObservingBlock, ObservingScript, SchedulingConstraint, ScriptConfiguration, SeeingConstraint,
    SkyBrightnessConstraint, TimeWindowConstraint, ValidationPolicy,
};

/// Formatting options, passed explicitly instead of living in global state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// When set, short scalar sequences are written in flow style (`[1, 2]`)
    /// if they fit within this many columns. Block style otherwise.
    pub line_width: Option<usize>,
    pub quote_style: QuoteStyle,
    /// Indent the outer JSON document.
    pub pretty: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            line_width: None,
            quote_style: QuoteStyle::Double,
            pretty: true,
        }
    }
}

/// Raw JSON structure for one script entry
#[derive(Debug, Serialize, Deserialize)]
struct ScriptDocument {
    name: String,
    #[serde(default)]
    standard: bool,
    #[serde(default)]
    configuration: String,
}

/// Raw JSON structure of a block document.
///
/// Constraints are read as raw JSON on load so that errors inside one can
/// name the offending field.
#[derive(Debug, Serialize, Deserialize)]
struct BlockDocument<C = SchedulingConstraint> {
    name: String,
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    program: Option<String>,
    #[serde(default)]
    constraints: Vec<C>,
    scripts: Vec<ScriptDocument>,
}

/// Converts observing blocks to and from their textual form.
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    options: SerializerOptions,
    policy: ValidationPolicy,
}

impl Serializer {
    pub fn new(options: SerializerOptions) -> Self {
        Self {
            options,
            policy: ValidationPolicy::default(),
        }
    }

    pub fn from_config(config: &ObservingConfig) -> Self {
        Self {
            options: config.serializer,
            policy: config.validation,
        }
    }

    /// Policy applied to blocks rebuilt by [`load`](Self::load).
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn options(&self) -> &SerializerOptions {
        &self.options
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Render `block` as a JSON document.
    pub fn dump(&self, block: &ObservingBlock) -> ObservingResult<String> {
        let document: BlockDocument = BlockDocument {
            name: block.name().to_string(),
            id: block.id(),
            program: block.program().map(str::to_string),
            constraints: block.constraints().to_vec(),
            scripts: block
                .scripts()
                .iter()
                .map(|script| ScriptDocument {
                    name: script.name().to_string(),
                    standard: script.is_standard(),
                    configuration: script.configuration_text_with(&self.options),
                })
                .collect(),
        };

        let text = if self.options.pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        log::debug!(
            "Dumped block {} ({}) with {} scripts and {} constraints",
            block.name(),
            block.id(),
            block.scripts().len(),
            block.constraints().len()
        );
        Ok(text)
    }

    /// Parse a document produced by [`dump`](Self::dump) back into a block.
    ///
    /// Every failure is reported as a [`FormatError`] naming the offending field.
    pub fn load(&self, text: &str) -> Result<ObservingBlock, FormatError> {
        self.load_document(text).map_err(|e| {
            log::warn!("Rejected observing block document: {}", e);
            e
        })
    }

    fn load_document(&self, text: &str) -> Result<ObservingBlock, FormatError> {
        let mut de = serde_json::Deserializer::from_str(text);
        let document: BlockDocument<serde_json::Value> = serde_path_to_error::deserialize(&mut de).map_err(|e| {
            let field = e.path().to_string();
            FormatError::new(field, e.into_inner().to_string())
        })?;
        de.end()
            .map_err(|e| FormatError::document(format!("Trailing content after block: {}", e)))?;

        let mut scripts = Vec::with_capacity(document.scripts.len());
        for (index, raw) in document.scripts.into_iter().enumerate() {
            let configuration = ScriptConfiguration::parse(&raw.configuration)
                .map_err(|e| e.within(&format!("scripts[{}].configuration", index)))?;
            let script = ObservingScript::new(raw.name, raw.standard, configuration)
                .map_err(|e| FormatError::new(format!("scripts[{}].name", index), e.to_string()))?;
            scripts.push(script);
        }

        let constraints = document
            .constraints
            .into_iter()
            .enumerate()
            .map(|(index, raw)| parse_constraint(raw).map_err(|e| e.within(&format!("constraints[{}]", index))))
            .collect::<Result<Vec<_>, _>>()?;

        let mut builder = ObservingBlock::builder(document.name)
            .id(document.id)
            .scripts(scripts)
            .constraints(constraints)
            .policy(self.policy);
        if let Some(program) = document.program {
            builder = builder.program(program);
        }

        let block = builder.build().map_err(|e| {
            let field = match &e {
                ValidationError::DuplicateScript(_) => "scripts",
                ValidationError::DuplicateConstraint(_) => "constraints",
                ValidationError::EmptyName("Program") => "program",
                _ => "name",
            };
            FormatError::new(field, e.to_string())
        })?;

        log::debug!("Loaded block {} ({}) with {} scripts", block.name(), block.id(), block.scripts().len());
        Ok(block)
    }
}

/// Rebuild one constraint from its document entry, dispatching on `name`.
fn parse_constraint(raw: serde_json::Value) -> Result<SchedulingConstraint, FormatError> {
    let mut fields = match raw {
        serde_json::Value::Object(fields) => fields,
        other => return Err(FormatError::document(format!("Constraint must be an object, found {}", other))),
    };
    let name = match fields.remove("name") {
        Some(serde_json::Value::String(name)) => name,
        Some(other) => {
            return Err(FormatError::new("name", format!("Constraint name must be a string, found {}", other)))
        }
        None => return Err(FormatError::document("missing field `name`")),
    };
    let body = serde_json::Value::Object(fields);

    let constraint = match name.as_str() {
        AirmassConstraint::NAME => SchedulingConstraint::Airmass(constraint_fields(body)?),
        MoonBrightnessConstraint::NAME => SchedulingConstraint::MoonBrightness(constraint_fields(body)?),
        MoonDistanceConstraint::NAME => SchedulingConstraint::MoonDistance(constraint_fields(body)?),
        SkyBrightnessConstraint::NAME => SchedulingConstraint::SkyBrightness(constraint_fields(body)?),
        CloudExtinctionConstraint::NAME => SchedulingConstraint::CloudExtinction(constraint_fields(body)?),
        SeeingConstraint::NAME => SchedulingConstraint::Seeing(constraint_fields(body)?),
        AltitudeConstraint::NAME => SchedulingConstraint::Altitude(constraint_fields(body)?),
        TimeWindowConstraint::NAME => SchedulingConstraint::TimeWindow(constraint_fields(body)?),
        other => return Err(FormatError::new("name", format!("Unknown constraint `{}`", other))),
    };

    constraint
        .validate()
        .map_err(|e| FormatError::document(e.to_string()))?;
    Ok(constraint)
}

fn constraint_fields<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, FormatError> {
    serde_path_to_error::deserialize(body).map_err(|e| {
        let field = e.path().to_string();
        FormatError::new(field, e.into_inner().to_string())
    })
}
