//! Observing blocks for the script queue.
//!
//! An observing block names an observation, lists the scripts that carry it
//! out (with their configurations) and the constraints the scheduler must
//! respect. This crate builds and validates blocks and turns them into text
//! that survives a round trip through a type-guessing YAML loader.
//!
//! - [`models`]: values, script configurations, scripts, constraints, blocks
//! - [`serialization`]: configuration YAML and block documents
//! - [`config`]: TOML settings for formatting and validation
//! - [`error`]: validation and format errors

pub mod config;
pub mod error;
pub mod models;
pub mod serialization;

#[cfg(feature = "python")]
pub mod python;

pub use config::ObservingConfig;
pub use error::{FormatError, ObservingError, ObservingResult, ValidationError};
pub use models::{ObservingBlock, ObservingScript, SchedulingConstraint, ScriptConfiguration, Value};
pub use serialization::{Serializer, SerializerOptions};
