//! Text forms of observing blocks and script configurations.
//!
//! Serialization has two layers:
//!
//! - [`yaml`]: script configurations rendered as YAML text, with every
//!   ambiguous string quoted by the rules in [`quoting`]
//! - [`serializer`]: the block document (JSON) that embeds each rendered
//!   configuration as an opaque string
//!
//! # Example
//!
//! ```
//! use ts_observing::models::{ObservingBlock, ObservingScript, ScriptConfiguration, Value};
//! use ts_observing::serialization::{dump, load};
//!
//! let config = ScriptConfiguration::build([("dec", Value::from("+01:23:45"))]).unwrap();
//! let script = ObservingScript::new("track_target", true, config).unwrap();
//! let block = ObservingBlock::build("BLOCK-1", vec![script], vec![]).unwrap();
//!
//! let text = dump(&block).unwrap();
//! assert_eq!(load(&text).unwrap(), block);
//! ```

pub mod quoting;
pub mod serializer;
pub mod yaml;

#[cfg(test)]
mod yaml_tests;

pub use quoting::{quoting_reason, requires_quotes, QuoteReason, QuoteStyle};
pub use serializer::{Serializer, SerializerOptions};

use crate::error::{FormatError, ObservingResult};
use crate::models::ObservingBlock;

/// Dump with default options.
pub fn dump(block: &ObservingBlock) -> ObservingResult<String> {
    Serializer::default().dump(block)
}

/// Load with default options and policy.
pub fn load(text: &str) -> Result<ObservingBlock, FormatError> {
    Serializer::default().load(text)
}
