//! Observing block data model.
//!
//! Blocks are assembled leaf-first: [`Value`]s make up a
//! [`ScriptConfiguration`], which is carried by an [`ObservingScript`];
//! scripts and [`SchedulingConstraint`]s make up an [`ObservingBlock`].
//! All of these are plain values, validated when constructed.

pub mod block;
pub mod configuration;
pub mod constraints;
pub mod script;
pub mod time;
pub mod value;

pub use block::*;
pub use configuration::*;
pub use constraints::*;
pub use script::*;
pub use time::*;
pub use value::{classify, Value, ValueKind};
