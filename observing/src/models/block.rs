use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use super::constraints::SchedulingConstraint;
use super::script::ObservingScript;
use crate::error::ValidationError;

/// Deployment-specific checks applied when a block is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationPolicy {
    /// Reject blocks where two scripts share `(standard, name)`.
    pub require_unique_scripts: bool,
    /// Reject blocks with more than one constraint of a kind (per band for sky brightness).
    pub require_unique_constraints: bool,
}

/// A collection of observing scripts and the constraints to schedule them under.
///
/// Blocks are value objects: every change produces a new block.
///
/// # Examples
///
/// ```
/// use ts_observing::models::{ObservingBlock, ObservingScript, SchedulingConstraint, ScriptConfiguration};
///
/// let slew = ObservingScript::new("slew", true, ScriptConfiguration::empty()).unwrap();
/// let block = ObservingBlock::builder("OBS-123")
///     .program("SITCOM-456")
///     .script(slew)
///     .constraint(SchedulingConstraint::airmass(1.5).unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(block.scripts().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ObservingBlock {
    name: String,
    id: Uuid,
    program: Option<String>,
    constraints: Vec<SchedulingConstraint>,
    scripts: Vec<ObservingScript>,
}

impl ObservingBlock {
    /// Build a block with a fresh id, no program and the default policy.
    pub fn build(
        name: impl Into<String>,
        scripts: Vec<ObservingScript>,
        constraints: Vec<SchedulingConstraint>,
    ) -> Result<Self, ValidationError> {
        Self::builder(name).scripts(scripts).constraints(constraints).build()
    }

    pub fn builder(name: impl Into<String>) -> ObservingBlockBuilder {
        ObservingBlockBuilder {
            name: name.into(),
            id: None,
            program: None,
            constraints: Vec::new(),
            scripts: Vec::new(),
            policy: ValidationPolicy::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn program(&self) -> Option<&str> {
        self.program.as_deref()
    }

    /// Scripts in execution order.
    pub fn scripts(&self) -> &[ObservingScript] {
        &self.scripts
    }

    pub fn constraints(&self) -> &[SchedulingConstraint] {
        &self.constraints
    }

    /// Copy of this block with one more constraint.
    ///
    /// No check is made for an existing constraint of the same kind unless the
    /// policy asks for it.
    pub fn with_constraint(
        &self,
        constraint: SchedulingConstraint,
        policy: ValidationPolicy,
    ) -> Result<Self, ValidationError> {
        let mut constraints = self.constraints.clone();
        constraints.push(constraint);
        ObservingBlockBuilder {
            name: self.name.clone(),
            id: Some(self.id),
            program: self.program.clone(),
            constraints,
            scripts: self.scripts.clone(),
            policy,
        }
        .build()
    }
}

/// Builder for [`ObservingBlock`]; validation happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ObservingBlockBuilder {
    name: String,
    id: Option<Uuid>,
    program: Option<String>,
    constraints: Vec<SchedulingConstraint>,
    scripts: Vec<ObservingScript>,
    policy: ValidationPolicy,
}

impl ObservingBlockBuilder {
    /// Use an externally assigned id instead of a random one.
    pub fn id(mut self, id: Uuid) -> Self {
        self.id = Some(id);
        self
    }

    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = Some(program.into());
        self
    }

    pub fn script(mut self, script: ObservingScript) -> Self {
        self.scripts.push(script);
        self
    }

    pub fn scripts(mut self, scripts: impl IntoIterator<Item = ObservingScript>) -> Self {
        self.scripts.extend(scripts);
        self
    }

    pub fn constraint(mut self, constraint: SchedulingConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn constraints(mut self, constraints: impl IntoIterator<Item = SchedulingConstraint>) -> Self {
        self.constraints.extend(constraints);
        self
    }

    pub fn policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<ObservingBlock, ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName("Block name"));
        }
        if matches!(&self.program, Some(p) if p.trim().is_empty()) {
            return Err(ValidationError::EmptyName("Program"));
        }

        for constraint in &self.constraints {
            constraint.validate()?;
        }

        if self.policy.require_unique_scripts {
            let mut seen = HashSet::new();
            for script in &self.scripts {
                if !seen.insert(script.identity()) {
                    let package = if script.is_standard() { "standard" } else { "external" };
                    return Err(ValidationError::DuplicateScript(format!("{} ({})", script.name(), package)));
                }
            }
        }

        if self.policy.require_unique_constraints {
            let mut seen = HashSet::new();
            for constraint in &self.constraints {
                let key = constraint.kind_key();
                if !seen.insert(key.clone()) {
                    return Err(ValidationError::DuplicateConstraint(key));
                }
            }
        }

        Ok(ObservingBlock {
            name: self.name,
            id: self.id.unwrap_or_else(Uuid::new_v4),
            program: self.program,
            constraints: self.constraints,
            scripts: self.scripts,
        })
    }
}
