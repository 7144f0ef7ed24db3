//! Ordered accept/reject filters over candidate component versions.

use std::fmt;
use std::sync::Arc;

use grava_core::module::ModuleIdentifier;
use grava_util::errors::{MutationKind, StrategyError};

use crate::mutation::MutationGuard;

/// A candidate version the resolver is considering for a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentCandidate {
    pub module: ModuleIdentifier,
    pub version: String,
}

impl ComponentCandidate {
    pub fn new(module: ModuleIdentifier, version: impl Into<String>) -> Self {
        Self {
            module,
            version: version.into(),
        }
    }
}

impl fmt::Display for ComponentCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.version)
    }
}

/// Outcome of evaluating a candidate against the rule chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentDecision {
    Accepted,
    Rejected { reason: String },
}

type SelectionPredicate = Arc<dyn Fn(&ComponentCandidate) -> ComponentDecision + Send + Sync>;

/// A named selection rule.
#[derive(Clone)]
pub struct SelectionRule {
    name: String,
    predicate: SelectionPredicate,
}

impl SelectionRule {
    pub fn new(
        name: impl Into<String>,
        predicate: impl Fn(&ComponentCandidate) -> ComponentDecision + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn evaluate(&self, candidate: &ComponentCandidate) -> ComponentDecision {
        (self.predicate)(candidate)
    }
}

impl fmt::Debug for SelectionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionRule")
            .field("name", &self.name)
            .finish()
    }
}

/// The ordered selection rule chain.
///
/// The resolver runs the chain once per candidate, in registration order.
/// Any reject eliminates the candidate and stops the chain; acceptance never
/// short-circuits, since independent exclusion criteria may still apply.
#[derive(Debug, Clone)]
pub struct ComponentSelectionRules {
    rules: Vec<SelectionRule>,
    guard: MutationGuard,
}

impl ComponentSelectionRules {
    pub(crate) fn new(guard: MutationGuard) -> Self {
        Self {
            rules: Vec::new(),
            guard,
        }
    }

    pub fn add_rule(&mut self, rule: SelectionRule) -> Result<(), StrategyError> {
        self.guard.validate_mutation(MutationKind::Selection)?;
        self.rules.push(rule);
        Ok(())
    }

    /// Shorthand: reject candidates matching `predicate` with `reason`.
    pub fn reject_if(
        &mut self,
        name: impl Into<String>,
        reason: impl Into<String>,
        predicate: impl Fn(&ComponentCandidate) -> bool + Send + Sync + 'static,
    ) -> Result<(), StrategyError> {
        let reason = reason.into();
        self.add_rule(SelectionRule::new(name, move |candidate| {
            if predicate(candidate) {
                ComponentDecision::Rejected {
                    reason: reason.clone(),
                }
            } else {
                ComponentDecision::Accepted
            }
        }))
    }

    /// Run the chain for one candidate, stopping at the first reject.
    pub fn evaluate(&self, candidate: &ComponentCandidate) -> ComponentDecision {
        for rule in &self.rules {
            if let ComponentDecision::Rejected { reason } = rule.evaluate(candidate) {
                return ComponentDecision::Rejected { reason };
            }
        }
        ComponentDecision::Accepted
    }

    pub fn rules(&self) -> &[SelectionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Append another chain's rules after this chain's own.
    pub(crate) fn extend_from(&mut self, other: &ComponentSelectionRules) {
        self.rules.extend(other.rules.iter().cloned());
    }
}
