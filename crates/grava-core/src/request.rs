use std::fmt;

use serde::{Deserialize, Serialize};

use crate::module::ModuleSelector;

/// Where a dependency request currently points.
///
/// Substitution rules may redirect a request to a different module version
/// or to a local project in the same build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstitutionTarget {
    Module(ModuleSelector),
    Project(String),
}

impl fmt::Display for SubstitutionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionTarget::Module(sel) => write!(f, "{sel}"),
            SubstitutionTarget::Project(path) => write!(f, "project {path}"),
        }
    }
}

/// A single dependency request threaded through the substitution pipeline.
///
/// Each rule sees the target left by the previous rule and may rewrite it;
/// the originally requested selector stays untouched for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRequest {
    requested: ModuleSelector,
    target: SubstitutionTarget,
}

impl DependencyRequest {
    pub fn new(requested: ModuleSelector) -> Self {
        let target = SubstitutionTarget::Module(requested.clone());
        Self { requested, target }
    }

    /// The selector as originally declared, before any substitution.
    pub fn requested(&self) -> &ModuleSelector {
        &self.requested
    }

    /// The selector or project the request currently resolves to.
    pub fn target(&self) -> &SubstitutionTarget {
        &self.target
    }

    /// Rewrite only the version, keeping the current module coordinate.
    ///
    /// If an earlier rule redirected the request to a project, this points it
    /// back at the requested coordinate with the given version.
    pub fn use_version(&mut self, version: &str) {
        match &mut self.target {
            SubstitutionTarget::Module(sel) => {
                sel.version = version.to_string();
            }
            SubstitutionTarget::Project(_) => {
                self.target = SubstitutionTarget::Module(ModuleSelector::new(
                    self.requested.group.clone(),
                    self.requested.name.clone(),
                    version,
                ));
            }
        }
    }

    /// Redirect the request to a new target.
    pub fn use_target(&mut self, target: SubstitutionTarget) {
        self.target = target;
    }

    /// Whether any rule rewrote this request away from what was declared.
    pub fn is_updated(&self) -> bool {
        match &self.target {
            SubstitutionTarget::Module(sel) => *sel != self.requested,
            SubstitutionTarget::Project(_) => true,
        }
    }
}
