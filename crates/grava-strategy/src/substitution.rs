//! Ordered dependency-substitution rules and the composed pipeline the
//! resolver applies to every dependency request.

use std::fmt;
use std::sync::Arc;

use grava_core::module::ModuleSelector;
use grava_core::request::{DependencyRequest, SubstitutionTarget};
use grava_util::errors::{MutationKind, StrategyError};

use crate::mutation::MutationGuard;

/// A free-form rewrite applied to a dependency request.
pub type EachDependencyAction = Arc<dyn Fn(&mut DependencyRequest) + Send + Sync>;

/// Matches a requested module coordinate, optionally version-exact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePattern {
    pub group: String,
    pub name: String,
    /// `None` matches any version of the coordinate.
    pub version: Option<String>,
}

impl ModulePattern {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: None,
        }
    }

    /// Parse `"group:name"` or `"group:name:version"` notation.
    pub fn parse(notation: &str) -> Result<Self, StrategyError> {
        let parts: Vec<&str> = notation.split(':').collect();
        if !(2..=3).contains(&parts.len()) || parts.iter().any(|p| p.is_empty()) {
            return Err(StrategyError::Notation {
                notation: notation.to_string(),
                message: "expected 'group:name' or 'group:name:version'".to_string(),
            });
        }
        Ok(Self {
            group: parts[0].to_string(),
            name: parts[1].to_string(),
            version: parts.get(2).map(|v| v.to_string()),
        })
    }

    pub fn matches(&self, selector: &ModuleSelector) -> bool {
        self.group == selector.group
            && self.name == selector.name
            && self
                .version
                .as_ref()
                .map_or(true, |v| *v == selector.version)
    }
}

impl fmt::Display for ModulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}:{v}", self.group, self.name),
            None => write!(f, "{}:{}", self.group, self.name),
        }
    }
}

/// A single user-registered substitution rule.
#[derive(Clone)]
pub enum SubstitutionRule {
    /// Structured redirection: requests matching `pattern` go to `target`.
    Module {
        pattern: ModulePattern,
        target: SubstitutionTarget,
    },
    /// A rewrite action run against every request. This is how the legacy
    /// `each_dependency` entry point is represented internally, so legacy
    /// call sites order exactly like native rules.
    Each(EachDependencyAction),
}

impl SubstitutionRule {
    fn apply(&self, request: &mut DependencyRequest) {
        match self {
            SubstitutionRule::Module { pattern, target } => {
                // Match against the current target so chained rules compose:
                // each rule sees the output of the previous one.
                if let SubstitutionTarget::Module(current) = request.target() {
                    if pattern.matches(current) {
                        request.use_target(target.clone());
                    }
                }
            }
            SubstitutionRule::Each(action) => action(request),
        }
    }
}

impl fmt::Debug for SubstitutionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubstitutionRule::Module { pattern, target } => f
                .debug_struct("Module")
                .field("pattern", pattern)
                .field("target", target)
                .finish(),
            SubstitutionRule::Each(_) => f.write_str("Each(..)"),
        }
    }
}

/// The user-facing ordered substitution rule list.
///
/// Rules apply in registration order. Forced modules are not part of this
/// list; they are prepended when the composed pipeline is built, so they
/// always win regardless of registration order.
#[derive(Debug, Clone)]
pub struct DependencySubstitutions {
    rules: Vec<SubstitutionRule>,
    guard: MutationGuard,
}

impl DependencySubstitutions {
    pub(crate) fn new(guard: MutationGuard) -> Self {
        Self {
            rules: Vec::new(),
            guard,
        }
    }

    /// Register "replace modules matching `pattern` with `target`".
    pub fn substitute(
        &mut self,
        pattern: ModulePattern,
        target: SubstitutionTarget,
    ) -> Result<(), StrategyError> {
        self.guard.validate_mutation(MutationKind::Substitution)?;
        self.rules.push(SubstitutionRule::Module { pattern, target });
        Ok(())
    }

    /// Notation shorthand: redirect `from` (`"group:name[:version]"`) to the
    /// module `to` (`"group:name:version"`).
    pub fn substitute_module(&mut self, from: &str, to: &str) -> Result<(), StrategyError> {
        let pattern = ModulePattern::parse(from)?;
        let target = SubstitutionTarget::Module(ModuleSelector::parse(to)?);
        self.substitute(pattern, target)
    }

    /// Notation shorthand: redirect `from` to a local project path.
    pub fn substitute_with_project(
        &mut self,
        from: &str,
        project: &str,
    ) -> Result<(), StrategyError> {
        let pattern = ModulePattern::parse(from)?;
        self.substitute(pattern, SubstitutionTarget::Project(project.to_string()))
    }

    /// Register an action run against every dependency request.
    pub fn all(&mut self, action: EachDependencyAction) -> Result<(), StrategyError> {
        self.guard.validate_mutation(MutationKind::Substitution)?;
        self.rules.push(SubstitutionRule::Each(action));
        Ok(())
    }

    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Deep copy rebound to a fresh guard.
    pub(crate) fn copy(&self, guard: MutationGuard) -> Self {
        Self {
            rules: self.rules.clone(),
            guard,
        }
    }
}

/// One stage of the composed pipeline, in application order.
#[derive(Clone)]
pub enum PipelineStage {
    /// The synthetic highest-precedence stage built from the forced-module
    /// set. Always first.
    ModuleForcing(Vec<ModuleSelector>),
    /// A user-registered rule, in registration order.
    User(SubstitutionRule),
}

impl fmt::Debug for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::ModuleForcing(forced) => {
                f.debug_tuple("ModuleForcing").field(forced).finish()
            }
            PipelineStage::User(rule) => f.debug_tuple("User").field(rule).finish(),
        }
    }
}

/// The composed substitution rule handed to the resolver.
///
/// The forcing stage runs before every user rule, so a forced version cannot
/// be undone by a later-registered substitution for the same coordinate.
/// That precedence is structural: the stage list itself is inspectable.
#[derive(Debug, Clone)]
pub struct SubstitutionPipeline {
    stages: Vec<PipelineStage>,
}

impl SubstitutionPipeline {
    pub(crate) fn new(forced: Vec<ModuleSelector>, user_rules: &[SubstitutionRule]) -> Self {
        let mut stages = Vec::with_capacity(1 + user_rules.len());
        stages.push(PipelineStage::ModuleForcing(forced));
        stages.extend(user_rules.iter().cloned().map(PipelineStage::User));
        Self { stages }
    }

    pub fn stages(&self) -> &[PipelineStage] {
        &self.stages
    }

    /// Thread a request through every stage, left to right.
    pub fn apply(&self, mut request: DependencyRequest) -> DependencyRequest {
        for stage in &self.stages {
            match stage {
                PipelineStage::ModuleForcing(forced) => apply_forcing(forced, &mut request),
                PipelineStage::User(rule) => rule.apply(&mut request),
            }
        }
        request
    }
}

/// Pin the request's version if its coordinate is forced. When the same
/// coordinate was forced more than once, the last force wins.
fn apply_forcing(forced: &[ModuleSelector], request: &mut DependencyRequest) {
    let hit = match request.target() {
        SubstitutionTarget::Module(current) => forced
            .iter()
            .rev()
            .find(|sel| sel.group == current.group && sel.name == current.name)
            .cloned(),
        SubstitutionTarget::Project(_) => None,
    };
    if let Some(sel) = hit {
        request.use_version(&sel.version);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(notation: &str) -> DependencyRequest {
        DependencyRequest::new(ModuleSelector::parse(notation).unwrap())
    }

    #[test]
    fn pattern_matches_any_version_without_version() {
        let pattern = ModulePattern::parse("org.example:lib").unwrap();
        assert!(pattern.matches(&ModuleSelector::new("org.example", "lib", "1.0")));
        assert!(pattern.matches(&ModuleSelector::new("org.example", "lib", "2.0")));
        assert!(!pattern.matches(&ModuleSelector::new("org.example", "other", "1.0")));
    }

    #[test]
    fn pattern_with_version_is_exact() {
        let pattern = ModulePattern::parse("org.example:lib:1.0").unwrap();
        assert!(pattern.matches(&ModuleSelector::new("org.example", "lib", "1.0")));
        assert!(!pattern.matches(&ModuleSelector::new("org.example", "lib", "1.1")));
    }

    #[test]
    fn pattern_rejects_bad_notation() {
        assert!(ModulePattern::parse("org.example").is_err());
        assert!(ModulePattern::parse("a:b:c:d").is_err());
        assert!(ModulePattern::parse("org.example::1.0").is_err());
    }

    #[test]
    fn substitution_rewrites_matching_request() {
        let guard = MutationGuard::new();
        let mut subs = DependencySubstitutions::new(guard);
        subs.substitute_module("org.example:lib", "org.example:lib:2.0")
            .unwrap();

        let pipeline = SubstitutionPipeline::new(Vec::new(), subs.rules());
        let out = pipeline.apply(request("org.example:lib:1.0"));
        assert_eq!(out.target().to_string(), "org.example:lib:2.0");
        assert!(out.is_updated());
    }

    #[test]
    fn rules_chain_in_registration_order() {
        let mut subs = DependencySubstitutions::new(MutationGuard::new());
        subs.substitute_module("org.example:a", "org.example:b:1.0")
            .unwrap();
        // Sees the output of the first rule, not the original request.
        subs.substitute_module("org.example:b", "org.example:c:1.0")
            .unwrap();

        let pipeline = SubstitutionPipeline::new(Vec::new(), subs.rules());
        let out = pipeline.apply(request("org.example:a:1.0"));
        assert_eq!(out.target().to_string(), "org.example:c:1.0");
    }

    #[test]
    fn project_substitution() {
        let mut subs = DependencySubstitutions::new(MutationGuard::new());
        subs.substitute_with_project("org.example:lib", ":lib").unwrap();

        let pipeline = SubstitutionPipeline::new(Vec::new(), subs.rules());
        let out = pipeline.apply(request("org.example:lib:1.0"));
        assert_eq!(out.target(), &SubstitutionTarget::Project(":lib".to_string()));
    }

    #[test]
    fn forcing_stage_is_always_first() {
        let mut subs = DependencySubstitutions::new(MutationGuard::new());
        subs.substitute_module("org.example:lib", "org.example:lib:9.9")
            .unwrap();

        let forced = vec![ModuleSelector::new("org.example", "lib", "1.0")];
        let pipeline = SubstitutionPipeline::new(forced, subs.rules());
        assert!(matches!(
            pipeline.stages()[0],
            PipelineStage::ModuleForcing(_)
        ));
        assert_eq!(pipeline.stages().len(), 2);
    }

    #[test]
    fn last_force_wins_for_same_coordinate() {
        let forced = vec![
            ModuleSelector::new("org.example", "lib", "1.0"),
            ModuleSelector::new("org.example", "lib", "1.5"),
        ];
        let pipeline = SubstitutionPipeline::new(forced, &[]);
        let out = pipeline.apply(request("org.example:lib:2.0"));
        assert_eq!(out.target().to_string(), "org.example:lib:1.5");
    }

    #[test]
    fn each_rule_rewrites_requests() {
        let mut subs = DependencySubstitutions::new(MutationGuard::new());
        subs.all(Arc::new(|req: &mut DependencyRequest| {
            if req.requested().group == "org.legacy" {
                req.use_version("0.9");
            }
        }))
        .unwrap();

        let pipeline = SubstitutionPipeline::new(Vec::new(), subs.rules());
        let out = pipeline.apply(request("org.legacy:old:1.0"));
        assert_eq!(out.target().to_string(), "org.legacy:old:0.9");
        let untouched = pipeline.apply(request("org.example:lib:1.0"));
        assert!(!untouched.is_updated());
    }

    #[test]
    fn frozen_substitutions_reject_registration() {
        let guard = MutationGuard::new();
        let mut subs = DependencySubstitutions::new(guard.clone());
        guard.engage();
        let err = subs
            .substitute_module("org.example:lib", "org.example:lib:2.0")
            .unwrap_err();
        assert!(matches!(err, StrategyError::FrozenStrategy { .. }));
        assert!(subs.is_empty());
    }
}
