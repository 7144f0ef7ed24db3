//! The aggregate resolution strategy.
//!
//! One `ResolutionStrategy` exists per build configuration unit. Build
//! configuration code mutates it freely, the resolver freezes it via
//! [`begin_resolution`](ResolutionStrategy::begin_resolution) when a pass
//! starts, and independent passes work against [`copy`](ResolutionStrategy::copy)
//! snapshots so they never observe each other's mutations.

use std::fmt;
use std::sync::Arc;

use grava_core::module::ModuleSelector;
use grava_core::time::TimeUnit;
use grava_util::deprecation::{DeprecationReporter, TracingDeprecationReporter};
use grava_util::errors::{MutationKind, StrategyError};

use crate::cache::CachePolicy;
use crate::conflict::ConflictResolution;
use crate::mutation::MutationGuard;
use crate::selection::ComponentSelectionRules;
use crate::substitution::{
    DependencySubstitutions, EachDependencyAction, SubstitutionPipeline,
};

const EACH_DEPENDENCY_DEPRECATION: &str = "ResolutionStrategy::each_dependency() is deprecated; \
     register rules through dependency_substitution() instead";

/// The policy the resolver consults when picking concrete module versions:
/// forced versions, substitution rules, the conflict mode, cache freshness
/// windows, and component selection filters.
pub struct ResolutionStrategy {
    forced_modules: Vec<ModuleSelector>,
    conflict_resolution: ConflictResolution,
    cache_policy: CachePolicy,
    substitutions: DependencySubstitutions,
    component_selection: ComponentSelectionRules,
    guard: MutationGuard,
    deprecation: Arc<dyn DeprecationReporter>,
}

impl ResolutionStrategy {
    pub fn new() -> Self {
        let guard = MutationGuard::new();
        Self {
            forced_modules: Vec::new(),
            conflict_resolution: ConflictResolution::default(),
            cache_policy: CachePolicy::new(guard.clone()),
            substitutions: DependencySubstitutions::new(guard.clone()),
            component_selection: ComponentSelectionRules::new(guard.clone()),
            guard,
            deprecation: Arc::new(TracingDeprecationReporter::new()),
        }
    }

    /// Replace the deprecation sink. Defaults to the `tracing`-backed
    /// reporter.
    pub fn set_deprecation_reporter(&mut self, reporter: Arc<dyn DeprecationReporter>) {
        self.deprecation = reporter;
    }

    /// Freeze configuration for this instance. The resolver calls this when
    /// a resolution pass starts; afterwards every mutator fails with
    /// [`StrategyError::FrozenStrategy`]. Idempotent.
    pub fn begin_resolution(&self) {
        if !self.guard.is_engaged() {
            tracing::debug!("resolution started; strategy configuration is now frozen");
        }
        self.guard.engage();
    }

    pub fn is_frozen(&self) -> bool {
        self.guard.is_engaged()
    }

    /// Pin modules to specific versions, overriding whatever conflict
    /// resolution or substitution would otherwise pick.
    ///
    /// Notations are `"group:name:version"`. Appends to previously forced
    /// modules; duplicate selectors collapse, keeping first-seen order. A
    /// malformed notation fails the whole call and leaves the set unchanged.
    pub fn force<I, S>(&mut self, notations: I) -> Result<&mut Self, StrategyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.guard.validate_mutation(MutationKind::Strategy)?;
        let selectors = ModuleSelector::parse_multi(notations)?;
        for selector in selectors {
            if !self.forced_modules.contains(&selector) {
                self.forced_modules.push(selector);
            }
        }
        Ok(self)
    }

    /// Replace the forced-module set wholesale with the given notations.
    pub fn set_forced_modules<I, S>(&mut self, notations: I) -> Result<&mut Self, StrategyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.guard.validate_mutation(MutationKind::Strategy)?;
        let selectors = ModuleSelector::parse_multi(notations)?;
        self.forced_modules = selectors;
        Ok(self)
    }

    /// The forced modules, deduplicated, in first-seen order.
    pub fn forced_modules(&self) -> &[ModuleSelector] {
        &self.forced_modules
    }

    /// Switch to strict conflict handling: incompatible version requests for
    /// the same module fail resolution instead of picking the highest.
    pub fn fail_on_version_conflict(&mut self) -> Result<&mut Self, StrategyError> {
        self.guard.validate_mutation(MutationKind::Strategy)?;
        self.conflict_resolution = ConflictResolution::Strict;
        Ok(self)
    }

    pub fn conflict_resolution(&self) -> ConflictResolution {
        self.conflict_resolution
    }

    /// The composed substitution rule for this strategy: the forcing stage
    /// built from the current forced-module set, then every user rule in
    /// registration order.
    pub fn dependency_substitution_rule(&self) -> SubstitutionPipeline {
        SubstitutionPipeline::new(self.forced_modules.clone(), self.substitutions.rules())
    }

    /// Configure structured substitution rules.
    pub fn dependency_substitution<F>(&mut self, configure: F) -> Result<&mut Self, StrategyError>
    where
        F: FnOnce(&mut DependencySubstitutions) -> Result<(), StrategyError>,
    {
        configure(&mut self.substitutions)?;
        Ok(self)
    }

    pub fn dependency_substitutions(&self) -> &DependencySubstitutions {
        &self.substitutions
    }

    /// Deprecated compatibility entry point: register a rewrite action for
    /// every dependency request.
    ///
    /// The action becomes a native substitution rule, so it orders exactly
    /// like rules registered through [`dependency_substitution`]. Emits a
    /// one-time deprecation notice.
    ///
    /// [`dependency_substitution`]: Self::dependency_substitution
    pub fn each_dependency(
        &mut self,
        action: EachDependencyAction,
    ) -> Result<&mut Self, StrategyError> {
        self.deprecation
            .notify_deprecated_usage(EACH_DEPENDENCY_DEPRECATION);
        self.substitutions.all(action)?;
        Ok(self)
    }

    /// How long resolved dynamic-version listings stay fresh.
    pub fn cache_dynamic_versions_for(
        &mut self,
        amount: i64,
        unit: TimeUnit,
    ) -> Result<(), StrategyError> {
        self.cache_policy.cache_dynamic_versions_for(amount, unit)
    }

    /// Notation variant: `cache_dynamic_versions_for_notation(10, "minutes")`.
    pub fn cache_dynamic_versions_for_notation(
        &mut self,
        amount: i64,
        unit: &str,
    ) -> Result<(), StrategyError> {
        self.cache_policy
            .cache_dynamic_versions_for_notation(amount, unit)
    }

    /// How long cached changing-module metadata stays fresh.
    pub fn cache_changing_modules_for(
        &mut self,
        amount: i64,
        unit: TimeUnit,
    ) -> Result<(), StrategyError> {
        self.cache_policy.cache_changing_modules_for(amount, unit)
    }

    /// Notation variant: `cache_changing_modules_for_notation(4, "hours")`.
    pub fn cache_changing_modules_for_notation(
        &mut self,
        amount: i64,
        unit: &str,
    ) -> Result<(), StrategyError> {
        self.cache_policy
            .cache_changing_modules_for_notation(amount, unit)
    }

    pub fn cache_policy(&self) -> &CachePolicy {
        &self.cache_policy
    }

    /// The freshness rules view the resolver's cache-lookup path queries.
    pub fn resolution_rules(&self) -> &CachePolicy {
        &self.cache_policy
    }

    /// Configure component selection rules.
    pub fn component_selection<F>(&mut self, configure: F) -> Result<&mut Self, StrategyError>
    where
        F: FnOnce(&mut ComponentSelectionRules) -> Result<(), StrategyError>,
    {
        configure(&mut self.component_selection)?;
        Ok(self)
    }

    pub fn component_selection_rules(&self) -> &ComponentSelectionRules {
        &self.component_selection
    }

    /// An independent strategy for a separate resolution pass.
    ///
    /// Per-field copy policy:
    /// - cache policy and substitution rules: deep copy
    /// - conflict mode: Strict re-applied iff the source is Strict (Latest is
    ///   the default and is not separately copied)
    /// - forced modules: replaced wholesale with the source's set
    /// - selection rules: appended after the target's existing chain
    ///
    /// The copy starts unfrozen even if the source is frozen.
    pub fn copy(&self) -> ResolutionStrategy {
        let mut out = ResolutionStrategy::new();
        out.deprecation = Arc::clone(&self.deprecation);
        self.apply_to(&mut out);
        out
    }

    /// Apply this strategy's state onto an existing target using the same
    /// per-field policy as [`copy`](Self::copy). Fails if the target is
    /// frozen.
    pub fn copy_into(&self, target: &mut ResolutionStrategy) -> Result<(), StrategyError> {
        target.guard.validate_mutation(MutationKind::Strategy)?;
        self.apply_to(target);
        Ok(())
    }

    fn apply_to(&self, target: &mut ResolutionStrategy) {
        target.cache_policy = self.cache_policy.copy(target.guard.clone());
        target.substitutions = self.substitutions.copy(target.guard.clone());
        if self.conflict_resolution == ConflictResolution::Strict {
            target.conflict_resolution = ConflictResolution::Strict;
        }
        target.forced_modules = self.forced_modules.clone();
        target.component_selection.extend_from(&self.component_selection);
    }
}

impl Default for ResolutionStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResolutionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionStrategy")
            .field("forced_modules", &self.forced_modules)
            .field("conflict_resolution", &self.conflict_resolution)
            .field("cache_policy", &self.cache_policy)
            .field("substitutions", &self.substitutions)
            .field("component_selection", &self.component_selection)
            .field("frozen", &self.guard.is_engaged())
            .finish()
    }
}
