//! Time-windowed freshness policy for cached remote metadata.
//!
//! The resolver asks this policy, per lookup, whether a cached dynamic-version
//! listing or changing-module entry is still fresh enough to use, or must be
//! refreshed from the remote repository.

use std::time::Duration;

use grava_core::time::{NormalizedDuration, TimeUnit};
use grava_util::errors::{MutationKind, StrategyError};
use serde::{Deserialize, Serialize};

use crate::mutation::MutationGuard;

/// Which class of cached metadata a freshness window applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheScope {
    /// Listings resolved for a dynamic version constraint (a range, "latest").
    DynamicVersionListing,
    /// Modules whose published content may change without a version bump.
    ChangingModule,
}

const DEFAULT_WINDOW: NormalizedDuration =
    NormalizedDuration::from_millis(24 * 60 * 60 * 1_000);

/// Freshness windows for dynamic-version listings and changing modules.
///
/// Shares its [`MutationGuard`] with the owning strategy, so the windows
/// freeze in lockstep with the rest of the configuration. Both windows
/// default to 24 hours.
#[derive(Debug, Clone)]
pub struct CachePolicy {
    dynamic_versions: NormalizedDuration,
    changing_modules: NormalizedDuration,
    guard: MutationGuard,
}

impl CachePolicy {
    pub(crate) fn new(guard: MutationGuard) -> Self {
        Self {
            dynamic_versions: DEFAULT_WINDOW,
            changing_modules: DEFAULT_WINDOW,
            guard,
        }
    }

    /// How long a resolved listing for a dynamic version constraint stays
    /// valid before the resolver must refresh it.
    pub fn cache_dynamic_versions_for(
        &mut self,
        amount: i64,
        unit: TimeUnit,
    ) -> Result<(), StrategyError> {
        self.guard.validate_mutation(MutationKind::CachePolicy)?;
        self.dynamic_versions = NormalizedDuration::new(amount, unit)?;
        Ok(())
    }

    /// Free-form notation variant of [`cache_dynamic_versions_for`].
    ///
    /// [`cache_dynamic_versions_for`]: Self::cache_dynamic_versions_for
    pub fn cache_dynamic_versions_for_notation(
        &mut self,
        amount: i64,
        unit: &str,
    ) -> Result<(), StrategyError> {
        self.cache_dynamic_versions_for(amount, TimeUnit::parse(unit)?)
    }

    /// How long cached metadata for a changing module stays valid before the
    /// resolver must re-check the remote source.
    pub fn cache_changing_modules_for(
        &mut self,
        amount: i64,
        unit: TimeUnit,
    ) -> Result<(), StrategyError> {
        self.guard.validate_mutation(MutationKind::CachePolicy)?;
        self.changing_modules = NormalizedDuration::new(amount, unit)?;
        Ok(())
    }

    /// Free-form notation variant of [`cache_changing_modules_for`].
    ///
    /// [`cache_changing_modules_for`]: Self::cache_changing_modules_for
    pub fn cache_changing_modules_for_notation(
        &mut self,
        amount: i64,
        unit: &str,
    ) -> Result<(), StrategyError> {
        self.cache_changing_modules_for(amount, TimeUnit::parse(unit)?)
    }

    /// The configured window for a scope.
    pub fn window(&self, scope: CacheScope) -> NormalizedDuration {
        match scope {
            CacheScope::DynamicVersionListing => self.dynamic_versions,
            CacheScope::ChangingModule => self.changing_modules,
        }
    }

    /// Whether a cached entry of the given age must be refreshed.
    ///
    /// An entry aged exactly the window is still fresh; only strictly older
    /// entries expire.
    pub fn is_expired(&self, scope: CacheScope, age: Duration) -> bool {
        age > self.window(scope).as_duration()
    }

    /// Deep copy rebound to a fresh guard, for [`ResolutionStrategy::copy`].
    ///
    /// [`ResolutionStrategy::copy`]: crate::strategy::ResolutionStrategy::copy
    pub(crate) fn copy(&self, guard: MutationGuard) -> Self {
        Self {
            dynamic_versions: self.dynamic_versions,
            changing_modules: self.changing_modules,
            guard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CachePolicy {
        CachePolicy::new(MutationGuard::new())
    }

    #[test]
    fn defaults_to_24_hours() {
        let policy = policy();
        assert_eq!(
            policy.window(CacheScope::DynamicVersionListing).as_millis(),
            86_400_000
        );
        assert_eq!(
            policy.window(CacheScope::ChangingModule).as_millis(),
            86_400_000
        );
    }

    #[test]
    fn expiry_is_strictly_after_window() {
        let mut policy = policy();
        policy
            .cache_dynamic_versions_for(5, TimeUnit::Minutes)
            .unwrap();
        let scope = CacheScope::DynamicVersionListing;
        assert!(!policy.is_expired(scope, Duration::from_secs(4 * 60)));
        assert!(!policy.is_expired(scope, Duration::from_secs(5 * 60)));
        assert!(policy.is_expired(scope, Duration::from_secs(6 * 60)));
    }

    #[test]
    fn scopes_are_independent() {
        let mut policy = policy();
        policy
            .cache_changing_modules_for(10, TimeUnit::Seconds)
            .unwrap();
        assert!(policy.is_expired(CacheScope::ChangingModule, Duration::from_secs(11)));
        assert!(!policy.is_expired(
            CacheScope::DynamicVersionListing,
            Duration::from_secs(11)
        ));
    }

    #[test]
    fn zero_window_rejected_and_state_unchanged() {
        let mut policy = policy();
        let err = policy
            .cache_dynamic_versions_for(0, TimeUnit::Hours)
            .unwrap_err();
        assert!(matches!(err, StrategyError::InvalidDuration { .. }));
        assert_eq!(
            policy.window(CacheScope::DynamicVersionListing).as_millis(),
            86_400_000
        );
    }

    #[test]
    fn notation_variant_parses_units() {
        let mut policy = policy();
        policy
            .cache_changing_modules_for_notation(2, "hours")
            .unwrap();
        assert_eq!(
            policy.window(CacheScope::ChangingModule).as_millis(),
            7_200_000
        );
        assert!(policy
            .cache_changing_modules_for_notation(2, "lightyears")
            .is_err());
    }

    #[test]
    fn frozen_policy_rejects_changes() {
        let guard = MutationGuard::new();
        let mut policy = CachePolicy::new(guard.clone());
        guard.engage();
        let err = policy
            .cache_dynamic_versions_for(1, TimeUnit::Hours)
            .unwrap_err();
        assert!(matches!(err, StrategyError::FrozenStrategy { .. }));
    }
}
