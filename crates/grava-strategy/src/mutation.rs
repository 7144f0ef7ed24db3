//! The two-phase mutation gate shared by a strategy and its sub-components.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use grava_util::errors::{MutationKind, StrategyError};

/// Shared freeze flag for one strategy instance.
///
/// The cache policy, substitution rules and selection rules of a strategy all
/// hold clones of the same guard, so every configuration surface freezes in
/// lockstep the moment a resolution pass begins. Every mutator calls
/// [`validate_mutation`](Self::validate_mutation) before touching state, which
/// makes "configure after resolve" a deterministic hard failure instead of a
/// race with the in-progress read.
#[derive(Debug, Clone, Default)]
pub struct MutationGuard {
    engaged: Arc<AtomicBool>,
}

impl MutationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail if resolution has already started for the owning strategy.
    pub fn validate_mutation(&self, kind: MutationKind) -> Result<(), StrategyError> {
        if self.is_engaged() {
            return Err(StrategyError::FrozenStrategy { kind });
        }
        Ok(())
    }

    /// Permanently freeze configuration for this instance. Idempotent.
    pub fn engage(&self) {
        self.engaged.store(true, Ordering::Release);
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged.load(Ordering::Acquire)
    }
}
