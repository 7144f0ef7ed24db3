//! Declared conflict-resolution policy, consulted by the resolver.
//!
//! This records the build author's choice only; detecting conflicts across
//! the graph is the resolver's job.

use serde::{Deserialize, Serialize};

/// How the resolver handles multiple incompatible version requests for the
/// same module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictResolution {
    /// The highest-ranked version among the conflicting requests wins.
    /// Ranking is the version comparator's concern.
    #[default]
    Latest,
    /// Any two incompatible requests for the same module fail resolution.
    Strict,
}
