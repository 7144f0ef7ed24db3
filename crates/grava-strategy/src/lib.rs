//! Resolution policy engine: the rules the dependency resolver consults when
//! picking concrete module versions.
//!
//! A [`ResolutionStrategy`] aggregates forced module versions, dependency
//! substitution rules, the conflict-resolution mode, cache freshness windows,
//! and component selection filters. It is mutated freely while a build is
//! being configured, then frozen in lockstep once a resolution pass starts.
//!
//! The graph-resolution algorithm itself lives elsewhere; this crate only
//! answers "what should actually be requested?" and "is this candidate
//! acceptable?".

pub mod cache;
pub mod conflict;
pub mod mutation;
pub mod selection;
pub mod strategy;
pub mod substitution;

pub use cache::{CachePolicy, CacheScope};
pub use conflict::ConflictResolution;
pub use mutation::MutationGuard;
pub use selection::{ComponentCandidate, ComponentDecision, ComponentSelectionRules, SelectionRule};
pub use strategy::ResolutionStrategy;
pub use substitution::{
    DependencySubstitutions, EachDependencyAction, ModulePattern, PipelineStage,
    SubstitutionPipeline, SubstitutionRule,
};
