use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all grava configuration operations.
#[derive(Debug, Error, Diagnostic)]
pub enum StrategyError {
    /// Mutation attempted after a resolution pass has started.
    #[error("Cannot change {kind} after resolution has started")]
    #[diagnostic(help(
        "Configure the resolution strategy before resolving, or resolve against a copy"
    ))]
    FrozenStrategy { kind: MutationKind },

    /// Malformed module selector notation.
    #[error("Invalid module notation '{notation}': {message}")]
    #[diagnostic(help("Expected 'group:name:version'"))]
    Notation { notation: String, message: String },

    /// Non-positive duration amount or unrecognized time unit.
    #[error("Invalid cache duration: {message}")]
    InvalidDuration { message: String },
}

/// Convenience alias for results carrying a [`StrategyError`].
pub type StrategyResult<T> = Result<T, StrategyError>;

/// The class of configuration state a rejected mutation targeted.
///
/// Carried in [`StrategyError::FrozenStrategy`] so the failure names what the
/// caller tried to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Strategy,
    CachePolicy,
    Substitution,
    Selection,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MutationKind::Strategy => "resolution strategy",
            MutationKind::CachePolicy => "cache policy",
            MutationKind::Substitution => "dependency substitution rules",
            MutationKind::Selection => "component selection rules",
        };
        f.write_str(s)
    }
}
