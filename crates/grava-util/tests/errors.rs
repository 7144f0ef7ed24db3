use grava_util::errors::{MutationKind, StrategyError};

#[test]
fn test_frozen_strategy_display() {
    let err = StrategyError::FrozenStrategy {
        kind: MutationKind::Strategy,
    };
    assert_eq!(
        err.to_string(),
        "Cannot change resolution strategy after resolution has started"
    );
}

#[test]
fn test_frozen_cache_policy_display() {
    let err = StrategyError::FrozenStrategy {
        kind: MutationKind::CachePolicy,
    };
    assert!(err.to_string().contains("cache policy"), "got: {err}");
}

#[test]
fn test_notation_error_display() {
    let err = StrategyError::Notation {
        notation: "org.example:lib".to_string(),
        message: "expected three ':'-separated parts".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid module notation 'org.example:lib': expected three ':'-separated parts"
    );
}

#[test]
fn test_invalid_duration_display() {
    let err = StrategyError::InvalidDuration {
        message: "amount must be positive, got 0".to_string(),
    };
    assert_eq!(
        err.to_string(),
        "Invalid cache duration: amount must be positive, got 0"
    );
}

#[test]
fn test_mutation_kind_display() {
    assert_eq!(MutationKind::Strategy.to_string(), "resolution strategy");
    assert_eq!(
        MutationKind::Substitution.to_string(),
        "dependency substitution rules"
    );
    assert_eq!(
        MutationKind::Selection.to_string(),
        "component selection rules"
    );
}
