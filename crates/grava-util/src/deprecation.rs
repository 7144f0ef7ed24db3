//! Deprecation reporting for legacy configuration entry points.

use std::collections::HashSet;
use std::sync::Mutex;

/// Sink for deprecation notices.
///
/// Fire-and-forget: callers never consume a result. Implementations decide
/// delivery (logging, collecting for build reports, ...).
pub trait DeprecationReporter: Send + Sync {
    fn notify_deprecated_usage(&self, message: &str);
}

/// Default reporter: logs each distinct message once via `tracing::warn!`.
///
/// Repeated use of the same deprecated entry point nags only on first use,
/// so a build script calling it in a loop does not flood the log.
#[derive(Debug, Default)]
pub struct TracingDeprecationReporter {
    seen: Mutex<HashSet<String>>,
}

impl TracingDeprecationReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeprecationReporter for TracingDeprecationReporter {
    fn notify_deprecated_usage(&self, message: &str) {
        let mut seen = self.seen.lock().unwrap_or_else(|e| e.into_inner());
        if seen.insert(message.to_string()) {
            tracing::warn!("{message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_repeated_messages() {
        let reporter = TracingDeprecationReporter::new();
        reporter.notify_deprecated_usage("old API");
        reporter.notify_deprecated_usage("old API");
        reporter.notify_deprecated_usage("other API");
        let seen = reporter.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
    }
}
