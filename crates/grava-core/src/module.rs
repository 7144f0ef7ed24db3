use std::fmt;

use grava_util::errors::StrategyError;
use serde::{Deserialize, Serialize};

/// A module coordinate without a version: `group:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleIdentifier {
    pub group: String,
    pub name: String,
}

impl ModuleIdentifier {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ModuleIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// A module coordinate plus version constraint: `group:name:version`.
///
/// The version part is an opaque constraint string. Ordering and matching of
/// versions are the version comparator's concern, not this type's; equality
/// here is purely structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleSelector {
    pub group: String,
    pub name: String,
    pub version: String,
}

impl ModuleSelector {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    /// The coordinate part of this selector, without the version.
    pub fn module(&self) -> ModuleIdentifier {
        ModuleIdentifier::new(self.group.clone(), self.name.clone())
    }

    /// Parse `"group:name:version"` notation.
    pub fn parse(notation: &str) -> Result<Self, StrategyError> {
        let parts: Vec<&str> = notation.split(':').collect();
        if parts.len() != 3 {
            return Err(StrategyError::Notation {
                notation: notation.to_string(),
                message: format!("expected three ':'-separated parts, got {}", parts.len()),
            });
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(StrategyError::Notation {
                notation: notation.to_string(),
                message: "group, name and version must all be non-empty".to_string(),
            });
        }
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }

    /// Parse several notations into a deduplicated set preserving first-seen
    /// order.
    ///
    /// Any malformed notation fails the whole batch; nothing is returned
    /// partially parsed.
    pub fn parse_multi<I, S>(notations: I) -> Result<Vec<Self>, StrategyError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selectors = Vec::new();
        for notation in notations {
            let selector = Self::parse(notation.as_ref())?;
            if !selectors.contains(&selector) {
                selectors.push(selector);
            }
        }
        Ok(selectors)
    }
}

impl fmt::Display for ModuleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.name, self.version)
    }
}
