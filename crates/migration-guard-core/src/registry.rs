//! Immutable, ordered rule registry.

use crate::rule::Rule;
use crate::types::FileKind;
use std::collections::HashSet;
use std::sync::Arc;

/// Errors building a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two rules share an ID.
    #[error("Duplicate rule ID: {id}")]
    DuplicateId {
        /// The repeated ID.
        id: String,
    },
}

/// Ordered list of rules, fixed before a scan starts.
///
/// Cloning is cheap; clones share the same rule list.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Arc<[Rule]>,
}

impl RuleRegistry {
    /// Creates a registry from an explicit rule list.
    ///
    /// # Errors
    ///
    /// Returns an error if two rules share an ID.
    pub fn new(rules: Vec<Rule>) -> Result<Self, RegistryError> {
        let mut seen = HashSet::new();
        for rule in &rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(RegistryError::DuplicateId {
                    id: rule.id.clone(),
                });
            }
        }
        Ok(Self {
            rules: rules.into(),
        })
    }

    /// All rules, in registration order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Iterates over the rules in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Looks up a rule by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Rules that inspect files of `kind`.
    pub fn applicable(&self, kind: FileKind) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.applies_to(kind))
    }

    /// Returns a new registry holding only the rules whose ID is listed.
    #[must_use]
    pub fn retain_ids(&self, ids: &[&str]) -> Self {
        Self {
            rules: self
                .rules
                .iter()
                .filter(|r| ids.contains(&r.id.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the registry holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self {
            rules: Arc::from(Vec::new()),
        }
    }
}

impl<'a> IntoIterator for &'a RuleRegistry {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
