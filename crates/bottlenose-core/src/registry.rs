//! Grammar registry.
//!
//! Built once from configuration. Keys are case-insensitive and unique; a
//! grammar's image is only checked for existence when it is looked up, so
//! a grammar can be installed or removed without restarting the server.

use serde::Serialize;
use std::path::PathBuf;

use crate::config::{ConfigError, GrammarConfig};
use crate::error::ServiceError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    /// Lower-cased key.
    pub key: String,
    pub path: PathBuf,
    pub description: Option<String>,
}

impl Grammar {
    pub fn is_available(&self) -> bool {
        self.path.exists()
    }
}

/// Listing entry for `GET /grammars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarSummary {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub available: bool,
}

#[derive(Debug, Clone, Default)]
pub struct GrammarRegistry {
    grammars: Vec<Grammar>,
}

impl GrammarRegistry {
    /// Build the registry, rejecting empty and duplicate keys.
    pub fn from_config(entries: &[GrammarConfig]) -> Result<Self, ConfigError> {
        let mut grammars: Vec<Grammar> = Vec::with_capacity(entries.len());
        for entry in entries {
            let key = entry.key.trim().to_lowercase();
            if key.is_empty() {
                return Err(ConfigError::EmptyGrammarKey(entry.path.clone()));
            }
            if grammars.iter().any(|g| g.key == key) {
                return Err(ConfigError::DuplicateGrammar(key));
            }
            grammars.push(Grammar {
                key,
                path: entry.path.clone(),
                description: entry.description.clone(),
            });
        }
        Ok(Self { grammars })
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    /// Find a grammar by key, ignoring case.
    pub fn get(&self, key: &str) -> Option<&Grammar> {
        let key = key.to_lowercase();
        self.grammars.iter().find(|g| g.key == key)
    }

    /// Find a usable grammar.
    ///
    /// Fails with [`ServiceError::UnknownGrammar`] for an unregistered key and
    /// [`ServiceError::GrammarUnavailable`] when the image is missing.
    pub fn lookup(&self, key: &str) -> Result<&Grammar, ServiceError> {
        let grammar = self
            .get(key)
            .ok_or_else(|| ServiceError::UnknownGrammar(key.to_string()))?;
        if !grammar.is_available() {
            tracing::warn!(
                grammar = %grammar.key,
                path = %grammar.path.display(),
                "Grammar image is missing"
            );
            return Err(ServiceError::GrammarUnavailable {
                key: grammar.key.clone(),
                path: grammar.path.clone(),
            });
        }
        Ok(grammar)
    }

    pub fn summaries(&self) -> Vec<GrammarSummary> {
        self.grammars
            .iter()
            .map(|g| GrammarSummary {
                key: g.key.clone(),
                description: g.description.clone(),
                available: g.is_available(),
            })
            .collect()
    }
}
