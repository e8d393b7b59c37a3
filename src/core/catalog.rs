use std::{collections::HashSet, sync::Arc};

use crate::{config::AppConfig, core::error::FinderError};

/// Placeholder substituted with the encoded username in every template.
pub const PLACEHOLDER: &str = "{u}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEntry {
    pub name: String,
    pub template: String,
}

impl PlatformEntry {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }
}

/// Immutable set of platforms; clones share the same backing slice.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: Arc<[PlatformEntry]>,
}

impl Catalog {
    pub fn new(entries: Vec<PlatformEntry>) -> Result<Self, FinderError> {
        if entries.is_empty() {
            return Err(FinderError::Config("catalog has no platforms".into()));
        }
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(FinderError::Config(format!(
                    "duplicate platform: {}",
                    entry.name
                )));
            }
            let placeholders = entry.template.matches(PLACEHOLDER).count();
            if placeholders != 1 {
                return Err(FinderError::Config(format!(
                    "template for {} must contain exactly one {} placeholder (found {})",
                    entry.name, PLACEHOLDER, placeholders
                )));
            }
        }
        Ok(Self {
            entries: entries.into(),
        })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, FinderError> {
        Self::new(
            cfg.enabled_sites()
                .map(|s| PlatformEntry::new(s.name.clone(), s.url.clone()))
                .collect(),
        )
    }

    pub fn builtin() -> Result<Self, FinderError> {
        Self::from_config(&AppConfig::default())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlatformEntry> {
        self.entries.iter()
    }
}
