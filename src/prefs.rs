use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::i18n::Language;

/// Storage key for the selected UI language.
pub const LANGUAGE_KEY: &str = "swisstour.language";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredValue {
    pub value:      String,
    pub updated_at: DateTime<Utc>,
}

/// Small persistent key/value store backed by one JSON file.
///
/// A missing or unreadable file reads as an empty store; writes replace the
/// whole file.
#[derive(Debug)]
pub struct PreferenceStore {
    path:    PathBuf,
    entries: BTreeMap<String, StoredValue>,
}

impl PreferenceStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable preferences file");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        };
        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|v| v.value.as_str())
    }

    pub fn updated_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.get(key).map(|v| v.updated_at)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), ClientError> {
        self.entries.insert(key.into(), StoredValue {
            value:      value.into(),
            updated_at: Utc::now(),
        });
        self.flush()
    }

    /// Stored language, or English when unset or unrecognised.
    pub fn load_language(&self) -> Language {
        self.get(LANGUAGE_KEY)
            .and_then(|code| code.parse().ok())
            .unwrap_or_default()
    }

    pub fn save_language(&mut self, lang: Language) -> Result<(), ClientError> {
        self.set(LANGUAGE_KEY, lang.code())
    }

    fn flush(&self) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Preferences(format!("{}: {}", parent.display(), e)))?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)
            .map_err(|e| ClientError::Preferences(format!("{}: {}", self.path.display(), e)))
    }
}
