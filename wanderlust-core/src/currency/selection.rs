use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::config::Config;

/// Key under which the chosen display currency is remembered.
pub const SELECTION_KEY: &str = "selectedCurrency";

/// Small string key-value store that outlives a single page view.
pub trait SelectionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemorySelectionStore {
    values: BTreeMap<String, String>,
}

impl MemorySelectionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemorySelectionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON object on disk, one string value per key.
#[derive(Debug, Clone)]
pub struct FileSelectionStore {
    path: PathBuf,
}

impl FileSelectionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store next to the config file.
    pub fn in_config_dir() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join("selection.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read selection file: {}", self.path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse selection file: {}", self.path.display()))
    }
}

impl SelectionStore for FileSelectionStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut values) => values.remove(key),
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "ignoring unreadable selection file");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // An unreadable file is replaced rather than blocking the write.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create selection directory: {}", parent.display())
            })?;
        }
        let json =
            serde_json::to_string_pretty(&values).context("Failed to serialize selection")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write selection file: {}", self.path.display()))
    }
}
