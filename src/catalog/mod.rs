//! Static emoji catalog.
//!
//! Loaded once at startup and shared read-only (`Arc<Catalog>`) by the matcher.
//! A missing or broken source yields an empty catalog, never an error for the caller
//! of [`Catalog::load`].

mod entry;

pub use entry::{normalize, CatalogEntry};

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use std::{fs, path::Path};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load the catalog file, falling back to an empty catalog on any failure.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(catalog) => catalog,
            Err(err) => {
                warn!("emoji catalog unavailable, matching disabled: {err:#}");
                Self::empty()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog from {}", path.display()))?;
        let catalog = Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse catalog at {}", path.display()))?;

        info!(
            "Loaded {} emoji entries from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a JSON array of records. Malformed records are dropped individually;
    /// only a non-array document is an error.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Array(records) = document else {
            bail!("catalog document is not an array of records");
        };

        let total = records.len();
        let entries: Vec<CatalogEntry> = records
            .into_iter()
            .filter_map(CatalogEntry::from_value)
            .collect();

        if entries.len() < total {
            debug!(
                "Dropped {} malformed catalog records out of {}",
                total - entries.len(),
                total
            );
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
