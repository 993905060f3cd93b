mod embedded;
mod error;
mod loader;
mod record;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

pub use embedded::EMBEDDED_TLES;
pub use error::CatalogError;
use loader::read_tle_file;
pub use record::SatelliteRecord;

/// Immutable set of tracked satellites, in load order.
#[derive(Debug)]
pub struct Catalog {
    records: Vec<Arc<SatelliteRecord>>,
}

impl Catalog {
    /// Builds a catalog from (name, line 1, line 2) entries. Any malformed
    /// entry or repeated name fails the whole load.
    pub fn from_entries<'a, I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let mut seen = HashSet::new();
        let mut records = Vec::new();

        for (name, line1, line2) in entries {
            if !seen.insert(name.to_string()) {
                return Err(CatalogError::DuplicateName(name.to_string()));
            }
            records.push(Arc::new(SatelliteRecord::from_tle(name, line1, line2)?));
        }

        if records.is_empty() {
            return Err(CatalogError::Empty);
        }

        Ok(Self { records })
    }

    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_entries(EMBEDDED_TLES.iter().copied())
    }

    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let entries = read_tle_file(path)?;
        Self::from_entries(
            entries
                .iter()
                .map(|(name, l1, l2)| (name.as_str(), l1.as_str(), l2.as_str())),
        )
    }

    /// Loads from `tle_file` when given, otherwise the built-in set.
    pub fn load(tle_file: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match tle_file {
            Some(path) => Self::from_file(path)?,
            None => Self::embedded()?,
        };
        log::info!("Loaded catalog with {} satellites", catalog.len());
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SatelliteRecord>> {
        self.records.iter()
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Arc<SatelliteRecord>> {
        self.records.iter().find(|r| r.name == name)
    }
}
