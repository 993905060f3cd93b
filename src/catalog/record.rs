use serde::Serialize;
use sgp4::{Constants, Elements};

use super::error::CatalogError;

/// Fixed byte columns of the catalog-number field on TLE line 1.
const CATALOG_NUMBER_COLUMNS: std::ops::Range<usize> = 2..7;

/// A two-line element set, kept verbatim alongside its parsed form.
#[derive(Debug, Clone, Serialize)]
pub struct ElementSet {
    pub line1: String,
    pub line2: String,
    #[serde(skip)]
    elements: Elements,
}

impl ElementSet {
    pub fn elements(&self) -> &Elements {
        &self.elements
    }
}

/// One tracked object. Immutable once the catalog is loaded.
#[derive(Debug, Clone, Serialize)]
pub struct SatelliteRecord {
    pub name: String,
    pub norad_id: String,
    pub element_set: ElementSet,
}

impl SatelliteRecord {
    /// Validates the fixed-column layout, then parses the set with sgp4 and
    /// checks that propagation constants can be derived from it.
    pub fn from_tle(name: &str, line1: &str, line2: &str) -> Result<Self, CatalogError> {
        let line1 = line1.trim_end();
        let line2 = line2.trim_end();

        if !line1.starts_with("1 ") {
            return Err(CatalogError::malformed(name, "line 1 must start with '1 '"));
        }
        if !line2.starts_with("2 ") {
            return Err(CatalogError::malformed(name, "line 2 must start with '2 '"));
        }

        let norad_id = parse_catalog_number(line1)
            .ok_or_else(|| CatalogError::malformed(name, "catalog number is not numeric"))?;

        let elements = Elements::from_tle(
            Some(name.to_string()),
            line1.as_bytes(),
            line2.as_bytes(),
        )
        .map_err(|e| CatalogError::malformed(name, e))?;

        Constants::from_elements(&elements).map_err(|e| CatalogError::malformed(name, e))?;

        Ok(Self {
            name: name.to_string(),
            norad_id,
            element_set: ElementSet {
                line1: line1.to_string(),
                line2: line2.to_string(),
                elements,
            },
        })
    }
}

/// Extracts the catalog number from its fixed columns on line 1.
pub fn parse_catalog_number(line1: &str) -> Option<String> {
    let field = line1.get(CATALOG_NUMBER_COLUMNS)?.trim();
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(field.to_string())
}
