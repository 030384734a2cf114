use std::collections::HashMap;
use std::io::Read;

use super::error::Result;

// ---------------------------------------------------------------------------
// Built-in alias list: boundary-dataset name → dataset country name
// ---------------------------------------------------------------------------

/// Many-to-one on purpose: several boundary spellings collapse onto one
/// dataset name, and some names map to themselves. Keep every entry.
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("United States of America", "United States"),
    ("United States", "United States"),
    ("Russian Federation", "Russia"),
    ("Russia", "Russia"),
    ("Côte d'Ivoire", "Ivory Coast"),
    ("Ivory Coast", "Ivory Coast"),
    ("Republic of the Congo", "Congo (Brazzaville)"),
    ("Democratic Republic of the Congo", "Congo (Kinshasa)"),
    ("Congo", "Congo (Brazzaville)"),
    ("Korea, South", "South Korea"),
    ("South Korea", "South Korea"),
    ("Korea, North", "North Korea"),
    ("North Korea", "North Korea"),
    ("Eswatini", "Eswatini"),
    ("Swaziland", "Swaziland"),
    ("North Macedonia", "North Macedonia"),
    ("Macedonia", "North Macedonia"),
    ("Hong Kong S.A.R. of China", "Hong Kong S.A.R. of China"),
    ("Hong Kong", "Hong Kong"),
    ("Taiwan Province of China", "Taiwan Province of China"),
    ("Taiwan", "Taiwan"),
    ("Trinidad & Tobago", "Trinidad & Tobago"),
    ("Trinidad and Tobago", "Trinidad and Tobago"),
    ("State of Palestine", "State of Palestine"),
    ("Palestinian Territories", "Palestinian Territories"),
    ("United Republic of Tanzania", "Tanzania"),
    ("The Bahamas", "Bahamas"),
    ("Bolivia", "Bolivia"),
    ("Czechia", "Czechia"),
    ("Czech Republic", "Czech Republic"),
    ("Turkiye", "Turkey"),
    ("Turkey", "Turkey"),
    ("Venezuela", "Venezuela"),
    ("Myanmar", "Myanmar"),
    ("Burma", "Myanmar"),
    ("Cape Verde", "Cabo Verde"),
    ("Cabo Verde", "Cabo Verde"),
    ("Somaliland", "Somaliland region"),
    ("Somaliland region", "Somaliland region"),
];

// ---------------------------------------------------------------------------
// AliasTable
// ---------------------------------------------------------------------------

/// Immutable name-translation table, built once and passed by reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasTable {
    map: HashMap<String, String>,
}

impl AliasTable {
    /// The table shipped with the dashboard.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ALIASES.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let map = pairs
            .into_iter()
            .map(|(geo, ds)| (geo.to_string(), ds.to_string()))
            .collect();
        Self { map }
    }

    /// Parse a flat JSON object `{ "boundary name": "dataset name", ... }`.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        let map: HashMap<String, String> = serde_json::from_reader(reader)?;
        Ok(Self { map })
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Self::from_json_reader(text.as_bytes())
    }

    /// Entries of `overrides` replace or extend this table's entries.
    pub fn with_overrides(mut self, overrides: AliasTable) -> Self {
        self.map.extend(overrides.map);
        self
    }

    /// Translate a boundary name to the dataset's name for the same country.
    ///
    /// Total: names without an entry come back unchanged.
    pub fn reconcile<'a>(&'a self, geo_name: &'a str) -> &'a str {
        self.map.get(geo_name).map(String::as_str).unwrap_or(geo_name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
