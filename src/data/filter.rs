use std::fmt;

use super::model::{HappinessDataset, Record};

// ---------------------------------------------------------------------------
// Selection: one dropdown value, or "no constraint"
// ---------------------------------------------------------------------------

/// Label shown for the unconstrained choice in region/country dropdowns.
pub const ALL_LABEL: &str = "All";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Selection {
    /// No constraint: every value passes.
    #[default]
    All,
    /// Exact, case-sensitive match on this value.
    Only(String),
}

impl Selection {
    /// Interpret a dropdown label; the unconstrained labels map to [`Selection::All`].
    pub fn from_label(label: &str) -> Self {
        match label {
            ALL_LABEL | "all" | "Todos" => Selection::All,
            other => Selection::Only(other.to_string()),
        }
    }

    pub fn as_value(&self) -> Option<&str> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v.as_str()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Only(v) => f.write_str(v),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// The predicate set applied to every record.
///
/// Replaced wholesale on each user change; never mutated in place by the
/// data layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterState {
    /// Inclusive `(min, max)` year range, `min <= max`.
    pub years: (i64, i64),
    pub region: Selection,
    pub country: Selection,
    /// Country picked on the map, accepted alongside the dropdown value.
    pub selected_country: Option<String>,
}

impl FilterState {
    /// Unconstrained region/country over the given years (swapped if reversed).
    pub fn new(min_year: i64, max_year: i64) -> Self {
        let years = if min_year <= max_year {
            (min_year, max_year)
        } else {
            (max_year, min_year)
        };
        Self {
            years,
            region: Selection::All,
            country: Selection::All,
            selected_country: None,
        }
    }

    pub fn with_region(mut self, region: Selection) -> Self {
        self.region = region;
        self
    }

    pub fn with_country(mut self, country: Selection) -> Self {
        self.country = country;
        self
    }

    pub fn with_selected_country(mut self, country: Option<String>) -> Self {
        self.selected_country = country;
        self
    }

    /// Whether a record passes all three predicates.
    pub fn matches(&self, record: &Record) -> bool {
        let (lo, hi) = self.years;
        let within_year = record.year >= lo && record.year <= hi;

        let within_region = match &self.region {
            Selection::All => true,
            Selection::Only(r) => record.region == *r,
        };

        let within_country = match &self.country {
            Selection::All => true,
            Selection::Only(c) => {
                record.country == *c
                    || self.selected_country.as_deref() == Some(record.country.as_str())
            }
        };

        within_year && within_region && within_country
    }
}

/// Return the records that pass `filters`, in input order.
pub fn apply<'a, I>(records: I, filters: &FilterState) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().filter(|r| filters.matches(r)).collect()
}

/// Return indices of records that pass all active filters.
pub fn filtered_indices(dataset: &HappinessDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.matches(rec))
        .map(|(i, _)| i)
        .collect()
}
