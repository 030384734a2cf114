use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Header names – the exact (case-sensitive) column names of the source file
// ---------------------------------------------------------------------------

pub const COL_RANKING: &str = "Ranking";
pub const COL_COUNTRY: &str = "Country";
pub const COL_REGION: &str = "Regional indicator";
pub const COL_HAPPINESS: &str = "Happiness score";
pub const COL_GDP: &str = "GDP per capita";
pub const COL_SOCIAL: &str = "Social support";
pub const COL_LIFE: &str = "Healthy life expectancy";
pub const COL_FREEDOM: &str = "Freedom to make life choices";
pub const COL_GENEROSITY: &str = "Generosity";
pub const COL_CORRUPTION: &str = "Perceptions of corruption";
pub const COL_YEAR: &str = "Year";

/// All header names in the order the sample generator writes them.
pub const HEADERS: [&str; 11] = [
    COL_RANKING,
    COL_COUNTRY,
    COL_REGION,
    COL_HAPPINESS,
    COL_GDP,
    COL_SOCIAL,
    COL_LIFE,
    COL_FREEDOM,
    COL_GENEROSITY,
    COL_CORRUPTION,
    COL_YEAR,
];

// ---------------------------------------------------------------------------
// Record – one country-year observation
// ---------------------------------------------------------------------------

/// One row of the happiness table.
///
/// Every numeric field is always present: cells that were missing or
/// non-numeric in the source were coerced to zero at load time, so a true
/// zero and a missing value look the same here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub ranking: i64,
    pub country: String,
    pub region: String,
    pub happiness_score: f64,
    pub gdp_per_capita: f64,
    pub social_support: f64,
    pub healthy_life_expectancy: f64,
    pub freedom_to_choose: f64,
    pub generosity: f64,
    pub perceptions_of_corruption: f64,
    pub year: i64,
    /// Set when at least one numeric cell fell back to zero. Diagnostics only.
    #[serde(skip)]
    pub coerced: bool,
}

impl Record {
    /// Read a numeric indicator as `f64`.
    pub fn value(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Ranking => self.ranking as f64,
            Indicator::HappinessScore => self.happiness_score,
            Indicator::GdpPerCapita => self.gdp_per_capita,
            Indicator::SocialSupport => self.social_support,
            Indicator::HealthyLifeExpectancy => self.healthy_life_expectancy,
            Indicator::FreedomToChoose => self.freedom_to_choose,
            Indicator::Generosity => self.generosity,
            Indicator::PerceptionsOfCorruption => self.perceptions_of_corruption,
        }
    }
}

// ---------------------------------------------------------------------------
// Indicator – the numeric columns a chart or ranking can be keyed on
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Indicator {
    Ranking,
    HappinessScore,
    GdpPerCapita,
    SocialSupport,
    HealthyLifeExpectancy,
    FreedomToChoose,
    Generosity,
    PerceptionsOfCorruption,
}

impl Indicator {
    pub const ALL: [Indicator; 8] = [
        Indicator::Ranking,
        Indicator::HappinessScore,
        Indicator::GdpPerCapita,
        Indicator::SocialSupport,
        Indicator::HealthyLifeExpectancy,
        Indicator::FreedomToChoose,
        Indicator::Generosity,
        Indicator::PerceptionsOfCorruption,
    ];

    /// Source column header for this indicator.
    pub fn column(self) -> &'static str {
        match self {
            Indicator::Ranking => COL_RANKING,
            Indicator::HappinessScore => COL_HAPPINESS,
            Indicator::GdpPerCapita => COL_GDP,
            Indicator::SocialSupport => COL_SOCIAL,
            Indicator::HealthyLifeExpectancy => COL_LIFE,
            Indicator::FreedomToChoose => COL_FREEDOM,
            Indicator::Generosity => COL_GENEROSITY,
            Indicator::PerceptionsOfCorruption => COL_CORRUPTION,
        }
    }

    /// Short human-readable label for axes and legends.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::Ranking => "Ranking",
            Indicator::HappinessScore => "Happiness",
            Indicator::GdpPerCapita => "GDP per capita",
            Indicator::SocialSupport => "Social support",
            Indicator::HealthyLifeExpectancy => "Healthy life expectancy",
            Indicator::FreedomToChoose => "Freedom",
            Indicator::Generosity => "Generosity",
            Indicator::PerceptionsOfCorruption => "Corruption",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// HappinessDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// The full parsed dataset with pre-computed option lists.
///
/// Immutable once built; every view reads it by reference.
#[derive(Debug, Clone)]
pub struct HappinessDataset {
    /// All records, in source order.
    pub records: Vec<Record>,
    /// Distinct regions in order of first appearance.
    pub regions: Vec<String>,
    /// Distinct countries, sorted ascending.
    pub countries: Vec<String>,
    /// File the records came from, if any. Used for verbatim export.
    pub source: Option<PathBuf>,
    /// Distinguishes one loaded snapshot from another for cache keys.
    pub version: u64,
}

impl HappinessDataset {
    /// Build option lists from the loaded records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut regions: Vec<String> = Vec::new();
        let mut seen_regions: BTreeSet<&str> = BTreeSet::new();
        let mut countries: BTreeSet<&str> = BTreeSet::new();

        for rec in &records {
            if seen_regions.insert(rec.region.as_str()) {
                regions.push(rec.region.clone());
            }
            countries.insert(rec.country.as_str());
        }
        let countries: Vec<String> = countries.into_iter().map(str::to_string).collect();

        HappinessDataset {
            records,
            regions,
            countries,
            source: None,
            version: NEXT_VERSION.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Smallest and largest year present, if any rows exist.
    pub fn year_span(&self) -> Option<(i64, i64)> {
        let min = self.records.iter().map(|r| r.year).min()?;
        let max = self.records.iter().map(|r| r.year).max()?;
        Some((min, max))
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
