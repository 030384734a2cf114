use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Choropleth bands
// ---------------------------------------------------------------------------

/// Map fill category for one country.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HappinessBand {
    High,
    Medium,
    Low,
    Selected,
    NoData,
}

impl HappinessBand {
    /// Classify a happiness score.
    ///
    /// Scores on a 0–1 scale (filtered maximum ≤ 1) use 0.7/0.5 cut-offs,
    /// scores on the usual 0–10 scale use 7/5.
    pub fn classify(score: Option<f64>, max_score: f64) -> Self {
        let Some(score) = score else {
            return HappinessBand::NoData;
        };
        let (high, medium) = if max_score <= 1.0 { (0.7, 0.5) } else { (7.0, 5.0) };
        Self::by_thresholds(score, high, medium)
    }

    /// Healthy life expectancy is already normalised to 0–1 in the dataset.
    pub fn classify_life(life: Option<f64>) -> Self {
        match life {
            Some(v) => Self::by_thresholds(v, 0.7, 0.5),
            None => HappinessBand::NoData,
        }
    }

    fn by_thresholds(v: f64, high: f64, medium: f64) -> Self {
        if v >= high {
            HappinessBand::High
        } else if v >= medium {
            HappinessBand::Medium
        } else {
            HappinessBand::Low
        }
    }

    pub fn fill(self) -> Color32 {
        match self {
            HappinessBand::High => Color32::from_rgb(0x4D, 0xA3, 0xFF),
            HappinessBand::Medium => Color32::from_rgb(0xFF, 0xA9, 0x4D),
            HappinessBand::Low => Color32::from_rgb(0xB0, 0xAD, 0xA5),
            HappinessBand::Selected => Color32::from_rgb(0x1E, 0x6B, 0xD6),
            HappinessBand::NoData => Color32::from_rgb(0xCC, 0xCC, 0xCC),
        }
    }

    pub fn stroke(self) -> Color32 {
        match self {
            HappinessBand::Selected => Color32::from_rgb(0x0F, 0x3C, 0x7A),
            _ => Color32::from_rgb(0x99, 0x99, 0x99),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HappinessBand::High => "High happiness",
            HappinessBand::Medium => "Medium happiness",
            HappinessBand::Low => "Low happiness",
            HappinessBand::Selected => "Selected country",
            HappinessBand::NoData => "No data",
        }
    }

    /// Legend order.
    pub const LEGEND: [HappinessBand; 5] = [
        HappinessBand::High,
        HappinessBand::Medium,
        HappinessBand::Low,
        HappinessBand::Selected,
        HappinessBand::NoData,
    ];
}

// ---------------------------------------------------------------------------
// Region colours for scatter charts
// ---------------------------------------------------------------------------

/// Maps each region name to a distinct colour.
#[derive(Debug, Clone)]
pub struct RegionColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl RegionColors {
    pub fn new(regions: &[String]) -> Self {
        let palette = generate_palette(regions.len());
        let mapping = regions.iter().cloned().zip(palette).collect();
        RegionColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, region: &str) -> Color32 {
        self.mapping
            .get(region)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (region → colour), sorted by region name.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping.iter().map(|(r, c)| (r.clone(), *c)).collect()
    }
}
