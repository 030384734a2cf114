use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::reconcile::AliasTable;

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "world-happiness.json";

pub const ENV_DATA: &str = "HAPPINESS_DATA";
pub const ENV_GEO: &str = "HAPPINESS_GEO";
pub const ENV_ALIASES: &str = "HAPPINESS_ALIASES";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Happiness table (`.csv`, `.json` or `.parquet`).
    pub data_path: PathBuf,
    /// GeoJSON feature collection with country boundaries.
    pub geo_path: PathBuf,
    /// Year range selected at startup.
    pub default_years: [i64; 2],
    /// Slider limits.
    pub year_bounds: [i64; 2],
    /// Optional JSON object of extra boundary → dataset name aliases.
    pub aliases_path: Option<PathBuf>,
    pub window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("happiness_clean.csv"),
            geo_path: PathBuf::from("world-countries.json"),
            default_years: [2018, 2023],
            year_bounds: [2015, 2024],
            aliases_path: None,
            window_size: [1280.0, 860.0],
        }
    }
}

impl AppConfig {
    /// Defaults, then `world-happiness.json` if present, then env overrides.
    pub fn load() -> Self {
        let mut config = match Self::from_file(Path::new(CONFIG_FILE)) {
            Ok(Some(c)) => c,
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("ignoring {CONFIG_FILE}: {e:#}");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.normalised()
    }

    /// `Ok(None)` when the file does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(config))
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var(ENV_DATA) {
            self.data_path = PathBuf::from(v);
        }
        if let Some(v) = var(ENV_GEO) {
            self.geo_path = PathBuf::from(v);
        }
        if let Some(v) = var(ENV_ALIASES) {
            self.aliases_path = Some(PathBuf::from(v));
        }
    }

    /// Order both ranges and clamp the default years into the slider bounds.
    pub fn normalised(mut self) -> Self {
        let [b0, b1] = self.year_bounds;
        let (lo, hi) = (b0.min(b1), b0.max(b1));
        self.year_bounds = [lo, hi];

        let [d0, d1] = self.default_years;
        let (d0, d1) = (d0.min(d1).clamp(lo, hi), d0.max(d1).clamp(lo, hi));
        self.default_years = [d0, d1];
        self
    }

    /// The built-in alias table, extended by `aliases_path` when set.
    pub fn alias_table(&self) -> Result<AliasTable> {
        let builtin = AliasTable::builtin();
        let Some(path) = &self.aliases_path else {
            return Ok(builtin);
        };
        let file = std::fs::File::open(path)
            .with_context(|| format!("opening alias file {}", path.display()))?;
        let extra = AliasTable::from_json_reader(std::io::BufReader::new(file))
            .with_context(|| format!("parsing alias file {}", path.display()))?;
        log::info!("loaded {} extra aliases from {}", extra.len(), path.display());
        Ok(builtin.with_overrides(extra))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"data_path": "other.csv"}"#).unwrap();
        assert_eq!(config.data_path, PathBuf::from("other.csv"));
        assert_eq!(config.default_years, [2018, 2023]);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            ENV_DATA => Some("/tmp/h.parquet".to_string()),
            ENV_ALIASES => Some("aliases.json".to_string()),
            _ => None,
        });
        assert_eq!(config.data_path, PathBuf::from("/tmp/h.parquet"));
        assert_eq!(config.geo_path, PathBuf::from("world-countries.json"));
        assert_eq!(config.aliases_path, Some(PathBuf::from("aliases.json")));
    }

    #[test]
    fn test_normalised_clamps_years() {
        let config = AppConfig {
            default_years: [2030, 2010],
            year_bounds: [2024, 2015],
            ..AppConfig::default()
        }
        .normalised();
        assert_eq!(config.year_bounds, [2015, 2024]);
        assert_eq!(config.default_years, [2015, 2024]);
    }

    #[test]
    fn test_missing_file_is_none() {
        let result = AppConfig::from_file(Path::new("/definitely/not/here.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_alias_file_extends_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"Wakanda": "Kenya"}}"#).unwrap();
        let config = AppConfig {
            aliases_path: Some(file.path().to_path_buf()),
            ..AppConfig::default()
        };
        let table = config.alias_table().unwrap();
        assert_eq!(table.reconcile("Wakanda"), "Kenya");
        assert_eq!(table.reconcile("Burma"), "Myanmar");
    }
}
