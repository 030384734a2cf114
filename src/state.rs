use std::path::Path;

use anyhow::{Context, Result};

use crate::color::RegionColors;
use crate::config::AppConfig;
use crate::data::filter::{filtered_indices, FilterState, Selection};
use crate::data::loader::export_source;
use crate::data::model::{HappinessDataset, Record};
use crate::data::query::HappinessQuery;
use crate::data::reconcile::AliasTable;
use crate::geo::FeatureCollection;

// ---------------------------------------------------------------------------
// Load state of a one-shot startup resource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub enum LoadState<T> {
    #[default]
    NotLoaded,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

/// Which page of the dashboard is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Overview,
    Map,
    Social,
}

impl View {
    pub const ALL: [View; 3] = [View::Overview, View::Map, View::Social];

    pub fn title(self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Map => "World map",
            View::Social => "Social factors",
        }
    }
}

/// Indicator the world map is coloured by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapLayer {
    #[default]
    Happiness,
    LifeExpectancy,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: AppConfig,

    /// Boundary name → dataset name translation.
    pub aliases: AliasTable,

    pub dataset: LoadState<HappinessDataset>,

    pub geo: LoadState<FeatureCollection>,

    /// Active filters. Replaced wholesale on every change.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Filters and dataset version `visible_indices` was computed for.
    cache_key: Option<(FilterState, u64)>,

    pub region_colors: Option<RegionColors>,

    pub view: View,

    pub map_layer: MapLayer,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: AppConfig, aliases: AliasTable) -> Self {
        let [lo, hi] = config.default_years;
        Self {
            filters: FilterState::new(lo, hi),
            config,
            aliases,
            dataset: LoadState::NotLoaded,
            geo: LoadState::NotLoaded,
            visible_indices: Vec::new(),
            cache_key: None,
            region_colors: None,
            view: View::default(),
            map_layer: MapLayer::default(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and recompute the visible rows.
    pub fn set_dataset(&mut self, dataset: HappinessDataset) {
        log::info!(
            "Loaded {} records across {} regions",
            dataset.len(),
            dataset.regions.len()
        );
        self.region_colors = Some(RegionColors::new(&dataset.regions));
        self.dataset = LoadState::Loaded(dataset);
        self.status_message = None;
        self.refilter();
    }

    pub fn set_dataset_error(&mut self, err: &anyhow::Error) {
        log::error!("Failed to load dataset: {err:#}");
        self.dataset = LoadState::Failed(format!("{err:#}"));
        self.visible_indices.clear();
        self.cache_key = None;
    }

    pub fn set_geo(&mut self, geo: FeatureCollection) {
        log::info!("Loaded {} boundary features", geo.len());
        self.geo = LoadState::Loaded(geo);
    }

    pub fn set_geo_error(&mut self, err: &anyhow::Error) {
        log::error!("Failed to load boundaries: {err:#}");
        self.geo = LoadState::Failed(format!("{err:#}"));
    }

    pub fn query(&self) -> Option<HappinessQuery<'_>> {
        self.dataset
            .loaded()
            .map(|ds| HappinessQuery::new(ds, &self.aliases))
    }

    /// Records passing the current filters, in dataset order.
    pub fn visible_records(&self) -> Vec<&Record> {
        match self.dataset.loaded() {
            Some(ds) => self.visible_indices.iter().map(|&i| &ds.records[i]).collect(),
            None => Vec::new(),
        }
    }

    /// Recompute `visible_indices` unless filters and dataset are unchanged.
    pub fn refilter(&mut self) {
        let Some(ds) = self.dataset.loaded() else {
            return;
        };
        let key = (self.filters.clone(), ds.version);
        if self.cache_key.as_ref() == Some(&key) {
            return;
        }
        self.visible_indices = filtered_indices(ds, &self.filters);
        self.cache_key = Some(key);
    }

    pub fn set_years(&mut self, min: i64, max: i64) {
        self.filters = FilterState {
            years: FilterState::new(min, max).years,
            ..self.filters.clone()
        };
        self.refilter();
    }

    pub fn set_region(&mut self, region: Selection) {
        self.filters = self.filters.clone().with_region(region);
        self.refilter();
    }

    /// Dropdown choice: sets the country filter and the selected country
    /// together; "All" clears both.
    pub fn set_country(&mut self, country: Selection) {
        let selected = country.as_value().map(str::to_string);
        self.filters = self
            .filters
            .clone()
            .with_country(country)
            .with_selected_country(selected);
        self.refilter();
    }

    /// Map click: translate the boundary name, then select that country.
    pub fn select_from_map(&mut self, geo_name: &str) {
        let country = self.aliases.reconcile(geo_name).to_string();
        log::debug!("map selection {geo_name} -> {country}");
        self.set_country(Selection::Only(country));
    }

    pub fn clear_selection(&mut self) {
        self.set_country(Selection::All);
    }

    pub fn reset_filters(&mut self) {
        let [lo, hi] = self.config.default_years;
        self.filters = FilterState::new(lo, hi);
        self.refilter();
    }

    /// Copy the loaded source file to `dst` unchanged.
    pub fn export_to(&self, dst: &Path) -> Result<u64> {
        let src = self
            .dataset
            .loaded()
            .and_then(|ds| ds.source.as_deref())
            .context("no dataset file loaded")?;
        let bytes = export_source(src, dst)
            .with_context(|| format!("exporting {} to {}", src.display(), dst.display()))?;
        log::info!("Exported {bytes} bytes to {}", dst.display());
        Ok(bytes)
    }
}
