use std::collections::HashMap;

use super::aggregate::{
    self, CountrySnapshot, KpiSummary, ScatterPoint, TopEntity, TrendPoint, YearlyAverage,
};
use super::filter::{self, FilterState};
use super::model::{HappinessDataset, Indicator, Record};
use super::reconcile::AliasTable;

// ---------------------------------------------------------------------------
// HappinessQuery – what the view layer is allowed to ask
// ---------------------------------------------------------------------------

/// Read-only query surface over one dataset snapshot.
///
/// Every call recomputes from scratch; nothing is cached here.
#[derive(Debug, Clone, Copy)]
pub struct HappinessQuery<'a> {
    pub dataset: &'a HappinessDataset,
    pub aliases: &'a AliasTable,
}

impl<'a> HappinessQuery<'a> {
    pub fn new(dataset: &'a HappinessDataset, aliases: &'a AliasTable) -> Self {
        Self { dataset, aliases }
    }

    pub fn filtered_records(&self, state: &FilterState) -> Vec<&'a Record> {
        filter::apply(&self.dataset.records, state)
    }

    pub fn yearly_averages(&self, state: &FilterState) -> Vec<YearlyAverage> {
        aggregate::yearly_averages(self.filtered_records(state))
    }

    pub fn trend_line(&self, x: Indicator, y: Indicator, state: &FilterState) -> Vec<TrendPoint> {
        aggregate::trend_line_for(self.filtered_records(state), x, y)
    }

    /// Ranked over the whole dataset, not the filtered subset.
    pub fn top_by_field(&self, field: Indicator) -> Option<TopEntity> {
        aggregate::top_by_field(&self.dataset.records, field)
    }

    pub fn snapshots(&self, state: &FilterState) -> HashMap<String, CountrySnapshot> {
        aggregate::country_snapshots(self.filtered_records(state))
    }

    /// Snapshot for a boundary feature name, reconciled to the dataset's
    /// naming first. `None` means "no data" for that one country.
    pub fn country_snapshot(&self, geo_name: &str, state: &FilterState) -> Option<CountrySnapshot> {
        let country = self.aliases.reconcile(geo_name);
        let snapshot = self
            .filtered_records(state)
            .into_iter()
            .filter(|r| r.country == country)
            .last()
            .map(CountrySnapshot::from);
        if snapshot.is_none() {
            log::debug!("no data for boundary {geo_name} -> {country}");
        }
        snapshot
    }

    pub fn kpis(&self, state: &FilterState) -> KpiSummary {
        aggregate::kpis(self.filtered_records(state))
    }

    pub fn scatter(&self, x: Indicator, y: Indicator, state: &FilterState) -> Vec<ScatterPoint> {
        aggregate::scatter(self.filtered_records(state), x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Selection;
    use crate::data::model::tests::record;

    fn dataset() -> HappinessDataset {
        HappinessDataset::from_records(vec![
            record("South Korea", "East Asia", 2019, 5.9),
            record("South Korea", "East Asia", 2021, 6.0),
            record("Myanmar", "Southeast Asia", 2021, 4.4),
            record("Finland", "Western Europe", 2021, 7.8),
        ])
    }

    #[test]
    fn test_country_snapshot_reconciles_geo_name() {
        let ds = dataset();
        let aliases = AliasTable::builtin();
        let q = HappinessQuery::new(&ds, &aliases);
        let all = FilterState::new(2015, 2024);

        let snap = q.country_snapshot("Korea, South", &all).unwrap();
        assert_eq!(snap.happiness, 6.0);
        assert_eq!(q.country_snapshot("Burma", &all).unwrap().happiness, 4.4);
        assert_eq!(q.country_snapshot("Wakanda", &all), None);
    }

    #[test]
    fn test_snapshot_respects_filters() {
        let ds = dataset();
        let aliases = AliasTable::builtin();
        let q = HappinessQuery::new(&ds, &aliases);
        let early = FilterState::new(2019, 2019);
        assert_eq!(q.country_snapshot("South Korea", &early).unwrap().happiness, 5.9);
        assert_eq!(q.country_snapshot("Finland", &early), None);
    }

    #[test]
    fn test_top_by_field_ignores_filters() {
        let ds = dataset();
        let aliases = AliasTable::default();
        let q = HappinessQuery::new(&ds, &aliases);
        assert_eq!(q.top_by_field(Indicator::HappinessScore).unwrap().country, "Finland");
    }

    #[test]
    fn test_yearly_averages_filtered() {
        let ds = dataset();
        let aliases = AliasTable::default();
        let q = HappinessQuery::new(&ds, &aliases);
        let f = FilterState::new(2015, 2024).with_region(Selection::Only("East Asia".into()));
        let avgs = q.yearly_averages(&f);
        assert_eq!(avgs.len(), 2);
        assert_eq!(avgs[0].year, 2019);
        assert_eq!(q.kpis(&f).count, 2);
        assert_eq!(q.snapshots(&f).len(), 1);
    }
}
