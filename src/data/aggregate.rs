use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use super::model::{Indicator, Record};

/// Round to two decimal places, the precision every view displays.
///
/// Formats from the exact binary value, so `5.465` (stored just below the
/// midpoint) becomes `5.46`.
pub fn round2(v: f64) -> f64 {
    if !v.is_finite() {
        return v;
    }
    format!("{v:.2}").parse().unwrap_or(v)
}

// ---------------------------------------------------------------------------
// Yearly average
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyAverage {
    pub year: i64,
    /// Mean happiness score for the year, rounded to 2 decimals.
    pub avg: f64,
}

/// Mean happiness per year, ascending by year.
pub fn yearly_averages<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<YearlyAverage> {
    let mut groups: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
    for rec in records {
        let entry = groups.entry(rec.year).or_insert((0.0, 0));
        entry.0 += rec.happiness_score;
        entry.1 += 1;
    }
    groups
        .into_iter()
        .map(|(year, (sum, n))| YearlyAverage {
            year,
            avg: round2(sum / n as f64),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Trend line (ordinary least squares)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub x: f64,
    pub y: f64,
}

/// Fit `y = m·x + b` and return the segment spanning the x-range.
///
/// Fewer than two points yields an empty line. When every x is identical the
/// denominator is replaced by 1, giving a flat line instead of a division by
/// zero.
pub fn trend_line(points: &[(f64, f64)]) -> Vec<TrendPoint> {
    let n = points.len();
    if n < 2 {
        return Vec::new();
    }
    let nf = n as f64;
    let mean_x = points.iter().map(|p| p.0).sum::<f64>() / nf;
    let mean_y = points.iter().map(|p| p.1).sum::<f64>() / nf;

    let num: f64 = points
        .iter()
        .map(|&(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let mut den: f64 = points.iter().map(|&(x, _)| (x - mean_x).powi(2)).sum();
    if den == 0.0 {
        den = 1.0;
    }

    let m = num / den;
    let b = mean_y - m * mean_x;

    let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);

    vec![
        TrendPoint {
            x: min_x,
            y: m * min_x + b,
        },
        TrendPoint {
            x: max_x,
            y: m * max_x + b,
        },
    ]
}

/// [`trend_line`] over two indicators of a record set.
pub fn trend_line_for<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    x: Indicator,
    y: Indicator,
) -> Vec<TrendPoint> {
    let points: Vec<(f64, f64)> = records
        .into_iter()
        .map(|r| (r.value(x), r.value(y)))
        .collect();
    trend_line(&points)
}

// ---------------------------------------------------------------------------
// Top entity by field
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopEntity {
    pub country: String,
    /// Rounded to 2 decimals.
    pub value: f64,
}

/// The record with the largest value for `field`; the first one wins ties.
pub fn top_by_field<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    field: Indicator,
) -> Option<TopEntity> {
    let mut best: Option<(&Record, f64)> = None;
    for rec in records {
        let v = rec.value(field);
        if !v.is_finite() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((rec, v)),
        }
    }
    best.map(|(rec, v)| TopEntity {
        country: rec.country.clone(),
        value: round2(v),
    })
}

// ---------------------------------------------------------------------------
// Country snapshot
// ---------------------------------------------------------------------------

/// Indicator bundle shown for one country on the map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountrySnapshot {
    pub happiness: f64,
    pub ranking: i64,
    pub gdp: f64,
    pub life: f64,
    pub corruption: f64,
    pub year: i64,
}

impl From<&Record> for CountrySnapshot {
    fn from(r: &Record) -> Self {
        Self {
            happiness: r.happiness_score,
            ranking: r.ranking,
            gdp: r.gdp_per_capita,
            life: r.healthy_life_expectancy,
            corruption: r.perceptions_of_corruption,
            year: r.year,
        }
    }
}

/// Country → snapshot. When a country appears more than once, the last
/// record in iteration order wins; years are not averaged.
pub fn country_snapshots<'a>(
    records: impl IntoIterator<Item = &'a Record>,
) -> HashMap<String, CountrySnapshot> {
    let mut map = HashMap::new();
    for rec in records {
        map.insert(rec.country.clone(), CountrySnapshot::from(rec));
    }
    map
}

// ---------------------------------------------------------------------------
// KPI summary
// ---------------------------------------------------------------------------

/// Headline averages for the KPI cards. All zero for an empty set.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct KpiSummary {
    pub count: usize,
    pub happiness: f64,
    pub gdp_per_capita: f64,
    pub social_support: f64,
    pub freedom: f64,
    pub corruption: f64,
}

pub fn kpis<'a>(records: impl IntoIterator<Item = &'a Record>) -> KpiSummary {
    let mut sum = KpiSummary::default();
    for r in records {
        sum.count += 1;
        sum.happiness += r.happiness_score;
        sum.gdp_per_capita += r.gdp_per_capita;
        sum.social_support += r.social_support;
        sum.freedom += r.freedom_to_choose;
        sum.corruption += r.perceptions_of_corruption;
    }
    let d = sum.count.max(1) as f64;
    KpiSummary {
        count: sum.count,
        happiness: sum.happiness / d,
        gdp_per_capita: sum.gdp_per_capita / d,
        social_support: sum.social_support / d,
        freedom: sum.freedom / d,
        corruption: sum.corruption / d,
    }
}

// ---------------------------------------------------------------------------
// Scatter series
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub country: String,
}

/// One point per record, in record order.
pub fn scatter<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    x: Indicator,
    y: Indicator,
) -> Vec<ScatterPoint> {
    records
        .into_iter()
        .map(|r| ScatterPoint {
            x: r.value(x),
            y: r.value(y),
            country: r.country.clone(),
        })
        .collect()
}

/// Largest value of `field`, or 0 when there are no records.
pub fn max_value<'a>(records: impl IntoIterator<Item = &'a Record>, field: Indicator) -> f64 {
    records
        .into_iter()
        .map(|r| r.value(field))
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    #[test]
    fn test_yearly_averages() {
        let rows = vec![
            record("A", "R", 2021, 6.0),
            record("B", "R", 2020, 5.0),
            record("C", "R", 2020, 7.0),
        ];
        let avgs = yearly_averages(&rows);
        assert_eq!(
            avgs,
            vec![
                YearlyAverage { year: 2020, avg: 6.0 },
                YearlyAverage { year: 2021, avg: 6.0 },
            ]
        );
    }

    #[test]
    fn test_yearly_averages_round_to_two_places() {
        let rows = vec![
            record("A", "R", 2020, 1.0),
            record("B", "R", 2020, 1.0),
            record("C", "R", 2020, 2.0),
        ];
        assert_eq!(yearly_averages(&rows)[0].avg, 1.33);
        assert!(yearly_averages(&Vec::<Record>::new()).is_empty());
    }

    #[test]
    fn test_round2_uses_exact_value() {
        assert_eq!(round2(5.465), 5.46);
        assert_eq!(round2(1.23456), 1.23);
        assert_eq!(round2(-0.126), -0.13);
        assert_eq!(round2(7.0), 7.0);
    }

    #[test]
    fn test_trend_line_needs_two_points() {
        assert!(trend_line(&[]).is_empty());
        assert!(trend_line(&[(1.0, 2.0)]).is_empty());
    }

    #[test]
    fn test_trend_line_exact_fit() {
        let line = trend_line(&[(0.0, 1.0), (1.0, 3.0), (2.0, 5.0)]);
        assert_eq!(line.len(), 2);
        assert_eq!(line[0], TrendPoint { x: 0.0, y: 1.0 });
        assert_eq!(line[1], TrendPoint { x: 2.0, y: 5.0 });
    }

    #[test]
    fn test_trend_line_identical_x_is_flat() {
        let line = trend_line(&[(3.0, 1.0), (3.0, 5.0)]);
        assert_eq!(line.len(), 2);
        // num = 0 so the slope is 0 and the line sits at mean y
        assert_eq!(line[0], TrendPoint { x: 3.0, y: 3.0 });
        assert_eq!(line[1], TrendPoint { x: 3.0, y: 3.0 });
    }

    #[test]
    fn test_trend_line_for_indicators() {
        let mut a = record("A", "R", 2020, 7.0);
        a.gdp_per_capita = 2.0;
        a.ranking = 1;
        let mut b = record("B", "R", 2020, 4.0);
        b.gdp_per_capita = 1.0;
        b.ranking = 100;
        let rows = vec![a, b];
        let line = trend_line_for(&rows, Indicator::GdpPerCapita, Indicator::Ranking);
        assert_eq!(line[0], TrendPoint { x: 1.0, y: 100.0 });
        assert_eq!(line[1], TrendPoint { x: 2.0, y: 1.0 });
    }

    #[test]
    fn test_top_by_field_first_wins_ties() {
        let rows = vec![
            record("A", "R", 2020, 5.0),
            record("B", "R", 2020, 5.0),
            record("C", "R", 2020, 3.0),
        ];
        let top = top_by_field(&rows, Indicator::HappinessScore).unwrap();
        assert_eq!(top.country, "A");
        assert_eq!(top.value, 5.0);
        assert_eq!(top_by_field(&Vec::<Record>::new(), Indicator::Generosity), None);
    }

    #[test]
    fn test_top_by_field_rounds() {
        let mut a = record("A", "R", 2020, 5.0);
        a.social_support = 1.23456;
        let rows = vec![a, record("B", "R", 2020, 5.0)];
        let top = top_by_field(&rows, Indicator::SocialSupport).unwrap();
        assert_eq!(top, TopEntity { country: "A".into(), value: 1.23 });
    }

    #[test]
    fn test_snapshot_last_write_wins() {
        let rows = vec![record("X", "R", 2019, 5.0), record("X", "R", 2021, 6.0)];
        let snaps = country_snapshots(&rows);
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps["X"].happiness, 6.0);
        assert_eq!(snaps["X"].year, 2021);
    }

    #[test]
    fn test_kpis_empty_is_zero() {
        let k = kpis(&Vec::<Record>::new());
        assert_eq!(k, KpiSummary::default());
    }

    #[test]
    fn test_kpis_average() {
        let mut a = record("A", "R", 2020, 6.0);
        a.freedom_to_choose = 0.5;
        let b = record("B", "R", 2020, 4.0);
        let k = kpis(&vec![a, b]);
        assert_eq!(k.count, 2);
        assert_eq!(k.happiness, 5.0);
        assert_eq!(k.freedom, 0.25);
    }

    #[test]
    fn test_scatter_and_max() {
        let rows = vec![record("A", "R", 2020, 6.0), record("B", "R", 2021, 4.0)];
        let pts = scatter(&rows, Indicator::HappinessScore, Indicator::Ranking);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[1].country, "B");
        assert_eq!(pts[1].x, 4.0);
        assert_eq!(max_value(&rows, Indicator::HappinessScore), 6.0);
        assert_eq!(max_value(&Vec::<Record>::new(), Indicator::HappinessScore), 0.0);
    }
}
