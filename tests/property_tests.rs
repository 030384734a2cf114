//! Property-based tests for the filter engine and aggregations.
//!
//! ```bash
//! PROPTEST_CASES=5000 cargo test --test property_tests
//! ```

use proptest::prelude::*;

use world_happiness::data::aggregate::{trend_line, yearly_averages};
use world_happiness::data::filter::{apply, FilterState, Selection};
use world_happiness::data::model::Record;

// =============================================================================
// Test Strategies
// =============================================================================

const COUNTRIES: [&str; 4] = ["Finland", "Chile", "Peru", "Japan"];
const REGIONS: [&str; 3] = ["Western Europe", "Latin America", "East Asia"];

fn arb_record() -> impl Strategy<Value = Record> {
    (0usize..4, 0usize..3, 2012i64..2026, 0.0f64..10.0, 1i64..160).prop_map(
        |(c, r, year, happiness, ranking)| Record {
            ranking,
            country: COUNTRIES[c].to_string(),
            region: REGIONS[r].to_string(),
            happiness_score: happiness,
            gdp_per_capita: happiness / 5.0,
            social_support: 0.0,
            healthy_life_expectancy: 0.0,
            freedom_to_choose: 0.0,
            generosity: 0.0,
            perceptions_of_corruption: 0.0,
            year,
            coerced: false,
        },
    )
}

fn arb_selection(values: &'static [&'static str]) -> impl Strategy<Value = Selection> {
    prop_oneof![
        Just(Selection::All),
        (0..values.len()).prop_map(move |i| Selection::Only(values[i].to_string())),
    ]
}

fn arb_filter() -> impl Strategy<Value = FilterState> {
    (
        2012i64..2026,
        2012i64..2026,
        arb_selection(&REGIONS),
        arb_selection(&COUNTRIES),
        proptest::option::of((0usize..4).prop_map(|i| COUNTRIES[i].to_string())),
    )
        .prop_map(|(a, b, region, country, selected)| {
            FilterState::new(a, b)
                .with_region(region)
                .with_country(country)
                .with_selected_country(selected)
        })
}

// =============================================================================
// Filter properties
// =============================================================================

proptest! {
    #[test]
    fn filter_is_idempotent(
        records in prop::collection::vec(arb_record(), 0..60),
        f in arb_filter(),
    ) {
        let once = apply(&records, &f);
        let twice = apply(once.iter().copied(), &f);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_preserves_order(
        records in prop::collection::vec(arb_record(), 0..60),
        f in arb_filter(),
    ) {
        let out = apply(&records, &f);
        // Each output element is found after the previous one in the input.
        let mut cursor = 0usize;
        for rec in out {
            let pos = records[cursor..]
                .iter()
                .position(|r| std::ptr::eq(r, rec));
            prop_assert!(pos.is_some());
            cursor += pos.unwrap() + 1;
        }
    }

    #[test]
    fn widening_years_only_adds(
        records in prop::collection::vec(arb_record(), 0..60),
        f in arb_filter(),
        widen_lo in 0i64..5,
        widen_hi in 0i64..5,
    ) {
        let (lo, hi) = f.years;
        let wide = FilterState { years: (lo - widen_lo, hi + widen_hi), ..f.clone() };
        let narrow_out = apply(&records, &f);
        let wide_out = apply(&records, &wide);
        for rec in narrow_out {
            prop_assert!(wide_out.iter().any(|r| std::ptr::eq(*r, rec)));
        }
    }

    #[test]
    fn unconstraining_region_or_country_only_adds(
        records in prop::collection::vec(arb_record(), 0..60),
        f in arb_filter(),
    ) {
        let narrow_out = apply(&records, &f);
        let any_region = f.clone().with_region(Selection::All);
        let any_country = f.clone().with_country(Selection::All);
        for wide in [any_region, any_country] {
            let wide_out = apply(&records, &wide);
            for rec in &narrow_out {
                prop_assert!(wide_out.iter().any(|r| std::ptr::eq(*r, *rec)));
            }
        }
    }

    #[test]
    fn yearly_averages_are_sorted_and_bounded(
        records in prop::collection::vec(arb_record(), 0..60),
    ) {
        let avgs = yearly_averages(&records);
        prop_assert!(avgs.windows(2).all(|w| w[0].year < w[1].year));
        for a in &avgs {
            prop_assert!(a.avg >= 0.0 && a.avg <= 10.0);
        }
    }

    #[test]
    fn trend_line_never_panics(
        points in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 0..40),
    ) {
        let line = trend_line(&points);
        if points.len() < 2 {
            prop_assert!(line.is_empty());
        } else {
            prop_assert_eq!(line.len(), 2);
            prop_assert!(line[0].x <= line[1].x);
            prop_assert!(line.iter().all(|p| p.y.is_finite()));
        }
    }
}
