//! Property-based tests using proptest.
//!
//! Invariants of the filter, grouping and view transforms over random
//! record sets.

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use options_dashboard::prelude::*;

fn option_type() -> impl Strategy<Value = OptionType> {
    prop_oneof![Just(OptionType::Call), Just(OptionType::Put)]
}

fn quotes() -> impl Strategy<Value = Vec<OptionQuote>> {
    prop::collection::vec(
        (1.0_f64..500.0, prop::option::of(-0.5_f64..1.5), option_type())
            .prop_map(|(strike, iv, kind)| OptionQuote::new(strike.round(), iv, kind)),
        0..40,
    )
}

fn samples() -> impl Strategy<Value = Vec<IvSample>> {
    prop::collection::vec(
        (
            prop::sample::select(vec![-10.0, 0.0, 80.0, 90.0, 100.0, 110.0, 120.0]),
            option_type(),
            prop::option::of(0.001_f64..1.0),
            prop::option::of(0.01_f64..1.5),
        )
            .prop_map(|(strike, kind, ttm, iv)| {
                IvSample::new(strike, kind, ttm, iv, Utc.with_ymd_and_hms(2025, 1, 2, 15, 0, 0).unwrap())
            }),
        0..40,
    )
}

proptest! {
    /// Filtering keeps exactly the accepted records, in order, and is idempotent.
    #[test]
    fn filter_is_exact_ordered_subsequence(quotes in quotes()) {
        let filter = RecordFilter::new(&[Field::ImpliedVolatility]);
        let kept = filter.apply(&quotes);

        let expected: Vec<OptionQuote> = quotes
            .iter()
            .filter(|q| q.implied_volatility.map_or(false, |iv| iv.is_finite() && iv > 0.0))
            .cloned()
            .collect();
        prop_assert_eq!(&kept, &expected);
        prop_assert_eq!(filter.apply(&kept), kept);
    }
}

proptest! {
    /// Groups are sorted by the order key; ties keep input order.
    #[test]
    fn grouping_is_sorted_and_stable(rows in prop::collection::vec((0u8..3, 0u8..5), 0..50)) {
        let indexed: Vec<(usize, u8, u8)> = rows.iter().enumerate().map(|(i, &(k, o))| (i, k, o)).collect();
        let groups = group_and_sort(indexed.clone(), |r| r.1, |r| r.2 as f64);

        let total: usize = groups.values().map(|g| g.len()).sum();
        prop_assert_eq!(total, indexed.len());

        for (key, group) in &groups {
            prop_assert!(group.iter().all(|r| r.1 == *key));
            for pair in group.windows(2) {
                prop_assert!(pair[0].2 <= pair[1].2);
                if pair[0].2 == pair[1].2 {
                    prop_assert!(pair[0].0 < pair[1].0);
                }
            }
        }
    }
}

proptest! {
    /// Smile never plots a non-positive IV and its domain is ordered when there is data.
    #[test]
    fn smile_points_positive_and_domain_ordered(quotes in quotes()) {
        let curve = smile_curve(&quotes, &SmileConfig::default());

        prop_assert!(curve.calls.points.iter().chain(&curve.puts.points).all(|p| p.y > 0.0));
        prop_assert!(curve.calls.points.iter().all(|p| p.option_type == OptionType::Call));

        if !curve.is_empty() {
            prop_assert!(curve.domain.max > curve.domain.min);
            for p in curve.calls.points.iter().chain(&curve.puts.points) {
                prop_assert!(curve.domain.contains(p.x));
            }
        } else {
            prop_assert_eq!(curve.domain, AxisDomain::new(0.0, 1000.0));
        }

        for series in [&curve.calls, &curve.puts] {
            let xs = series.xs();
            prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

proptest! {
    /// Default strike is the element at len / 2 of the ascending distinct strikes.
    #[test]
    fn default_strike_is_upper_middle(samples in samples()) {
        let evo = iv_evolution(&samples, None, &EvolutionConfig::default());
        let strikes = &evo.available_strikes;

        prop_assert!(strikes.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(strikes.iter().all(|s| *s > 0.0));
        if strikes.is_empty() {
            prop_assert_eq!(evo.default_strike, None);
        } else {
            prop_assert_eq!(evo.default_strike, Some(strikes[strikes.len() / 2]));
        }

        for series in evo.series_by_group.values() {
            let xs = series.xs();
            prop_assert!(xs.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(series.points.iter().all(|p| p.y > 0.0 && p.strike_price.is_some()));
        }
    }
}
