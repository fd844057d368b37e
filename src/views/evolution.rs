//! Implied-volatility evolution
//!
//! How each contract's implied volatility moved as it approached expiry:
//! one series per (strike, option type), x in days to maturity, y in percent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::filter::{Field, FieldRecord, RecordFilter};
use super::gate::{RequestGate, Ticket};
use super::group::{group_and_sort, GroupKey};
use super::{settle, PERCENT};
use crate::config::EvolutionConfig;
use crate::core::{ChartPoint, IvSample, Series, ViewState};
use crate::data::{columns, fetch_records, Collection, DataSource, Query};
use crate::DashboardResult;

/// IV evolution for one expiration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IvEvolution {
    /// One series per (strike, option type)
    pub series_by_group: BTreeMap<GroupKey, Series>,
    /// Distinct strikes of the expiration, ascending
    pub available_strikes: Vec<f64>,
    /// Suggested strike when none is selected
    pub default_strike: Option<f64>,
    /// Strike the series are restricted to
    pub strike_filter: Option<f64>,
}

impl IvEvolution {
    /// No series to plot
    pub fn is_empty(&self) -> bool {
        self.series_by_group.values().all(|s| s.is_empty())
    }

    /// The expiration has samples, even if none match the strike filter
    pub fn has_strikes(&self) -> bool {
        !self.available_strikes.is_empty()
    }

    /// Series of one strike, calls first
    pub fn series_for_strike(&self, strike: f64) -> Vec<&Series> {
        self.series_by_group
            .iter()
            .filter(|(key, _)| key.strike_price == strike)
            .map(|(_, series)| series)
            .collect()
    }
}

/// The "middle" entry of an ascending strike list: index `len / 2`, which is
/// the upper-middle element for even lengths
pub fn default_strike(available_strikes: &[f64]) -> Option<f64> {
    available_strikes.get(available_strikes.len() / 2).copied()
}

/// Distinct strikes, ascending
pub fn distinct_strikes(samples: &[IvSample]) -> Vec<f64> {
    sorted_strikes(samples.iter().map(|s| s.strike_price))
}

fn sorted_strikes(strikes: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut strikes: Vec<f64> = strikes.collect();
    strikes.sort_by(|a, b| a.total_cmp(b));
    strikes.dedup();
    strikes
}

/// Fields a sample needs to be plotted
const REQUIRED: [Field; 3] = [Field::StrikePrice, Field::ImpliedVolatility, Field::TimeToMaturity];

/// Strike projection of an IV sample, enough to list the selectable strikes
#[derive(Debug, Clone, Copy, Deserialize)]
struct StrikeRow {
    strike_price: f64,
    #[serde(default)]
    implied_volatility: Option<f64>,
    #[serde(default)]
    time_to_maturity: Option<f64>,
}

impl FieldRecord for StrikeRow {
    fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::StrikePrice => Some(self.strike_price),
            Field::ImpliedVolatility => self.implied_volatility,
            Field::TimeToMaturity => self.time_to_maturity,
            Field::Greek(_) => None,
        }
    }
}

/// Build the evolution from the samples of one expiration
///
/// Samples without a positive strike and implied volatility, or without a
/// time to maturity, are dropped first.
/// `available_strikes` is taken before the strike filter is applied, and a
/// default strike is only proposed when no filter is active.
pub fn iv_evolution(samples: &[IvSample], strike_filter: Option<f64>, config: &EvolutionConfig) -> IvEvolution {
    let filter = RecordFilter::new(&REQUIRED);
    let mut valid = filter.apply(samples);

    let available_strikes = distinct_strikes(&valid);

    if let Some(strike) = strike_filter {
        valid.retain(|s| s.strike_price == strike);
    }

    let groups = group_and_sort(
        valid,
        |s| GroupKey::new(s.strike_price, s.option_type),
        |s| s.time_to_maturity.unwrap_or(f64::NAN),
    );

    let series_by_group = groups
        .into_iter()
        .map(|(key, samples)| {
            let points = samples
                .into_iter()
                .filter_map(|s| match (s.time_to_maturity, s.implied_volatility) {
                    (Some(ttm), Some(iv)) => Some(
                        ChartPoint::new(ttm * config.days_per_year, iv * PERCENT, key.option_type)
                            .with_strike(key.strike_price),
                    ),
                    _ => None,
                })
                .collect();
            let name = format!("{} {}", key.option_type.label(), key.strike_price);
            (key, Series::with_points(name, points))
        })
        .collect();

    let default_strike = match strike_filter {
        None => default_strike(&available_strikes),
        Some(_) => None,
    };

    IvEvolution {
        series_by_group,
        available_strikes,
        default_strike,
        strike_filter,
    }
}

/// IV evolution view over a data source
pub struct IvEvolutionBuilder {
    source: Arc<dyn DataSource>,
    config: EvolutionConfig,
    gate: RequestGate<ViewState<IvEvolution>>,
}

impl IvEvolutionBuilder {
    pub fn new(source: Arc<dyn DataSource>, config: EvolutionConfig) -> Self {
        Self {
            source,
            config,
            gate: RequestGate::new(),
        }
    }

    /// Samples for `expiration` in recording order. The strike is only part
    /// of the query when `push_down_strike` is configured.
    pub fn query(&self, expiration: NaiveDate, strike: Option<f64>) -> Query {
        let mut query = Query::new(Collection::IvSamples)
            .select(&[
                columns::TIME_TO_MATURITY,
                columns::IMPLIED_VOLATILITY,
                columns::STRIKE_PRICE,
                columns::OPTION_TYPE,
                columns::RECORDED_AT,
            ])
            .where_eq(columns::EXPIRATION_DATE, expiration);

        if let (Some(strike), true) = (strike, self.config.push_down_strike) {
            query = query.where_eq(columns::STRIKE_PRICE, strike);
        }

        query
            .not_null(columns::IMPLIED_VOLATILITY)
            .not_null(columns::TIME_TO_MATURITY)
            .order_asc(columns::RECORDED_AT)
    }

    /// Strike columns of every sample of `expiration`, by strike
    pub fn strikes_query(expiration: NaiveDate) -> Query {
        Query::new(Collection::IvSamples)
            .select(&[
                columns::STRIKE_PRICE,
                columns::IMPLIED_VOLATILITY,
                columns::TIME_TO_MATURITY,
            ])
            .where_eq(columns::EXPIRATION_DATE, expiration)
            .not_null(columns::IMPLIED_VOLATILITY)
            .not_null(columns::TIME_TO_MATURITY)
            .order_asc(columns::STRIKE_PRICE)
    }

    /// Selectable strikes of `expiration`, independent of any strike filter
    pub fn fetch_strikes(&self, expiration: NaiveDate) -> DashboardResult<Vec<f64>> {
        let rows: Vec<StrikeRow> = fetch_records(self.source.as_ref(), &Self::strikes_query(expiration))?;
        let filter = RecordFilter::new(&REQUIRED);
        Ok(sorted_strikes(filter.retain(rows).into_iter().map(|r| r.strike_price)))
    }

    pub fn fetch(&self, expiration: NaiveDate, strike: Option<f64>) -> DashboardResult<IvEvolution> {
        let samples: Vec<IvSample> = fetch_records(self.source.as_ref(), &self.query(expiration, strike))?;
        let mut evolution = iv_evolution(&samples, strike, &self.config);

        // A pushed-down strike leaves only that strike in the response
        if self.config.push_down_strike && strike.is_some() {
            evolution.available_strikes = self.fetch_strikes(expiration)?;
        }

        Ok(evolution)
    }

    /// `Data` whenever the expiration has strikes, so a filter matching
    /// nothing still reports what can be selected
    pub fn build(&self, expiration: NaiveDate, strike: Option<f64>) -> ViewState<IvEvolution> {
        let query = self.query(expiration, strike);
        settle(
            "iv_evolution",
            self.source.as_ref(),
            &query,
            self.fetch(expiration, strike),
            IvEvolution::has_strikes,
        )
    }

    pub fn issue(&self) -> Ticket {
        self.gate.issue()
    }

    pub fn complete(&self, ticket: Ticket, expiration: NaiveDate, strike: Option<f64>) -> bool {
        let state = self.build(expiration, strike);
        self.gate.resolve(ticket, state)
    }

    pub fn refresh(&self, expiration: NaiveDate, strike: Option<f64>) -> bool {
        let ticket = self.issue();
        self.complete(ticket, expiration, strike)
    }

    pub fn latest(&self) -> Option<ViewState<IvEvolution>> {
        self.gate.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OptionType;
    use chrono::{TimeZone, Utc};

    fn sample(strike: f64, option_type: OptionType, ttm: Option<f64>, iv: Option<f64>, minute: u32) -> IvSample {
        let recorded_at = Utc.with_ymd_and_hms(2025, 1, 15, 14, minute, 0).unwrap();
        IvSample::new(strike, option_type, ttm, iv, recorded_at)
    }

    #[test]
    fn test_default_strike_index() {
        assert_eq!(default_strike(&[90.0, 100.0, 110.0]), Some(100.0));
        assert_eq!(default_strike(&[90.0, 100.0, 110.0, 120.0]), Some(110.0));
        assert_eq!(default_strike(&[42.0]), Some(42.0));
        assert_eq!(default_strike(&[]), None);
    }

    #[test]
    fn test_unit_conversion() {
        let samples = vec![sample(100.0, OptionType::Call, Some(0.0822), Some(0.225), 0)];
        let evo = iv_evolution(&samples, None, &EvolutionConfig::default());

        let series = &evo.series_by_group[&GroupKey::new(100.0, OptionType::Call)];
        assert!((series.points[0].x - 30.0).abs() < 0.01);
        assert!((series.points[0].y - 22.5).abs() < 1e-9);
        assert_eq!(series.points[0].strike_price, Some(100.0));
        assert_eq!(series.name, "Calls 100");
    }

    #[test]
    fn test_grouped_and_sorted_by_maturity() {
        // Recorded in time order, so maturity shrinks as samples arrive
        let samples = vec![
            sample(100.0, OptionType::Call, Some(0.10), Some(0.20), 0),
            sample(100.0, OptionType::Put, Some(0.10), Some(0.22), 1),
            sample(100.0, OptionType::Call, Some(0.08), Some(0.21), 2),
            sample(110.0, OptionType::Call, Some(0.08), Some(0.19), 3),
            sample(100.0, OptionType::Call, Some(0.05), Some(0.23), 4),
        ];

        let evo = iv_evolution(&samples, None, &EvolutionConfig::default());
        assert_eq!(evo.series_by_group.len(), 3);

        let calls = &evo.series_by_group[&GroupKey::new(100.0, OptionType::Call)];
        let days: Vec<f64> = calls.xs();
        assert!(days.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(calls.len(), 3);
    }

    #[test]
    fn test_strike_filter_keeps_available_strikes() {
        let samples = vec![
            sample(90.0, OptionType::Call, Some(0.1), Some(0.3), 0),
            sample(100.0, OptionType::Call, Some(0.1), Some(0.2), 1),
            sample(110.0, OptionType::Put, Some(0.1), Some(0.25), 2),
        ];

        let evo = iv_evolution(&samples, Some(110.0), &EvolutionConfig::default());
        assert_eq!(evo.available_strikes, vec![90.0, 100.0, 110.0]);
        assert_eq!(evo.default_strike, None);
        assert_eq!(evo.series_by_group.len(), 1);
        assert_eq!(evo.series_for_strike(110.0).len(), 1);
    }

    #[test]
    fn test_non_positive_strike_dropped() {
        let samples = vec![
            sample(-5.0, OptionType::Put, Some(0.1), Some(0.3), 0),
            sample(0.0, OptionType::Call, Some(0.1), Some(0.3), 1),
            sample(100.0, OptionType::Call, Some(0.1), Some(0.2), 2),
        ];

        let evo = iv_evolution(&samples, None, &EvolutionConfig::default());
        assert_eq!(evo.available_strikes, vec![100.0]);
        assert_eq!(evo.default_strike, Some(100.0));
        assert_eq!(evo.series_by_group.len(), 1);
    }

    #[test]
    fn test_unmatched_strike_keeps_strike_list() {
        let samples = vec![sample(100.0, OptionType::Call, Some(0.1), Some(0.2), 0)];

        let evo = iv_evolution(&samples, Some(105.0), &EvolutionConfig::default());
        assert!(evo.is_empty());
        assert!(evo.has_strikes());
        assert_eq!(evo.available_strikes, vec![100.0]);
    }

    #[test]
    fn test_incomplete_samples_dropped() {
        let samples = vec![
            sample(90.0, OptionType::Call, None, Some(0.3), 0),
            sample(100.0, OptionType::Call, Some(0.1), None, 1),
        ];

        let evo = iv_evolution(&samples, None, &EvolutionConfig::default());
        assert!(evo.is_empty());
        assert!(evo.available_strikes.is_empty());
        assert_eq!(evo.default_strike, None);
    }

    #[test]
    fn test_query_strike_push_down() {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        let source: Arc<dyn DataSource> = Arc::new(crate::data::MemorySource::new());

        let local = IvEvolutionBuilder::new(source.clone(), EvolutionConfig::default());
        assert!(!local.query(expiry, Some(100.0)).to_string().contains("strike_price = 100"));

        let pushed = IvEvolutionBuilder::new(
            source,
            EvolutionConfig {
                push_down_strike: true,
                ..Default::default()
            },
        );
        assert!(pushed.query(expiry, Some(100.0)).to_string().contains("strike_price = 100"));
    }
}
