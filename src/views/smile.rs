//! Volatility smile
//!
//! Implied volatility (in percent) against strike for one expiration, split
//! into calls and puts, with a padded x-axis domain.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use super::filter::{Field, RecordFilter};
use super::gate::{RequestGate, Ticket};
use super::group::group_and_sort;
use super::{settle, PERCENT};
use crate::config::SmileConfig;
use crate::core::{AxisDomain, ChartPoint, OptionQuote, OptionType, Series, ViewState};
use crate::data::{columns, fetch_records, Collection, DataSource, Query};
use crate::DashboardResult;

/// Smile curve for one expiration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SmileCurve {
    pub calls: Series,
    pub puts: Series,
    pub domain: AxisDomain,
}

impl SmileCurve {
    /// Neither calls nor puts have a point
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}

/// Build the smile from quotes of a single expiration
///
/// Quotes without a positive implied volatility or strike are dropped. The
/// domain spans the strikes of both series, padded by the configured factors,
/// and falls back to the configured empty domain when nothing survives.
pub fn smile_curve(quotes: &[OptionQuote], config: &SmileConfig) -> SmileCurve {
    let filter = RecordFilter::new(&[Field::StrikePrice, Field::ImpliedVolatility]);
    let valid = filter.apply(quotes);

    let strikes = valid.iter().map(|q| q.strike_price);
    let domain = match (
        strikes.clone().min_by(|a, b| a.total_cmp(b)),
        strikes.max_by(|a, b| a.total_cmp(b)),
    ) {
        (Some(lo), Some(hi)) => AxisDomain::new(lo * config.lower_padding, hi * config.upper_padding),
        _ => config.empty_domain,
    };

    let mut groups = group_and_sort(valid, |q| q.option_type, |q| q.strike_price);
    let mut series = |option_type: OptionType| {
        let points = groups
            .remove(&option_type)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|q| {
                q.implied_volatility
                    .map(|iv| ChartPoint::new(q.strike_price, iv * PERCENT, option_type))
            })
            .collect();
        Series::with_points(option_type.label(), points)
    };

    SmileCurve {
        calls: series(OptionType::Call),
        puts: series(OptionType::Put),
        domain,
    }
}

/// Smile curve view over a data source
pub struct SmileCurveBuilder {
    source: Arc<dyn DataSource>,
    config: SmileConfig,
    gate: RequestGate<ViewState<SmileCurve>>,
}

impl SmileCurveBuilder {
    pub fn new(source: Arc<dyn DataSource>, config: SmileConfig) -> Self {
        Self {
            source,
            config,
            gate: RequestGate::new(),
        }
    }

    /// Quotes with implied volatility for `expiration`, by strike
    pub fn query(expiration: NaiveDate) -> Query {
        Query::new(Collection::OptionQuotes)
            .select(&[columns::STRIKE_PRICE, columns::IMPLIED_VOLATILITY, columns::OPTION_TYPE])
            .where_eq(columns::EXPIRATION_DATE, expiration)
            .not_null(columns::IMPLIED_VOLATILITY)
            .order_asc(columns::STRIKE_PRICE)
    }

    pub fn fetch(&self, expiration: NaiveDate) -> DashboardResult<SmileCurve> {
        let quotes: Vec<OptionQuote> = fetch_records(self.source.as_ref(), &Self::query(expiration))?;
        Ok(smile_curve(&quotes, &self.config))
    }

    pub fn build(&self, expiration: NaiveDate) -> ViewState<SmileCurve> {
        let query = Self::query(expiration);
        settle("smile", self.source.as_ref(), &query, self.fetch(expiration), |curve| {
            !curve.is_empty()
        })
    }

    /// Start a request for new inputs
    pub fn issue(&self) -> Ticket {
        self.gate.issue()
    }

    /// Build for `ticket`; returns whether the result became visible
    pub fn complete(&self, ticket: Ticket, expiration: NaiveDate) -> bool {
        let state = self.build(expiration);
        self.gate.resolve(ticket, state)
    }

    /// Issue and complete in one call
    pub fn refresh(&self, expiration: NaiveDate) -> bool {
        let ticket = self.issue();
        self.complete(ticket, expiration)
    }

    /// Visible result of the most recent request
    pub fn latest(&self) -> Option<ViewState<SmileCurve>> {
        self.gate.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(strike: f64, iv: Option<f64>, option_type: OptionType) -> OptionQuote {
        OptionQuote::new(strike, iv, option_type)
    }

    #[test]
    fn test_domain_padding() {
        let quotes = vec![
            quote(90.0, Some(0.30), OptionType::Call),
            quote(95.0, Some(0.27), OptionType::Put),
            quote(100.0, Some(0.22), OptionType::Call),
            quote(105.0, Some(0.24), OptionType::Put),
            quote(110.0, Some(0.26), OptionType::Call),
        ];

        let curve = smile_curve(&quotes, &SmileConfig::default());
        assert!((curve.domain.min - 85.5).abs() < 1e-9);
        assert!((curve.domain.max - 115.5).abs() < 1e-9);
        assert_eq!(curve.calls.xs(), vec![90.0, 100.0, 110.0]);
        assert_eq!(curve.puts.xs(), vec![95.0, 105.0]);
    }

    #[test]
    fn test_percent_conversion_and_invalid_iv() {
        let quotes = vec![
            quote(100.0, Some(0.225), OptionType::Call),
            quote(105.0, Some(0.0), OptionType::Call),
            quote(110.0, None, OptionType::Call),
        ];

        let curve = smile_curve(&quotes, &SmileConfig::default());
        assert_eq!(curve.calls.len(), 1);
        assert!((curve.calls.points[0].y - 22.5).abs() < 1e-9);
        assert!(curve.puts.is_empty());
        // Domain only spans the valid strike
        assert!((curve.domain.min - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_domain_default() {
        let curve = smile_curve(&[], &SmileConfig::default());
        assert!(curve.is_empty());
        assert_eq!(curve.domain, AxisDomain::new(0.0, 1000.0));
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let quotes = vec![
            quote(110.0, Some(0.26), OptionType::Put),
            quote(90.0, Some(0.30), OptionType::Put),
        ];
        let curve = smile_curve(&quotes, &SmileConfig::default());
        assert_eq!(curve.puts.xs(), vec![90.0, 110.0]);
        assert_eq!(curve.puts.name, "Puts");
    }
}
