//! Greeks by strike
//!
//! One sensitivity against strike for calls and puts. The records are kept
//! unfiltered so that every selection decides afresh which points it drops.

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use super::filter::{Field, RecordFilter};
use super::gate::{RequestGate, Ticket};
use super::group::group_and_sort;
use super::settle;
use crate::core::{ChartPoint, Greek, GreeksQuote, OptionType, Series, ViewState};
use crate::data::{columns, fetch_records, Collection, DataSource, Query};
use crate::DashboardResult;

/// Call and put series for one selected sensitivity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreeksSeries {
    pub greek: Greek,
    pub calls: Series,
    pub puts: Series,
}

impl GreeksSeries {
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}

/// Series for `greek`, dropping points where that sensitivity is absent or
/// the strike is not positive
pub fn greeks_series(quotes: &[GreeksQuote], greek: Greek) -> GreeksSeries {
    let filter = RecordFilter::new(&[Field::StrikePrice, Field::Greek(greek)]);
    let groups = group_and_sort(quotes.iter(), |q| q.option_type, |q| q.strike_price);

    let series = |option_type: OptionType| {
        let points = groups
            .get(&option_type)
            .into_iter()
            .flatten()
            .filter(|q| filter.accepts(**q))
            .filter_map(|q| {
                q.greeks
                    .get(greek)
                    .map(|value| ChartPoint::new(q.strike_price, value, option_type))
            })
            .collect();
        Series::with_points(option_type.label(), points)
    };

    GreeksSeries {
        greek,
        calls: series(OptionType::Call),
        puts: series(OptionType::Put),
    }
}

/// All Greeks records of one expiration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GreeksSnapshot {
    pub quotes: Vec<GreeksQuote>,
}

impl GreeksSnapshot {
    pub fn new(quotes: Vec<GreeksQuote>) -> Self {
        Self { quotes }
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Series for one selection
    pub fn series(&self, greek: Greek) -> GreeksSeries {
        greeks_series(&self.quotes, greek)
    }

    /// Series for every selectable sensitivity
    pub fn all_series(&self) -> Vec<GreeksSeries> {
        Greek::ALL.iter().map(|&g| self.series(g)).collect()
    }
}

/// Greeks view over a data source
pub struct GreeksSeriesBuilder {
    source: Arc<dyn DataSource>,
    gate: RequestGate<ViewState<GreeksSeries>>,
}

impl GreeksSeriesBuilder {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            gate: RequestGate::new(),
        }
    }

    /// All Greeks rows for `expiration`, by strike
    pub fn query(expiration: NaiveDate) -> Query {
        Query::new(Collection::Greeks)
            .select(&[
                columns::STRIKE_PRICE,
                columns::DELTA,
                columns::GAMMA,
                columns::THETA,
                columns::VEGA,
                columns::RHO,
                columns::OPTION_TYPE,
            ])
            .where_eq(columns::EXPIRATION_DATE, expiration)
            .order_asc(columns::STRIKE_PRICE)
    }

    pub fn fetch(&self, expiration: NaiveDate) -> DashboardResult<GreeksSnapshot> {
        let quotes: Vec<GreeksQuote> = fetch_records(self.source.as_ref(), &Self::query(expiration))?;
        Ok(GreeksSnapshot::new(quotes))
    }

    /// Every record of the expiration, for callers switching selection locally
    pub fn snapshot(&self, expiration: NaiveDate) -> ViewState<GreeksSnapshot> {
        let query = Self::query(expiration);
        settle("greeks", self.source.as_ref(), &query, self.fetch(expiration), |snapshot| {
            !snapshot.is_empty()
        })
    }

    pub fn build(&self, expiration: NaiveDate, greek: Greek) -> ViewState<GreeksSeries> {
        let query = Self::query(expiration);
        let result = self.fetch(expiration).map(|snapshot| snapshot.series(greek));
        settle("greeks", self.source.as_ref(), &query, result, |series| !series.is_empty())
    }

    pub fn issue(&self) -> Ticket {
        self.gate.issue()
    }

    pub fn complete(&self, ticket: Ticket, expiration: NaiveDate, greek: Greek) -> bool {
        let state = self.build(expiration, greek);
        self.gate.resolve(ticket, state)
    }

    pub fn refresh(&self, expiration: NaiveDate, greek: Greek) -> bool {
        let ticket = self.issue();
        self.complete(ticket, expiration, greek)
    }

    pub fn latest(&self) -> Option<ViewState<GreeksSeries>> {
        self.gate.latest()
    }
}
