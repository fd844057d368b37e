//! Data source contract
//!
//! A data source executes one read-only query against a named record
//! collection: equality filters, not-null filters, an ascending sort key.
//! Rows come back loosely typed and are decoded into records by
//! [`fetch_records`].

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{DashboardError, DashboardResult};

/// Column names shared by the record collections
pub mod columns {
    pub const EXPIRATION_DATE: &str = "expiration_date";
    pub const STRIKE_PRICE: &str = "strike_price";
    pub const OPTION_TYPE: &str = "option_type";
    pub const IMPLIED_VOLATILITY: &str = "implied_volatility";
    pub const TIME_TO_MATURITY: &str = "time_to_maturity";
    pub const RECORDED_AT: &str = "recorded_at";
    pub const DELTA: &str = "delta";
    pub const GAMMA: &str = "gamma";
    pub const THETA: &str = "theta";
    pub const VEGA: &str = "vega";
    pub const RHO: &str = "rho";
}

/// Logical record collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Collection {
    /// Per-contract quotes with implied volatility
    OptionQuotes,
    /// Per-contract precomputed Greeks
    Greeks,
    /// Implied-volatility observations over a contract's life
    IvSamples,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::OptionQuotes, Collection::Greeks, Collection::IvSamples];

    /// Default storage name
    pub fn default_name(&self) -> &'static str {
        match self {
            Collection::OptionQuotes => "options_data",
            Collection::Greeks => "greeks_data",
            Collection::IvSamples => "iv_evolution",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_name())
    }
}

/// Right-hand side of an equality filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterValue {
    Date(NaiveDate),
    Number(f64),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FilterValue::Number(n) => write!(f, "{}", n),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(d: NaiveDate) -> Self {
        FilterValue::Date(d)
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        FilterValue::Number(n)
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

/// Row predicate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Eq { column: String, value: FilterValue },
    NotNull { column: String },
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::NotNull { column } => column,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Eq { column, value } => write!(f, "{} = {}", column, value),
            Filter::NotNull { column } => write!(f, "{} not null", column),
        }
    }
}

/// A read-only query against one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub collection: Collection,
    /// Projected columns; empty means all
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    /// Ascending sort column
    pub order_by: Option<String>,
}

impl Query {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            columns: Vec::new(),
            filters: Vec::new(),
            order_by: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn where_eq(mut self, column: &str, value: impl Into<FilterValue>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn not_null(mut self, column: &str) -> Self {
        self.filters.push(Filter::NotNull {
            column: column.to_string(),
        });
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order_by = Some(column.to_string());
        self
    }

    /// Filters rendered for log lines
    pub fn describe_filters(&self) -> String {
        let rendered: Vec<String> = self.filters.iter().map(|f| f.to_string()).collect();
        format!("[{}]", rendered.join(", "))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.collection, self.describe_filters())?;
        if let Some(order) = &self.order_by {
            write!(f, " order by {} asc", order)?;
        }
        Ok(())
    }
}

/// Read-only access to the record collections
pub trait DataSource: Send + Sync {
    /// Execute a query, returning every matching row or failing as a whole
    fn fetch(&self, query: &Query) -> DashboardResult<Vec<serde_json::Value>>;

    /// Storage name of `collection`, as used in diagnostics
    fn collection_name(&self, collection: Collection) -> &str {
        collection.default_name()
    }
}

/// Execute `query` and decode each row into `T`
///
/// Rows that do not decode mean the collection does not have the expected
/// shape, which is reported as the collection being unavailable.
pub fn fetch_records<T: DeserializeOwned>(
    source: &dyn DataSource,
    query: &Query,
) -> DashboardResult<Vec<T>> {
    let rows = source.fetch(query)?;

    rows.into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| {
            DashboardError::unavailable(
                source.collection_name(query.collection),
                format!("schema mismatch: {}", e),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_display() {
        let expiry = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        let query = Query::new(Collection::IvSamples)
            .where_eq(columns::EXPIRATION_DATE, expiry)
            .where_eq(columns::STRIKE_PRICE, 100.0)
            .not_null(columns::IMPLIED_VOLATILITY)
            .order_asc(columns::RECORDED_AT);

        assert_eq!(
            query.to_string(),
            "iv_evolution [expiration_date = 2025-03-21, strike_price = 100, implied_volatility not null] order by recorded_at asc"
        );
    }

    #[test]
    fn test_filter_column() {
        let f = Filter::NotNull {
            column: "time_to_maturity".into(),
        };
        assert_eq!(f.column(), "time_to_maturity");
        assert_eq!(FilterValue::Number(112.5).to_string(), "112.5");
    }
}
