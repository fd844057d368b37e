//! Chart views
//!
//! Turns raw option records into plot-ready series. Each view:
//! 1. Issues one query against the data source
//! 2. Drops records with missing or invalid fields
//! 3. Groups and sorts into series, converting units for display
//!
//! Views:
//! - **Smile**: IV (%) vs strike, calls and puts, padded x-domain
//! - **Greeks**: one selected sensitivity vs strike
//! - **IV evolution**: IV (%) vs days to maturity per strike and type
//!
//! Failures never escape a view's `build`; they are logged and returned as
//! [`ViewState::Unavailable`].

mod dashboard;
mod evolution;
mod expirations;
mod filter;
mod gate;
mod greeks;
mod group;
mod smile;

pub use dashboard::*;
pub use evolution::*;
pub use expirations::*;
pub use filter::*;
pub use gate::*;
pub use greeks::*;
pub use group::*;
pub use smile::*;

use crate::core::{DashboardResult, ViewState};
use crate::data::{DataSource, Query};

/// Fraction to percent
pub const PERCENT: f64 = 100.0;

/// Turn a query outcome into a view state, logging empties and failures
pub(crate) fn settle<T>(
    view: &'static str,
    source: &dyn DataSource,
    query: &Query,
    result: DashboardResult<T>,
    has_data: impl FnOnce(&T) -> bool,
) -> ViewState<T> {
    match result {
        Ok(value) if has_data(&value) => ViewState::Data(value),
        Ok(_) => {
            tracing::info!(
                view,
                collection = source.collection_name(query.collection),
                filters = %query.describe_filters(),
                "No records"
            );
            ViewState::Empty
        }
        Err(e) => {
            tracing::error!(
                view,
                collection = source.collection_name(query.collection),
                filters = %query.describe_filters(),
                error = %e,
                "Query failed"
            );
            ViewState::Unavailable(e.to_string())
        }
    }
}
