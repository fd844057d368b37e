//! # Options Dashboard - Chart Views for Option Market Data
//!
//! Turns raw option-contract observations into plot-ready series for three
//! views, each split by calls and puts.
//!
//! ## Overview
//!
//! - **Volatility smile**: implied volatility (%) against strike for one
//!   expiration, with a padded x-axis domain
//! - **Greeks**: a selected sensitivity (delta, gamma, theta, vega, rho)
//!   against strike
//! - **IV evolution**: implied volatility (%) against days to maturity for
//!   each (strike, type), with a selectable strike list and a default strike
//!
//! ## Key Components
//!
//! - **Data Sources**: PostgREST/Supabase over HTTP, or in-memory/JSON snapshots
//! - **Record Filter**: drops rows whose required fields are absent or invalid
//! - **Series Grouping**: composite-key grouping with a stable sort
//! - **Request Gate**: newer requests always win over late stale responses
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use options_dashboard::prelude::*;
//!
//! let config = DashboardConfig::default();
//! let source = MemorySource::from_json_file("snapshot.json", &config.source.collections).unwrap();
//! let dashboard = Dashboard::new(Arc::new(source), &config);
//!
//! if let ViewState::Data(expirations) = dashboard.expirations.build() {
//!     let expiry = expirations.default.unwrap();
//!     let smile = dashboard.smile.build(expiry);
//!     let delta = dashboard.greeks.build(expiry, Greek::Delta);
//!     let evolution = dashboard.evolution.build(expiry, None);
//! }
//! ```
//!
//! ## What This Crate Does NOT Do
//!
//! - Compute implied volatility or Greeks (they arrive precomputed)
//! - Interpolate, smooth or fit curves between strikes or maturities
//! - Persist or cache anything beyond a single request

pub mod config;
pub mod core;
pub mod data;
pub mod views;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        AxisDomain, ChartPoint, DashboardError, DashboardResult, ExpirationRow, Greek, Greeks,
        GreeksQuote, IvSample, OptionQuote, OptionType, Series, ViewState,
    };

    // Configuration
    pub use crate::config::{CollectionNames, DashboardConfig, EvolutionConfig, SmileConfig, SourceConfig};

    // Data sources
    pub use crate::data::{fetch_records, Collection, DataSource, Filter, FilterValue, MemorySource, Query, RestSource};

    // Views
    pub use crate::views::{
        default_strike,
        greeks_series,
        group_and_sort,
        iv_evolution,
        smile_curve,
        Dashboard,
        ExpirationCatalog,
        Expirations,
        Field,
        FieldRecord,
        GreeksSeries,
        GreeksSeriesBuilder,
        GreeksSnapshot,
        GroupKey,
        IvEvolution,
        IvEvolutionBuilder,
        RecordFilter,
        RequestGate,
        SmileCurve,
        SmileCurveBuilder,
        Ticket,
    };
}

// Re-export main types at crate root
pub use crate::core::{DashboardError, DashboardResult};
pub use crate::views::Dashboard;
