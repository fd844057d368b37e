//! Core data types for the options dashboard
//!
//! Defines fundamental types:
//! - OptionType: call/put
//! - OptionQuote / GreeksQuote / IvSample: typed input records
//! - ChartPoint / Series / AxisDomain / ViewState: plot-ready output

pub mod chart;
pub mod error;
pub mod greeks;
pub mod option;
pub mod quote;

pub use chart::*;
pub use error::*;
pub use greeks::*;
pub use option::*;
pub use quote::*;
