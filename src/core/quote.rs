//! Option market records
//!
//! Typed rows of the three record collections. Numeric fields that the
//! collector may leave empty are `Option`s; validity is decided once by the
//! record filter rather than at each use site.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::greeks::Greeks;
use super::option::OptionType;

/// Option quote used by the smile curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price
    pub strike_price: f64,
    /// Implied volatility as a fraction (0.225 = 22.5%)
    #[serde(default)]
    pub implied_volatility: Option<f64>,
    /// Call or put
    pub option_type: OptionType,
}

impl OptionQuote {
    pub fn new(strike_price: f64, implied_volatility: Option<f64>, option_type: OptionType) -> Self {
        Self {
            strike_price,
            implied_volatility,
            option_type,
        }
    }
}

/// Greeks-extended option quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreeksQuote {
    pub strike_price: f64,
    pub option_type: OptionType,
    #[serde(flatten)]
    pub greeks: Greeks,
}

impl GreeksQuote {
    pub fn new(strike_price: f64, option_type: OptionType, greeks: Greeks) -> Self {
        Self {
            strike_price,
            option_type,
            greeks,
        }
    }
}

/// One implied-volatility observation of a contract at a point in its life
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IvSample {
    pub strike_price: f64,
    pub option_type: OptionType,
    /// Remaining life as a fraction of a year
    #[serde(default)]
    pub time_to_maturity: Option<f64>,
    /// Implied volatility as a fraction
    #[serde(default)]
    pub implied_volatility: Option<f64>,
    /// When the collector recorded the sample
    pub recorded_at: DateTime<Utc>,
}

impl IvSample {
    pub fn new(
        strike_price: f64,
        option_type: OptionType,
        time_to_maturity: Option<f64>,
        implied_volatility: Option<f64>,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            strike_price,
            option_type,
            time_to_maturity,
            implied_volatility,
            recorded_at,
        }
    }
}

/// Row projection used to list available expirations
///
/// The cell is kept as text: collectors store either a plain date or a full
/// timestamp, and some rows carry no date at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationRow {
    #[serde(default)]
    pub expiration_date: Option<String>,
}

impl ExpirationRow {
    pub fn new(expiration_date: impl Into<String>) -> Self {
        Self {
            expiration_date: Some(expiration_date.into()),
        }
    }

    /// Calendar date from the leading `YYYY-MM-DD` of the cell
    pub fn date(&self) -> Option<NaiveDate> {
        let cell = self.expiration_date.as_deref()?.trim();
        let prefix = cell.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}
