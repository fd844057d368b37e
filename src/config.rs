//! Configuration for the dashboard views and their data source

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::{AxisDomain, DashboardError, DashboardResult};
use crate::data::Collection;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Where records come from
    pub source: SourceConfig,
    /// Smile curve axis settings
    pub smile: SmileConfig,
    /// IV evolution settings
    pub evolution: EvolutionConfig,
}

impl DashboardConfig {
    /// Load from a JSON file; missing sections take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> DashboardResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config: DashboardConfig = serde_json::from_str(&json)
            .map_err(|e| DashboardError::config(format!("{}: {}", path.display(), e)))?;

        config.validate()?;
        tracing::info!("Loaded dashboard config from {:?}", path);
        Ok(config)
    }

    pub fn validate(&self) -> DashboardResult<()> {
        self.smile.validate()?;
        self.evolution.validate()
    }
}

/// Record collection names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionNames {
    pub option_quotes: String,
    pub greeks: String,
    pub iv_samples: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            option_quotes: "options_data".to_string(),
            greeks: "greeks_data".to_string(),
            iv_samples: "iv_evolution".to_string(),
        }
    }
}

impl CollectionNames {
    pub fn name(&self, collection: Collection) -> &str {
        match collection {
            Collection::OptionQuotes => &self.option_quotes,
            Collection::Greeks => &self.greeks,
            Collection::IvSamples => &self.iv_samples,
        }
    }
}

/// Remote data source configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub base_url: String,
    /// Anonymous API key
    pub api_key: String,
    pub collections: CollectionNames,
}

impl SourceConfig {
    pub const URL_VAR: &'static str = "SUPABASE_URL";
    pub const KEY_VAR: &'static str = "SUPABASE_KEY";

    /// Read `SUPABASE_URL` / `SUPABASE_KEY` from the environment
    pub fn from_env() -> DashboardResult<Self> {
        let base_url = std::env::var(Self::URL_VAR)
            .map_err(|_| DashboardError::config(format!("{} is not set", Self::URL_VAR)))?;
        let api_key = std::env::var(Self::KEY_VAR).unwrap_or_default();

        if api_key.is_empty() {
            tracing::warn!("{} is not set, requests will be anonymous", Self::KEY_VAR);
        }

        Ok(Self {
            base_url,
            api_key,
            collections: CollectionNames::default(),
        })
    }
}

/// Smile curve axis padding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmileConfig {
    /// Lowest strike is multiplied by this
    /// Default: 0.95
    pub lower_padding: f64,

    /// Highest strike is multiplied by this
    /// Default: 1.05
    pub upper_padding: f64,

    /// Domain used when there are no valid points
    /// Default: [0, 1000]
    pub empty_domain: AxisDomain,
}

impl Default for SmileConfig {
    fn default() -> Self {
        Self {
            lower_padding: 0.95,
            upper_padding: 1.05,
            empty_domain: AxisDomain::new(0.0, 1000.0),
        }
    }
}

impl SmileConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if !(self.lower_padding > 0.0 && self.lower_padding <= 1.0) {
            return Err(DashboardError::config("smile.lower_padding must be in (0, 1]"));
        }
        if self.upper_padding < 1.0 {
            return Err(DashboardError::config("smile.upper_padding must be >= 1"));
        }
        if self.empty_domain.max <= self.empty_domain.min {
            return Err(DashboardError::config("smile.empty_domain must have max > min"));
        }
        Ok(())
    }
}

/// IV evolution settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Year fraction to days
    /// Default: 365
    pub days_per_year: f64,

    /// Send the strike selection to the data source as `strike_price = S`.
    /// When set, the selectable strike list only contains the selected strike.
    /// Default: false (strike applied in-process after the query)
    pub push_down_strike: bool,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            days_per_year: 365.0,
            push_down_strike: false,
        }
    }
}

impl EvolutionConfig {
    pub fn validate(&self) -> DashboardResult<()> {
        if !(self.days_per_year.is_finite() && self.days_per_year > 0.0) {
            return Err(DashboardError::config("evolution.days_per_year must be positive"));
        }
        Ok(())
    }
}
