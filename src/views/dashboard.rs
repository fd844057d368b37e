//! All views over one data source

use std::sync::Arc;

use super::evolution::IvEvolutionBuilder;
use super::expirations::ExpirationCatalog;
use super::greeks::GreeksSeriesBuilder;
use super::smile::SmileCurveBuilder;
use crate::config::DashboardConfig;
use crate::data::DataSource;

/// The expiration catalog and the three chart builders
///
/// Builders are independent; each tracks its own request generations.
pub struct Dashboard {
    pub expirations: ExpirationCatalog,
    pub smile: SmileCurveBuilder,
    pub greeks: GreeksSeriesBuilder,
    pub evolution: IvEvolutionBuilder,
}

impl Dashboard {
    pub fn new(source: Arc<dyn DataSource>, config: &DashboardConfig) -> Self {
        Self {
            expirations: ExpirationCatalog::new(source.clone()),
            smile: SmileCurveBuilder::new(source.clone(), config.smile.clone()),
            greeks: GreeksSeriesBuilder::new(source.clone()),
            evolution: IvEvolutionBuilder::new(source, config.evolution.clone()),
        }
    }
}
