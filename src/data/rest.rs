//! PostgREST data source
//!
//! Reads the record collections over HTTP from a Supabase-style REST
//! endpoint (`{base_url}/rest/v1/{table}`).

use reqwest::StatusCode;
use serde_json::Value;

use super::source::{Collection, DataSource, Filter, Query};
use crate::config::{CollectionNames, SourceConfig};
use crate::core::{DashboardError, DashboardResult};

/// PostgREST client
pub struct RestSource {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    collections: CollectionNames,
}

impl RestSource {
    pub fn new(config: &SourceConfig) -> DashboardResult<Self> {
        if config.base_url.is_empty() {
            return Err(DashboardError::config("source.base_url is empty"));
        }

        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("options-dashboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            collections: config.collections.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }
}

impl DataSource for RestSource {
    fn fetch(&self, query: &Query) -> DashboardResult<Vec<Value>> {
        let table = self.collections.name(query.collection);
        let url = self.table_url(table);

        let mut request = self.client.get(&url).query(&query_pairs(query));
        if !self.api_key.is_empty() {
            request = request.header("apikey", &self.api_key).bearer_auth(&self.api_key);
        }

        let response = request
            .send()
            .map_err(|e| DashboardError::transport(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(classify_failure(table, status, &body));
        }

        response
            .json::<Vec<Value>>()
            .map_err(|e| DashboardError::unavailable(table, format!("unexpected response body: {}", e)))
    }

    fn collection_name(&self, collection: Collection) -> &str {
        self.collections.name(collection)
    }
}

/// Query string pairs in PostgREST syntax
pub fn query_pairs(query: &Query) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(query.filters.len() + 2);

    let select = if query.columns.is_empty() {
        "*".to_string()
    } else {
        query.columns.join(",")
    };
    pairs.push(("select".to_string(), select));

    for filter in &query.filters {
        match filter {
            Filter::Eq { column, value } => pairs.push((column.clone(), format!("eq.{}", value))),
            Filter::NotNull { column } => pairs.push((column.clone(), "not.is.null".to_string())),
        }
    }

    if let Some(column) = &query.order_by {
        pairs.push(("order".to_string(), format!("{}.asc", column)));
    }

    pairs
}

/// Missing relation vs anything else
fn classify_failure(table: &str, status: StatusCode, body: &str) -> DashboardError {
    const MISSING_MARKERS: [&str; 4] = ["PGRST116", "42P01", "NOT_FOUND", "does not exist"];

    if status == StatusCode::NOT_FOUND || MISSING_MARKERS.iter().any(|m| body.contains(m)) {
        DashboardError::unavailable(table, format!("HTTP {}: {}", status.as_u16(), body))
    } else {
        DashboardError::transport(format!("{} returned HTTP {}: {}", table, status.as_u16(), body))
    }
}
