//! In-memory data source
//!
//! Serves rows held in process, either inserted directly or loaded from a
//! JSON snapshot of the record collections. Useful for offline analysis and
//! for exercising the views without a backend.

use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::source::{Collection, DataSource, Filter, FilterValue, Query};
use crate::config::CollectionNames;
use crate::core::{DashboardError, DashboardResult};

/// Rows per collection, served with the same filter/sort semantics as the
/// remote source
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: HashMap<Collection, Vec<Value>>,
    names: CollectionNames,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty source reporting collections under `names`
    pub fn with_names(names: CollectionNames) -> Self {
        Self {
            rows: HashMap::new(),
            names,
        }
    }

    /// Load a snapshot file: `{ "<collection name>": [row, ...], ... }`
    ///
    /// Collections absent from the snapshot stay unavailable.
    pub fn from_json_file(path: impl AsRef<Path>, names: &CollectionNames) -> DashboardResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let snapshot: Map<String, Value> = serde_json::from_str(&json)
            .map_err(|e| DashboardError::Serialization(format!("{}: {}", path.display(), e)))?;

        let source = Self::from_snapshot(snapshot, names)?;
        tracing::info!(
            "Loaded snapshot {:?} ({} collections, {} rows)",
            path,
            source.rows.len(),
            source.total_rows()
        );
        Ok(source)
    }

    pub fn from_snapshot(mut snapshot: Map<String, Value>, names: &CollectionNames) -> DashboardResult<Self> {
        let mut source = Self::with_names(names.clone());

        for collection in Collection::ALL {
            let name = names.name(collection);
            match snapshot.remove(name) {
                Some(Value::Array(rows)) => source.insert_rows(collection, rows),
                Some(_) => {
                    return Err(DashboardError::Serialization(format!(
                        "snapshot entry '{}' is not an array",
                        name
                    )))
                }
                None => {}
            }
        }

        Ok(source)
    }

    /// Append raw rows, creating the collection if needed
    pub fn insert_rows(&mut self, collection: Collection, rows: Vec<Value>) {
        self.rows.entry(collection).or_default().extend(rows);
    }

    /// Append typed records
    pub fn insert_records<T: Serialize>(&mut self, collection: Collection, records: &[T]) -> DashboardResult<()> {
        let rows = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DashboardError::Serialization(e.to_string()))?;
        self.insert_rows(collection, rows);
        Ok(())
    }

    pub fn total_rows(&self) -> usize {
        self.rows.values().map(|r| r.len()).sum()
    }
}

impl DataSource for MemorySource {
    fn fetch(&self, query: &Query) -> DashboardResult<Vec<Value>> {
        let rows = self.rows.get(&query.collection).ok_or_else(|| {
            DashboardError::unavailable(self.collection_name(query.collection), "collection does not exist")
        })?;

        let mut matched: Vec<Value> = rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| row_matches(row, f)))
            .cloned()
            .collect();

        // Vec::sort_by is stable: ties keep insertion order
        if let Some(column) = &query.order_by {
            matched.sort_by(|a, b| compare_values(a.get(column), b.get(column)));
        }

        if !query.columns.is_empty() {
            matched = matched.into_iter().map(|row| project(row, &query.columns)).collect();
        }

        Ok(matched)
    }

    fn collection_name(&self, collection: Collection) -> &str {
        self.names.name(collection)
    }
}

fn row_matches(row: &Value, filter: &Filter) -> bool {
    match filter {
        Filter::NotNull { column } => row.get(column).map_or(false, |v| !v.is_null()),
        Filter::Eq { column, value } => match row.get(column) {
            Some(cell) => cell_equals(cell, value),
            None => false,
        },
    }
}

fn cell_equals(cell: &Value, value: &FilterValue) -> bool {
    match (cell, value) {
        (Value::Number(n), FilterValue::Number(x)) => n.as_f64() == Some(*x),
        (Value::String(s), FilterValue::Number(x)) => s.trim().parse::<f64>().ok() == Some(*x),
        // Date columns may be stored as full timestamps
        (Value::String(s), FilterValue::Date(_)) => {
            let date = value.to_string();
            s == &date || s.starts_with(&format!("{}T", date))
        }
        (Value::String(s), FilterValue::Text(t)) => s == t,
        (Value::Bool(b), FilterValue::Text(t)) => b.to_string() == *t,
        _ => false,
    }
}

/// Ascending order with numbers compared numerically and nulls last
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());

    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => Ordering::Equal,
        },
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn project(row: Value, columns: &[String]) -> Value {
    match row {
        Value::Object(mut map) => {
            let mut out = Map::new();
            for column in columns {
                if let Some(v) = map.remove(column) {
                    out.insert(column.clone(), v);
                }
            }
            Value::Object(out)
        }
        other => other,
    }
}
