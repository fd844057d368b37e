//! Available expiration dates

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;

use super::settle;
use crate::core::{ExpirationRow, ViewState};
use crate::data::{columns, fetch_records, Collection, DataSource, Query};
use crate::DashboardResult;

/// Distinct expirations with the earliest proposed as the selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Expirations {
    pub dates: Vec<NaiveDate>,
    pub default: Option<NaiveDate>,
}

impl Expirations {
    /// Distinct dates of `rows`; rows without a readable date are skipped
    pub fn from_rows(rows: &[ExpirationRow]) -> Self {
        let mut dates: Vec<NaiveDate> = rows.iter().filter_map(ExpirationRow::date).collect();

        let skipped = rows.len() - dates.len();
        if skipped > 0 {
            tracing::warn!(skipped, total = rows.len(), "Skipped rows without a readable expiration date");
        }

        dates.sort();
        dates.dedup();

        let default = dates.first().copied();
        Self { dates, default }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }
}

/// Lists the expirations present in the option quotes
pub struct ExpirationCatalog {
    source: Arc<dyn DataSource>,
}

impl ExpirationCatalog {
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self { source }
    }

    pub fn query() -> Query {
        Query::new(Collection::OptionQuotes)
            .select(&[columns::EXPIRATION_DATE])
            .order_asc(columns::EXPIRATION_DATE)
    }

    pub fn fetch(&self) -> DashboardResult<Expirations> {
        let rows: Vec<ExpirationRow> = fetch_records(self.source.as_ref(), &Self::query())?;
        Ok(Expirations::from_rows(&rows))
    }

    pub fn build(&self) -> ViewState<Expirations> {
        settle(
            "expirations",
            self.source.as_ref(),
            &Self::query(),
            self.fetch(),
            |e| !e.dates.is_empty(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(y: i32, m: u32, d: u32) -> ExpirationRow {
        ExpirationRow::new(format!("{:04}-{:02}-{:02}", y, m, d))
    }

    #[test]
    fn test_distinct_ascending() {
        let rows = vec![row(2025, 4, 17), row(2025, 3, 21), row(2025, 4, 17), row(2025, 3, 21)];
        let expirations = Expirations::from_rows(&rows);

        assert_eq!(expirations.dates.len(), 2);
        assert_eq!(expirations.default, NaiveDate::from_ymd_opt(2025, 3, 21));
        assert!(expirations.contains(NaiveDate::from_ymd_opt(2025, 4, 17).unwrap()));
    }

    #[test]
    fn test_no_rows() {
        let expirations = Expirations::from_rows(&[]);
        assert!(expirations.dates.is_empty());
        assert_eq!(expirations.default, None);
    }

    #[test]
    fn test_timestamp_and_null_cells() {
        let rows = vec![
            ExpirationRow::new("2025-03-21T00:00:00"),
            ExpirationRow::default(),
            ExpirationRow::new("not a date"),
            row(2025, 3, 21),
            row(2025, 4, 17),
        ];
        let expirations = Expirations::from_rows(&rows);

        assert_eq!(
            expirations.dates,
            vec![
                NaiveDate::from_ymd_opt(2025, 3, 21).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 17).unwrap()
            ]
        );
    }
}
