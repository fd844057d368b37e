//! Record filter
//!
//! Keeps the records whose required numeric fields are present and valid.
//! Validity: the value is finite, and strike and implied volatility are
//! strictly positive (a zero IV is a missing reading, not a reading of zero).

use crate::core::{Greek, GreeksQuote, IvSample, OptionQuote};

/// Numeric record field a view can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    StrikePrice,
    ImpliedVolatility,
    TimeToMaturity,
    Greek(Greek),
}

impl Field {
    pub fn is_valid(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self {
            Field::StrikePrice | Field::ImpliedVolatility => value > 0.0,
            Field::TimeToMaturity | Field::Greek(_) => true,
        }
    }
}

impl From<Greek> for Field {
    fn from(greek: Greek) -> Self {
        Field::Greek(greek)
    }
}

/// Record with named numeric fields
pub trait FieldRecord {
    /// Field value, or `None` when absent or not part of this record shape
    fn field(&self, field: Field) -> Option<f64>;
}

impl FieldRecord for OptionQuote {
    fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::StrikePrice => Some(self.strike_price),
            Field::ImpliedVolatility => self.implied_volatility,
            Field::TimeToMaturity | Field::Greek(_) => None,
        }
    }
}

impl FieldRecord for GreeksQuote {
    fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::StrikePrice => Some(self.strike_price),
            Field::Greek(greek) => self.greeks.get(greek),
            Field::ImpliedVolatility | Field::TimeToMaturity => None,
        }
    }
}

impl FieldRecord for IvSample {
    fn field(&self, field: Field) -> Option<f64> {
        match field {
            Field::StrikePrice => Some(self.strike_price),
            Field::ImpliedVolatility => self.implied_volatility,
            Field::TimeToMaturity => self.time_to_maturity,
            Field::Greek(_) => None,
        }
    }
}

/// Filter over a fixed set of required fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter {
    required: Vec<Field>,
}

impl RecordFilter {
    pub fn new(required: &[Field]) -> Self {
        Self {
            required: required.to_vec(),
        }
    }

    pub fn required(&self) -> &[Field] {
        &self.required
    }

    /// Every required field present and valid
    pub fn accepts<R: FieldRecord>(&self, record: &R) -> bool {
        self.required
            .iter()
            .all(|&f| record.field(f).map_or(false, |v| f.is_valid(v)))
    }

    /// Order-preserving subsequence of accepted records
    pub fn apply<R: FieldRecord + Clone>(&self, records: &[R]) -> Vec<R> {
        records.iter().filter(|r| self.accepts(*r)).cloned().collect()
    }

    /// Owning variant of [`apply`](Self::apply)
    pub fn retain<R: FieldRecord>(&self, mut records: Vec<R>) -> Vec<R> {
        records.retain(|r| self.accepts(r));
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Greeks, OptionType};
    use chrono::Utc;

    #[test]
    fn test_iv_must_be_positive() {
        let filter = RecordFilter::new(&[Field::ImpliedVolatility]);
        let quotes = vec![
            OptionQuote::new(90.0, Some(0.25), OptionType::Put),
            OptionQuote::new(95.0, Some(0.0), OptionType::Put),
            OptionQuote::new(100.0, None, OptionType::Call),
            OptionQuote::new(105.0, Some(-0.1), OptionType::Call),
            OptionQuote::new(110.0, Some(f64::NAN), OptionType::Call),
            OptionQuote::new(115.0, Some(0.3), OptionType::Call),
        ];

        let kept = filter.apply(&quotes);
        let strikes: Vec<f64> = kept.iter().map(|q| q.strike_price).collect();
        assert_eq!(strikes, vec![90.0, 115.0]);
    }

    #[test]
    fn test_all_required_fields() {
        let filter = RecordFilter::new(&[Field::ImpliedVolatility, Field::TimeToMaturity]);
        let now = Utc::now();
        let samples = vec![
            IvSample::new(100.0, OptionType::Call, Some(0.1), Some(0.2), now),
            IvSample::new(100.0, OptionType::Call, None, Some(0.2), now),
            IvSample::new(100.0, OptionType::Call, Some(0.1), None, now),
        ];

        assert_eq!(filter.retain(samples).len(), 1);
    }

    #[test]
    fn test_negative_greeks_are_valid() {
        let filter = RecordFilter::new(&[Field::Greek(Greek::Theta)]);
        let quote = GreeksQuote::new(100.0, OptionType::Put, Greeks::new(-0.4, 0.01, -0.05, 0.2, -0.1));
        assert!(filter.accepts(&quote));
    }

    #[test]
    fn test_field_not_in_shape_is_absent() {
        let filter = RecordFilter::new(&[Field::TimeToMaturity]);
        let quote = OptionQuote::new(100.0, Some(0.2), OptionType::Call);
        assert!(!filter.accepts(&quote));
    }

    #[test]
    fn test_empty_input() {
        let filter = RecordFilter::new(&[Field::ImpliedVolatility]);
        let empty: Vec<OptionQuote> = Vec::new();
        assert!(filter.apply(&empty).is_empty());
    }
}
