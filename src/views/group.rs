//! Series grouping
//!
//! Splits records into sub-series by a composite key and orders each group by
//! a numeric key. The sort is stable: records that tie on the ordering key
//! keep their query order, the only tie-break the data offers.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::OptionType;

/// Group records by `key`, each group sorted ascending by `order`
pub fn group_and_sort<R, K, FK, FO>(records: impl IntoIterator<Item = R>, key: FK, order: FO) -> BTreeMap<K, Vec<R>>
where
    K: Ord,
    FK: Fn(&R) -> K,
    FO: Fn(&R) -> f64,
{
    let mut groups: BTreeMap<K, Vec<R>> = BTreeMap::new();
    for record in records {
        groups.entry(key(&record)).or_default().push(record);
    }

    for group in groups.values_mut() {
        group.sort_by(|a, b| order(a).total_cmp(&order(b)));
    }

    groups
}

/// Composite (strike, option type) key
///
/// Ordered by strike, then calls before puts. Strikes compare with
/// `f64::total_cmp`, so the key is totally ordered.
#[derive(Debug, Clone, Copy)]
pub struct GroupKey {
    pub strike_price: f64,
    pub option_type: OptionType,
}

impl GroupKey {
    pub fn new(strike_price: f64, option_type: OptionType) -> Self {
        Self {
            strike_price,
            option_type,
        }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.strike_price
            .total_cmp(&other.strike_price)
            .then(self.option_type.cmp(&other.option_type))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.strike_price, self.option_type)
    }
}

// Serialized as "<strike>_<type>" so it can key a JSON object
impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: u32,
        kind: OptionType,
        x: f64,
    }

    fn row(id: u32, kind: OptionType, x: f64) -> Row {
        Row { id, kind, x }
    }

    #[test]
    fn test_groups_sorted_by_order_key() {
        let rows = vec![
            row(1, OptionType::Put, 110.0),
            row(2, OptionType::Call, 105.0),
            row(3, OptionType::Put, 90.0),
            row(4, OptionType::Call, 95.0),
        ];

        let groups = group_and_sort(rows, |r| r.kind, |r| r.x);
        let calls: Vec<u32> = groups[&OptionType::Call].iter().map(|r| r.id).collect();
        let puts: Vec<u32> = groups[&OptionType::Put].iter().map(|r| r.id).collect();

        assert_eq!(calls, vec![4, 2]);
        assert_eq!(puts, vec![3, 1]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let rows = vec![
            row(1, OptionType::Call, 0.5),
            row(2, OptionType::Call, 0.1),
            row(3, OptionType::Call, 0.5),
            row(4, OptionType::Call, 0.1),
        ];

        let groups = group_and_sort(rows, |r| r.kind, |r| r.x);
        let ids: Vec<u32> = groups[&OptionType::Call].iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 4, 1, 3]);
    }

    #[test]
    fn test_group_key_order() {
        let mut keys = vec![
            GroupKey::new(110.0, OptionType::Call),
            GroupKey::new(100.0, OptionType::Put),
            GroupKey::new(100.0, OptionType::Call),
        ];
        keys.sort();

        assert_eq!(keys[0], GroupKey::new(100.0, OptionType::Call));
        assert_eq!(keys[1], GroupKey::new(100.0, OptionType::Put));
        assert_eq!(keys[2].to_string(), "110_call");
    }

    #[test]
    fn test_group_key_serializes_as_string() {
        let mut map = BTreeMap::new();
        map.insert(GroupKey::new(97.5, OptionType::Put), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"97.5_put":1}"#);
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<Row> = Vec::new();
        assert!(group_and_sort(rows, |r| r.kind, |r| r.x).is_empty());
    }
}
