use ahash::RandomState;
use hashbrown::{HashMap, HashSet};
use rayon::prelude::*;

use crate::aggregate::Aggregate;

/// Per-station aggregates plus the set of stations seen so far.
///
/// A table has exactly one owner at a time: a worker while it folds
/// records, then the merger once the worker publishes it. There is no
/// locking here.
#[derive(Debug, Clone, Default)]
pub struct AggregateTable {
    entries: HashMap<String, Aggregate, RandomState>,
    keys: HashSet<String, RandomState>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, key: &str, value: f64) {
        match self.entries.get_mut(key) {
            Some(agg) => *agg = agg.fold(value),
            None => {
                self.entries.insert(key.to_owned(), Aggregate::new(value));
                self.keys.insert(key.to_owned());
            }
        }
    }

    /// Fold every entry of `other` into this table.
    pub fn merge(&mut self, other: AggregateTable) {
        self.keys.extend(other.keys);
        for (key, theirs) in other.entries {
            self.entries
                .entry(key)
                .and_modify(|ours| *ours = ours.combine(theirs))
                .or_insert(theirs);
        }
    }

    /// Reduce any number of independently built tables into one.
    pub fn merge_all<I>(tables: I) -> Self
    where
        I: IntoParallelIterator<Item = AggregateTable>,
    {
        tables
            .into_par_iter()
            .reduce(AggregateTable::new, |mut acc, table| {
                acc.merge(table);
                acc
            })
    }

    pub fn get(&self, key: &str) -> Option<&Aggregate> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> &HashSet<String, RandomState> {
        &self.keys
    }

    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys = self.keys.iter().map(String::as_str).collect::<Vec<_>>();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Aggregate)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_of(records: &[(&str, f64)]) -> AggregateTable {
        let mut table = AggregateTable::new();
        for (key, value) in records {
            table.upsert(key, *value);
        }
        table
    }

    fn assert_same(a: &AggregateTable, b: &AggregateTable) {
        assert_eq!(a.keys(), b.keys());
        for key in a.keys() {
            let (x, y) = (a.get(key).unwrap(), b.get(key).unwrap());
            assert_eq!(x.count(), y.count(), "{key}");
            assert_eq!(x.min(), y.min(), "{key}");
            assert_eq!(x.max(), y.max(), "{key}");
            assert!((x.sum() - y.sum()).abs() <= 1e-6 * x.sum().abs().max(1.0), "{key}");
            assert!((x.mean() - y.mean()).abs() <= 1e-6 * x.mean().abs().max(1.0), "{key}");
        }
    }

    #[test]
    fn upsert_single_key() {
        let values = [12.5, -7.25, 30.0, 0.0, 4.75];
        let table = table_of(&values.map(|v| ("Oslo", v)));
        let agg = table.get("Oslo").unwrap();
        assert_eq!(agg.count(), 5);
        assert_eq!(agg.sum(), 40.0);
        assert_eq!(agg.mean(), 8.0);
        assert_eq!(agg.min(), -7.25);
        assert_eq!(agg.max(), 30.0);
        assert_eq!(table.len(), 1);
        assert!(table.get("Bergen").is_none());
    }

    #[test]
    fn keys_track_entries() {
        let table = table_of(&[("b", 1.0), ("a", 2.0), ("b", 3.0), ("c", 4.0)]);
        assert_eq!(table.sorted_keys(), vec!["a", "b", "c"]);
        assert_eq!(table.iter().count(), table.keys().len());
    }

    #[test]
    fn merge_matches_single_pass_in_any_order() {
        let records = [
            ("Tokyo", 18.1),
            ("Paris", 10.3),
            ("Tokyo", 22.7),
            ("Lima", -4.4),
            ("Paris", 9.9),
            ("Tokyo", 0.1),
            ("Lima", 13.0),
            ("Cairo", 35.2),
        ];
        let whole = table_of(&records);

        let parts = [&records[..3], &records[3..5], &records[5..]];

        let mut forward = AggregateTable::new();
        for part in parts {
            forward.merge(table_of(part));
        }
        assert_same(&whole, &forward);

        let mut backward = table_of(parts[2]);
        let mut grouped = table_of(parts[1]);
        grouped.merge(table_of(parts[0]));
        backward.merge(grouped);
        assert_same(&whole, &backward);
    }

    #[test]
    fn merge_into_empty_copies_everything() {
        let other = table_of(&[("x", 1.0), ("y", 2.0)]);
        let mut table = AggregateTable::new();
        table.merge(other.clone());
        assert_same(&other, &table);
    }

    #[test]
    fn merge_all_reduces_in_parallel() {
        let tables = (0..16)
            .map(|i| table_of(&[("even", (2 * i) as f64), ("odd", (2 * i + 1) as f64)]))
            .collect::<Vec<_>>();
        let merged = AggregateTable::merge_all(tables);
        let even = merged.get("even").unwrap();
        assert_eq!(even.count(), 16);
        assert_eq!(even.min(), 0.0);
        assert_eq!(even.max(), 30.0);
        assert_eq!(even.mean(), 15.0);
        assert_eq!(merged.get("odd").unwrap().mean(), 16.0);
        assert!(AggregateTable::merge_all(Vec::new()).is_empty());
    }
}
