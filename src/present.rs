use std::fmt::Write;

use crate::table::AggregateTable;

/// `{a=min/mean/max, b=...}` over the first `limit` stations in
/// lexicographic order, one decimal place each.
pub fn format_summary(table: &AggregateTable, limit: usize) -> String {
    let mut out = String::from("{");
    for (i, key) in table.sorted_keys().into_iter().take(limit).enumerate() {
        let Some(agg) = table.get(key) else {
            continue;
        };
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{key}={:.1}/{:.1}/{:.1}", agg.min(), agg.mean(), agg.max());
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_with_one_decimal() {
        let mut table = AggregateTable::new();
        table.upsert("Tokyo", 18.0);
        table.upsert("Tokyo", 22.0);
        table.upsert("Paris", 10.0);
        assert_eq!(
            format_summary(&table, 10),
            "{Paris=10.0/10.0/10.0, Tokyo=18.0/20.0/22.0}"
        );
    }

    #[test]
    fn truncates_to_limit() {
        let mut table = AggregateTable::new();
        for key in ["c", "a", "d", "b"] {
            table.upsert(key, 1.5);
        }
        assert_eq!(format_summary(&table, 2), "{a=1.5/1.5/1.5, b=1.5/1.5/1.5}");
        assert_eq!(format_summary(&table, 0), "{}");
    }

    #[test]
    fn empty() {
        assert_eq!(format_summary(&AggregateTable::new(), 10), "{}");
    }
}
