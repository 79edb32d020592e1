//! Result comparison helpers
//!
//! Ranked results are compared in order; single-row lookups and unordered
//! results are compared as sets.

use reeldb::executor::{Datum, Record};

/// Build an expected record from `(name, value)` pairs
pub fn record<const N: usize>(fields: [(&str, Datum); N]) -> Record {
    fields
        .into_iter()
        .fold(Record::new(), |rec, (name, value)| rec.with(name, value))
}

/// Field names, values and order must all match
pub fn assert_records_eq(actual: &[Record], expected: &[Record]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "row count differs\nactual:   {:?}\nexpected: {:?}",
        actual,
        expected
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(a, e, "row {} differs", i);
    }
}

/// Same records regardless of order
pub fn assert_same_records(actual: &[Record], expected: &[Record]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "row count differs\nactual:   {:?}\nexpected: {:?}",
        actual,
        expected
    );
    let mut unmatched: Vec<&Record> = actual.iter().collect();
    for e in expected {
        let pos = unmatched
            .iter()
            .position(|a| *a == e)
            .unwrap_or_else(|| panic!("expected record {:?} not found in {:?}", e, actual));
        unmatched.swap_remove(pos);
    }
}
