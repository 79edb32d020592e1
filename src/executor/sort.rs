//! Sort executor
//!
//! Implements ORDER BY by collecting all rows, sorting them, then emitting.
//! The sort is stable: rows with equal keys keep their input order.

use std::cmp::Ordering;

use super::datum::Datum;
use super::error::ExecutorResult;
use super::row::Row;
use super::Executor;

/// Sort executor
pub struct Sort {
    /// Input executor
    input: Box<dyn Executor>,
    /// Key positions with ascending flag
    order_by: Vec<(usize, bool)>,
    /// Collected and sorted rows
    rows: Vec<Row>,
    /// Current position in sorted rows
    position: usize,
}

impl Sort {
    /// Create a new sort executor
    pub fn new(input: Box<dyn Executor>, order_by: Vec<(usize, bool)>) -> Self {
        Sort {
            input,
            order_by,
            rows: Vec::new(),
            position: 0,
        }
    }
}

impl Executor for Sort {
    fn open(&mut self) -> ExecutorResult<()> {
        self.input.open()?;

        // Precompute sort keys so a bad column index surfaces as an error
        // rather than inside the comparator
        let mut keyed_rows: Vec<(Vec<Datum>, Row)> = Vec::new();
        while let Some(row) = self.input.next()? {
            let mut keys = Vec::with_capacity(self.order_by.len());
            for (index, _) in &self.order_by {
                keys.push(row.get(*index)?.clone());
            }
            keyed_rows.push((keys, row));
        }

        let order_by = &self.order_by;
        keyed_rows.sort_by(|(keys_a, _), (keys_b, _)| {
            for ((key_a, key_b), (_, ascending)) in keys_a.iter().zip(keys_b).zip(order_by) {
                let cmp = key_a.cmp(key_b);
                let cmp = if *ascending { cmp } else { cmp.reverse() };
                if cmp != Ordering::Equal {
                    return cmp;
                }
            }
            Ordering::Equal
        });

        self.rows = keyed_rows.into_iter().map(|(_, row)| row).collect();
        self.position = 0;

        Ok(())
    }

    fn next(&mut self) -> ExecutorResult<Option<Row>> {
        if self.position >= self.rows.len() {
            return Ok(None);
        }
        let row = self.rows[self.position].clone();
        self.position += 1;
        Ok(Some(row))
    }

    fn close(&mut self) -> ExecutorResult<()> {
        self.rows.clear();
        self.position = 0;
        self.input.close()
    }
}
