//! Join executor
//!
//! Implements inner equi-join as a hash join: the right input is built into a
//! hash table keyed on the join column, the left input probes it. Output
//! follows left order, and for one left row, right insertion order.

use std::collections::HashMap;

use super::datum::Datum;
use super::error::ExecutorResult;
use super::row::Row;
use super::Executor;

/// Inner hash join executor
pub struct HashJoin {
    /// Probe side
    left: Box<dyn Executor>,
    /// Build side
    right: Box<dyn Executor>,
    /// Key position in left rows
    left_key: usize,
    /// Key position in right rows
    right_key: usize,
    /// Right rows by key; NULL keys are never inserted
    build: HashMap<Datum, Vec<Row>>,
    /// Current left row and its key
    current_left: Option<(Row, Datum)>,
    /// Next match position in the current bucket
    match_pos: usize,
}

impl HashJoin {
    /// Create a new hash join executor
    pub fn new(
        left: Box<dyn Executor>,
        right: Box<dyn Executor>,
        left_key: usize,
        right_key: usize,
    ) -> Self {
        HashJoin {
            left,
            right,
            left_key,
            right_key,
            build: HashMap::new(),
            current_left: None,
            match_pos: 0,
        }
    }
}

impl Executor for HashJoin {
    fn open(&mut self) -> ExecutorResult<()> {
        self.left.open()?;
        self.right.open()?;

        self.build.clear();
        let mut built = 0usize;
        while let Some(row) = self.right.next()? {
            let key = row.get(self.right_key)?.clone();
            if key.is_null() {
                continue;
            }
            self.build.entry(key).or_default().push(row);
            built += 1;
        }
        tracing::trace!(rows = built, keys = self.build.len(), "hash join build side ready");

        self.current_left = None;
        self.match_pos = 0;
        Ok(())
    }

    fn next(&mut self) -> ExecutorResult<Option<Row>> {
        loop {
            if let Some((left_row, key)) = &self.current_left {
                if let Some(bucket) = self.build.get(key) {
                    if let Some(right_row) = bucket.get(self.match_pos) {
                        self.match_pos += 1;
                        return Ok(Some(Row::concat_ref(left_row, right_row)));
                    }
                }
            }

            // Advance the probe side
            match self.left.next()? {
                Some(row) => {
                    let key = row.get(self.left_key)?.clone();
                    self.match_pos = 0;
                    // NULL never matches; leaving current_left empty skips the row
                    self.current_left = if key.is_null() { None } else { Some((row, key)) };
                }
                None => {
                    self.current_left = None;
                    return Ok(None);
                }
            }
        }
    }

    fn close(&mut self) -> ExecutorResult<()> {
        self.build.clear();
        self.current_left = None;
        self.left.close()?;
        self.right.close()
    }
}
