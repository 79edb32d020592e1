//! Aggregate executor
//!
//! Implements GROUP BY over a single column with COUNT, SUM and AVG. Groups
//! are emitted in the order their keys were first seen.

use std::collections::HashMap;

use crate::catalog::DataType;
use crate::planner::physical::{AggregateFunc, PlannedAggregate};

use super::datum::Datum;
use super::error::{ExecutorError, ExecutorResult};
use super::row::Row;
use super::Executor;

/// Accumulator for a single aggregate function
#[derive(Debug, Clone)]
enum Accumulator {
    Count(i64),
    SumInt(Option<i64>),
    SumFloat(Option<f64>),
    Avg { sum: f64, count: i64 },
    First(Option<Datum>),
}

impl Accumulator {
    fn new(agg: &PlannedAggregate) -> Self {
        match agg.func {
            AggregateFunc::CountStar | AggregateFunc::Count => Accumulator::Count(0),
            AggregateFunc::Sum if agg.input_type == Some(DataType::Int) => {
                Accumulator::SumInt(None)
            }
            AggregateFunc::Sum => Accumulator::SumFloat(None),
            AggregateFunc::Avg => Accumulator::Avg { sum: 0.0, count: 0 },
            AggregateFunc::First => Accumulator::First(None),
        }
    }

    /// `value` is None for COUNT(*), which counts every row
    fn accumulate(&mut self, value: Option<&Datum>, agg: &PlannedAggregate) -> ExecutorResult<()> {
        let Some(value) = value else {
            if let Accumulator::Count(n) = self {
                *n += 1;
            }
            return Ok(());
        };

        match self {
            Accumulator::Count(n) => {
                if !value.is_null() {
                    *n += 1;
                }
            }
            Accumulator::SumInt(sum) => {
                if value.is_null() {
                    return Ok(());
                }
                let v = value.as_int().ok_or_else(|| mismatch(DataType::Int, value, agg))?;
                let next = sum
                    .unwrap_or(0)
                    .checked_add(v)
                    .ok_or_else(|| ExecutorError::Overflow(agg.display.clone()))?;
                *sum = Some(next);
            }
            Accumulator::SumFloat(sum) => {
                if value.is_null() {
                    return Ok(());
                }
                let v = value
                    .as_float()
                    .ok_or_else(|| mismatch(DataType::Double, value, agg))?;
                *sum = Some(sum.unwrap_or(0.0) + v);
            }
            Accumulator::Avg { sum, count } => {
                if value.is_null() {
                    return Ok(());
                }
                let v = value
                    .as_float()
                    .ok_or_else(|| mismatch(DataType::Double, value, agg))?;
                *sum += v;
                *count += 1;
            }
            Accumulator::First(first) => {
                if first.is_none() {
                    *first = Some(value.clone());
                }
            }
        }
        Ok(())
    }

    fn finalize(&self, agg: &PlannedAggregate) -> ExecutorResult<Datum> {
        Ok(match self {
            Accumulator::Count(n) => Datum::Int(*n),
            Accumulator::SumInt(sum) => sum.map(Datum::Int).unwrap_or(Datum::Null),
            Accumulator::SumFloat(sum) => sum.map(Datum::Float).unwrap_or(Datum::Null),
            Accumulator::Avg { sum, count } => {
                if *count == 0 {
                    return Err(ExecutorError::EmptyGroup(agg.display.clone()));
                }
                Datum::Float(*sum / *count as f64)
            }
            Accumulator::First(first) => first.clone().unwrap_or(Datum::Null),
        })
    }
}

fn mismatch(expected: DataType, got: &Datum, agg: &PlannedAggregate) -> ExecutorError {
    ExecutorError::TypeMismatch {
        expected,
        got: got.data_type().unwrap_or(expected),
        context: agg.display.clone(),
    }
}

/// Hash aggregate executor
pub struct HashAggregate {
    /// Input executor
    input: Box<dyn Executor>,
    /// Grouping column position; None aggregates everything into one group
    group_by: Option<usize>,
    /// Aggregates in output order
    aggregates: Vec<PlannedAggregate>,
    /// Finalized output rows
    output: Vec<Row>,
    /// Current position in output
    position: usize,
}

impl HashAggregate {
    /// Create a new hash aggregate executor
    pub fn new(
        input: Box<dyn Executor>,
        group_by: Option<usize>,
        aggregates: Vec<PlannedAggregate>,
    ) -> Self {
        HashAggregate {
            input,
            group_by,
            aggregates,
            output: Vec::new(),
            position: 0,
        }
    }

    fn new_accumulators(&self) -> Vec<Accumulator> {
        self.aggregates.iter().map(Accumulator::new).collect()
    }
}

impl Executor for HashAggregate {
    fn open(&mut self) -> ExecutorResult<()> {
        self.output.clear();
        self.position = 0;

        self.input.open()?;

        // Groups in first-seen order, plus a key -> slot index
        let mut groups: Vec<(Datum, Vec<Accumulator>)> = Vec::new();
        let mut slots: HashMap<Datum, usize> = HashMap::new();
        let mut input_rows = 0usize;

        while let Some(row) = self.input.next()? {
            input_rows += 1;
            let key = match self.group_by {
                Some(index) => row.get(index)?.clone(),
                None => Datum::Null,
            };

            let slot = match slots.get(&key) {
                Some(&slot) => slot,
                None => {
                    groups.push((key.clone(), self.new_accumulators()));
                    slots.insert(key, groups.len() - 1);
                    groups.len() - 1
                }
            };

            let accumulators = &mut groups[slot].1;
            for (acc, agg) in accumulators.iter_mut().zip(&self.aggregates) {
                let value = match agg.input {
                    Some(index) => Some(row.get(index)?),
                    None => None,
                };
                acc.accumulate(value, agg)?;
            }
        }

        // Aggregates without GROUP BY always produce one row, even over empty input
        if groups.is_empty() && self.group_by.is_none() {
            groups.push((Datum::Null, self.new_accumulators()));
        }

        for (key, accumulators) in &groups {
            let mut values = Vec::with_capacity(self.aggregates.len() + 1);
            if self.group_by.is_some() {
                values.push(key.clone());
            }
            for (acc, agg) in accumulators.iter().zip(&self.aggregates) {
                values.push(acc.finalize(agg)?);
            }
            self.output.push(Row::new(values));
        }

        tracing::trace!(input_rows, groups = self.output.len(), "aggregation complete");
        Ok(())
    }

    fn next(&mut self) -> ExecutorResult<Option<Row>> {
        if self.position >= self.output.len() {
            return Ok(None);
        }
        let row = self.output[self.position].clone();
        self.position += 1;
        Ok(Some(row))
    }

    fn close(&mut self) -> ExecutorResult<()> {
        self.output.clear();
        self.position = 0;
        self.input.close()
    }
}
