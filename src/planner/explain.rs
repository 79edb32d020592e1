//! EXPLAIN output formatting
//!
//! Formats physical plans as an indented operator tree.

use std::fmt::Write;

use crate::planner::physical::PhysicalPlan;

/// Format a physical plan for EXPLAIN output
pub struct ExplainOutput;

impl ExplainOutput {
    /// Format a physical plan as a string
    pub fn format(plan: &PhysicalPlan) -> String {
        let mut output = String::new();
        Self::format_node(plan, 0, &mut output);
        output
    }

    fn format_node(plan: &PhysicalPlan, indent: usize, out: &mut String) {
        let prefix = "  ".repeat(indent);

        match plan {
            PhysicalPlan::TableScan { table, columns } => {
                let col_names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
                let _ = writeln!(out, "{}TableScan: {} [{}]", prefix, table, col_names.join(", "));
            }

            PhysicalPlan::HashJoin {
                left,
                right,
                left_key,
                right_key,
            } => {
                let left_names = column_names(left);
                let right_names = column_names(right);
                let _ = writeln!(
                    out,
                    "{}HashJoin: {} = {}",
                    prefix,
                    name_at(&left_names, *left_key),
                    name_at(&right_names, *right_key)
                );
                let _ = writeln!(out, "{}  probe:", prefix);
                Self::format_node(left, indent + 2, out);
                let _ = writeln!(out, "{}  build:", prefix);
                Self::format_node(right, indent + 2, out);
            }

            PhysicalPlan::Filter { input, predicates } => {
                let preds: Vec<_> = predicates
                    .iter()
                    .map(|p| format!("{} {} {:?}", p.column, p.op, p.value))
                    .collect();
                let _ = writeln!(out, "{}Filter: {}", prefix, preds.join(" AND "));
                Self::format_node(input, indent + 1, out);
            }

            PhysicalPlan::HashAggregate {
                input,
                group_by,
                aggregates,
            } => {
                let _ = writeln!(out, "{}HashAggregate", prefix);
                if let Some(index) = group_by {
                    let names = column_names(input);
                    let _ = writeln!(out, "{}  group by: {}", prefix, name_at(&names, *index));
                }
                if !aggregates.is_empty() {
                    let agg_names: Vec<_> = aggregates.iter().map(|a| a.display.as_str()).collect();
                    let _ = writeln!(out, "{}  aggregates: [{}]", prefix, agg_names.join(", "));
                }
                Self::format_node(input, indent + 1, out);
            }

            PhysicalPlan::Sort { input, order_by } => {
                let names = column_names(input);
                let keys: Vec<_> = order_by
                    .iter()
                    .map(|(index, asc)| {
                        format!("{} {}", name_at(&names, *index), if *asc { "ASC" } else { "DESC" })
                    })
                    .collect();
                let _ = writeln!(out, "{}Sort: [{}]", prefix, keys.join(", "));
                Self::format_node(input, indent + 1, out);
            }

            PhysicalPlan::Limit {
                input,
                limit,
                offset,
            } => {
                let mut parts = Vec::new();
                if let Some(l) = limit {
                    parts.push(format!("limit={}", l));
                }
                if let Some(o) = offset {
                    parts.push(format!("offset={}", o));
                }
                let _ = writeln!(out, "{}Limit: {}", prefix, parts.join(", "));
                Self::format_node(input, indent + 1, out);
            }

            PhysicalPlan::Project { input, columns } => {
                let cols: Vec<_> = columns
                    .iter()
                    .map(|c| match c.round {
                        Some(places) => format!("{} (round {})", c.name, places),
                        None => c.name.clone(),
                    })
                    .collect();
                let _ = writeln!(out, "{}Project: [{}]", prefix, cols.join(", "));
                Self::format_node(input, indent + 1, out);
            }
        }
    }
}

/// Display names of the values in a plan node's output rows
fn column_names(plan: &PhysicalPlan) -> Vec<String> {
    match plan {
        PhysicalPlan::TableScan { columns, .. } => {
            columns.iter().map(|c| c.qualified_name()).collect()
        }
        PhysicalPlan::HashJoin { left, right, .. } => {
            let mut names = column_names(left);
            names.extend(column_names(right));
            names
        }
        PhysicalPlan::Filter { input, .. }
        | PhysicalPlan::Sort { input, .. }
        | PhysicalPlan::Limit { input, .. } => column_names(input),
        PhysicalPlan::HashAggregate {
            input,
            group_by,
            aggregates,
        } => {
            let mut names = Vec::with_capacity(aggregates.len() + 1);
            if let Some(index) = group_by {
                names.push(name_at(&column_names(input), *index));
            }
            names.extend(aggregates.iter().map(|a| a.display.clone()));
            names
        }
        PhysicalPlan::Project { columns, .. } => columns.iter().map(|c| c.name.clone()).collect(),
    }
}

fn name_at(names: &[String], index: usize) -> String {
    names
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("#{}", index))
}
