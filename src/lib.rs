//! ReelDB - an in-memory join/aggregate/sort evaluator for tabular datasets
//!
//! Features:
//! - Typed query descriptions validated against a catalog before execution
//! - Volcano-style operators: hash join, filter, hash aggregate, sort, limit
//! - JSON fixture loading with a bounded load time
//! - The movie dataset schema and its canned reports

pub mod catalog;
pub mod config;
pub mod database;
pub mod executor;
pub mod movies;
pub mod planner;
pub mod storage;
