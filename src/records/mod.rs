// src/records/mod.rs
pub mod filter;
pub mod models;

pub use filter::{filter_table, OutcomeSelector};
pub use models::{Outcome, ResultRecord, ResultTable};
