// src/records/filter.rs
use crate::records::models::{Outcome, ResultTable};

/// Outcome restriction applied after the subject-code match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSelector {
    Pass,
    Fail,
    /// Any selector other than `pass` or `fail`: no outcome restriction.
    Any,
}

impl OutcomeSelector {
    /// Exact, case-sensitive match on `pass` and `fail`; everything else is `Any`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pass" => OutcomeSelector::Pass,
            "fail" => OutcomeSelector::Fail,
            _ => OutcomeSelector::Any,
        }
    }

    fn admits(&self, outcome: Outcome) -> bool {
        match self {
            OutcomeSelector::Pass => outcome == Outcome::Pass,
            OutcomeSelector::Fail => outcome == Outcome::Fail,
            OutcomeSelector::Any => true,
        }
    }
}

/// Narrows `table` to rows whose subject code equals `subject_code` exactly,
/// then to the outcome chosen by `selector`. The source table is untouched.
pub fn filter_table(table: &ResultTable, subject_code: &str, selector: OutcomeSelector) -> ResultTable {
    let narrowed: ResultTable = table
        .iter()
        .filter(|r| r.subject_code == subject_code && selector.admits(r.result))
        .cloned()
        .collect();

    tracing::debug!(
        "Filter {} / {:?} kept {} of {} rows",
        subject_code,
        selector,
        narrowed.len(),
        table.len()
    );
    narrowed
}
