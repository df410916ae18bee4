// src/records/models.rs
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Canonical column headers of a persisted result table, in file order.
pub const COLUMNS: [&str; 4] = ["Roll_Number", "Name", "Subject_Code", "Result"];

/// Outcome of one student in one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Pass,
    Fail,
    Absent,
    /// Never produced by the line scanner today, which only collects
    /// `P`, `R` and `A` tokens. Kept so tables written by other tools load.
    Unknown,
}

impl Outcome {
    /// Maps a single-letter result token to its outcome.
    pub fn from_token(token: &str) -> Self {
        match token {
            "P" => Outcome::Pass,
            "R" => Outcome::Fail,
            "A" => Outcome::Absent,
            _ => Outcome::Unknown,
        }
    }
}

/// One row per (student, subject).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(rename = "Roll_Number")]
    pub roll_number: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Subject_Code")]
    pub subject_code: String,
    #[serde(rename = "Result")]
    pub result: Outcome,
}

impl ResultRecord {
    pub fn new(roll_number: &str, name: &str, subject_code: &str, result: Outcome) -> Self {
        Self {
            roll_number: roll_number.to_string(),
            name: name.to_string(),
            subject_code: subject_code.to_string(),
            result,
        }
    }
}

/// Ordered sequence of result records. Duplicates are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    records: Vec<ResultRecord>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &COLUMNS
    }

    /// Number of distinct roll numbers present in the table.
    pub fn student_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.roll_number.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

impl From<Vec<ResultRecord>> for ResultTable {
    fn from(records: Vec<ResultRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<ResultRecord> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ResultRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a ResultRecord;
    type IntoIter = std::slice::Iter<'a, ResultRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_token_mapping() {
        assert_eq!(Outcome::from_token("P"), Outcome::Pass);
        assert_eq!(Outcome::from_token("R"), Outcome::Fail);
        assert_eq!(Outcome::from_token("A"), Outcome::Absent);
        assert_eq!(Outcome::from_token("X"), Outcome::Unknown);
        assert_eq!(Outcome::from_token("p"), Outcome::Unknown);
    }

    #[test]
    fn test_student_count_ignores_repeated_rolls() {
        let table: ResultTable = vec![
            ResultRecord::new("2201001", "JOHN DOE", "1234", Outcome::Pass),
            ResultRecord::new("2201001", "JOHN DOE", "5678", Outcome::Fail),
            ResultRecord::new("2201002", "JANE ROE", "1234", Outcome::Absent),
        ]
        .into();
        assert_eq!(table.len(), 3);
        assert_eq!(table.student_count(), 2);
        assert_eq!(table.columns(), &COLUMNS);
    }
}
