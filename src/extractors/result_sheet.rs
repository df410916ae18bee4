// src/extractors/result_sheet.rs

// --- Imports ---
use crate::records::{Outcome, ResultRecord, ResultTable};
use once_cell::sync::Lazy;
use regex::Regex;

// --- Constants ---
/// A block is read from the roll line plus this many lines in total.
const BLOCK_WINDOW_LINES: usize = 3;

/// Lines containing any of these are page or section headings.
const HEADER_MARKERS: [&str; 2] = ["Course Code:", "Branch Name"];

/// A line containing any of these is taken as the block's result line.
const RESULT_LINE_MARKERS: [&str; 3] = ["P ", "R ", "A "];

const RESULT_TOKENS: [&str; 3] = ["P", "R", "A"];

// --- Token Patterns (Lazy Static) ---
static SUBJECT_CODE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}$").expect("Failed to compile SUBJECT_CODE_RE")
});

static NUMERIC_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]+$").expect("Failed to compile NUMERIC_TOKEN_RE")
});

// --- Data Structures ---
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Return to `Seeking` at every page boundary instead of carrying the
    /// last roll/name over to the next page.
    pub reset_per_page: bool,
}

/// Line-scanner state. Only a roll line moves the scanner into a block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Seeking,
    InBlock { roll_number: String, name: String },
}

/// Outcome of scanning a whole document.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub table: ResultTable,
    pub pages: usize,
    pub blocks_seen: usize,
    /// Roll lines with no result line inside their window.
    pub blocks_dropped: usize,
    pub final_state: ScanState,
}

// --- Main Extractor Structure ---
pub struct ResultSheetExtractor {
    options: ScanOptions,
}

impl ResultSheetExtractor {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Builds the result table from page texts given in reading order.
    /// Blocks that do not match the layout are skipped and only counted.
    pub fn scan(&self, pages: &[String]) -> ScanReport {
        let mut report = ScanReport {
            table: ResultTable::new(),
            pages: pages.len(),
            blocks_seen: 0,
            blocks_dropped: 0,
            final_state: ScanState::Seeking,
        };

        let mut state = ScanState::Seeking;
        for (page_no, page) in pages.iter().enumerate() {
            if self.options.reset_per_page {
                state = ScanState::Seeking;
            } else if let ScanState::InBlock { roll_number, .. } = &state {
                tracing::trace!("Carrying roll {} over into page {}", roll_number, page_no + 1);
            }
            let before = report.table.len();
            state = self.scan_page(page, state, &mut report);
            tracing::debug!("Page {}: {} records", page_no + 1, report.table.len() - before);
        }

        report.final_state = state;
        tracing::info!(
            "Scanned {} pages: {} blocks, {} dropped, {} records",
            report.pages,
            report.blocks_seen,
            report.blocks_dropped,
            report.table.len()
        );
        report
    }

    /// Folds the page's lines through the scanner, appending any records.
    fn scan_page(&self, page: &str, state: ScanState, report: &mut ScanReport) -> ScanState {
        let lines: Vec<&str> = page.split('\n').collect();

        lines.iter().enumerate().fold(state, |state, (i, line)| {
            if is_skippable(line) {
                return state;
            }
            let Some((roll_number, name)) = parse_roll_line(line) else {
                return state;
            };

            report.blocks_seen += 1;
            let window = &lines[i..(i + BLOCK_WINDOW_LINES).min(lines.len())];

            match read_block(window) {
                Some(pairs) => {
                    for (code, result) in pairs {
                        report
                            .table
                            .push(ResultRecord::new(&roll_number, &name, code, result));
                    }
                }
                None => {
                    report.blocks_dropped += 1;
                    tracing::debug!("No result line within window for roll {}", roll_number);
                }
            }

            ScanState::InBlock { roll_number, name }
        })
    }
}

// --- Line Helpers ---

fn is_skippable(line: &str) -> bool {
    line.trim().is_empty() || HEADER_MARKERS.iter().any(|m| line.contains(m))
}

/// Returns the roll token and the name run that follows it, if `line`
/// opens a student block.
fn parse_roll_line(line: &str) -> Option<(String, String)> {
    if !line.trim_start().starts_with('2') {
        return None;
    }
    let mut tokens = line.split_whitespace();
    let roll_number = tokens.next()?.to_string();
    let name = tokens
        .take_while(|t| !NUMERIC_TOKEN_RE.is_match(t))
        .collect::<Vec<_>>()
        .join(" ");
    Some((roll_number, name))
}

/// Pairs subject codes with results for one window. `None` when no line in
/// the window looks like a result line.
fn read_block<'a>(window: &[&'a str]) -> Option<Vec<(&'a str, Outcome)>> {
    let codes: Vec<&str> = window
        .iter()
        .copied()
        .flat_map(|l| l.split_whitespace())
        .filter(|t| SUBJECT_CODE_RE.is_match(t))
        .collect();

    let result_line = window
        .iter()
        .copied()
        .find(|l| RESULT_LINE_MARKERS.iter().any(|m| l.contains(m)))?;

    let results = result_line
        .split_whitespace()
        .filter(|t| RESULT_TOKENS.contains(t))
        .map(Outcome::from_token);

    // Shorter side wins, extras are dropped
    Some(codes.into_iter().zip(results).collect())
}
