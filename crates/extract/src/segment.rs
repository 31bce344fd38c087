use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn re_row_code() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^\d{3}$").expect("invalid regex"))
}

fn re_inline_date() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\d{1,4}[-/]\d{1,2}[-/]\d{1,2}").expect("invalid regex"))
}

/// Which grouping strategy produced the rows. The choice is made once per
/// document; strategies are never mixed within one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStrategy {
    /// Tabular passbooks: an internal 3-digit sequence id starts each row.
    RowCode,
    /// Free-form statements: dates embedded in running text start rows.
    InlineDate,
}

/// One logical transaction row, as grouped by the segmenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// The 3-digit sequence marker, when the row-code strategy matched.
    pub code: Option<String>,
    /// The row's content with line breaks flattened to single spaces.
    pub text: String,
}

impl Row {
    pub fn tokens(&self) -> Vec<&str> {
        self.text.split_whitespace().collect()
    }
}

#[derive(Debug, Clone)]
pub struct SegmentOutcome {
    pub rows: Vec<Row>,
    pub strategy: SegmentStrategy,
}

/// Group normalized lines into logical rows. The row-code strategy is
/// tried first; the inline-date split is the fallback when no coded row
/// with content exists.
pub fn segment_lines(lines: &[String]) -> SegmentOutcome {
    let coded = segment_by_row_code(lines);
    if coded.iter().any(|r| !r.text.is_empty()) {
        return SegmentOutcome {
            rows: coded,
            strategy: SegmentStrategy::RowCode,
        };
    }
    SegmentOutcome {
        rows: segment_by_inline_date(lines),
        strategy: SegmentStrategy::InlineDate,
    }
}

/// Strategy A: a line of exactly 3 digits opens a row and absorbs every
/// following non-marker line. Lines before the first marker are preamble
/// and dropped.
fn segment_by_row_code(lines: &[String]) -> Vec<Row> {
    let mut rows: Vec<Row> = Vec::new();
    let mut current: Option<Row> = None;

    for line in lines {
        let trimmed = line.trim();
        if re_row_code().is_match(trimmed) {
            if let Some(row) = current.take() {
                rows.push(row);
            }
            current = Some(Row {
                code: Some(trimmed.to_string()),
                text: String::new(),
            });
        } else if let Some(row) = current.as_mut() {
            if !trimmed.is_empty() {
                if !row.text.is_empty() {
                    row.text.push(' ');
                }
                row.text.push_str(trimmed);
            }
        }
        // NO_ROW state: nothing matched yet, keep skipping.
    }
    if let Some(row) = current.take() {
        rows.push(row);
    }
    rows
}

/// Strategy B: split the joined document at every loose date token. Text
/// before the first date is preamble; the trailing open row is flushed.
fn segment_by_inline_date(lines: &[String]) -> Vec<Row> {
    let doc = lines
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let starts: Vec<usize> = re_inline_date().find_iter(&doc).map(|m| m.start()).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = starts.get(i + 1).copied().unwrap_or(doc.len());
            Row {
                code: None,
                text: doc[start..end].trim().to_string(),
            }
        })
        .collect()
}
