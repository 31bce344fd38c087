use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tsucho_core::{AssetRecord, FormatHint, PassbookDate};
use tsucho_infer::{SimpleEraTable, YearResolver};

use crate::dateparse::CompactDateParser;
use crate::fields::build_transaction;
use crate::metadata;
use crate::normalize::normalize_line;
use crate::segment::{segment_lines, SegmentStrategy};

/// Counters for observing the lossy row contract: rows that fail both
/// date parsing and field building drop silently from the output, and
/// these numbers are the only trace they leave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    pub lines_seen: usize,
    pub rows_seen: usize,
    pub rows_accepted: usize,
    pub strategy: SegmentStrategy,
}

#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub record: AssetRecord,
    pub stats: ParseStats,
}

/// The document pipeline: normalize → segment → per-row date parse +
/// field build → metadata scan → assembled `AssetRecord`.
///
/// Generic over the year-resolution strategy. The default is the static
/// era table; callers holding a bank code or surrounding-date context
/// plug in `DateInferenceEngine::resolver(ctx)` instead.
pub struct PassbookPipeline<R: YearResolver> {
    parser: CompactDateParser<R>,
}

impl Default for PassbookPipeline<SimpleEraTable> {
    fn default() -> Self {
        PassbookPipeline {
            parser: CompactDateParser::default(),
        }
    }
}

impl PassbookPipeline<SimpleEraTable> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hint(hint: FormatHint) -> Self {
        PassbookPipeline {
            parser: CompactDateParser::new(SimpleEraTable::new(hint)),
        }
    }
}

impl<R: YearResolver> PassbookPipeline<R> {
    pub fn with_resolver(resolver: R) -> Self {
        PassbookPipeline {
            parser: CompactDateParser::new(resolver),
        }
    }

    /// Parse one document's OCR lines. Total: every input, however
    /// malformed, produces a (possibly empty) record.
    pub fn parse_document(&self, raw_lines: &[String]) -> ParseOutcome {
        let normalized: Vec<String> = raw_lines.iter().map(|l| normalize_line(l)).collect();

        let segmented = segment_lines(&normalized);
        let rows_seen = segmented.rows.len();

        let mut lines_out = Vec::new();
        for row in &segmented.rows {
            let tokens = row.tokens();
            let (date, remainder): (Option<PassbookDate>, Vec<&str>) =
                match self.parser.extract(&tokens) {
                    Some(m) => (
                        Some(m.date),
                        tokens
                            .iter()
                            .enumerate()
                            .filter(|&(i, _)| i < m.start || i >= m.end)
                            .map(|(_, t)| *t)
                            .collect(),
                    ),
                    None => (None, tokens),
                };
            if let Some(line) = build_transaction(&remainder, date) {
                lines_out.push(line);
            }
        }

        let stats = ParseStats {
            lines_seen: raw_lines.len(),
            rows_seen,
            rows_accepted: lines_out.len(),
            strategy: segmented.strategy,
        };
        debug!(
            lines_seen = stats.lines_seen,
            rows_seen = stats.rows_seen,
            rows_accepted = stats.rows_accepted,
            strategy = ?stats.strategy,
            "assembled passbook document"
        );
        if stats.rows_accepted < stats.rows_seen {
            warn!(
                dropped = stats.rows_seen - stats.rows_accepted,
                "rows dropped during assembly"
            );
        }

        let record = AssetRecord::new(
            metadata::extract_owner(&normalized),
            metadata::extract_account_number(&normalized),
            metadata::extract_branch(&normalized),
            lines_out,
        );
        ParseOutcome { record, stats }
    }
}
