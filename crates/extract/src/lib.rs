pub mod dateparse;
pub mod fields;
pub mod metadata;
pub mod normalize;
pub mod pipeline;
pub mod segment;

pub use dateparse::{CompactDateParser, DateMatch};
pub use fields::build_transaction;
pub use metadata::{extract_account_number, extract_branch, extract_owner};
pub use normalize::normalize_line;
pub use pipeline::{ParseOutcome, ParseStats, PassbookPipeline};
pub use segment::{segment_lines, Row, SegmentOutcome, SegmentStrategy};
