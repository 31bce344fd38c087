pub mod date;
pub mod transaction;

pub use date::{DateError, Era, EraInterpretation, FormatHint, PassbookDate};
pub use transaction::{AssetRecord, TransactionLine};
