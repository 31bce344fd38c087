use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::date::PassbookDate;

/// One logical passbook row, assembled from OCR tokens.
///
/// A single inferred primary amount lands in either `withdrawal_amount` or
/// `deposit_amount`, never both; the trailing numeric slot of a row is
/// always the running `balance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub transaction_date: Option<PassbookDate>,
    pub description: String,
    pub withdrawal_amount: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    pub balance: Option<Decimal>,
    pub confidence: Option<f32>,
}

impl TransactionLine {
    /// A record with no date, no description and no amounts carries no
    /// information and must not be emitted.
    pub fn is_empty(&self) -> bool {
        self.transaction_date.is_none()
            && self.description.is_empty()
            && self.withdrawal_amount.is_none()
            && self.deposit_amount.is_none()
            && self.balance.is_none()
    }
}

/// Document-level result for a bank-deposit passbook: extracted metadata
/// plus the ordered transaction lines. Constructed once per source
/// document; only notes may be appended afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub owner_name: Option<String>,
    pub account_number: Option<String>,
    pub branch_name: Option<String>,
    pub lines: Vec<TransactionLine>,
    pub notes: Vec<String>,
}

impl AssetRecord {
    pub fn new(
        owner_name: Option<String>,
        account_number: Option<String>,
        branch_name: Option<String>,
        lines: Vec<TransactionLine>,
    ) -> Self {
        AssetRecord {
            owner_name,
            account_number,
            branch_name,
            lines,
            notes: Vec::new(),
        }
    }

    pub fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}
