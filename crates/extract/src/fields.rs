use regex::Regex;
use rust_decimal::Decimal;
use std::sync::OnceLock;

use tsucho_core::{PassbookDate, TransactionLine};

fn re_amount() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"[+-]?\d{1,3}(?:,\d{3})+|[+-]?\d+").expect("invalid regex")
    })
}

fn re_numeric_token() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"^[+-]?[\d,.]+$").expect("invalid regex"))
}

/// Words that mark a row's primary amount as money coming in.
const DEPOSIT_KEYWORDS: &[&str] = &["振込", "入金", "預入", "配当", "振込入金", "定期積金"];

/// OCR misreads of row/column indices produce small stray integers; real
/// passbook amounts and balances are at least two digits.
const NOISE_FLOOR: i64 = 10;

/// Build a transaction line from a row's remainder (date already
/// consumed). Returns `None` for rows carrying no information.
pub fn build_transaction(tokens: &[&str], date: Option<PassbookDate>) -> Option<TransactionLine> {
    let text_tokens: Vec<&str> = tokens
        .iter()
        .copied()
        .filter(|t| !re_numeric_token().is_match(t))
        .collect();
    let description = if text_tokens.is_empty() {
        tokens.join(" ")
    } else {
        text_tokens.join(" ")
    };

    let joined = tokens.join(" ");
    let amounts: Vec<i64> = re_amount()
        .find_iter(&joined)
        .filter_map(|m| m.as_str().replace(',', "").parse::<i64>().ok())
        .filter(|v| v.abs() >= NOISE_FLOOR)
        .collect();

    if date.is_none() && amounts.is_empty() && description.is_empty() {
        return None;
    }

    let balance = amounts.last().map(|&v| Decimal::from(v));
    let mut withdrawal = None;
    let mut deposit = None;
    if amounts.len() >= 2 {
        let primary = amounts[0];
        if primary < 0 {
            withdrawal = Some(Decimal::from(-primary));
        } else if DEPOSIT_KEYWORDS.iter().any(|kw| description.contains(kw)) {
            deposit = Some(Decimal::from(primary));
        } else {
            withdrawal = Some(Decimal::from(primary));
        }
    }

    let confidence = line_confidence(
        date.is_some(),
        balance.is_some(),
        !description.is_empty(),
    );

    Some(TransactionLine {
        transaction_date: date,
        description,
        withdrawal_amount: withdrawal,
        deposit_amount: deposit,
        balance,
        confidence: Some(confidence),
    })
}

/// Weighted presence score: date 0.4, amounts 0.4, description 0.2.
fn line_confidence(has_date: bool, has_amounts: bool, has_description: bool) -> f32 {
    let mut score = 0.0;
    if has_date {
        score += 0.4;
    }
    if has_amounts {
        score += 0.4;
    }
    if has_description {
        score += 0.2;
    }
    score
}
