use regex::Regex;
use std::sync::OnceLock;

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Kana/kanji stems may contain `-` after normalization (prolonged sound
// marks are folded into hyphens upstream).
re!(re_branch, r"([\p{Han}\p{Hiragana}\p{Katakana}A-Za-z0-9\-]+)支店");
re!(re_owner_sama, r"([\p{Han}\p{Hiragana}\p{Katakana}A-Za-z\- ]+?)\s*サマ");
re!(re_placeholder, r"^[-=＝#＃※]+$");

/// Tokens that label a line rather than carry a value; never returned as
/// an extracted name.
const OWNER_SKIP_TOKENS: &[&str] = &["氏名", "名義人", "フリガナ", "カナ", "御中"];
const OWNER_LABELS: &[&str] = &["非会員", "氏名", "名義人"];
const ACCOUNT_LABELS: &[&str] = &["口座番号", "店番号", "座番号"];

/// Lines ahead of a label that may still carry its value.
const LABEL_WINDOW: usize = 5;

fn is_placeholder(s: &str) -> bool {
    s.is_empty() || re_placeholder().is_match(s)
}

fn is_numeric_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == ',' || c == ' ')
}

// ── Branch name ──────────────────────────────────────────────────────────────

/// Best-effort branch-name scan. Fallback chain: inline `◯◯支店` stem →
/// suffix-stripped `支店` line → backward walk over prior lines for a
/// plausible stem. Absence is a normal outcome.
pub fn extract_branch(lines: &[String]) -> Option<String> {
    for line in lines {
        if let Some(caps) = re_branch().captures(line) {
            let stem = caps.get(1)?.as_str();
            if !is_placeholder(stem) && !is_numeric_only(stem) {
                return Some(stem.to_string());
            }
        }
    }

    for (idx, line) in lines.iter().enumerate() {
        if !line.contains("支店") {
            continue;
        }
        let stem = line.replace("支店", "").trim().to_string();
        if !is_placeholder(&stem) && !is_numeric_only(&stem) {
            return Some(stem);
        }
        // The suffix sat alone on its line: the stem is usually the last
        // meaningful line above it.
        for prior in lines[..idx].iter().rev() {
            let prior = prior.trim();
            if is_placeholder(prior) || is_numeric_only(prior) {
                continue;
            }
            return Some(prior.to_string());
        }
    }
    None
}

// ── Account number ───────────────────────────────────────────────────────────

/// 6–10 digit run near an account label, preferring 7–8 digits, then the
/// longest candidate; falls back to the first such run anywhere.
pub fn extract_account_number(lines: &[String]) -> Option<String> {
    let mut candidates: Vec<String> = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        if !ACCOUNT_LABELS.iter().any(|label| line.contains(label)) {
            continue;
        }
        let window_end = (idx + LABEL_WINDOW + 1).min(lines.len());
        for near in &lines[idx..window_end] {
            candidates.extend(
                digit_runs(near)
                    .into_iter()
                    .filter(|r| (6..=10).contains(&r.len()))
                    .map(str::to_string),
            );
        }
    }

    if let Some(preferred) = candidates
        .iter()
        .find(|c| c.len() == 7 || c.len() == 8)
    {
        return Some(preferred.clone());
    }
    if let Some(longest) = candidates.iter().max_by_key(|c| c.len()) {
        return Some(longest.clone());
    }

    // No labels anywhere: first plausible run in the document.
    lines.iter().find_map(|line| {
        digit_runs(line)
            .into_iter()
            .find(|r| (6..=10).contains(&r.len()))
            .map(str::to_string)
    })
}

// ── Owner name ───────────────────────────────────────────────────────────────

/// Owner-name scan: `◯◯サマ` regex and a longest-honorific-suffix sweep
/// (the sweep wins at equal length), then a label-window fallback.
pub fn extract_owner(lines: &[String]) -> Option<String> {
    let regex_hit: Option<String> = lines.iter().find_map(|line| {
        re_owner_sama()
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    });

    let suffix_hit: Option<String> = lines
        .iter()
        .filter_map(|line| {
            let line = line.trim();
            ["様", "サマ", "さま"]
                .iter()
                .find_map(|suffix| line.strip_suffix(suffix))
                .map(|s| s.trim().to_string())
        })
        .filter(|s| !s.is_empty() && !is_numeric_only(s))
        .max_by_key(|s| s.chars().count());

    match (regex_hit, suffix_hit) {
        (Some(r), Some(s)) => Some(if s.chars().count() >= r.chars().count() { s } else { r }),
        (Some(r), None) => Some(r),
        (None, Some(s)) => Some(s),
        (None, None) => owner_from_labels(lines),
    }
}

fn owner_from_labels(lines: &[String]) -> Option<String> {
    for (idx, line) in lines.iter().enumerate() {
        if !OWNER_LABELS.iter().any(|label| line.contains(label)) {
            continue;
        }
        let window_end = (idx + LABEL_WINDOW + 1).min(lines.len());
        for near in &lines[idx + 1..window_end] {
            let near = near.trim();
            if near.is_empty()
                || is_numeric_only(near)
                || is_placeholder(near)
                || OWNER_SKIP_TOKENS.iter().any(|t| near == *t)
            {
                continue;
            }
            return Some(near.to_string());
        }
    }
    None
}

fn digit_runs(line: &str) -> Vec<&str> {
    line.split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── Branch ────────────────────────────────────────────────────────────────

    #[test]
    fn branch_inline_stem() {
        let l = lines(&["みずほ銀行", "渋谷支店", "普通預金"]);
        assert_eq!(extract_branch(&l).as_deref(), Some("渋谷"));
    }

    #[test]
    fn branch_stem_with_hyphen_from_normalization() {
        let l = lines(&["ニュ-タウン支店"]);
        assert_eq!(extract_branch(&l).as_deref(), Some("ニュ-タウン"));
    }

    #[test]
    fn branch_backward_walk_over_fillers() {
        let l = lines(&["本店営業部", "1234", "---", "支店"]);
        assert_eq!(extract_branch(&l).as_deref(), Some("本店営業部"));
    }

    #[test]
    fn branch_absent() {
        let l = lines(&["普通預金", "残高 500,000"]);
        assert_eq!(extract_branch(&l), None);
    }

    // ── Account number ────────────────────────────────────────────────────────

    #[test]
    fn account_prefers_seven_or_eight_digits_near_label() {
        let l = lines(&["口座番号", "123456", "7654321"]);
        assert_eq!(extract_account_number(&l).as_deref(), Some("7654321"));
    }

    #[test]
    fn account_takes_longest_without_preferred_length() {
        let l = lines(&["店番号 123456 1234567890"]);
        assert_eq!(extract_account_number(&l).as_deref(), Some("1234567890"));
    }

    #[test]
    fn account_label_window_is_bounded() {
        // 98765432 sits outside the 5-line lookahead, so the window yields
        // nothing and the document-wide fallback picks the first run.
        let l = lines(&["123456", "口座番号", "a", "b", "c", "d", "e", "98765432"]);
        assert_eq!(extract_account_number(&l).as_deref(), Some("123456"));
    }

    #[test]
    fn account_fallback_without_label() {
        let l = lines(&["普通預金", "No. 1234567"]);
        assert_eq!(extract_account_number(&l).as_deref(), Some("1234567"));
    }

    #[test]
    fn account_absent() {
        let l = lines(&["普通預金", "残高 500"]);
        assert_eq!(extract_account_number(&l), None);
    }

    // ── Owner ─────────────────────────────────────────────────────────────────

    #[test]
    fn owner_sama_regex() {
        let l = lines(&["タナカ タロウ サマ"]);
        assert_eq!(extract_owner(&l).as_deref(), Some("タナカ タロウ"));
    }

    #[test]
    fn owner_kanji_sama_suffix() {
        let l = lines(&["田中 太郎 様", "普通預金"]);
        assert_eq!(extract_owner(&l).as_deref(), Some("田中 太郎"));
    }

    #[test]
    fn owner_longest_suffix_candidate_wins() {
        let l = lines(&["タナカ サマ", "タナカ タロウ 様"]);
        assert_eq!(extract_owner(&l).as_deref(), Some("タナカ タロウ"));
    }

    #[test]
    fn owner_label_fallback() {
        let l = lines(&["氏名", "フリガナ", "田中太郎", "口座番号 1234567"]);
        assert_eq!(extract_owner(&l).as_deref(), Some("田中太郎"));
    }

    #[test]
    fn owner_hikaiin_marker_fallback() {
        let l = lines(&["非会員", "123", "山田花子"]);
        assert_eq!(extract_owner(&l).as_deref(), Some("山田花子"));
    }

    #[test]
    fn owner_absent() {
        let l = lines(&["普通預金", "残高 500,000"]);
        assert_eq!(extract_owner(&l), None);
    }
}
