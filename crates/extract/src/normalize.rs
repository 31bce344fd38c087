use regex::Regex;
use std::sync::OnceLock;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

re!(re_whitespace, r"\s+");
re!(re_punct_spacing, r" ?([-:,]) ?");

/// Canonicalize one raw OCR line. Total and idempotent; applied before any
/// structural parsing. Width/compatibility folding is deliberately NOT
/// done — only the artifacts layout OCR actually produces:
///
/// - hyphen/dash variants (−, ―, ー, –, —, ‐) → `-`
/// - full-width slash → `/`
/// - full-width colon/semicolon → `-` (misread date separators)
/// - middle dots and asterisks dropped
/// - whitespace runs collapsed, stray spaces around `-`/`:`/`,` removed
pub fn normalize_line(raw: &str) -> String {
    let mapped: String = raw
        .chars()
        .filter_map(|c| match c {
            '−' | '―' | 'ー' | '–' | '—' | '‐' | '﹣' | '－' => Some('-'),
            '／' => Some('/'),
            '：' | '；' => Some('-'),
            '・' | '･' | '·' => None,
            '*' | '＊' => None,
            _ => Some(c),
        })
        .collect();
    let collapsed = re_whitespace().replace_all(&mapped, " ");
    let tightened = re_punct_spacing().replace_all(&collapsed, "$1");
    tightened.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hyphen_variants_become_ascii() {
        assert_eq!(normalize_line("01−12−06"), "01-12-06");
        assert_eq!(normalize_line("01―12―06"), "01-12-06");
        assert_eq!(normalize_line("01ー12ー06"), "01-12-06");
        assert_eq!(normalize_line("01–12—06"), "01-12-06");
    }

    #[test]
    fn full_width_slash_becomes_ascii() {
        assert_eq!(normalize_line("01／12／06"), "01/12/06");
    }

    #[test]
    fn full_width_colon_semicolon_become_hyphen() {
        assert_eq!(normalize_line("01：12；06"), "01-12-06");
    }

    #[test]
    fn middle_dots_and_asterisks_dropped() {
        assert_eq!(normalize_line("カ）タナカ・ショウジ"), "カ）タナカショウジ");
        assert_eq!(normalize_line("**繰越**"), "繰越");
        assert_eq!(normalize_line("＊残高＊"), "残高");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(normalize_line("振込　　入金   10,000"), "振込 入金 10,000");
    }

    #[test]
    fn spaces_around_punctuation_removed() {
        assert_eq!(normalize_line("01 - 12 - 06"), "01-12-06");
        assert_eq!(normalize_line("10 , 000"), "10,000");
        assert_eq!(normalize_line("12 : 34"), "12:34");
    }

    #[test]
    fn idempotent() {
        for raw in [
            "01−12−06",
            "振込　　入金   10,000",
            "01 - 12 - 06",
            "＊サンプル＊・テスト：１２３",
            "",
        ] {
            let once = normalize_line(raw);
            assert_eq!(normalize_line(&once), once);
        }
    }

    #[test]
    fn empty_and_blank_lines_are_empty() {
        assert_eq!(normalize_line(""), "");
        assert_eq!(normalize_line("   　  "), "");
    }
}
