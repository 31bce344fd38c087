use tsucho_core::PassbookDate;
use tsucho_infer::{SimpleEraTable, YearResolver};

/// Year/month digit-length splits, tried left to right. The day takes
/// whatever remains (1–2 digits).
const SPLIT_ORDER: &[(usize, usize)] = &[(4, 2), (4, 1), (3, 2), (3, 1), (2, 2), (2, 1)];

/// Resolved years outside this range are split artifacts (digit runs from
/// amounts), never dates.
const YEAR_MIN: i32 = 1900;
const YEAR_MAX: i32 = 2100;

/// A date found inside a row, with the half-open token range it consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateMatch {
    pub date: PassbookDate,
    pub start: usize,
    pub end: usize,
}

/// Extracts a calendar date from the digit clusters of a row.
///
/// Digit groups are accumulated across adjacent tokens until at least 3
/// groups or 6 digits are collected — short numeric tokens alone never
/// trigger a parse. Generic over the year-resolution strategy; row
/// assembly defaults to the static era table.
pub struct CompactDateParser<R: YearResolver> {
    resolver: R,
}

impl Default for CompactDateParser<SimpleEraTable> {
    fn default() -> Self {
        CompactDateParser {
            resolver: SimpleEraTable::default(),
        }
    }
}

impl<R: YearResolver> CompactDateParser<R> {
    pub fn new(resolver: R) -> Self {
        CompactDateParser { resolver }
    }

    /// Find the first parseable date in `tokens`. Returns `None` when no
    /// digit cluster yields a valid calendar date — the caller decides
    /// what a dateless row means.
    pub fn extract(&self, tokens: &[&str]) -> Option<DateMatch> {
        let mut start = 0;
        while start < tokens.len() {
            if digit_runs(tokens[start]).is_empty() {
                start += 1;
                continue;
            }
            if let Some(m) = self.extract_cluster(tokens, start) {
                return Some(m);
            }
            start += 1;
        }
        None
    }

    /// Accumulate digit groups from the cluster of digit-bearing tokens
    /// beginning at `start`, attempting a split after each new group once
    /// the thresholds are met.
    fn extract_cluster(&self, tokens: &[&str], start: usize) -> Option<DateMatch> {
        let mut digits = String::new();
        let mut groups = 0;

        for (i, token) in tokens.iter().enumerate().skip(start) {
            let runs = digit_runs(token);
            if runs.is_empty() {
                break;
            }
            for run in runs {
                digits.push_str(run);
                groups += 1;
                if groups >= 3 || digits.len() >= 6 {
                    if let Some(date) = self.try_splits(&digits) {
                        return Some(DateMatch {
                            date,
                            start,
                            end: i + 1,
                        });
                    }
                }
            }
            // Longer than any year+month+day layout: this cluster is not a date.
            if digits.len() > 8 {
                break;
            }
        }
        None
    }

    fn try_splits(&self, digits: &str) -> Option<PassbookDate> {
        for &(year_len, month_len) in SPLIT_ORDER {
            let day_len = digits.len().checked_sub(year_len + month_len)?;
            if !(1..=2).contains(&day_len) {
                continue;
            }
            let year_str = &digits[..year_len];
            // A year group longer than two digits never starts with zero;
            // "011206" must split as 01|12|06, not 011|2|06.
            if year_len > 2 && year_str.starts_with('0') {
                continue;
            }
            let year: u32 = match year_str.parse() {
                Ok(y) => y,
                Err(_) => continue,
            };
            let month: u32 = match digits[year_len..year_len + month_len].parse() {
                Ok(m) => m,
                Err(_) => continue,
            };
            let day: u32 = match digits[year_len + month_len..].parse() {
                Ok(d) => d,
                Err(_) => continue,
            };
            if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                continue;
            }
            let Some(resolved) = self.resolver.resolve_year(year, month, day) else {
                continue;
            };
            if !(YEAR_MIN..=YEAR_MAX).contains(&resolved) {
                continue;
            }
            if let Ok(date) = PassbookDate::new(resolved, month, day) {
                return Some(date);
            }
        }
        None
    }
}

/// Maximal runs of ASCII digits within a token.
fn digit_runs(token: &str) -> Vec<&str> {
    token
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CompactDateParser<SimpleEraTable> {
        CompactDateParser::default()
    }

    fn date_of(tokens: &[&str]) -> Option<String> {
        parser()
            .extract(tokens)
            .map(|m| m.date.to_iso_date())
    }

    #[test]
    fn hyphenated_two_digit_date() {
        let m = parser().extract(&["01-12-06", "振込", "10,000"]).unwrap();
        assert_eq!(m.date.to_iso_date(), "2019-12-06");
        assert_eq!((m.start, m.end), (0, 1));
    }

    #[test]
    fn four_digit_year_date() {
        assert_eq!(date_of(&["2019-12-06"]), Some("2019-12-06".to_string()));
        assert_eq!(date_of(&["2019/12/06"]), Some("2019-12-06".to_string()));
    }

    #[test]
    fn heisei_two_digit_date() {
        assert_eq!(date_of(&["17-11-24"]), Some("2005-11-24".to_string()));
    }

    #[test]
    fn showa_band_date() {
        assert_eq!(date_of(&["45-06-15"]), Some("1970-06-15".to_string()));
    }

    #[test]
    fn groups_split_across_tokens() {
        assert_eq!(date_of(&["01", "12", "06"]), Some("2019-12-06".to_string()));
    }

    #[test]
    fn leading_text_tokens_are_skipped_not_consumed() {
        let m = parser().extract(&["繰越", "01-12-06", "500"]).unwrap();
        assert_eq!(m.date.to_iso_date(), "2019-12-06");
        assert_eq!((m.start, m.end), (1, 2));
    }

    #[test]
    fn short_numeric_tokens_alone_do_not_parse() {
        assert_eq!(date_of(&["45"]), None);
        assert_eq!(date_of(&["1", "2"]), None);
    }

    #[test]
    fn amounts_are_not_mistaken_for_dates() {
        assert_eq!(date_of(&["1,234", "567"]), None);
        assert_eq!(date_of(&["10,000", "500,000"]), None);
    }

    #[test]
    fn invalid_calendar_dates_try_other_splits_then_fail() {
        // Feb 30 is invalid under every split.
        assert_eq!(date_of(&["01-02-30"]), None);
    }

    #[test]
    fn leap_day_requires_leap_year() {
        // Reiwa 2 = 2020 is a leap year.
        assert_eq!(date_of(&["02-02-29"]), Some("2020-02-29".to_string()));
        // Heisei 11 = 1999 is not, and neither reading validates.
        assert_eq!(date_of(&["11-02-29"]), None);
    }

    #[test]
    fn no_digits_no_date() {
        assert_eq!(date_of(&["振込", "入金"]), None);
        assert_eq!(date_of(&[]), None);
    }
}
