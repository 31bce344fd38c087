use tsucho_core::{Era, FormatHint};

/// Abstraction over a two-digit-year resolution strategy.
///
/// Two implementations exist: [`SimpleEraTable`] — a fixed boundary table
/// with no outside knowledge, used inside row assembly — and the full
/// [`crate::DateInferenceEngine`], which consults bank tables and
/// surrounding-date context. The row pipeline is generic over this trait so
/// callers with richer metadata can swap the engine in.
pub trait YearResolver {
    /// Resolve a year as printed (two-digit or already four-digit) into a
    /// four-digit Gregorian year. Month and day are provided so contextual
    /// resolvers can reject calendar-impossible readings; returns `None`
    /// when no interpretation is acceptable.
    fn resolve_year(&self, year: u32, month: u32, day: u32) -> Option<i32>;
}

/// The fixed, non-contextual era boundary table:
///
/// - `>= 2000` — already a literal Gregorian year
/// - `32..=64` — Showa (+1925)
/// - `6..=31` — Heisei (+1988)
/// - `1..=5` — Reiwa (+2018)
/// - otherwise — Gregorian 2000 offset
///
/// A `western` hint forces the 2000 offset for two-digit input; `wareki`
/// forces the era mapping (values outside the era bands read as Showa).
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleEraTable {
    pub hint: FormatHint,
}

impl SimpleEraTable {
    pub fn new(hint: FormatHint) -> Self {
        SimpleEraTable { hint }
    }
}

impl YearResolver for SimpleEraTable {
    fn resolve_year(&self, year: u32, _month: u32, _day: u32) -> Option<i32> {
        let y = year as i32;
        if y >= 2000 {
            return Some(y);
        }
        let resolved = match self.hint {
            FormatHint::Western if y < 100 => 2000 + y,
            FormatHint::Wareki if y < 100 => match y {
                6..=31 => Era::Heisei.base_year() + y,
                1..=5 => Era::Reiwa.base_year() + y,
                _ => Era::Showa.base_year() + y,
            },
            _ => match y {
                32..=64 => Era::Showa.base_year() + y,
                6..=31 => Era::Heisei.base_year() + y,
                1..=5 => Era::Reiwa.base_year() + y,
                _ => 2000 + y,
            },
        };
        Some(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto() -> SimpleEraTable {
        SimpleEraTable::default()
    }

    #[test]
    fn literal_four_digit_year_passes_through() {
        assert_eq!(auto().resolve_year(2019, 12, 6), Some(2019));
        assert_eq!(auto().resolve_year(2099, 1, 1), Some(2099));
    }

    #[test]
    fn showa_band() {
        assert_eq!(auto().resolve_year(32, 1, 1), Some(1957));
        assert_eq!(auto().resolve_year(45, 6, 15), Some(1970));
        assert_eq!(auto().resolve_year(64, 1, 7), Some(1989));
    }

    #[test]
    fn heisei_band() {
        assert_eq!(auto().resolve_year(6, 1, 1), Some(1994));
        assert_eq!(auto().resolve_year(17, 11, 24), Some(2005));
        assert_eq!(auto().resolve_year(31, 4, 30), Some(2019));
    }

    #[test]
    fn reiwa_band() {
        assert_eq!(auto().resolve_year(1, 12, 6), Some(2019));
        assert_eq!(auto().resolve_year(5, 3, 15), Some(2023));
    }

    #[test]
    fn zero_and_high_two_digit_fall_to_gregorian() {
        assert_eq!(auto().resolve_year(0, 1, 1), Some(2000));
        assert_eq!(auto().resolve_year(65, 1, 1), Some(2065));
        assert_eq!(auto().resolve_year(99, 12, 31), Some(2099));
    }

    #[test]
    fn western_hint_forces_gregorian() {
        let t = SimpleEraTable::new(FormatHint::Western);
        assert_eq!(t.resolve_year(17, 11, 24), Some(2017));
        assert_eq!(t.resolve_year(1, 12, 6), Some(2001));
        // Literal years are untouched by the hint.
        assert_eq!(t.resolve_year(2005, 1, 1), Some(2005));
    }

    #[test]
    fn wareki_hint_forces_era_mapping() {
        let t = SimpleEraTable::new(FormatHint::Wareki);
        assert_eq!(t.resolve_year(17, 11, 24), Some(2005));
        assert_eq!(t.resolve_year(1, 12, 6), Some(2019));
        assert_eq!(t.resolve_year(45, 6, 15), Some(1970));
        assert_eq!(t.resolve_year(99, 1, 1), Some(2024));
    }
}
