use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateError {
    #[error("Invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("Unparseable date string: '{0}'")]
    Unparseable(String),
}

/// Japanese calendar eras relevant to passbook printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Era {
    Reiwa,
    Heisei,
    Showa,
}

impl Era {
    /// Offset added to an era year to obtain the Gregorian year
    /// (Reiwa 1 = 2019, Heisei 1 = 1989, Showa 1 = 1926).
    pub fn base_year(self) -> i32 {
        match self {
            Era::Reiwa => 2018,
            Era::Heisei => 1988,
            Era::Showa => 1925,
        }
    }

    pub fn prefix(self) -> char {
        match self {
            Era::Reiwa => 'R',
            Era::Heisei => 'H',
            Era::Showa => 'S',
        }
    }
}

impl fmt::Display for Era {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Era::Reiwa => write!(f, "reiwa"),
            Era::Heisei => write!(f, "heisei"),
            Era::Showa => write!(f, "showa"),
        }
    }
}

impl FromStr for Era {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reiwa" => Ok(Era::Reiwa),
            "heisei" => Ok(Era::Heisei),
            "showa" => Ok(Era::Showa),
            other => Err(format!("Unknown era: '{other}'")),
        }
    }
}

/// How a two-digit year should be read — the closed tag stored in learned
/// bank formats and attached to inference alternatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EraInterpretation {
    Gregorian,
    Reiwa,
    Heisei,
    Showa,
}

impl EraInterpretation {
    /// Expand a two-digit year under this interpretation.
    pub fn apply(self, two_digit_year: u32) -> i32 {
        let y = two_digit_year as i32;
        match self {
            EraInterpretation::Gregorian => 2000 + y,
            EraInterpretation::Reiwa => Era::Reiwa.base_year() + y,
            EraInterpretation::Heisei => Era::Heisei.base_year() + y,
            EraInterpretation::Showa => Era::Showa.base_year() + y,
        }
    }
}

impl fmt::Display for EraInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EraInterpretation::Gregorian => write!(f, "western"),
            EraInterpretation::Reiwa => write!(f, "reiwa"),
            EraInterpretation::Heisei => write!(f, "heisei"),
            EraInterpretation::Showa => write!(f, "showa"),
        }
    }
}

impl FromStr for EraInterpretation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "western" | "gregorian" => Ok(EraInterpretation::Gregorian),
            "reiwa" => Ok(EraInterpretation::Reiwa),
            "heisei" => Ok(EraInterpretation::Heisei),
            "showa" => Ok(EraInterpretation::Showa),
            other => Err(format!("Unknown era interpretation: '{other}'")),
        }
    }
}

/// Free-form date-format hint accepted at the input boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatHint {
    #[default]
    Auto,
    Western,
    Wareki,
}

impl FromStr for FormatHint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(FormatHint::Auto),
            "western" => Ok(FormatHint::Western),
            "wareki" => Ok(FormatHint::Wareki),
            other => Err(format!("Unknown format hint: '{other}'")),
        }
    }
}

/// A strictly validated calendar date as printed in a passbook.
/// Construction rejects impossible day-in-month combinations outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassbookDate(NaiveDate);

impl PassbookDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(PassbookDate)
            .ok_or(DateError::InvalidDate { year, month, day })
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        PassbookDate(date)
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    /// `YYYY-MM-DD`, the display contract consumed by export layers.
    pub fn to_iso_date(self) -> String {
        format!("{:04}-{:02}-{:02}", self.year(), self.month(), self.day())
    }

    /// Era-prefixed display (`R5.03.15`); years before Showa render the
    /// literal Gregorian year.
    pub fn to_wareki_display(self) -> String {
        let y = self.year();
        let era = if y >= 2019 {
            Some(Era::Reiwa)
        } else if y >= 1989 {
            Some(Era::Heisei)
        } else if y >= 1926 {
            Some(Era::Showa)
        } else {
            None
        };
        match era {
            Some(era) => format!(
                "{}{}.{:02}.{:02}",
                era.prefix(),
                y - era.base_year(),
                self.month(),
                self.day()
            ),
            None => format!("{:04}.{:02}.{:02}", y, self.month(), self.day()),
        }
    }
}

impl fmt::Display for PassbookDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_iso_date())
    }
}

impl FromStr for PassbookDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(PassbookDate)
            .map_err(|_| DateError::Unparseable(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_day_in_month() {
        assert!(PassbookDate::new(2021, 2, 29).is_err());
        assert!(PassbookDate::new(2021, 4, 31).is_err());
        assert!(PassbookDate::new(2021, 13, 1).is_err());
    }

    #[test]
    fn new_accepts_leap_day() {
        assert!(PassbookDate::new(2020, 2, 29).is_ok());
    }

    #[test]
    fn iso_round_trip() {
        for (y, m, d) in [(2019, 12, 6), (1996, 6, 15), (2005, 11, 24), (2020, 2, 29)] {
            let date = PassbookDate::new(y, m, d).unwrap();
            let reparsed: PassbookDate = date.to_iso_date().parse().unwrap();
            assert_eq!(reparsed, date);
        }
    }

    #[test]
    fn wareki_display_reiwa() {
        let d = PassbookDate::new(2019, 12, 6).unwrap();
        assert_eq!(d.to_wareki_display(), "R1.12.06");
    }

    #[test]
    fn wareki_display_heisei() {
        let d = PassbookDate::new(2005, 3, 1).unwrap();
        assert_eq!(d.to_wareki_display(), "H17.03.01");
    }

    #[test]
    fn wareki_display_showa() {
        let d = PassbookDate::new(1970, 6, 15).unwrap();
        assert_eq!(d.to_wareki_display(), "S45.06.15");
    }

    #[test]
    fn wareki_display_pre_showa_is_literal() {
        let d = PassbookDate::new(1920, 1, 2).unwrap();
        assert_eq!(d.to_wareki_display(), "1920.01.02");
    }

    #[test]
    fn wareki_boundaries() {
        assert_eq!(PassbookDate::new(1989, 1, 8).unwrap().to_wareki_display(), "H1.01.08");
        assert_eq!(PassbookDate::new(1926, 12, 25).unwrap().to_wareki_display(), "S1.12.25");
    }

    #[test]
    fn interpretation_apply() {
        assert_eq!(EraInterpretation::Gregorian.apply(17), 2017);
        assert_eq!(EraInterpretation::Heisei.apply(17), 2005);
        assert_eq!(EraInterpretation::Reiwa.apply(1), 2019);
        assert_eq!(EraInterpretation::Showa.apply(45), 1970);
    }

    #[test]
    fn interpretation_string_round_trip() {
        for tag in ["western", "reiwa", "heisei", "showa"] {
            let parsed: EraInterpretation = tag.parse().unwrap();
            assert_eq!(parsed.to_string(), tag);
        }
        assert!("taisho".parse::<EraInterpretation>().is_err());
    }

    #[test]
    fn format_hint_parse() {
        assert_eq!("auto".parse::<FormatHint>().unwrap(), FormatHint::Auto);
        assert_eq!("western".parse::<FormatHint>().unwrap(), FormatHint::Western);
        assert_eq!("wareki".parse::<FormatHint>().unwrap(), FormatHint::Wareki);
        assert!("seireki".parse::<FormatHint>().is_err());
    }

    #[test]
    fn date_serde_is_iso_string() {
        let d = PassbookDate::new(2019, 12, 6).unwrap();
        assert_eq!(serde_json::to_string(&d).unwrap(), "\"2019-12-06\"");
    }
}
