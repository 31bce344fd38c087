use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which calendar a given institution prints in its passbooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankCalendar {
    Western,
    Wareki,
}

/// Institution conventions for two-digit years, built in. Metropolitan
/// net-first banks print Gregorian; the postal bank, credit unions and
/// agricultural co-ops keep wareki.
const DEFAULT_BANKS: &[(&str, &str, BankCalendar)] = &[
    ("0001", "みずほ銀行", BankCalendar::Western),
    ("0009", "三井住友銀行", BankCalendar::Western),
    ("0010", "りそな銀行", BankCalendar::Western),
    ("0033", "PayPay銀行", BankCalendar::Western),
    ("0036", "楽天銀行", BankCalendar::Western),
    ("2952", "セブン銀行", BankCalendar::Western),
    ("0005", "三菱UFJ銀行", BankCalendar::Wareki),
    ("9900", "ゆうちょ銀行", BankCalendar::Wareki),
    ("1311", "多摩信用金庫", BankCalendar::Wareki),
    ("1333", "城南信用金庫", BankCalendar::Wareki),
];

/// Bank-name substrings that settle the calendar when only a display name
/// is available.
const WESTERN_NAME_MARKERS: &[&str] = &["ネット銀行", "楽天", "PayPay"];
const WAREKI_NAME_MARKERS: &[&str] = &["ゆうちょ", "信用金庫", "信用組合", "農業協同組合", "JA"];

#[derive(Debug, Deserialize)]
struct BankEntry {
    code: String,
    #[serde(default)]
    name: Option<String>,
    calendar: BankCalendar,
}

#[derive(Debug, Deserialize)]
struct BankFile {
    banks: Vec<BankEntry>,
}

/// Lookup table from institution to printed calendar. Codes are exact
/// 4-character matches; names fall back to substring markers.
#[derive(Debug, Clone)]
pub struct BankFormatTable {
    by_code: HashMap<String, BankCalendar>,
    by_name: Vec<(String, BankCalendar)>,
}

impl Default for BankFormatTable {
    fn default() -> Self {
        let by_code = DEFAULT_BANKS
            .iter()
            .map(|(code, _, cal)| (code.to_string(), *cal))
            .collect();
        let mut by_name: Vec<(String, BankCalendar)> = DEFAULT_BANKS
            .iter()
            .map(|(_, name, cal)| (name.to_string(), *cal))
            .collect();
        by_name.extend(
            WESTERN_NAME_MARKERS
                .iter()
                .map(|m| (m.to_string(), BankCalendar::Western)),
        );
        by_name.extend(
            WAREKI_NAME_MARKERS
                .iter()
                .map(|m| (m.to_string(), BankCalendar::Wareki)),
        );
        BankFormatTable { by_code, by_name }
    }
}

impl BankFormatTable {
    /// Load a site-specific table:
    ///
    /// ```toml
    /// [[banks]]
    /// code = "0123"
    /// name = "〇〇銀行"
    /// calendar = "wareki"
    /// ```
    pub fn from_toml(toml_content: &str) -> Result<Self, String> {
        let file: BankFile =
            toml::from_str(toml_content).map_err(|e| format!("Failed to parse bank table: {e}"))?;
        let mut table = BankFormatTable {
            by_code: HashMap::new(),
            by_name: Vec::new(),
        };
        for entry in file.banks {
            table.by_code.insert(entry.code, entry.calendar);
            if let Some(name) = entry.name {
                table.by_name.push((name, entry.calendar));
            }
        }
        Ok(table)
    }

    /// Decide the calendar for an institution. The code match wins; a name
    /// is only consulted when the code is absent or unknown.
    pub fn classify(&self, code: Option<&str>, name: Option<&str>) -> Option<BankCalendar> {
        if let Some(code) = code {
            if let Some(cal) = self.by_code.get(code) {
                return Some(*cal);
            }
        }
        let name = name?;
        self.by_name
            .iter()
            .find(|(marker, _)| name.contains(marker.as_str()))
            .map(|(_, cal)| *cal)
    }
}
