use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

use tsucho_core::{Era, EraInterpretation};

use crate::banks::{BankCalendar, BankFormatTable};
use crate::resolver::YearResolver;

fn re_compact_date() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(r"^(\d{1,4})[-/](\d{1,2})[-/](\d{1,2})$").expect("invalid regex")
    })
}

/// Which rule of the cascade produced a result. The enum order mirrors the
/// priority order of the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferenceMethod {
    DefiniteGregorian,
    UserConfirmed,
    BankLookup,
    HighProbabilityHeisei,
    ContextBased,
    Default,
}

/// A rejected-but-plausible reading attached to an ambiguous result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub year: i32,
    pub interpretation: EraInterpretation,
}

/// The best guess for one printed date, always produced — ambiguity is
/// communicated through `confidence`, `is_ambiguous` and `alternatives`,
/// never through an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateInferenceResult {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub confidence: f32,
    pub inference_method: InferenceMethod,
    pub is_ambiguous: bool,
    pub original_year_digits: u8,
    pub alternatives: Vec<Alternative>,
}

/// Everything a caller knows about where a printed date came from. Lives
/// for one inference (or batch) call; never persisted.
#[derive(Debug, Clone, Default)]
pub struct DateInferenceContext {
    pub bank_code: Option<String>,
    pub bank_name: Option<String>,
    /// Every printed date of the document as `Y[Y]-M[M]-D[D]` strings, in
    /// reading order. Document-wide, not a sliding window.
    pub surrounding_dates: Vec<String>,
    /// Position of the date being resolved within `surrounding_dates`.
    pub current_index: Option<usize>,
    pub user_confirmed_format: Option<EraInterpretation>,
}

/// The contextual two-digit-year resolver: a priority cascade over
/// magnitude, institution knowledge, learned overrides and surrounding
/// dates. One instance per caller/session — the learned table is
/// deliberately not process-global.
#[derive(Debug, Clone)]
pub struct DateInferenceEngine {
    learned: HashMap<String, EraInterpretation>,
    banks: BankFormatTable,
    current_year: i32,
}

impl Default for DateInferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DateInferenceEngine {
    pub fn new() -> Self {
        DateInferenceEngine {
            learned: HashMap::new(),
            banks: BankFormatTable::default(),
            current_year: chrono::Local::now().year(),
        }
    }

    pub fn with_banks(banks: BankFormatTable) -> Self {
        DateInferenceEngine {
            banks,
            ..Self::new()
        }
    }

    /// Pin the wall-clock year; deterministic cascade behavior for tests.
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Record a user-confirmed interpretation for a bank code. Consulted
    /// before any table lookup on every later call for that code.
    pub fn learn(&mut self, bank_code: impl Into<String>, interpretation: EraInterpretation) {
        self.learned.insert(bank_code.into(), interpretation);
    }

    pub fn learned_format(&self, bank_code: &str) -> Option<EraInterpretation> {
        self.learned.get(bank_code).copied()
    }

    fn current_reiwa_year(&self) -> i32 {
        self.current_year - Era::Reiwa.base_year()
    }

    /// Resolve one printed date. Years ≥ 100 are taken as literal
    /// four-digit years; everything else runs the cascade.
    pub fn infer(
        &self,
        year: u32,
        month: u32,
        day: u32,
        ctx: &DateInferenceContext,
    ) -> DateInferenceResult {
        if year >= 100 {
            return make(
                year as i32,
                month,
                day,
                1.0,
                InferenceMethod::DefiniteGregorian,
                false,
                4,
                vec![],
            );
        }
        let yy = year as i32;

        // 1. Magnitude alone settles it: no era reaches year 32 here.
        if yy >= 32 {
            return make(
                2000 + yy,
                month,
                day,
                1.0,
                InferenceMethod::DefiniteGregorian,
                false,
                2,
                vec![],
            );
        }

        // 2. Explicit confirmation, then institution knowledge.
        if let Some(interp) = ctx.user_confirmed_format {
            return make(
                interp.apply(year),
                month,
                day,
                0.95,
                InferenceMethod::UserConfirmed,
                false,
                2,
                vec![],
            );
        }
        if let Some(result) = self.bank_lookup(year, month, day, ctx) {
            return result;
        }

        // 3. The 8–31 band is overwhelmingly Heisei in passbooks still in
        // circulation; the Gregorian reading rides along as an alternative.
        if (8..=31).contains(&yy) {
            let gregorian = 2000 + yy;
            let mut alternatives = vec![];
            let mut ambiguous = false;
            if calendar_valid(gregorian, month, day) {
                alternatives.push(Alternative {
                    year: gregorian,
                    interpretation: EraInterpretation::Gregorian,
                });
                ambiguous = true;
            }
            return make(
                Era::Heisei.base_year() + yy,
                month,
                day,
                0.85,
                InferenceMethod::HighProbabilityHeisei,
                ambiguous,
                2,
                alternatives,
            );
        }

        // 4. Years 1–7: only neighboring dates can break the Reiwa/Heisei tie.
        if (1..=7).contains(&yy) && !ctx.surrounding_dates.is_empty() {
            if let Some(result) = self.context_lookup(year, month, day, ctx) {
                return result;
            }
        }

        // 5. Default split on the current Reiwa year.
        if yy <= self.current_reiwa_year() {
            let reiwa = Era::Reiwa.base_year() + yy;
            let heisei = Era::Heisei.base_year() + yy;
            let mut alternatives = vec![];
            if calendar_valid(heisei, month, day) {
                alternatives.push(Alternative {
                    year: heisei,
                    interpretation: EraInterpretation::Heisei,
                });
            }
            make(
                reiwa,
                month,
                day,
                0.6,
                InferenceMethod::Default,
                true,
                2,
                alternatives,
            )
        } else {
            make(
                Era::Heisei.base_year() + yy,
                month,
                day,
                0.7,
                InferenceMethod::Default,
                false,
                2,
                vec![],
            )
        }
    }

    /// Batch resolution over `Y[Y]-M[M]-D[D]` strings sharing one context.
    /// Every call sees the entire list as its surrounding dates plus its
    /// own position; unparseable entries yield `None`.
    pub fn infer_batch(
        &self,
        dates: &[String],
        base: &DateInferenceContext,
    ) -> Vec<Option<DateInferenceResult>> {
        dates
            .iter()
            .enumerate()
            .map(|(idx, raw)| {
                let (y, m, d) = parse_compact(raw)?;
                let mut ctx = base.clone();
                ctx.surrounding_dates = dates.to_vec();
                ctx.current_index = Some(idx);
                Some(self.infer(y, m, d, &ctx))
            })
            .collect()
    }

    /// Borrow the engine together with a fixed context as a [`YearResolver`]
    /// for the row pipeline.
    pub fn resolver(&self, ctx: DateInferenceContext) -> ContextualResolver<'_> {
        ContextualResolver { engine: self, ctx }
    }

    fn bank_lookup(
        &self,
        year: u32,
        month: u32,
        day: u32,
        ctx: &DateInferenceContext,
    ) -> Option<DateInferenceResult> {
        if let Some(code) = ctx.bank_code.as_deref() {
            if let Some(interp) = self.learned.get(code) {
                return Some(make(
                    interp.apply(year),
                    month,
                    day,
                    0.95,
                    InferenceMethod::UserConfirmed,
                    false,
                    2,
                    vec![],
                ));
            }
        }

        let calendar = self
            .banks
            .classify(ctx.bank_code.as_deref(), ctx.bank_name.as_deref())?;
        let yy = year as i32;
        match calendar {
            BankCalendar::Western => {
                let gregorian = 2000 + yy;
                calendar_valid(gregorian, month, day).then(|| {
                    make(
                        gregorian,
                        month,
                        day,
                        0.9,
                        InferenceMethod::BankLookup,
                        false,
                        2,
                        vec![],
                    )
                })
            }
            BankCalendar::Wareki => {
                let reiwa = Era::Reiwa.base_year() + yy;
                let heisei = Era::Heisei.base_year() + yy;
                let reiwa_valid = calendar_valid(reiwa, month, day);
                let heisei_valid = calendar_valid(heisei, month, day);
                if yy > self.current_reiwa_year() {
                    // Reiwa hasn't reached this year yet.
                    Some(make(
                        heisei,
                        month,
                        day,
                        0.85,
                        InferenceMethod::BankLookup,
                        false,
                        2,
                        vec![],
                    ))
                } else if reiwa_valid && heisei_valid {
                    Some(make(
                        reiwa,
                        month,
                        day,
                        0.7,
                        InferenceMethod::BankLookup,
                        true,
                        2,
                        vec![Alternative {
                            year: heisei,
                            interpretation: EraInterpretation::Heisei,
                        }],
                    ))
                } else if reiwa_valid || heisei_valid {
                    let year = if reiwa_valid { reiwa } else { heisei };
                    Some(make(
                        year,
                        month,
                        day,
                        0.85,
                        InferenceMethod::BankLookup,
                        false,
                        2,
                        vec![],
                    ))
                } else {
                    None
                }
            }
        }
    }

    fn context_lookup(
        &self,
        year: u32,
        month: u32,
        day: u32,
        ctx: &DateInferenceContext,
    ) -> Option<DateInferenceResult> {
        // Years the surrounding dates pin down without ambiguity.
        let confirmed: Vec<(usize, i32)> = ctx
            .surrounding_dates
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let (y, _, _) = parse_compact(raw)?;
                Some((idx, confident_year(y)?))
            })
            .collect();
        if confirmed.is_empty() {
            return None;
        }

        let lo = confirmed.iter().map(|&(_, y)| y).min()? - 5;
        let hi = confirmed.iter().map(|&(_, y)| y).max()? + 5;
        let yy = year as i32;
        let reiwa = Era::Reiwa.base_year() + yy;
        let heisei = Era::Heisei.base_year() + yy;
        let reiwa_fits = calendar_valid(reiwa, month, day) && (lo..=hi).contains(&reiwa);
        let heisei_fits = calendar_valid(heisei, month, day) && (lo..=hi).contains(&heisei);

        match (reiwa_fits, heisei_fits) {
            (true, true) => {
                // Both fit the window: side with the nearest confirmed year
                // preceding this date in document order.
                let preceding = ctx
                    .current_index
                    .and_then(|idx| {
                        confirmed
                            .iter()
                            .rev()
                            .find(|&&(i, _)| i < idx)
                            .map(|&(_, y)| y)
                    })
                    .or_else(|| confirmed.last().map(|&(_, y)| y))?;
                let (chosen, other, other_interp) =
                    if (reiwa - preceding).abs() <= (heisei - preceding).abs() {
                        (reiwa, heisei, EraInterpretation::Heisei)
                    } else {
                        (heisei, reiwa, EraInterpretation::Reiwa)
                    };
                Some(make(
                    chosen,
                    month,
                    day,
                    0.8,
                    InferenceMethod::ContextBased,
                    true,
                    2,
                    vec![Alternative {
                        year: other,
                        interpretation: other_interp,
                    }],
                ))
            }
            (true, false) => Some(make(
                reiwa,
                month,
                day,
                0.8,
                InferenceMethod::ContextBased,
                false,
                2,
                vec![],
            )),
            (false, true) => Some(make(
                heisei,
                month,
                day,
                0.8,
                InferenceMethod::ContextBased,
                false,
                2,
                vec![],
            )),
            (false, false) => None,
        }
    }
}

impl YearResolver for DateInferenceEngine {
    fn resolve_year(&self, year: u32, month: u32, day: u32) -> Option<i32> {
        Some(self.infer(year, month, day, &DateInferenceContext::default()).year)
    }
}

/// A [`DateInferenceEngine`] paired with a fixed per-document context.
pub struct ContextualResolver<'a> {
    engine: &'a DateInferenceEngine,
    ctx: DateInferenceContext,
}

impl YearResolver for ContextualResolver<'_> {
    fn resolve_year(&self, year: u32, month: u32, day: u32) -> Option<i32> {
        Some(self.engine.infer(year, month, day, &self.ctx).year)
    }
}

fn calendar_valid(year: i32, month: u32, day: u32) -> bool {
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

/// Rules 1 and 3 only — the readings that need no context. Ambiguity in
/// the 1–7 band disqualifies a date from anchoring others.
fn confident_year(year: u32) -> Option<i32> {
    let y = year as i32;
    if y >= 100 {
        Some(y)
    } else if y >= 32 {
        Some(2000 + y)
    } else if y >= 8 {
        Some(Era::Heisei.base_year() + y)
    } else {
        None
    }
}

fn parse_compact(raw: &str) -> Option<(u32, u32, u32)> {
    let caps = re_compact_date().captures(raw.trim())?;
    let y: u32 = caps.get(1)?.as_str().parse().ok()?;
    let m: u32 = caps.get(2)?.as_str().parse().ok()?;
    let d: u32 = caps.get(3)?.as_str().parse().ok()?;
    Some((y, m, d))
}

#[allow(clippy::too_many_arguments)]
fn make(
    year: i32,
    month: u32,
    day: u32,
    confidence: f32,
    inference_method: InferenceMethod,
    is_ambiguous: bool,
    original_year_digits: u8,
    alternatives: Vec<Alternative>,
) -> DateInferenceResult {
    DateInferenceResult {
        year,
        month,
        day,
        confidence,
        inference_method,
        is_ambiguous,
        original_year_digits,
        alternatives,
    }
}
