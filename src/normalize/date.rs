//! Numeric dates and clock times.
//!
//! `12/18/2013` → "December eighteenth, two thousand thirteen".  Field order
//! for ambiguous dates follows a fixed heuristic: a first field with three or
//! more digits, or a value above 31, is the year (`YYYY-MM-DD`); otherwise
//! the year is last, a value above 12 must be the day, and when both leading
//! fields could be a month the configured `field_order` decides.

use fancy_regex::Regex;
use once_cell::sync::Lazy;

use crate::config::{DateProcessing, DateStyle, EffectiveConfiguration, FieldOrder};
use crate::error::NormalizeError;
use crate::normalize::{Category, Normalize, Outcome, SpanContext};
use crate::numbers::{cardinal, ordinal, year_to_words};
use crate::rules::{NormalizationRule, RuleInput, RulePattern, RuleSet};
use crate::segment::TextSpan;
use crate::tables::MONTHS;

// ─────────────────────────────────────────────────────────────────────────────
// Dates
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: u32,
    pub month: u32,
    pub day: u32,
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

fn expand_year(field: &str, pivot: u32) -> Option<u32> {
    let value: u32 = field.parse().ok()?;
    match field.len() {
        2 if value < pivot => Some(2000 + value),
        2 => Some(1900 + value),
        4 => Some(value),
        _ => None,
    }
}

/// Parse `MM/DD/YYYY`, `DD/MM/YY`, `YYYY-MM-DD` and friends.
///
/// Returns `None` for anything that is not a real calendar day.
pub fn parse_date(text: &str, settings: &DateProcessing) -> Option<CalendarDate> {
    let sep = text.chars().find(|c| *c == '/' || *c == '-')?;
    let fields: Vec<&str> = text.split(sep).collect();
    let [a, b, c] = fields.as_slice() else {
        return None;
    };
    if [a, b, c].iter().any(|f| f.is_empty() || !f.bytes().all(|ch| ch.is_ascii_digit())) {
        return None;
    }
    let first: u32 = a.parse().ok()?;
    let second: u32 = b.parse().ok()?;
    let third: u32 = c.parse().ok()?;

    let date = if a.len() >= 3 || first > 31 {
        CalendarDate {
            year: expand_year(a, settings.two_digit_year_pivot)?,
            month: second,
            day: third,
        }
    } else {
        let year = expand_year(c, settings.two_digit_year_pivot)?;
        let (month, day) = if first > 12 {
            (second, first)
        } else if second > 12 {
            (first, second)
        } else {
            match settings.field_order {
                FieldOrder::MonthFirst => (first, second),
                FieldOrder::DayFirst => (second, first),
            }
        };
        CalendarDate { year, month, day }
    };

    let valid = (1..=12).contains(&date.month) && (1..=days_in_month(date.year, date.month)).contains(&date.day);
    valid.then_some(date)
}

/// Whether `text` reads as a real date under the default settings.
pub fn is_plausible_date(text: &str) -> bool {
    parse_date(text, &DateProcessing::default()).is_some()
}

fn spoken_year(year: u32, config: &EffectiveConfiguration) -> String {
    if config.number_processing.years_as_pairs {
        year_to_words(year)
    } else {
        cardinal(year as u64)
    }
}

impl CalendarDate {
    pub fn spoken(&self, config: &EffectiveConfiguration) -> String {
        let month = MONTHS[(self.month - 1) as usize];
        let day = ordinal(self.day as u64);
        let year = spoken_year(self.year, config);
        match config.date_processing.style {
            DateStyle::MonthDayYear => format!("{} {}, {}", month, day, year),
            DateStyle::DayMonthYear => format!("the {} of {}, {}", day, month, year),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Times
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub second: Option<u32>,
    pub meridiem: Option<Meridiem>,
}

/// Parse `3:30`, `3:05 pm`, `5pm`, `5 p.m.`, `14:00:30`.
pub fn parse_time(text: &str) -> Option<ClockTime> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let (clock, meridiem) = if let Some(rest) = compact.strip_suffix("am") {
        (rest, Some(Meridiem::Am))
    } else if let Some(rest) = compact.strip_suffix("pm") {
        (rest, Some(Meridiem::Pm))
    } else {
        (compact.as_str(), None)
    };

    let mut parts = clock.split(':');
    let hour_field = parts.next()?;
    let minute_field = parts.next();
    let second_field = parts.next();
    if parts.next().is_some() || (minute_field.is_none() && meridiem.is_none()) {
        return None;
    }

    let two_digits = |f: &str| (f.len() == 2).then(|| f.parse::<u32>().ok()).flatten();
    if hour_field.is_empty() || hour_field.len() > 2 {
        return None;
    }
    let hour: u32 = hour_field.parse().ok()?;
    let minute = match minute_field {
        Some(f) => two_digits(f)?,
        None => 0,
    };
    let second = match second_field {
        Some(f) => Some(two_digits(f)?),
        None => None,
    };

    let hour_ok = match meridiem {
        Some(_) => (1..=12).contains(&hour),
        None => hour <= 23,
    };
    (hour_ok && minute < 60 && second.map_or(true, |s| s < 60)).then_some(ClockTime {
        hour,
        minute,
        second,
        meridiem,
    })
}

impl ClockTime {
    pub fn spoken(&self) -> String {
        let twenty_four_hour = self.meridiem.is_none() && (self.hour == 0 || self.hour > 12);
        let hour = cardinal(self.hour as u64);
        let mut out = match self.minute {
            0 if twenty_four_hour => format!("{} hundred", hour),
            0 if self.meridiem.is_none() => format!("{} o'clock", hour),
            0 => hour,
            1..=9 => format!("{} oh {}", hour, cardinal(self.minute as u64)),
            _ => format!("{} {}", hour, cardinal(self.minute as u64)),
        };
        if let Some(s) = self.second.filter(|s| *s > 0) {
            let unit = if s == 1 { "second" } else { "seconds" };
            out.push_str(&format!(" and {} {}", cardinal(s as u64), unit));
        }
        match self.meridiem {
            Some(Meridiem::Am) => out.push_str(" a m"),
            Some(Meridiem::Pm) => out.push_str(" p m"),
            None => {}
        }
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rules
// ─────────────────────────────────────────────────────────────────────────────

static RE_ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap());

static RE_NUMERIC_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,4}([/-])\d{1,2}\1\d{1,4}$").unwrap());

fn render_date(input: &RuleInput<'_>) -> Option<String> {
    let date = parse_date(input.text, &input.config.date_processing)?;
    Some(date.spoken(input.config))
}

fn render_time(input: &RuleInput<'_>) -> Option<String> {
    parse_time(input.text).map(|t| t.spoken())
}

fn is_time(text: &str) -> bool {
    parse_time(text).is_some()
}

pub struct DateNormalizer {
    rules: RuleSet,
}

impl DateNormalizer {
    pub fn new() -> Self {
        let c = Category::Date;
        Self {
            rules: RuleSet::new(
                c,
                vec![
                    NormalizationRule::new("iso-date", c, 0, RulePattern::Regex(&RE_ISO_DATE), render_date),
                    NormalizationRule::new("numeric-date", c, 10, RulePattern::Regex(&RE_NUMERIC_DATE), render_date),
                    NormalizationRule::new("clock-time", c, 20, RulePattern::Predicate(is_time), render_time)
                        .when(|c| c.date_processing.times),
                ],
            ),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for DateNormalizer {
    fn category(&self) -> Category {
        Category::Date
    }

    fn normalize(
        &self,
        span: &TextSpan<'_>,
        config: &EffectiveConfiguration,
        context: &SpanContext<'_>,
    ) -> Result<Outcome, NormalizeError> {
        self.rules.apply(span.text, config, context)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::tests::render;

    fn say(text: &str, target: &str, config: &EffectiveConfiguration) -> String {
        render(&DateNormalizer::new(), text, target, config)
    }

    #[test]
    fn test_month_day_year() {
        let config = EffectiveConfiguration::default();
        assert_eq!(
            say("on 12/18/2013.", "12/18/2013", &config),
            "December eighteenth, two thousand thirteen"
        );
    }

    #[test]
    fn test_iso_date() {
        let config = EffectiveConfiguration::default();
        let out = say("2023-05-12", "2023-05-12", &config);
        assert_eq!(out, "May twelfth, twenty twenty-three");
    }

    #[test]
    fn test_ambiguous_order_follows_config() {
        let mut config = EffectiveConfiguration::default();
        assert_eq!(say("05/06/19", "05/06/19", &config), "May sixth, two thousand nineteen");
        config.date_processing.field_order = FieldOrder::DayFirst;
        assert_eq!(say("05/06/19", "05/06/19", &config), "June fifth, two thousand nineteen");
        // 25 cannot be a month, whatever the configured order
        assert_eq!(say("25/12/99", "25/12/99", &config), "December twenty-fifth, nineteen ninety-nine");
    }

    #[test]
    fn test_day_month_year_style() {
        let mut config = EffectiveConfiguration::default();
        config.date_processing.style = DateStyle::DayMonthYear;
        assert_eq!(
            say("12/21/2001", "12/21/2001", &config),
            "the twenty-first of December, two thousand one"
        );
    }

    #[test]
    fn test_two_digit_year_pivot() {
        let settings = DateProcessing::default();
        assert_eq!(parse_date("1/2/49", &settings).map(|d| d.year), Some(2049));
        assert_eq!(parse_date("1/2/50", &settings).map(|d| d.year), Some(1950));
        assert_eq!(parse_date("99/12/31", &settings).map(|d| (d.year, d.month, d.day)), Some((1999, 12, 31)));
    }

    #[test]
    fn test_invalid_dates_rejected() {
        assert!(is_plausible_date("02/29/2020"));
        assert!(!is_plausible_date("02/29/2021"));
        assert!(!is_plausible_date("13/13/2020"));
        assert!(!is_plausible_date("04/31/2020"));
        assert!(!is_plausible_date("1/2/123"));
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(
            parse_time("3:05 p.m."),
            Some(ClockTime { hour: 3, minute: 5, second: None, meridiem: Some(Meridiem::Pm) })
        );
        assert!(parse_time("13pm").is_none());
        assert!(parse_time("24:00").is_none());
        assert!(parse_time("7:60").is_none());
        assert!(parse_time("7").is_none());
    }

    #[test]
    fn test_time_rendering() {
        let config = EffectiveConfiguration::default();
        assert_eq!(say("at 3:30 pm", "3:30 pm", &config), "three thirty p m");
        assert_eq!(say("at 3:05", "3:05", &config), "three oh five");
        assert_eq!(say("at 3:00", "3:00", &config), "three o'clock");
        assert_eq!(say("at 5pm", "5pm", &config), "five p m");
        assert_eq!(say("at 14:00", "14:00", &config), "fourteen hundred");
        assert_eq!(say("at 9:15:01", "9:15:01", &config), "nine fifteen and one second");
    }

    #[test]
    fn test_times_toggle() {
        let mut config = EffectiveConfiguration::default();
        config.date_processing.times = false;
        assert_eq!(say("at 3:30 pm", "3:30 pm", &config), "3:30 pm");
        assert_eq!(DateNormalizer::new().rules().ids(), vec!["iso-date", "numeric-date", "clock-time"]);
    }
}
