//! Number literals → words.
//!
//! Handles cardinals with grouping commas, decimals ("point" plus digits),
//! negatives, ordinals, fractions, decades, years, phone numbers, IP
//! addresses, dotted versions, units, percentages and K/M/B/T scales.
//! Strings that look like identifiers rather than quantities (leading
//! zeros, very long digit runs) are read digit by digit.

use fancy_regex::Regex;
use once_cell::sync::Lazy;

use crate::config::EffectiveConfiguration;
use crate::error::NormalizeError;
use crate::normalize::{is_month_name, Category, Normalize, Outcome, SpanContext};
use crate::numbers::{cardinal, decimal_to_words, digits_to_words, ordinal, year_to_words};
use crate::rules::{NormalizationRule, Render, RuleInput, RulePattern, RuleSet};
use crate::segment::TextSpan;
use crate::tables::{contains_ci, is_era_marker, scale_word, unit_words};

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

static RE_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\+?\d{1,2}[-\s])?(?:\(\d{3}\)\s?|\d{3}-)?\d{3}-\d{4}$").unwrap());

static RE_IP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}(?:\.\d{1,3}){3}$").unwrap());

static RE_VERSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+){2,}$").unwrap());

static RE_FRACTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)/(\d+)$").unwrap());

static RE_DECADE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3}0)s$").unwrap());

static RE_SCIENTIFIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?\d+(?:\.\d+)?)[eE]([+-]?\d+)$").unwrap());

static RE_ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}(?:,\d{3})+|\d+)(?i:st|nd|rd|th)$").unwrap());

static RE_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

static RE_LEADING_ZERO: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0\d+$").unwrap());

static RE_SCALED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(-?(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)([KMBT])$").unwrap());

static RE_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(-?(?:(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|\.\d+))\s?(%|[^\d\s.,][^\d\s]*)$").unwrap()
});

static RE_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?(?:(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|\.\d+)$").unwrap());

/// Words that make a following four-digit number read as a year.
const YEAR_CUES: &[&str] = &[
    "in", "since", "by", "until", "till", "from", "to", "before", "after", "circa", "year",
];

/// Words that make a following "80s" a decade rather than eighty seconds.
const DECADE_CUES: &[&str] = &[
    "the", "early", "late", "mid", "his", "her", "their", "my", "your", "our", "its",
];

// ─────────────────────────────────────────────────────────────────────────────
// Renderers
// ─────────────────────────────────────────────────────────────────────────────

fn render_phone(input: &RuleInput<'_>) -> Option<String> {
    let groups: Vec<String> = input
        .text
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .map(digits_to_words)
        .collect();
    let spoken = groups.join(", ");
    Some(if input.text.starts_with('+') {
        format!("plus {}", spoken)
    } else {
        spoken
    })
}

fn render_ip(input: &RuleInput<'_>) -> Option<String> {
    let octets: Vec<&str> = input.text.split('.').collect();
    if octets.iter().any(|o| o.parse::<u32>().map_or(true, |v| v > 255)) {
        return None;
    }
    Some(octets.into_iter().map(digits_to_words).collect::<Vec<_>>().join(" dot "))
}

fn render_version(input: &RuleInput<'_>) -> Option<String> {
    let parts = input
        .text
        .split('.')
        .map(|p| p.parse::<u64>().ok().map(cardinal))
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join(" point "))
}

fn plural(word: &str) -> String {
    match word.strip_suffix('y') {
        Some(stem) => format!("{}ies", stem),
        None if word.ends_with('x') || word.ends_with("ch") || word.ends_with('s') => format!("{}es", word),
        None => format!("{}s", word),
    }
}

fn render_fraction(input: &RuleInput<'_>) -> Option<String> {
    let numerator: u64 = input.group(1).parse().ok()?;
    let denominator: u64 = input.group(2).parse().ok()?;
    if denominator == 0 {
        return None;
    }
    let one = numerator == 1;
    let top = cardinal(numerator);
    let bottom = match denominator {
        1 => return Some(format!("{} over one", top)),
        2 if one => "half".to_string(),
        2 => "halves".to_string(),
        4 if one => "quarter".to_string(),
        4 => "quarters".to_string(),
        d if d >= 100 => return Some(format!("{} over {}", top, cardinal(d))),
        d if one => ordinal(d),
        d => plural(&ordinal(d)),
    };
    Some(format!("{} {}", top, bottom))
}

/// "1990s" → "nineteen nineties", "100s" → "hundreds".  A bare "30s" is
/// only a decade after a cue like "the" or an apostrophe; otherwise it is
/// left for the unit rule ("thirty seconds").
fn render_decade(input: &RuleInput<'_>) -> Option<String> {
    let digits = input.group(1);
    let value: u64 = digits.parse().ok()?;
    match digits.len() {
        2 => {
            let ctx = input.context;
            let apostrophe = ctx.prev().is_some_and(|s| matches!(s.text, "'" | "’"));
            let cued = ctx.prev_word().is_some_and(|w| contains_ci(DECADE_CUES, w));
            (apostrophe || cued).then(|| plural(&cardinal(value)))
        }
        3 if value == 100 => Some("hundreds".to_string()),
        3 if value % 100 == 0 => Some(format!("{} hundreds", cardinal(value / 100))),
        3 => Some(plural(&cardinal(value))),
        _ => {
            let (century, rest) = (value / 100, value % 100);
            Some(match rest {
                0 if century % 10 == 0 => plural(&cardinal(value)),
                0 => format!("{} hundreds", cardinal(century)),
                _ => format!("{} {}", cardinal(century), plural(&cardinal(rest))),
            })
        }
    }
}

fn render_ordinal(input: &RuleInput<'_>) -> Option<String> {
    let value: u64 = input.group(1).replace(',', "").parse().ok()?;
    Some(ordinal(value))
}

/// "December 18", "18 December" → ordinal day.
fn render_month_day(input: &RuleInput<'_>) -> Option<String> {
    let day: u64 = input.text.parse().ok()?;
    if !(1..=31).contains(&day) || input.text.len() > 2 {
        return None;
    }
    let ctx = input.context;
    let beside_month = ctx.prev_word().is_some_and(is_month_name) || ctx.next_word().is_some_and(is_month_name);
    beside_month.then(|| ordinal(day))
}

fn has_year_context(ctx: &SpanContext<'_>) -> bool {
    ctx.month_within(3) || ctx.prev_word().is_some_and(|w| contains_ci(YEAR_CUES, w))
}

fn beside_era(ctx: &SpanContext<'_>) -> bool {
    ctx.prev_word().is_some_and(is_era_marker) || ctx.next_word().is_some_and(is_era_marker)
}

/// Four-digit years in context, and any year of up to four digits next to
/// an era marker ("AD 800", "1066 AD").
fn render_year(input: &RuleInput<'_>) -> Option<String> {
    let year: u32 = input.text.parse().ok()?;
    let ctx = input.context;
    let plausible = if beside_era(ctx) {
        input.text.len() <= 4 && year > 0
    } else {
        input.text.len() == 4 && (1100..=2099).contains(&year) && has_year_context(ctx)
    };
    plausible.then(|| year_to_words(year))
}

fn render_digits(input: &RuleInput<'_>) -> Option<String> {
    Some(digits_to_words(input.text))
}

fn render_long_digits(input: &RuleInput<'_>) -> Option<String> {
    (input.text.len() > input.config.number_processing.max_cardinal_digits).then(|| digits_to_words(input.text))
}

fn render_scaled(input: &RuleInput<'_>) -> Option<String> {
    let amount = decimal_to_words(input.group(1))?;
    let scale = scale_word(input.group(2))?;
    Some(format!("{} {}", amount, scale))
}

fn render_unit(input: &RuleInput<'_>) -> Option<String> {
    let value = input.group(1);
    let (singular, plural) = unit_words(input.group(2))?;
    let amount = decimal_to_words(value)?;
    let unit = if value.trim_start_matches('-') == "1" { singular } else { plural };
    Some(format!("{} {}", amount, unit))
}

/// "1e10" → "one times ten to the ten", "2.5e-3" → "... to the negative three".
fn render_scientific(input: &RuleInput<'_>) -> Option<String> {
    let coefficient = decimal_to_words(input.group(1))?;
    let exponent: i64 = input.group(2).parse().ok()?;
    let sign = if exponent < 0 { "negative " } else { "" };
    Some(format!(
        "{} times ten to the {}{}",
        coefficient,
        sign,
        cardinal(exponent.unsigned_abs())
    ))
}

fn render_decimal(input: &RuleInput<'_>) -> Option<String> {
    decimal_to_words(input.text)
}

// ─────────────────────────────────────────────────────────────────────────────
// NumberNormalizer
// ─────────────────────────────────────────────────────────────────────────────

pub struct NumberNormalizer {
    rules: RuleSet,
}

impl NumberNormalizer {
    pub fn new() -> Self {
        let c = Category::Number;
        let rule = |id: &'static str, priority: i32, re: &'static Lazy<Regex>, render: Render| {
            NormalizationRule::new(id, c, priority, RulePattern::Regex(re), render)
        };
        Self {
            rules: RuleSet::new(
                c,
                vec![
                    rule("phone", 0, &RE_PHONE, render_phone),
                    rule("ip-address", 10, &RE_IP, render_ip),
                    rule("version", 11, &RE_VERSION, render_version),
                    rule("fraction", 20, &RE_FRACTION, render_fraction),
                    rule("scientific", 25, &RE_SCIENTIFIC, render_scientific),
                    rule("decade", 30, &RE_DECADE, render_decade),
                    rule("ordinal", 40, &RE_ORDINAL, render_ordinal),
                    rule("month-day", 50, &RE_INTEGER, render_month_day),
                    rule("year", 51, &RE_INTEGER, render_year).when(|c| c.number_processing.years_as_pairs),
                    rule("leading-zeros", 60, &RE_LEADING_ZERO, render_digits)
                        .when(|c| c.number_processing.leading_zeros_as_digits),
                    rule("long-digits", 61, &RE_INTEGER, render_long_digits),
                    rule("scaled", 70, &RE_SCALED, render_scaled),
                    rule("unit", 71, &RE_UNIT, render_unit),
                    rule("cardinal", 100, &RE_DECIMAL, render_decimal),
                ],
            ),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for NumberNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for NumberNormalizer {
    fn category(&self) -> Category {
        Category::Number
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
    use crate::normalize::tests::{render, run_on};

    fn say(text: &str, target: &str) -> String {
        render(&NumberNormalizer::new(), text, target, &EffectiveConfiguration::default())
    }

    #[test]
    fn test_cardinals_and_decimals() {
        assert_eq!(say("pi is 3.14.", "3.14"), "three point one four");
        assert_eq!(say("count 5,000 items", "5,000"), "five thousand");
        assert_eq!(say("take .5 now", ".5"), "zero point five");
        assert_eq!(say("it was -12 out", "-12"), "negative twelve");
        assert_eq!(say("1999 people", "1999"), "one thousand, nine hundred ninety-nine");
    }

    #[test]
    fn test_decimal_point_is_never_dropped() {
        let out = say("costs 10.05 units", "10.05");
        assert_eq!(out, "ten point zero five");
    }

    #[test]
    fn test_identifier_like_numbers_read_as_digits() {
        assert_eq!(say("agent 007 here", "007"), "zero zero seven");
        assert_eq!(say("call 555-123-4567 now", "555-123-4567"), "five five five, one two three, four five six seven");
        assert_eq!(say("id 12345678901234567", "12345678901234567"), digits_to_words("12345678901234567"));

        let mut config = EffectiveConfiguration::default();
        config.number_processing.leading_zeros_as_digits = false;
        assert_eq!(render(&NumberNormalizer::new(), "agent 007", "007", &config), "seven");
    }

    #[test]
    fn test_ordinals_fractions_decades() {
        assert_eq!(say("the 21st time", "21st"), "twenty-first");
        assert_eq!(say("add 3/4 cup", "3/4"), "three quarters");
        assert_eq!(say("add 1/2 cup", "1/2"), "one half");
        assert_eq!(say("about 2/3 done", "2/3"), "two thirds");
        assert_eq!(say("in the 1990s", "1990s"), "nineteen nineties");
        assert_eq!(say("the 80s", "80s"), "eighties");
        assert_eq!(say("the 2010s", "2010s"), "twenty tens");
        assert_eq!(say("back in the '80s", "80s"), "eighties");
        assert_eq!(say("she is in her 30s", "30s"), "thirties");
    }

    #[test]
    fn test_hundreds_and_seconds() {
        assert_eq!(say("The 100s and 200s were bad.", "100s"), "hundreds");
        assert_eq!(say("The 100s and 200s were bad.", "200s"), "two hundreds");
        assert_eq!(say("the 1900s", "1900s"), "nineteen hundreds");
        assert_eq!(say("the 2000s", "2000s"), "two thousands");
        assert_eq!(say("I waited 30s.", "30s"), "thirty seconds");
        assert_eq!(say("wait 5s", "5s"), "five seconds");
        assert_eq!(say("only 1s left", "1s"), "one second");
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(say("The value is 1e10.", "1e10"), "one times ten to the ten");
        assert_eq!(say("lr 2.5e-3 here", "2.5e-3"), "two point five times ten to the negative three");
        let outcome = run_on(&NumberNormalizer::new(), "about 6E23", "6E23", &EffectiveConfiguration::default());
        assert_eq!(outcome.rule_id(), Some("scientific"));
    }

    #[test]
    fn test_years_need_context() {
        assert_eq!(say("born in 1985.", "1985"), "nineteen eighty-five");
        assert_eq!(say("December 18, 2013", "2013"), "two thousand thirteen");
        assert_eq!(say("May 2023 was warm", "2023"), "twenty twenty-three");
        assert_eq!(say("1066 AD", "1066"), "ten sixty-six");
        assert_eq!(say("The AD 1066 AD", "1066"), "ten sixty-six");
        assert_eq!(say("around 500 BC", "500"), "five hundred");
        // a lowercase "ad" is the noun
        assert_eq!(say("one ad 1066 times", "1066"), "one thousand, sixty-six");
        assert_eq!(say("in 1000 ways", "1000"), "one thousand");
    }

    #[test]
    fn test_month_context_ordinal() {
        assert_eq!(say("December 18, 2013", "18"), "eighteenth");
        assert_eq!(say("on 4 July we", "4"), "fourth");
        // "may" as a modal is not a month
        assert_eq!(say("you may 5 times", "5"), "five");
    }

    #[test]
    fn test_units_and_scales() {
        assert_eq!(say("run 5km today", "5km"), "five kilometers");
        assert_eq!(say("only 1km", "1km"), "one kilometer");
        assert_eq!(say("a 50% cut", "50%"), "fifty percent");
        assert_eq!(say("worth 7B now", "7B"), "seven billion");
        assert_eq!(say("a 2.5M raise", "2.5M"), "two point five million");
    }

    #[test]
    fn test_ip_and_versions() {
        assert_eq!(say("ping 10.0.0.1 now", "10.0.0.1"), "one zero dot zero dot zero dot one");
        assert_eq!(say("release 1.2.3 is out", "1.2.3"), "one point two point three");
        let outcome = run_on(&NumberNormalizer::new(), "ping 999.1.1.1", "999.1.1.1", &EffectiveConfiguration::default());
        assert_eq!(outcome.rule_id(), Some("version"));
    }

    #[test]
    fn test_rule_order_is_data() {
        let ids = NumberNormalizer::new().rules().ids();
        assert_eq!(ids.first(), Some(&"phone"));
        assert_eq!(ids.last(), Some(&"cardinal"));
        let month = ids.iter().position(|id| *id == "month-day");
        let year = ids.iter().position(|id| *id == "year");
        assert!(month < year);
    }
}
