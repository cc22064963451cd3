//! Currency amounts → words.
//!
//! `~$5,681.52` → "about five thousand, six hundred eighty-one dollars and
//! fifty-two cents".  The approximation marker is spoken with the configured
//! word; it is never read as a symbol name.

use fancy_regex::Regex;
use once_cell::sync::Lazy;

use crate::config::{CurrencyStyle, EffectiveConfiguration};
use crate::error::NormalizeError;
use crate::normalize::{Category, Normalize, Outcome, SpanContext};
use crate::numbers::{cardinal, cardinal_digits, decimal_to_words};
use crate::rules::{NormalizationRule, RuleInput, RulePattern, RuleSet};
use crate::segment::TextSpan;
use crate::tables::{currency_unit, scale_word, CurrencyUnit};

static RE_AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(~\s?)?([$€£¥₹₩₿])\s?(\d{1,3}(?:,\d{3})+|\d+)?(?:\.(\d+))?(?:\s?(thousand|million|billion|trillion)|([KMBT]))?$",
    )
    .unwrap()
});

/// A parsed amount; borrowed from the span.
struct Amount<'a> {
    approximate: bool,
    unit: &'static CurrencyUnit,
    integer: &'a str,
    fraction: Option<&'a str>,
    scale: Option<&'static str>,
}

impl<'a> Amount<'a> {
    fn parse(input: &RuleInput<'a>) -> Option<Self> {
        let unit = currency_unit(input.group(2).chars().next()?)?;
        let integer = input.group(3);
        let fraction = Some(input.group(4)).filter(|f| !f.is_empty());
        if integer.is_empty() && fraction.is_none() {
            return None;
        }
        let scale = [input.group(5), input.group(6)]
            .into_iter()
            .find(|s| !s.is_empty())
            .and_then(scale_word);
        Some(Self {
            approximate: !input.group(1).is_empty(),
            unit,
            integer,
            fraction,
            scale,
        })
    }

    fn whole(&self) -> Option<u64> {
        if self.integer.is_empty() {
            return Some(0);
        }
        self.integer.replace(',', "").parse().ok()
    }

    /// The whole part in words, however many digits it has.
    fn whole_words(&self) -> Option<String> {
        if self.integer.is_empty() {
            return Some(cardinal(0));
        }
        cardinal_digits(&self.integer.replace(',', ""))
    }

    /// The amount as a plain decimal literal, commas removed.
    fn literal(&self) -> String {
        let integer = self.integer.replace(',', "");
        match self.fraction {
            Some(f) => format!("{}.{}", integer, f),
            None => integer,
        }
    }

    fn is_exactly_one(&self) -> bool {
        self.whole() == Some(1) && self.fraction.map_or(true, |f| f.bytes().all(|b| b == b'0'))
    }

    fn unit_name(&self) -> &'static str {
        if self.is_exactly_one() {
            self.unit.singular
        } else {
            self.unit.plural
        }
    }
}

fn with_prefix(amount: &Amount<'_>, config: &EffectiveConfiguration, spoken: String) -> String {
    if amount.approximate {
        format!("{} {}", config.currency_processing.approximation_word.trim(), spoken)
    } else {
        spoken
    }
}

fn render_scaled(input: &RuleInput<'_>) -> Option<String> {
    let amount = Amount::parse(input)?;
    let scale = amount.scale?;
    let number = decimal_to_words(&amount.literal())?;
    let spoken = format!("{} {} {}", number, scale, amount.unit.plural);
    Some(with_prefix(&amount, input.config, spoken))
}

/// "five dollars and fifty-two cents".
fn render_words(input: &RuleInput<'_>) -> Option<String> {
    let amount = Amount::parse(input)?;
    if amount.scale.is_some() {
        return None;
    }
    let whole = amount.whole_words()?;
    let major = || {
        let name = if amount.whole() == Some(1) { amount.unit.singular } else { amount.unit.plural };
        format!("{} {}", whole, name)
    };
    let no_whole = amount.whole() == Some(0);

    let spoken = match amount.fraction {
        None => major(),
        Some(fraction) => {
            let (minor_one, minor_many) = amount.unit.minor?;
            if fraction.len() > 2 {
                return None;
            }
            let cents: u64 = format!("{:0<2}", fraction).parse().ok()?;
            let minor = format!("{} {}", cardinal(cents), if cents == 1 { minor_one } else { minor_many });
            match (no_whole, cents) {
                (_, 0) => major(),
                (true, _) => minor,
                _ => format!("{} and {}", major(), minor),
            }
        }
    };
    Some(with_prefix(&amount, input.config, spoken))
}

/// "five point five two dollars".
fn render_decimal(input: &RuleInput<'_>) -> Option<String> {
    let amount = Amount::parse(input)?;
    let number = decimal_to_words(&amount.literal())?;
    let spoken = format!("{} {}", number, amount.unit_name());
    Some(with_prefix(&amount, input.config, spoken))
}

pub struct CurrencyNormalizer {
    rules: RuleSet,
}

impl CurrencyNormalizer {
    pub fn new() -> Self {
        let c = Category::Currency;
        let pattern = || RulePattern::Regex(&RE_AMOUNT);
        Self {
            rules: RuleSet::new(
                c,
                vec![
                    NormalizationRule::new("scaled-amount", c, 0, pattern(), render_scaled),
                    NormalizationRule::new("amount-words", c, 10, pattern(), render_words)
                        .when(|c| c.currency_processing.style == CurrencyStyle::Words),
                    NormalizationRule::new("amount-decimal", c, 20, pattern(), render_decimal),
                ],
            ),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for CurrencyNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for CurrencyNormalizer {
    fn category(&self) -> Category {
        Category::Currency
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
    use crate::numbers::parse_cardinal;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn say(text: &str, target: &str) -> String {
        render(&CurrencyNormalizer::new(), text, target, &EffectiveConfiguration::default())
    }

    fn group_thousands(n: u64) -> String {
        let digits = n.to_string();
        let mut out = String::new();
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }

    /// Read "X dollars and Y cents" back into (dollars, cents).
    fn read_back(words: &str) -> (u64, u64) {
        let (dollars, rest) = match words.split_once(" dollar") {
            Some((d, rest)) => (
                parse_cardinal(d).unwrap(),
                rest.trim_start_matches('s').trim_start_matches(" and "),
            ),
            None => (0, words),
        };
        let cents = match rest.split_once(" cent") {
            Some((c, _)) => parse_cardinal(c).unwrap(),
            None => 0,
        };
        (dollars, cents)
    }

    #[test]
    fn test_grouped_amount() {
        assert_eq!(
            say("It was $5,681.52 total", "$5,681.52"),
            "five thousand, six hundred eighty-one dollars and fifty-two cents"
        );
    }

    #[test]
    fn test_approximation_marker() {
        let out = say("roughly ~$5,681.52", "~$5,681.52");
        assert!(out.starts_with("about five thousand"));
        assert!(!out.contains('~'));
        assert!(!out.contains("tilde"));
    }

    #[test]
    fn test_singular_and_edge_amounts() {
        assert_eq!(say("just $1 now", "$1"), "one dollar");
        assert_eq!(say("just $1.01 now", "$1.01"), "one dollar and one cent");
        assert_eq!(say("only $0.50 now", "$0.50"), "fifty cents");
        assert_eq!(say("only $5.00 now", "$5.00"), "five dollars");
        assert_eq!(say("only $.5 now", "$.5"), "fifty cents");
        assert_eq!(say("a £2.50 fee", "£2.50"), "two pounds and fifty pence");
        assert_eq!(say("a ¥500 fee", "¥500"), "five hundred yen");
    }

    #[test]
    fn test_amounts_beyond_u64_are_spoken() {
        let literal = "$99,999,999,999,999,999,999.99";
        let out = say(&format!("a bill of {literal} due"), literal);
        assert!(out.starts_with("ninety-nine quintillion, nine hundred ninety-nine quadrillion"), "{out}");
        assert!(out.ends_with("dollars and ninety-nine cents"), "{out}");
        assert!(!out.contains('$'));
    }

    #[test]
    fn test_scaled_amounts() {
        assert_eq!(say("a $2.5 billion deal", "$2.5 billion"), "two point five billion dollars");
        assert_eq!(say("raised $5M today", "$5M"), "five million dollars");
    }

    #[test]
    fn test_sub_unit_precision_falls_back_to_decimal() {
        let outcome = run_on(&CurrencyNormalizer::new(), "at $0.125 each", "$0.125", &EffectiveConfiguration::default());
        assert_eq!(outcome.rule_id(), Some("amount-decimal"));
        assert_eq!(outcome.text(), Some("zero point one two five dollars"));
    }

    #[test]
    fn test_decimal_words_style() {
        let mut config = EffectiveConfiguration::default();
        config.currency_processing.style = CurrencyStyle::DecimalWords;
        let out = render(&CurrencyNormalizer::new(), "costs $5.52", "$5.52", &config);
        assert_eq!(out, "five point five two dollars");
    }

    #[test]
    fn test_custom_approximation_word() {
        let mut config = EffectiveConfiguration::default();
        config.currency_processing.approximation_word = "roughly".to_string();
        let out = render(&CurrencyNormalizer::new(), "~$3", "~$3", &config);
        assert_eq!(out, "roughly three dollars");
    }

    #[test]
    fn test_random_amounts_read_back_exactly() {
        let mut rng = StdRng::seed_from_u64(42);
        let normalizer = CurrencyNormalizer::new();
        let config = EffectiveConfiguration::default();
        for _ in 0..1000 {
            let dollars: u64 = rng.gen_range(0..10_000_000);
            let cents: u64 = rng.gen_range(0..100);
            let literal = format!("${}.{:02}", group_thousands(dollars), cents);
            let text = format!("total {} due", literal);
            let spoken = render(&normalizer, &text, &literal, &config);
            assert_eq!(read_back(&spoken), (dollars, cents), "{literal} -> {spoken}");
        }
    }
}
