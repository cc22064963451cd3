//! Acronyms, abbreviations and titles.
//!
//! Short all-caps tokens are spelled letter by letter ("TSLA" → "T-S-L-A")
//! unless they are pronounced as a word ("NASA") or are an ordinary word
//! typed in capitals ("THE").  Known abbreviations follow
//! `abbreviation_policy`; titles ("Dr", "Mrs") expand before a name.  Era
//! markers beside a year are read as separate letters ("AD 1066" → "A D").

use fancy_regex::Regex;
use once_cell::sync::Lazy;

use crate::config::{AbbreviationPolicy, EffectiveConfiguration};
use crate::error::NormalizeError;
use crate::normalize::{match_case, Category, Normalize, Outcome, SpanContext};
use crate::rules::{NormalizationRule, RuleInput, RulePattern, RuleSet};
use crate::segment::{SpanTag, TextSpan};
use crate::tables::{is_common_word, is_era_marker, ABBREVIATIONS, LATIN_ABBREVIATIONS, SPOKEN_AS_WORD, TITLES};

static RE_ALL_CAPS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([A-Z]+)('?s)?$").unwrap());

fn expanding_titles(config: &EffectiveConfiguration) -> bool {
    config.acronym_processing.expand_titles
}

/// "Dr. Smith" and "Dr Smith", not "the Dr".
fn render_title(input: &RuleInput<'_>) -> Option<String> {
    let (_, expansion) = TITLES.iter().find(|(title, _)| *title == input.text)?;
    let ctx = input.context;
    let before_period = ctx.next().is_some_and(|s| s.text == ".");
    let before_name = ctx
        .next_word()
        .is_some_and(|w| w.chars().next().is_some_and(char::is_uppercase));
    (before_period || before_name).then(|| expansion.to_string())
}

fn render_latin(input: &RuleInput<'_>) -> Option<String> {
    LATIN_ABBREVIATIONS
        .iter()
        .find(|(short, _)| short.eq_ignore_ascii_case(input.text))
        .map(|(_, long)| match_case(input.text, long))
}

fn render_abbreviation(input: &RuleInput<'_>) -> Option<String> {
    ABBREVIATIONS
        .iter()
        .find(|(short, _)| *short == input.text)
        .map(|(_, long)| long.to_string())
}

fn render_era(input: &RuleInput<'_>) -> Option<String> {
    let ctx = input.context;
    let is_year = |s: &TextSpan<'_>| matches!(s.tag, SpanTag::Number | SpanTag::Date);
    let beside_year = ctx.prev_non_space().is_some_and(is_year) || ctx.next_non_space().is_some_and(is_year);
    beside_year.then(|| input.text.chars().map(String::from).collect::<Vec<_>>().join(" "))
}

fn is_spoken_as_word(word: &str, config: &EffectiveConfiguration) -> bool {
    SPOKEN_AS_WORD.contains(&word)
        || config
            .acronym_processing
            .spoken_as_word
            .iter()
            .any(|w| w.eq_ignore_ascii_case(word))
}

/// "TSLA" → "T-S-L-A", "APIs" → "A-P-I's".
fn render_spelled(input: &RuleInput<'_>) -> Option<String> {
    let letters = input.group(1);
    let settings = &input.config.acronym_processing;
    let length = letters.chars().count();
    if !(2..=settings.max_length).contains(&length)
        || is_spoken_as_word(letters, input.config)
        || (length >= 3 && is_common_word(letters))
    {
        return None;
    }
    let mut spelled = letters
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(&settings.letter_separator);
    if !input.group(2).is_empty() {
        spelled.push_str("'s");
    }
    Some(spelled)
}

pub struct AcronymExpander {
    rules: RuleSet,
}

impl AcronymExpander {
    pub fn new() -> Self {
        let c = Category::Acronym;
        Self {
            rules: RuleSet::new(
                c,
                vec![
                    NormalizationRule::new("title", c, 0, RulePattern::Any, render_title).when(expanding_titles),
                    NormalizationRule::new("latin", c, 1, RulePattern::Any, render_latin).when(expanding_titles),
                    NormalizationRule::new("abbreviation", c, 10, RulePattern::Any, render_abbreviation)
                        .when(|c| c.acronym_processing.abbreviation_policy == AbbreviationPolicy::Expand),
                    NormalizationRule::new("era", c, 15, RulePattern::Predicate(is_era_marker), render_era),
                    NormalizationRule::new("spell", c, 20, RulePattern::Regex(&RE_ALL_CAPS), render_spelled),
                ],
            ),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for AcronymExpander {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for AcronymExpander {
    fn category(&self) -> Category {
        Category::Acronym
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
