//! Punctuation and symbols.
//!
//! Nothing here is ever read as a symbol name.  Terminal punctuation is kept
//! so the sentence splitter can derive intonation from it; quotes and
//! markdown and inline markup tags go silent; brackets and dashes become a pause; a few symbols
//! with a natural spoken form ("&", "+", "=") become words.  Per-symbol
//! `overrides` win over everything.

use crate::config::EffectiveConfiguration;
use crate::error::NormalizeError;
use crate::normalize::{Category, Normalize, Outcome, SpanContext};
use crate::rules::{NormalizationRule, RuleInput, RulePattern, RuleSet};
use crate::segment::{SpanTag, TextSpan};
use crate::tables::{KEPT_PUNCTUATION, LATIN_ABBREVIATIONS, MARKDOWN_SYMBOLS, PAUSE_SYMBOLS, QUOTES, SYMBOL_WORDS, TITLES};

fn is_quantity(span: Option<&TextSpan<'_>>) -> bool {
    span.is_some_and(|s| matches!(s.tag, SpanTag::Number | SpanTag::Currency))
}

fn is_whitespace(span: Option<&TextSpan<'_>>) -> bool {
    span.is_some_and(|s| s.tag == SpanTag::Whitespace)
}

fn render_override(input: &RuleInput<'_>) -> Option<String> {
    let replacement = input.config.symbol_processing.overrides.get(input.text)?;
    Some(if replacement.is_empty() {
        " ".to_string()
    } else {
        format!(" {} ", replacement)
    })
}

/// Drop the period of "Dr.", "vs.", "etc." and "p.m." when the sentence
/// carries on after it.
fn render_abbreviation_period(input: &RuleInput<'_>) -> Option<String> {
    let ctx = input.context;
    let prev = ctx.prev()?;
    let next_word = ctx.next_word();
    let continues_lowercase = next_word.is_some_and(|w| w.chars().next().is_some_and(char::is_lowercase));

    let drop = match prev.tag {
        SpanTag::Word if TITLES.iter().any(|(t, _)| *t == prev.text) => next_word.is_some(),
        SpanTag::Word if prev.text.eq_ignore_ascii_case("vs") => next_word.is_some(),
        SpanTag::Word if LATIN_ABBREVIATIONS.iter().any(|(a, _)| a.eq_ignore_ascii_case(prev.text)) => {
            continues_lowercase
        }
        SpanTag::Time => prev.text.contains('.') && continues_lowercase,
        _ => false,
    };
    drop.then(String::new)
}

/// "10-20" → "ten to twenty".
fn render_range(input: &RuleInput<'_>) -> Option<String> {
    let ctx = input.context;
    (is_quantity(ctx.prev()) && is_quantity(ctx.next())).then(|| " to ".to_string())
}

fn render_number_sign(input: &RuleInput<'_>) -> Option<String> {
    is_quantity(input.context.next()).then(|| "number ".to_string())
}

fn silence(_: &RuleInput<'_>) -> Option<String> {
    Some(" ".to_string())
}

fn render_pause(input: &RuleInput<'_>) -> Option<String> {
    let ctx = input.context;
    let is_pause = PAUSE_SYMBOLS.contains(&input.text)
        || (input.text == "-" && is_whitespace(ctx.prev()) && is_whitespace(ctx.next()));
    is_pause.then(|| format!(" {} ", input.config.symbol_processing.pause.trim()))
}

fn render_symbol_word(input: &RuleInput<'_>) -> Option<String> {
    SYMBOL_WORDS
        .iter()
        .find(|(symbol, _)| *symbol == input.text)
        .map(|(_, word)| format!(" {} ", word))
}

/// Anything left that is neither kept punctuation nor a word hyphen.
fn is_unknown(text: &str) -> bool {
    !KEPT_PUNCTUATION.contains(&text) && text != "-"
}

/// `<b>`, `</p>`, `<br/>`: only whole tags are cut out as one span.
fn is_markup_tag(text: &str) -> bool {
    text.len() > 2 && text.starts_with('<') && text.ends_with('>')
}

fn is_quote(text: &str) -> bool {
    QUOTES.contains(&text)
}

fn is_markdown(text: &str) -> bool {
    MARKDOWN_SYMBOLS.contains(&text)
}

pub struct SymbolProcessor {
    rules: RuleSet,
}

impl SymbolProcessor {
    pub fn new() -> Self {
        let c = Category::Symbol;
        Self {
            rules: RuleSet::new(
                c,
                vec![
                    NormalizationRule::new("override", c, 0, RulePattern::Any, render_override),
                    NormalizationRule::new("markup-tag", c, 5, RulePattern::Predicate(is_markup_tag), silence),
                    NormalizationRule::new(
                        "abbreviation-period",
                        c,
                        10,
                        RulePattern::Literal("."),
                        render_abbreviation_period,
                    ),
                    NormalizationRule::new("range", c, 20, RulePattern::Literal("-"), render_range)
                        .when(|c| c.symbol_processing.ranges),
                    NormalizationRule::new("en-dash-range", c, 21, RulePattern::Literal("–"), render_range)
                        .when(|c| c.symbol_processing.ranges),
                    NormalizationRule::new("number-sign", c, 30, RulePattern::Literal("#"), render_number_sign),
                    NormalizationRule::new("quote", c, 40, RulePattern::Predicate(is_quote), silence),
                    NormalizationRule::new("markdown", c, 50, RulePattern::Predicate(is_markdown), silence)
                        .when(|c| c.symbol_processing.strip_markdown),
                    NormalizationRule::new("pause", c, 60, RulePattern::Any, render_pause),
                    NormalizationRule::new("symbol-word", c, 70, RulePattern::Any, render_symbol_word),
                    NormalizationRule::new("unknown", c, 100, RulePattern::Predicate(is_unknown), silence),
                ],
            ),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for SymbolProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for SymbolProcessor {
    fn category(&self) -> Category {
        Category::Symbol
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
