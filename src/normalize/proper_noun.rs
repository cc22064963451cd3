//! Proper-noun pronunciations.
//!
//! Configured entries win over the built-in list.  A value wrapped in
//! slashes is IPA and becomes a phoneme link; anything else is spoken as a
//! plain respelling ("nginx" → "engine x").

use crate::config::EffectiveConfiguration;
use crate::error::NormalizeError;
use crate::normalize::{Category, Normalize, Outcome, SpanContext};
use crate::rules::{NormalizationRule, RuleInput, RulePattern, RuleSet};
use crate::segment::TextSpan;
use crate::tables::PROPER_NOUNS;

fn pronounce(word: &str, value: &str) -> String {
    let value = value.trim();
    if value.len() > 2 && value.starts_with('/') && value.ends_with('/') {
        format!("[{}]({})", word, value)
    } else {
        value.to_string()
    }
}

/// Exact match first, then case-insensitive.
fn lookup<'a, I>(entries: I, word: &str) -> Option<&'a str>
where
    I: Iterator<Item = (&'a str, &'a str)> + Clone,
{
    entries
        .clone()
        .find(|(key, _)| *key == word)
        .or_else(|| entries.into_iter().find(|(key, _)| key.to_lowercase() == word.to_lowercase()))
        .map(|(_, value)| value)
}

fn render_configured(input: &RuleInput<'_>) -> Option<String> {
    let entries = input
        .config
        .proper_noun_processing
        .pronunciations
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()));
    lookup(entries, input.text).map(|value| pronounce(input.text, value))
}

fn render_builtin(input: &RuleInput<'_>) -> Option<String> {
    lookup(PROPER_NOUNS.iter().copied(), input.text).map(|value| pronounce(input.text, value))
}

pub struct ProperNounProcessor {
    rules: RuleSet,
}

impl ProperNounProcessor {
    pub fn new() -> Self {
        let c = Category::ProperNoun;
        Self {
            rules: RuleSet::new(
                c,
                vec![
                    NormalizationRule::new("configured", c, 0, RulePattern::Any, render_configured),
                    NormalizationRule::new("builtin", c, 10, RulePattern::Any, render_builtin)
                        .when(|c| c.proper_noun_processing.use_builtin),
                ],
            ),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for ProperNounProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for ProperNounProcessor {
    fn category(&self) -> Category {
        Category::ProperNoun
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
