//! Domain normalizers.
//!
//! Each category is a closed variant of [`Category`] and one implementation
//! of [`Normalize`].  A normalizer only ever sees spans whose tag its
//! category [`accepts`](Category::accepts); it answers with an [`Outcome`]
//! and must never panic on unmatched input (the pipeline contains it if it
//! does anyway).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::EffectiveConfiguration;
use crate::error::NormalizeError;
use crate::segment::{SpanTag, TextSpan};
use crate::tables::month_number;

pub mod acronym;
pub mod contraction;
pub mod currency;
pub mod date;
pub mod homograph;
pub mod number;
pub mod proper_noun;
pub mod symbol;
pub mod url;

// ─────────────────────────────────────────────────────────────────────────────
// Category
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Url,
    Date,
    Currency,
    Number,
    Contraction,
    ProperNoun,
    Acronym,
    Homograph,
    Symbol,
}

/// Fixed stage order: literal-level categories first, then word-level ones,
/// punctuation last.
pub const PIPELINE: [Category; 9] = [
    Category::Url,
    Category::Date,
    Category::Currency,
    Category::Number,
    Category::Contraction,
    Category::ProperNoun,
    Category::Acronym,
    Category::Homograph,
    Category::Symbol,
];

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Url => "url",
            Category::Date => "date",
            Category::Currency => "currency",
            Category::Number => "number",
            Category::Contraction => "contraction",
            Category::ProperNoun => "proper_noun",
            Category::Acronym => "acronym",
            Category::Homograph => "homograph",
            Category::Symbol => "symbol",
        }
    }

    /// Whether spans tagged `tag` belong to this category.
    pub fn accepts(self, tag: SpanTag) -> bool {
        match self {
            Category::Url => matches!(tag, SpanTag::Url | SpanTag::Email),
            Category::Date => matches!(tag, SpanTag::Date | SpanTag::Time),
            Category::Currency => tag == SpanTag::Currency,
            Category::Number => tag == SpanTag::Number,
            Category::Contraction | Category::ProperNoun | Category::Acronym | Category::Homograph => {
                tag == SpanTag::Word
            }
            Category::Symbol => matches!(tag, SpanTag::Punctuation | SpanTag::Symbol),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outcome
// ─────────────────────────────────────────────────────────────────────────────

/// Result of running one normalizer on one span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No rule matched; the span is spoken verbatim.
    Unchanged,
    Rewritten { text: String, rule_id: &'static str },
}

impl Outcome {
    pub fn rewritten(text: impl Into<String>, rule_id: &'static str) -> Self {
        Outcome::Rewritten {
            text: text.into(),
            rule_id,
        }
    }

    pub fn is_rewritten(&self) -> bool {
        matches!(self, Outcome::Rewritten { .. })
    }

    pub fn rule_id(&self) -> Option<&'static str> {
        match self {
            Outcome::Rewritten { rule_id, .. } => Some(rule_id),
            Outcome::Unchanged => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Rewritten { text, .. } => Some(text),
            Outcome::Unchanged => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SpanContext
// ─────────────────────────────────────────────────────────────────────────────

/// A span together with its neighbours in the original input.
#[derive(Debug, Clone, Copy)]
pub struct SpanContext<'a> {
    spans: &'a [TextSpan<'a>],
    index: usize,
}

impl<'a> SpanContext<'a> {
    pub fn new(spans: &'a [TextSpan<'a>], index: usize) -> Self {
        Self { spans, index }
    }

    pub fn current(&self) -> Option<&'a TextSpan<'a>> {
        self.spans.get(self.index)
    }

    /// Span immediately before, whitespace included.
    pub fn prev(&self) -> Option<&'a TextSpan<'a>> {
        self.index.checked_sub(1).and_then(|i| self.spans.get(i))
    }

    /// Span immediately after, whitespace included.
    pub fn next(&self) -> Option<&'a TextSpan<'a>> {
        self.spans.get(self.index + 1)
    }

    /// Up to `n` preceding non-whitespace spans, nearest first.
    pub fn before(&self, n: usize) -> impl Iterator<Item = &'a TextSpan<'a>> {
        self.spans[..self.index.min(self.spans.len())]
            .iter()
            .rev()
            .filter(|s| s.tag != SpanTag::Whitespace)
            .take(n)
    }

    /// Up to `n` following non-whitespace spans, nearest first.
    pub fn after(&self, n: usize) -> impl Iterator<Item = &'a TextSpan<'a>> {
        self.spans
            .get(self.index + 1..)
            .unwrap_or_default()
            .iter()
            .filter(|s| s.tag != SpanTag::Whitespace)
            .take(n)
    }

    pub fn prev_non_space(&self) -> Option<&'a TextSpan<'a>> {
        self.before(1).next()
    }

    pub fn next_non_space(&self) -> Option<&'a TextSpan<'a>> {
        self.after(1).next()
    }

    /// The previous word, if nothing but whitespace separates it from this span.
    pub fn prev_word(&self) -> Option<&'a str> {
        self.prev_non_space().filter(|s| s.is_word()).map(|s| s.text)
    }

    /// The next word, if nothing but whitespace separates it from this span.
    pub fn next_word(&self) -> Option<&'a str> {
        self.next_non_space().filter(|s| s.is_word()).map(|s| s.text)
    }

    /// True at the start of the input or right after terminal punctuation.
    pub fn at_sentence_start(&self) -> bool {
        match self.prev_non_space() {
            None => true,
            Some(s) => s.tag == SpanTag::Punctuation && s.text.contains(['.', '!', '?', '…']),
        }
    }

    /// Whether a month name appears among the `n` preceding spans.
    pub fn month_within(&self, n: usize) -> bool {
        self.before(n).any(|s| s.is_word() && is_month_name(s.text))
    }
}

/// Capitalised month name or abbreviation; "may" the modal does not count.
pub(crate) fn is_month_name(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase) && month_number(word).is_some()
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalize
// ─────────────────────────────────────────────────────────────────────────────

/// The single interface every normalizer implements.
pub trait Normalize: Send + Sync {
    fn category(&self) -> Category;

    /// Rewrite `span`, or report [`Outcome::Unchanged`].
    fn normalize(
        &self,
        span: &TextSpan<'_>,
        config: &EffectiveConfiguration,
        context: &SpanContext<'_>,
    ) -> Result<Outcome, NormalizeError>;
}

/// The built-in normalizer for `category`.
pub fn default_stage(category: Category) -> Box<dyn Normalize> {
    match category {
        Category::Url => Box::new(url::UrlNormalizer::new()),
        Category::Date => Box::new(date::DateNormalizer::new()),
        Category::Currency => Box::new(currency::CurrencyNormalizer::new()),
        Category::Number => Box::new(number::NumberNormalizer::new()),
        Category::Contraction => Box::new(contraction::ContractionProcessor::new()),
        Category::ProperNoun => Box::new(proper_noun::ProperNounProcessor::new()),
        Category::Acronym => Box::new(acronym::AcronymExpander::new()),
        Category::Homograph => Box::new(homograph::HomographResolver::new()),
        Category::Symbol => Box::new(symbol::SymbolProcessor::new()),
    }
}

/// All built-in normalizers in pipeline order.
pub fn default_stages() -> Vec<Box<dyn Normalize>> {
    PIPELINE.iter().map(|c| default_stage(*c)).collect()
}

/// Keep the capitalisation pattern of `original` on `replacement`.
pub(crate) fn match_case(original: &str, replacement: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    match original.chars().next() {
        Some(first) if first.is_uppercase() => {
            let mut chars = replacement.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        _ => replacement.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
