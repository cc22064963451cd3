//! URLs and email addresses.
//!
//! The scheme is never spoken.  Host labels are joined with "dot", each path
//! segment is introduced by "forward slash", and with `split_path_words`
//! concatenated path words are split best-effort against a small lexicon
//! ("somepage" → "some page").  The split can be wrong for words outside
//! the lexicon; such segments are read as-is.

use fancy_regex::Regex;
use once_cell::sync::Lazy;

use crate::config::{EffectiveConfiguration, UrlProcessing, UrlVerbosity};
use crate::error::NormalizeError;
use crate::normalize::{Category, Normalize, Outcome, SpanContext};
use crate::numbers::{cardinal, digits_to_words};
use crate::rules::{NormalizationRule, RuleInput, RulePattern, RuleSet};
use crate::segment::TextSpan;
use crate::tables::is_common_word;

static RE_SCHEME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?i:[a-z][a-z0-9+.-]*://)").unwrap());

/// Letter/digit runs, splitting camelCase humps ("somePage2" → some, Page, 2).
static RE_PIECES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Z]+(?![a-z])|[A-Z]?[a-z]+|\d+|[^\W\d_]+").unwrap());

// ─────────────────────────────────────────────────────────────────────────────
// Word helpers
// ─────────────────────────────────────────────────────────────────────────────

fn number_words(digits: &str) -> String {
    match digits.parse::<u64>() {
        Ok(n) if digits.len() <= 4 && !digits.starts_with('0') => cardinal(n),
        _ => digits_to_words(digits),
    }
}

/// Split a lowercase run into lexicon words, fewest pieces first.
fn split_compound(word: &str) -> Option<Vec<&str>> {
    if word.len() < 6 || !word.is_ascii() || is_common_word(word) {
        return None;
    }
    let n = word.len();
    // best[i] = (piece count, start of last piece) for word[..i]
    let mut best: Vec<Option<(usize, usize)>> = vec![None; n + 1];
    best[0] = Some((0, 0));
    for end in 2..=n {
        for start in 0..=end - 2 {
            let Some((count, _)) = best[start] else { continue };
            if !is_common_word(&word[start..end]) {
                continue;
            }
            if best[end].map_or(true, |(c, _)| count + 1 < c) {
                best[end] = Some((count + 1, start));
            }
        }
    }
    let (count, _) = best[n]?;
    if count < 2 {
        return None;
    }
    let mut pieces = Vec::with_capacity(count);
    let mut end = n;
    while end > 0 {
        let (_, start) = best[end]?;
        pieces.push(&word[start..end]);
        end = start;
    }
    pieces.reverse();
    Some(pieces)
}

/// Read one token of a path or local part: camelCase humps, digit runs and
/// lexicon compounds become separate words.
fn token_words(token: &str, split_words: bool) -> Vec<String> {
    let mut words = Vec::new();
    for piece in RE_PIECES.find_iter(token).filter_map(Result::ok) {
        let piece = piece.as_str();
        if piece.bytes().all(|b| b.is_ascii_digit()) {
            words.push(number_words(piece));
            continue;
        }
        let compound = split_words
            .then(|| split_compound(&piece.to_lowercase()).map(|p| p.join(" ")))
            .flatten();
        words.push(compound.unwrap_or_else(|| piece.to_string()));
    }
    words
}

/// Read a path segment, naming the separators inside it.
fn segment_words(segment: &str, split_words: bool) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut token = String::new();
    let flush = |token: &mut String, out: &mut Vec<String>| {
        if !token.is_empty() {
            out.extend(token_words(token, split_words));
            token.clear();
        }
    };
    for ch in segment.chars() {
        let spoken = match ch {
            '.' => Some("dot"),
            '-' | '_' | '+' | '~' | '%' => Some(""),
            _ => None,
        };
        match spoken {
            Some(word) => {
                flush(&mut token, &mut out);
                if !word.is_empty() {
                    out.push(word.to_string());
                }
            }
            None => token.push(ch),
        }
    }
    flush(&mut token, &mut out);
    out.join(" ")
}

fn host_words(host: &str, settings: &UrlProcessing) -> String {
    host.split('.')
        .filter(|label| !label.is_empty())
        .filter(|label| settings.speak_www || !label.eq_ignore_ascii_case("www"))
        .map(|label| {
            label
                .split('-')
                .map(|part| {
                    if part.bytes().all(|b| b.is_ascii_digit()) {
                        digits_to_words(part)
                    } else {
                        part.to_lowercase()
                    }
                })
                .collect::<Vec<_>>()
                .join(" dash ")
        })
        .collect::<Vec<_>>()
        .join(" dot ")
}

// ─────────────────────────────────────────────────────────────────────────────
// Renderers
// ─────────────────────────────────────────────────────────────────────────────

fn is_email(text: &str) -> bool {
    text.contains('@') && !text.contains("://")
}

fn render_email(input: &RuleInput<'_>) -> Option<String> {
    let (local, domain) = input.text.rsplit_once('@')?;
    let mut local_words = Vec::new();
    let mut token = String::new();
    for ch in local.chars().chain(std::iter::once('\0')) {
        let separator = match ch {
            '.' => Some("dot"),
            '_' => Some("underscore"),
            '-' => Some("dash"),
            '+' => Some("plus"),
            '\0' => Some(""),
            _ => None,
        };
        let Some(separator) = separator else {
            token.push(ch);
            continue;
        };
        if !token.is_empty() {
            local_words.extend(token_words(&token, false));
            token.clear();
        }
        if !separator.is_empty() {
            local_words.push(separator.to_string());
        }
    }
    let settings = &input.config.url_processing;
    Some(format!("{} at {}", local_words.join(" "), host_words(domain, settings)))
}

fn render_url(input: &RuleInput<'_>) -> Option<String> {
    let settings = &input.config.url_processing;
    let scheme_len = RE_SCHEME.find(input.text).ok().flatten().map_or(0, |m| m.end());
    let rest = &input.text[scheme_len..];

    let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(host_end);
    let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => (host, Some(port)),
        _ => (authority, None),
    };

    let mut spoken = host_words(host, settings);
    if spoken.is_empty() {
        return None;
    }
    if let Some(port) = port {
        spoken.push_str(" port ");
        spoken.push_str(&number_words(port));
    }
    if settings.verbosity == UrlVerbosity::DomainOnly {
        return Some(spoken);
    }

    let (path_and_query, fragment) = match tail.split_once('#') {
        Some((p, f)) => (p, Some(f)),
        None => (tail, None),
    };
    let (path, query) = match path_and_query.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (path_and_query, None),
    };

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        let words = segment_words(segment, settings.split_path_words);
        if !words.is_empty() {
            spoken.push_str(" forward slash ");
            spoken.push_str(&words);
        }
    }

    if settings.verbosity == UrlVerbosity::Full {
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            let pairs: Vec<String> = query
                .split('&')
                .filter(|p| !p.is_empty())
                .map(|pair| match pair.split_once('=') {
                    Some((k, v)) => format!("{} equals {}", segment_words(k, false), segment_words(v, false)),
                    None => segment_words(pair, false),
                })
                .collect();
            spoken.push_str(" question mark ");
            spoken.push_str(&pairs.join(" and "));
        }
        if let Some(fragment) = fragment.filter(|f| !f.is_empty()) {
            spoken.push_str(" hash ");
            spoken.push_str(&segment_words(fragment, settings.split_path_words));
        }
    }
    Some(spoken.split_whitespace().collect::<Vec<_>>().join(" "))
}

pub struct UrlNormalizer {
    rules: RuleSet,
}

impl UrlNormalizer {
    pub fn new() -> Self {
        let c = Category::Url;
        Self {
            rules: RuleSet::new(
                c,
                vec![
                    NormalizationRule::new("email", c, 0, RulePattern::Predicate(is_email), render_email)
                        .when(|c| c.url_processing.emails),
                    NormalizationRule::new("url", c, 10, RulePattern::Predicate(|t| !is_email(t)), render_url),
                ],
            ),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}

impl Default for UrlNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalize for UrlNormalizer {
    fn category(&self) -> Category {
        Category::Url
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
