//! Segmentation: raw text → ordered, non-overlapping [`TextSpan`]s that tile
//! the input exactly.
//!
//! Multi-character literals (URLs, emails, dates, times, currency amounts,
//! numbers) are recognised first.  At every word boundary each literal
//! pattern is tried in priority order and the longest match wins; a tie goes
//! to the higher-priority pattern.  Inline markup tags (`<b>`, `</p>`) are
//! cut out as symbol spans wherever they occur.  Everything else falls back
//! to whitespace, word, punctuation and single-character symbol spans.
//!
//! Also home to [`split_sentences`], which cuts normalized text into
//! synthesizer-sized chunks.

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::NormalizeError;
use crate::normalize::date;
use crate::tables::UNITS;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// What a span was recognised as.  Declaration order is literal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanTag {
    /// `[word](/ipa/)`, already resolved; never rewritten.
    PhonemeLink,
    Url,
    Email,
    Date,
    Time,
    Currency,
    Number,
    Word,
    Whitespace,
    Punctuation,
    Symbol,
}

/// A tagged slice of the input.  `start..end` are byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextSpan<'a> {
    pub start: usize,
    pub end: usize,
    pub tag: SpanTag,
    pub text: &'a str,
}

impl TextSpan<'_> {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn is_word(&self) -> bool {
        self.tag == SpanTag::Word
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Literal patterns (anchored at the current position)
// ─────────────────────────────────────────────────────────────────────────────

const URL_TRAILING: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', ')', ']', '}'];

static RE_PHONEME_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[[^\]\n]+\]\(/[^/\n)]+/\)").unwrap());

static RE_URL_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?i:(?:https?|ftp)://|www\.)[^\s<>"]+"#).unwrap());

static RE_URL_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"^(?i:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)*\.(?:com|org|net|io|dev|edu|gov|co|ai|app|uk|us|de|fr|ca|au|info|biz|me|tv|ly))(?![\w-])(?::\d{1,5})?(?:/[^\s<>"]*)?"#,
    )
    .unwrap()
});

static RE_EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}(?![\w-])").unwrap()
});

static RE_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,4}([/-])\d{1,2}\1\d{1,4}(?![\w/])").unwrap());

static RE_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\d{1,2}:\d{2}(?::\d{2})?(?:\s?[AaPp]\.?[Mm](?![\w]))?|\d{1,2}\s?[AaPp]\.?[Mm](?![\w]))(?![\w:])",
    )
    .unwrap()
});

static RE_CURRENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:~\s?)?[$€£¥₹₩₿]\s?(?:(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?|\.\d+)(?:\s?(?:thousand|million|billion|trillion)|[KMBT])?(?![\p{L}\d])",
    )
    .unwrap()
});

static RE_PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\+?\d{1,2}[-\s])?(?:\(\d{3}\)\s?|\d{3}-)\d{3}-\d{4}(?![\w-])|^\d{3}-\d{4}(?![\w-])").unwrap()
});

static RE_DOTTED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+(?:\.\d+){2,}(?![\w.]*\d)").unwrap());

static RE_FRACTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+/\d+(?![\w/])").unwrap());

static RE_DECADE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,3}0s(?![\w])").unwrap());

static RE_QUANTITY: Lazy<Regex> = Lazy::new(|| {
    let mut units: Vec<&str> = UNITS.iter().map(|(abbr, _, _)| *abbr).filter(|a| *a != "%").collect();
    units.sort_by_key(|u| std::cmp::Reverse(u.chars().count()));
    let units = units.iter().map(|u| fancy_regex::escape(u)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(
        r"^-?(?:(?:\d{{1,3}}(?:,\d{{3}})+|\d+)(?:\.\d+)?|\.\d+)(?:(?i:st|nd|rd|th)|\s?%|(?i:{units})|[KMBT])?(?![\p{{L}}\d])"
    ))
    .unwrap()
});

static RE_SCIENTIFIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(?:\.\d+)?[eE][+-]?\d{1,3}(?![\w]|\.\d)").unwrap());

static RE_MARKUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^</?[A-Za-z][A-Za-z0-9-]*(?:\s+[^<>]*)?/?>"#).unwrap());

/// Bytes of input a non-URL literal is matched against.
const LITERAL_WINDOW: usize = 256;
/// Bytes of the current token a URL or email is matched against.
const TOKEN_WINDOW: usize = 2048;
/// A windowed match ending this close to the cut is re-run on the full input.
const EDGE_MARGIN: usize = 32;

fn regex_len(re: &Regex, rest: &str) -> Option<usize> {
    re.find(rest).ok().flatten().map(|m| m.end())
}

/// Prefix of `s` at most `max` bytes long, cut on a char boundary.
fn clip(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Match `re` against `window`, falling back to `full` only when the match
/// runs up to the cut and may continue past it.
fn anchored_len(re: &Regex, window: &str, full: &str) -> Option<usize> {
    let len = regex_len(re, window)?;
    if window.len() < full.len() && len + EDGE_MARGIN >= window.len() {
        return regex_len(re, full);
    }
    Some(len)
}

/// What the literal matchers see at one position.
struct Window<'a> {
    /// The remaining input.
    rest: &'a str,
    /// `rest` clipped to [`LITERAL_WINDOW`].
    near: &'a str,
    /// `rest` up to the next whitespace.
    token: &'a str,
    has_dot: bool,
    has_at: bool,
}

impl Window<'_> {
    fn first(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn find(&self, re: &Regex) -> Option<usize> {
        anchored_len(re, self.near, self.rest)
    }

    fn find_in_token(&self, re: &Regex) -> Option<usize> {
        anchored_len(re, clip(self.token, TOKEN_WINDOW), self.token)
    }
}

/// Index of the next char satisfying `pred`, advanced only forward so that
/// lookups from increasing positions cost linear time overall.
struct NextChar {
    pred: fn(char) -> bool,
    at: Option<usize>,
}

impl NextChar {
    fn new(pred: fn(char) -> bool) -> Self {
        Self { pred, at: None }
    }

    fn at_or_after(&mut self, text: &str, pos: usize) -> usize {
        match self.at {
            Some(at) if at >= pos => at,
            _ => {
                let at = text[pos..].find(self.pred).map_or(text.len(), |i| pos + i);
                self.at = Some(at);
                at
            }
        }
    }
}

fn match_phoneme_link(w: &Window<'_>) -> Option<usize> {
    (w.first() == Some('[')).then(|| w.find(&RE_PHONEME_LINK)).flatten()
}

fn match_url(w: &Window<'_>) -> Option<usize> {
    if !w.has_dot || !w.first().is_some_and(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    let len = w.find_in_token(&RE_URL_SCHEME).or_else(|| w.find_in_token(&RE_URL_BARE))?;
    let trimmed = w.rest[..len].trim_end_matches(URL_TRAILING);
    // "www." alone is not a URL
    (trimmed.contains('.') && !trimmed.ends_with("www")).then_some(trimmed.len())
}

fn match_email(w: &Window<'_>) -> Option<usize> {
    if !w.has_at || !w.first().is_some_and(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c)) {
        return None;
    }
    w.find_in_token(&RE_EMAIL)
}

fn match_date(w: &Window<'_>) -> Option<usize> {
    if !w.first().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let len = w.find(&RE_DATE)?;
    date::is_plausible_date(&w.rest[..len]).then_some(len)
}

fn match_time(w: &Window<'_>) -> Option<usize> {
    if !w.first().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    let len = w.find(&RE_TIME)?;
    date::parse_time(&w.rest[..len]).map(|_| len)
}

fn match_currency(w: &Window<'_>) -> Option<usize> {
    if !w.first().is_some_and(|c| "~$€£¥₹₩₿".contains(c)) {
        return None;
    }
    w.find(&RE_CURRENCY)
}

fn match_number(w: &Window<'_>) -> Option<usize> {
    if !w.first().is_some_and(|c| c.is_ascii_digit() || "-.+(".contains(c)) {
        return None;
    }
    [&RE_PHONE, &RE_DOTTED, &RE_FRACTION, &RE_DECADE, &RE_SCIENTIFIC, &RE_QUANTITY]
        .iter()
        .filter_map(|re| w.find(re))
        .max()
}

/// Inline markup tags (`<b>`, `</p>`, `<br/>`), matched at any position.
fn match_markup(rest: &str) -> Option<usize> {
    if !rest.starts_with('<') {
        return None;
    }
    anchored_len(&RE_MARKUP, clip(rest, LITERAL_WINDOW), rest)
}

type Matcher = fn(&Window<'_>) -> Option<usize>;

/// Literal patterns in priority order.
const LITERALS: &[(SpanTag, Matcher)] = &[
    (SpanTag::PhonemeLink, match_phoneme_link),
    (SpanTag::Url, match_url),
    (SpanTag::Email, match_email),
    (SpanTag::Date, match_date),
    (SpanTag::Time, match_time),
    (SpanTag::Currency, match_currency),
    (SpanTag::Number, match_number),
];

// ─────────────────────────────────────────────────────────────────────────────
// Fallback patterns
// ─────────────────────────────────────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());

static RE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}][\p{L}\p{M}\p{N}]*(?:['’]\p{L}+)*").unwrap());

static RE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:\.{2,}|[.,;:!?…¡¿]+|-{2,}|[—–―]|["“”„«»‘’'`()\[\]{}]|-)"#).unwrap()
});

fn fallback(rest: &str) -> (usize, SpanTag) {
    for (re, tag) in [
        (&RE_WHITESPACE, SpanTag::Whitespace),
        (&RE_WORD, SpanTag::Word),
        (&RE_PUNCTUATION, SpanTag::Punctuation),
    ] {
        if let Some(len) = anchored_len(re, clip(rest, LITERAL_WINDOW), rest).filter(|l| *l > 0) {
            return (len, tag);
        }
    }
    let len = rest.chars().next().map_or(rest.len(), char::len_utf8);
    (len, SpanTag::Symbol)
}

fn at_word_boundary(text: &str, pos: usize) -> bool {
    let mut before = text[..pos].chars().rev();
    match before.next() {
        None => true,
        Some(c) if c.is_alphanumeric() || c == '_' => false,
        // "v1.2" continues the token the period is attached to
        Some('.') => !before.next().is_some_and(char::is_alphanumeric),
        Some(_) => true,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// segment
// ─────────────────────────────────────────────────────────────────────────────

/// Split `text` into spans covering every byte exactly once.
///
/// Every matcher sees a bounded window of the input, so the cost per
/// position is constant and the whole pass is linear in `text.len()`.
pub fn segment(text: &str) -> Vec<TextSpan<'_>> {
    let mut spans = Vec::new();
    let mut pos = 0;
    let mut next_space = NextChar::new(char::is_whitespace);
    let mut next_dot = NextChar::new(|c| c == '.');
    let mut next_at = NextChar::new(|c| c == '@');

    while pos < text.len() {
        let rest = &text[pos..];
        let mut best: Option<(usize, SpanTag)> = match_markup(rest).map(|len| (len, SpanTag::Symbol));

        if best.is_none() && at_word_boundary(text, pos) {
            let token_end = next_space.at_or_after(text, pos);
            let window = Window {
                rest,
                near: clip(rest, LITERAL_WINDOW),
                token: &text[pos..token_end],
                has_dot: next_dot.at_or_after(text, pos) < token_end,
                has_at: next_at.at_or_after(text, pos) < token_end,
            };
            for (tag, matcher) in LITERALS {
                if let Some(len) = matcher(&window) {
                    if len > 0 && best.map_or(true, |(l, _)| len > l) {
                        best = Some((len, *tag));
                    }
                }
            }
        }

        let (len, tag) = best.unwrap_or_else(|| fallback(rest));
        spans.push(TextSpan {
            start: pos,
            end: pos + len,
            tag,
            text: &rest[..len],
        });
        pos += len;
    }
    spans
}

/// Verify that `spans` tile `text`: ordered, non-empty, no gaps, no overlaps.
pub fn check_coverage(text: &str, spans: &[TextSpan<'_>]) -> Result<(), NormalizeError> {
    let mut expected = 0;
    for span in spans {
        let valid = span.start == expected
            && span.end > span.start
            && text.get(span.start..span.end) == Some(span.text);
        if !valid {
            return Err(NormalizeError::TokenizationGap { offset: expected });
        }
        expected = span.end;
    }
    if expected != text.len() {
        return Err(NormalizeError::TokenizationGap { offset: expected });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Sentence chunking
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intonation {
    Statement,
    Question,
    Exclamation,
}

/// One synthesizer chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sentence {
    pub text: String,
    pub intonation: Intonation,
}

fn ensure_punctuation(text: &str) -> String {
    let text = text.trim();
    match text.chars().last() {
        Some(c) if ".!?,;:…".contains(c) => text.to_string(),
        Some(_) => format!("{},", text),
        None => String::new(),
    }
}

fn intonation_of(terminator: &str) -> Intonation {
    if terminator.contains('?') {
        Intonation::Question
    } else if terminator.contains('!') {
        Intonation::Exclamation
    } else {
        Intonation::Statement
    }
}

/// Split normalized text into sentences of at most `max_chars` bytes.
///
/// Terminal punctuation stays attached to its sentence and sets the
/// intonation.  Over-long sentences are cut at word boundaries; every piece
/// keeps the intonation of the sentence it came from, and non-final pieces
/// end with a comma pause.
pub fn split_sentences(text: &str, max_chars: usize) -> Vec<Sentence> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if !matches!(c, '.' | '!' | '?' | '…') {
            continue;
        }
        while let Some(&next) = chars.peek() {
            if matches!(next, '.' | '!' | '?' | '…' | '"' | '”' | '\'' | ')') {
                current.push(next);
                chars.next();
            } else {
                break;
            }
        }
        if chars.peek().map_or(true, |n| n.is_whitespace()) {
            push_sentence(&mut sentences, &current, max_chars);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current, max_chars);
    sentences
}

fn push_sentence(out: &mut Vec<Sentence>, raw: &str, max_chars: usize) {
    let sentence = raw.trim();
    if sentence.is_empty() {
        return;
    }
    let body_end = sentence.trim_end_matches(|c: char| ".!?…\"”')".contains(c)).len();
    let intonation = intonation_of(&sentence[body_end..]);

    if sentence.len() <= max_chars {
        out.push(Sentence {
            text: sentence.to_string(),
            intonation,
        });
        return;
    }

    let mut current = String::new();
    for word in sentence.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            out.push(Sentence {
                text: ensure_punctuation(&current),
                intonation,
            });
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.trim().is_empty() {
        out.push(Sentence {
            text: ensure_punctuation(&current),
            intonation,
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::time::{Duration, Instant};

    fn tags(text: &str) -> Vec<(SpanTag, &str)> {
        segment(text).into_iter().map(|s| (s.tag, s.text)).collect()
    }

    fn literal<'a>(text: &'a str, tag: SpanTag) -> Vec<&'a str> {
        segment(text).into_iter().filter(|s| s.tag == tag).map(|s| s.text).collect()
    }

    #[test]
    fn test_currency_kept_whole() {
        assert_eq!(literal("It costs $5,000.00 today.", SpanTag::Currency), vec!["$5,000.00"]);
        assert_eq!(literal("roughly ~$5,681.52", SpanTag::Currency), vec!["~$5,681.52"]);
        assert_eq!(literal("a $2.5 billion deal", SpanTag::Currency), vec!["$2.5 billion"]);
    }

    #[test]
    fn test_numbers_and_dates() {
        assert_eq!(literal("pi is 3.14.", SpanTag::Number), vec!["3.14"]);
        assert_eq!(literal("on 12/18/2013 we", SpanTag::Date), vec!["12/18/2013"]);
        assert_eq!(literal("on 2023-05-12", SpanTag::Date), vec!["2023-05-12"]);
        // not a valid date in any order
        assert!(literal("ratio 45/67/89", SpanTag::Date).is_empty());
        assert_eq!(literal("add 3/4 cup", SpanTag::Number), vec!["3/4"]);
        assert_eq!(literal("call 555-123-4567 now", SpanTag::Number), vec!["555-123-4567"]);
        assert_eq!(literal("the 21st and 5km and 50%", SpanTag::Number), vec!["21st", "5km", "50%"]);
        assert_eq!(literal("v1.2.3 and 192.168.0.1", SpanTag::Number), vec!["192.168.0.1"]);
        assert_eq!(literal("release 1.2.3 is out", SpanTag::Number), vec!["1.2.3"]);
    }

    #[test]
    fn test_times() {
        assert_eq!(literal("at 3:30 pm sharp", SpanTag::Time), vec!["3:30 pm"]);
        assert_eq!(literal("at 5pm.", SpanTag::Time), vec!["5pm"]);
        assert_eq!(literal("by 10:05", SpanTag::Time), vec!["10:05"]);
        assert!(literal("ratio 3:99", SpanTag::Time).is_empty());
    }

    #[test]
    fn test_url_trailing_punctuation_not_consumed() {
        assert_eq!(
            tags("see google.com, then"),
            vec![
                (SpanTag::Word, "see"),
                (SpanTag::Whitespace, " "),
                (SpanTag::Url, "google.com"),
                (SpanTag::Punctuation, ","),
                (SpanTag::Whitespace, " "),
                (SpanTag::Word, "then"),
            ]
        );
        assert_eq!(
            literal("Visit https://www.somesite.com/somepage.", SpanTag::Url),
            vec!["https://www.somesite.com/somepage"]
        );
    }

    #[test]
    fn test_email_and_phoneme_link() {
        assert_eq!(literal("mail john.doe@example.com.", SpanTag::Email), vec!["john.doe@example.com"]);
        assert_eq!(literal("I [read](/ɹɛd/) it", SpanTag::PhonemeLink), vec!["[read](/ɹɛd/)"]);
    }

    #[test]
    fn test_words_and_contractions() {
        assert_eq!(
            literal("They're TSLA's fans, wasn't it?", SpanTag::Word),
            vec!["They're", "TSLA's", "fans", "wasn't", "it"]
        );
    }

    #[test]
    fn test_no_literal_inside_word() {
        assert_eq!(literal("abc123 x", SpanTag::Number), Vec::<&str>::new());
        assert_eq!(literal("abc123 x", SpanTag::Word), vec!["abc123", "x"]);
    }

    #[test]
    fn test_markup_and_scientific_literals() {
        assert_eq!(
            literal("<b>bold</b> text<br/>", SpanTag::Symbol),
            vec!["<b>", "</b>", "<br/>"]
        );
        assert_eq!(literal("<a href=\"x\">link</a>", SpanTag::Symbol), vec!["<a href=\"x\">", "</a>"]);
        // comparisons are not tags
        assert_eq!(literal("if a < b > c", SpanTag::Symbol), vec!["<", ">"]);
        assert_eq!(literal("The value is 1e10.", SpanTag::Number), vec!["1e10"]);
        assert_eq!(literal("lr 1e-4 and 6.02E23", SpanTag::Number), vec!["1e-4", "6.02E23"]);
    }

    #[test]
    fn test_long_literals_cross_the_window() {
        let digits = "7".repeat(LITERAL_WINDOW + 100);
        let text = format!("count {digits} end");
        assert_eq!(literal(&text, SpanTag::Number), vec![digits.as_str()]);

        let word = "x".repeat(LITERAL_WINDOW * 3);
        assert_eq!(tags(&word), vec![(SpanTag::Word, word.as_str())]);

        let url = format!("https://example.com/{}", "p".repeat(TOKEN_WINDOW));
        let text = format!("see {url}.");
        assert_eq!(literal(&text, SpanTag::Url), vec![url.as_str()]);
    }

    #[test]
    fn test_segmentation_scales_linearly() {
        let sentence = "Visit https://www.example.com/page on 12/18/2013, it's $5,681.52 today. ";
        segment(sentence);

        let timed = |text: &str| {
            let started = Instant::now();
            let spans = segment(text);
            let elapsed = started.elapsed();
            check_coverage(text, &spans).unwrap();
            elapsed
        };

        let small = timed(&sentence.repeat(100));
        let large = timed(&sentence.repeat(800));
        assert!(
            large < small * 30 + Duration::from_millis(50),
            "8x input took {:?} vs {:?}",
            large,
            small
        );

        let small = timed(&"a-".repeat(2_000));
        let large = timed(&"a-".repeat(16_000));
        assert!(
            large < small * 30 + Duration::from_millis(50),
            "8x input took {:?} vs {:?}",
            large,
            small
        );
    }

    #[test]
    fn test_coverage_invariant_random_inputs() {
        let alphabet: Vec<char> =
            "ab Z09 .,;:!?$€~-/@#%&*()[]'\"’—\n\t5:3012/2023pmhttps://www.x.com é😀".chars().collect();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let len = rng.gen_range(0..60);
            let text: String = (0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]).collect();
            let spans = segment(&text);
            check_coverage(&text, &spans).unwrap();
            assert_eq!(spans.iter().map(TextSpan::len).sum::<usize>(), text.len());
        }
    }

    #[test]
    fn test_check_coverage_detects_gap() {
        let text = "ab cd";
        let mut spans = segment(text);
        spans.remove(1);
        assert!(matches!(
            check_coverage(text, &spans),
            Err(NormalizeError::TokenizationGap { offset: 2 })
        ));
    }

    #[test]
    fn test_split_sentences_intonation() {
        let sentences = split_sentences("Is it ready? Yes! It is done.", 400);
        let kinds: Vec<Intonation> = sentences.iter().map(|s| s.intonation).collect();
        assert_eq!(kinds, vec![Intonation::Question, Intonation::Exclamation, Intonation::Statement]);
        assert_eq!(sentences[0].text, "Is it ready?");
    }

    #[test]
    fn test_split_sentences_keeps_inner_periods() {
        let sentences = split_sentences("Pi is three point one four. Visit example dot com.", 400);
        assert_eq!(sentences.len(), 2);
        let sentences = split_sentences("Version 1.2 shipped", 400);
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].text, "Version 1.2 shipped");
    }

    #[test]
    fn test_split_long_sentence() {
        let text = "word ".repeat(30);
        let chunks = split_sentences(text.trim(), 40);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.text.len() <= 41));
        assert!(chunks[0].text.ends_with(','));
    }
}
