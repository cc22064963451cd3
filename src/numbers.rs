//! Number → words primitives shared by the number, currency, date and URL
//! normalizers.
//!
//! Cardinals group by thousands with a comma between scale groups
//! ("five thousand, six hundred eighty-one"), the way the synthesizer pauses
//! when reading long amounts aloud.

// ─────────────────────────────────────────────────────────────────────────────
// Word tables
// ─────────────────────────────────────────────────────────────────────────────

const ONES: &[&str] = &[
    "", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
    "ten", "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen",
    "seventeen", "eighteen", "nineteen",
];
const TENS: &[&str] = &["", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety"];
const SCALE: &[&str] = &[
    "", "thousand", "million", "billion", "trillion", "quadrillion", "quintillion",
    "sextillion", "septillion", "octillion", "nonillion", "decillion",
];

const DIGITS: &[&str] = &["zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine"];

/// Irregular ordinal endings, keyed by the cardinal's last word.
const ORDINAL_EXCEPTIONS: &[(&str, &str)] = &[
    ("one", "first"),
    ("two", "second"),
    ("three", "third"),
    ("five", "fifth"),
    ("eight", "eighth"),
    ("nine", "ninth"),
    ("twelve", "twelfth"),
];

fn three_digits_to_words(n: u64) -> String {
    if n == 0 {
        return String::new();
    }
    let mut parts = Vec::new();
    let hundreds = n / 100;
    let remainder = n % 100;
    if hundreds > 0 {
        parts.push(format!("{} hundred", ONES[hundreds as usize]));
    }
    if remainder > 0 {
        parts.push(two_digits_to_words(remainder));
    }
    parts.join(" ")
}

fn two_digits_to_words(n: u64) -> String {
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    let tens_word = TENS[(n / 10) as usize];
    let ones_word = ONES[(n % 10) as usize];
    if ones_word.is_empty() {
        tens_word.to_string()
    } else {
        format!("{}-{}", tens_word, ones_word)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cardinals, decimals, digits
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a non-negative integer to English words.
pub fn cardinal(n: u64) -> String {
    if n == 0 {
        return "zero".to_string();
    }
    let mut groups = Vec::new();
    let mut remaining = n;
    for &scale in SCALE {
        let chunk = remaining % 1000;
        if chunk > 0 {
            let words = three_digits_to_words(chunk);
            if scale.is_empty() {
                groups.push(words);
            } else {
                groups.push(format!("{} {}", words, scale));
            }
        }
        remaining /= 1000;
        if remaining == 0 {
            break;
        }
    }
    groups.reverse();
    groups.join(", ")
}

/// [`cardinal`] for a digit string of any length.
///
/// Runs longer than the scale words reach are read digit by digit.
/// Returns `None` unless `digits` is a non-empty run of ASCII digits.
pub fn cardinal_digits(digits: &str) -> Option<String> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Some("zero".to_string());
    }
    if digits.len() > SCALE.len() * 3 {
        return Some(digits_to_words(digits));
    }
    let mut groups = Vec::new();
    let mut end = digits.len();
    for &scale in SCALE {
        let start = end.saturating_sub(3);
        let chunk: u64 = digits[start..end].parse().ok()?;
        if chunk > 0 {
            let words = three_digits_to_words(chunk);
            if scale.is_empty() {
                groups.push(words);
            } else {
                groups.push(format!("{} {}", words, scale));
            }
        }
        end = start;
        if end == 0 {
            break;
        }
    }
    groups.reverse();
    Some(groups.join(", "))
}

/// Signed variant of [`cardinal`].
pub fn number_to_words(n: i64) -> String {
    if n < 0 {
        format!("negative {}", cardinal(n.unsigned_abs()))
    } else {
        cardinal(n as u64)
    }
}

/// Read every digit individually: `"007"` → `"zero zero seven"`.
pub fn digits_to_words(s: &str) -> String {
    s.chars()
        .filter_map(|c| c.to_digit(10))
        .map(|d| DIGITS[d as usize])
        .collect::<Vec<_>>()
        .join(" ")
}

/// Convert a decimal literal to words, reading fractional digits one by one.
///
/// Grouping commas are ignored; a missing integer part reads as "zero".
/// Returns `None` when the literal is not a plain decimal number.
pub fn decimal_to_words(value: &str) -> Option<String> {
    let value = value.replace(',', "");
    let (negative, value) = match value.strip_prefix('-') {
        Some(rest) => (true, rest.to_string()),
        None => (false, value),
    };

    let (int_part, frac_part) = match value.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (value.as_str(), None),
    };
    if !int_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let int_words = if int_part.is_empty() {
        "zero".to_string()
    } else {
        cardinal_digits(int_part)?
    };

    let mut words = match frac_part {
        Some(f) if !f.is_empty() && f.chars().all(|c| c.is_ascii_digit()) => {
            format!("{} point {}", int_words, digits_to_words(f))
        }
        Some(_) => return None,
        None => int_words,
    };
    if negative {
        words = format!("negative {}", words);
    }
    Some(words)
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordinals and years
// ─────────────────────────────────────────────────────────────────────────────

/// Turn the last word of a cardinal into its ordinal form.
fn ordinalize_last_word(last: &str) -> String {
    if let Some((_, ord)) = ORDINAL_EXCEPTIONS.iter().find(|(base, _)| *base == last) {
        return (*ord).to_string();
    }
    if let Some(stem) = last.strip_suffix('y') {
        format!("{}ieth", stem)
    } else {
        format!("{}th", last)
    }
}

/// `21` → `"twenty-first"`, `100` → `"one hundredth"`.
pub fn ordinal(n: u64) -> String {
    let word = cardinal(n);
    let split = word.rfind(['-', ' ']);
    match split {
        Some(pos) => {
            let (prefix, last) = word.split_at(pos + 1);
            format!("{}{}", prefix, ordinalize_last_word(last))
        }
        None => ordinalize_last_word(&word),
    }
}

/// Read a year the way it is spoken.
///
/// 2000–2009 and 2010–2019 keep the "two thousand" form; every other
/// four-digit year is read as two pairs ("nineteen ninety-nine",
/// "twenty twenty-three", "nineteen oh five", "nineteen hundred").
pub fn year_to_words(year: u32) -> String {
    if !(1000..=9999).contains(&year) || (2000..=2019).contains(&year) {
        return cardinal(year as u64);
    }
    let high = (year / 100) as u64;
    let low = (year % 100) as u64;
    let high_words = two_digits_to_words(high);
    match low {
        0 if year % 1000 == 0 => cardinal(year as u64),
        0 => format!("{} hundred", high_words),
        1..=9 => format!("{} oh {}", high_words, ONES[low as usize]),
        _ => format!("{} {}", high_words, two_digits_to_words(low)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Words → number (used to check that rendered amounts read back exactly)
// ─────────────────────────────────────────────────────────────────────────────

fn small_value(word: &str) -> Option<u64> {
    if word == "zero" {
        return Some(0);
    }
    if let Some(i) = ONES.iter().position(|w| !w.is_empty() && *w == word) {
        return Some(i as u64);
    }
    TENS.iter()
        .position(|w| !w.is_empty() && *w == word)
        .map(|i| i as u64 * 10)
}

/// Parse a cardinal produced by [`cardinal`] back into its value.
///
/// Accepts commas, hyphens and the connective "and"; returns `None` on any
/// word that is not part of a cardinal.
pub fn parse_cardinal(words: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut seen = false;

    for word in words
        .split(|c: char| c.is_whitespace() || c == ',' || c == '-')
        .filter(|w| !w.is_empty())
    {
        let word = word.to_lowercase();
        if word == "and" {
            continue;
        }
        seen = true;
        if let Some(v) = small_value(&word) {
            current += v;
        } else if word == "hundred" {
            current = current.max(1) * 100;
        } else if let Some(pos) = SCALE.iter().skip(1).position(|s| *s == word) {
            let multiplier = 1000u64.checked_pow(pos as u32 + 1)?;
            total = total.checked_add(current.max(1).checked_mul(multiplier)?)?;
            current = 0;
        } else {
            return None;
        }
    }
    if seen {
        total.checked_add(current)
    } else {
        None
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinal() {
        assert_eq!(cardinal(0), "zero");
        assert_eq!(cardinal(12), "twelve");
        assert_eq!(cardinal(40), "forty");
        assert_eq!(cardinal(1000), "one thousand");
        assert_eq!(cardinal(5681), "five thousand, six hundred eighty-one");
        assert_eq!(cardinal(1_000_005), "one million, five");
        assert_eq!(number_to_words(-42), "negative forty-two");
    }

    #[test]
    fn test_cardinal_digits_beyond_u64() {
        for n in [0u64, 7, 1000, 5681, 1_000_005, u64::MAX] {
            assert_eq!(cardinal_digits(&n.to_string()).as_deref(), Some(cardinal(n).as_str()));
        }
        assert_eq!(cardinal_digits("007").as_deref(), Some("seven"));
        let huge = cardinal_digits("99999999999999999999999").unwrap();
        assert!(huge.starts_with("ninety-nine sextillion, nine hundred ninety-nine quintillion"), "{huge}");
        assert!(huge.ends_with("nine hundred ninety-nine"));
        assert_eq!(cardinal_digits(&"1".repeat(40)), Some(digits_to_words(&"1".repeat(40))));
        assert_eq!(cardinal_digits("12a"), None);
        assert_eq!(cardinal_digits(""), None);
    }

    #[test]
    fn test_decimal_to_words() {
        assert_eq!(decimal_to_words("3.14").as_deref(), Some("three point one four"));
        assert_eq!(decimal_to_words(".5").as_deref(), Some("zero point five"));
        assert_eq!(decimal_to_words("-0.5").as_deref(), Some("negative zero point five"));
        assert_eq!(decimal_to_words("1,024.50").as_deref(), Some("one thousand, twenty-four point five zero"));
        assert_eq!(decimal_to_words("1.2.3"), None);
        let huge = decimal_to_words("99,999,999,999,999,999,999.99").unwrap();
        assert!(huge.starts_with("ninety-nine quintillion"), "{huge}");
        assert!(huge.ends_with("point nine nine"));
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(ordinal(1), "first");
        assert_eq!(ordinal(12), "twelfth");
        assert_eq!(ordinal(18), "eighteenth");
        assert_eq!(ordinal(20), "twentieth");
        assert_eq!(ordinal(21), "twenty-first");
        assert_eq!(ordinal(103), "one hundred third");
    }

    #[test]
    fn test_years() {
        assert_eq!(year_to_words(2013), "two thousand thirteen");
        assert_eq!(year_to_words(2023), "twenty twenty-three");
        assert_eq!(year_to_words(1999), "nineteen ninety-nine");
        assert_eq!(year_to_words(1905), "nineteen oh five");
        assert_eq!(year_to_words(1900), "nineteen hundred");
        assert_eq!(year_to_words(2000), "two thousand");
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits_to_words("007"), "zero zero seven");
    }

    #[test]
    fn test_parse_cardinal_reads_back() {
        for n in [0u64, 7, 19, 52, 100, 999, 5681, 1_000_005, 987_654_321] {
            assert_eq!(parse_cardinal(&cardinal(n)), Some(n), "n = {}", n);
        }
        assert_eq!(parse_cardinal("dollars"), None);
        assert_eq!(parse_cardinal(""), None);
    }
}
