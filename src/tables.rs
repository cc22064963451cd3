//! Static rule tables: number words live in [`crate::numbers`]; everything
//! else the normalizers look up by key is here.
//!
//! Pure data.  Lookups are case-sensitive unless the helper says otherwise.

// ─────────────────────────────────────────────────────────────────────────────
// Calendar
// ─────────────────────────────────────────────────────────────────────────────

pub const MONTHS: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December",
];

/// Month name (or its common abbreviation) → 1-based month number.
pub fn month_number(word: &str) -> Option<u32> {
    let lower = word.trim_end_matches('.').to_lowercase();
    if lower.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|m| {
            let m = m.to_lowercase();
            m == lower || (m.starts_with(&lower) && (lower.len() == 3 || lower == "sept"))
        })
        .map(|i| i as u32 + 1)
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency
// ─────────────────────────────────────────────────────────────────────────────

pub struct CurrencyUnit {
    pub symbol: char,
    pub singular: &'static str,
    pub plural: &'static str,
    /// `None` when the currency has no spoken sub-unit.
    pub minor: Option<(&'static str, &'static str)>,
}

pub const CURRENCIES: &[CurrencyUnit] = &[
    CurrencyUnit { symbol: '$', singular: "dollar", plural: "dollars", minor: Some(("cent", "cents")) },
    CurrencyUnit { symbol: '€', singular: "euro", plural: "euros", minor: Some(("cent", "cents")) },
    CurrencyUnit { symbol: '£', singular: "pound", plural: "pounds", minor: Some(("penny", "pence")) },
    CurrencyUnit { symbol: '¥', singular: "yen", plural: "yen", minor: None },
    CurrencyUnit { symbol: '₹', singular: "rupee", plural: "rupees", minor: Some(("paisa", "paise")) },
    CurrencyUnit { symbol: '₩', singular: "won", plural: "won", minor: None },
    CurrencyUnit { symbol: '₿', singular: "bitcoin", plural: "bitcoins", minor: None },
];

pub fn currency_unit(symbol: char) -> Option<&'static CurrencyUnit> {
    CURRENCIES.iter().find(|c| c.symbol == symbol)
}

/// Scale suffixes and words accepted after an amount.
pub const SCALES: &[(&str, &str)] = &[
    ("K", "thousand"),
    ("M", "million"),
    ("B", "billion"),
    ("T", "trillion"),
    ("thousand", "thousand"),
    ("million", "million"),
    ("billion", "billion"),
    ("trillion", "trillion"),
];

pub fn scale_word(suffix: &str) -> Option<&'static str> {
    SCALES
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(suffix) && (s.len() > 1 || *s == suffix))
        .map(|(_, w)| *w)
}

// ─────────────────────────────────────────────────────────────────────────────
// Units
// ─────────────────────────────────────────────────────────────────────────────

/// Unit abbreviation → (singular, plural).
pub const UNITS: &[(&str, &str, &str)] = &[
    ("%", "percent", "percent"),
    ("km", "kilometer", "kilometers"),
    ("cm", "centimeter", "centimeters"),
    ("mm", "millimeter", "millimeters"),
    ("mi", "mile", "miles"),
    ("ft", "foot", "feet"),
    ("kg", "kilogram", "kilograms"),
    ("mg", "milligram", "milligrams"),
    ("lb", "pound", "pounds"),
    ("lbs", "pound", "pounds"),
    ("oz", "ounce", "ounces"),
    ("ml", "milliliter", "milliliters"),
    ("kb", "kilobyte", "kilobytes"),
    ("mb", "megabyte", "megabytes"),
    ("gb", "gigabyte", "gigabytes"),
    ("tb", "terabyte", "terabytes"),
    ("hz", "hertz", "hertz"),
    ("khz", "kilohertz", "kilohertz"),
    ("mhz", "megahertz", "megahertz"),
    ("ghz", "gigahertz", "gigahertz"),
    ("mph", "mile per hour", "miles per hour"),
    ("kph", "kilometer per hour", "kilometers per hour"),
    ("s", "second", "seconds"),
    ("ms", "millisecond", "milliseconds"),
    ("ns", "nanosecond", "nanoseconds"),
    ("µs", "microsecond", "microseconds"),
    ("°c", "degree Celsius", "degrees Celsius"),
    ("°f", "degree Fahrenheit", "degrees Fahrenheit"),
    ("°", "degree", "degrees"),
];

pub fn unit_words(unit: &str) -> Option<(&'static str, &'static str)> {
    let lower = unit.to_lowercase();
    UNITS
        .iter()
        .find(|(abbr, _, _)| *abbr == lower)
        .map(|(_, one, many)| (*one, *many))
}

// ─────────────────────────────────────────────────────────────────────────────
// Contractions
// ─────────────────────────────────────────────────────────────────────────────

/// Whole-word contractions whose stem changes when expanded.
pub const IRREGULAR_CONTRACTIONS: &[(&str, &str)] = &[
    ("can't", "cannot"),
    ("won't", "will not"),
    ("shan't", "shall not"),
    ("ain't", "is not"),
    ("let's", "let us"),
    ("y'all", "you all"),
];

/// Suffix contractions: the stem is kept and the suffix replaced.
pub const CONTRACTION_SUFFIXES: &[(&str, &str)] = &[
    ("n't", " not"),
    ("'re", " are"),
    ("'ve", " have"),
    ("'ll", " will"),
    ("'d", " would"),
    ("'m", " am"),
];

/// Stems where `'s` means "is" rather than a possessive.
pub const IS_CONTRACTION_STEMS: &[&str] = &[
    "it", "he", "she", "that", "what", "where", "who", "there", "here", "how",
    "when", "why", "this",
];

// ─────────────────────────────────────────────────────────────────────────────
// Symbols
// ─────────────────────────────────────────────────────────────────────────────

/// Symbols with a spoken equivalent.
pub const SYMBOL_WORDS: &[(&str, &str)] = &[
    ("&", "and"),
    ("%", "percent"),
    ("@", "at"),
    ("+", "plus"),
    ("=", "equals"),
    ("°", "degrees"),
    ("×", "times"),
    ("÷", "divided by"),
    ("→", "to"),
    ("±", "plus or minus"),
    ("<", "less than"),
    (">", "greater than"),
];

/// Markdown emphasis and markup characters; silent when markdown stripping is on.
pub const MARKDOWN_SYMBOLS: &[&str] = &["*", "**", "***", "_", "__", "`", "```", "#", "##", "###", "~", "~~"];

/// Quotation marks; never spoken.
pub const QUOTES: &[&str] = &["\"", "“", "”", "„", "«", "»", "‘", "’", "'", "`"];

/// Brackets and dashes read as a short pause.
pub const PAUSE_SYMBOLS: &[&str] = &["(", ")", "[", "]", "{", "}", "—", "–", "--", "―"];

/// Terminal and clause punctuation passed through as-is.
pub const KEPT_PUNCTUATION: &[&str] = &[".", ",", ";", ":", "!", "?", "…", "...", "?!", "!?"];

// ─────────────────────────────────────────────────────────────────────────────
// Abbreviations and acronyms
// ─────────────────────────────────────────────────────────────────────────────

/// Titles read in full when followed by a period (or a name).
pub const TITLES: &[(&str, &str)] = &[
    ("Dr", "Doctor"),
    ("Mr", "Mister"),
    ("Mrs", "Missus"),
    ("Ms", "Miz"),
    ("Prof", "Professor"),
    ("Jr", "Junior"),
    ("Sr", "Senior"),
];

/// Latin-ish abbreviations that are always expanded.
pub const LATIN_ABBREVIATIONS: &[(&str, &str)] = &[("etc", "et cetera"), ("vs", "versus")];

/// Calendar eras, read letter by letter beside a year ("AD 1066" → "A D").
pub const ERA_MARKERS: &[&str] = &["AD", "BC", "BCE", "CE"];

pub fn is_era_marker(word: &str) -> bool {
    ERA_MARKERS.contains(&word)
}

/// Letter abbreviations with a full-phrase reading.
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("ASAP", "as soon as possible"),
    ("FYI", "for your information"),
    ("ETA", "estimated time of arrival"),
    ("DIY", "do it yourself"),
    ("BTW", "by the way"),
    ("IMO", "in my opinion"),
    ("AKA", "also known as"),
    ("TBD", "to be determined"),
    ("RSVP", "please reply"),
    ("FAQ", "frequently asked questions"),
];

/// All-caps tokens pronounced as a word rather than spelled.
pub const SPOKEN_AS_WORD: &[&str] = &[
    "NASA", "NATO", "SCUBA", "LASER", "RADAR", "UNICEF", "UNESCO", "FIFA", "OPEC",
    "GIF", "JPEG", "PIN", "SIM", "RAM", "ROM", "LAN", "WAN", "ASCII", "COVID",
    "AIDS", "NASDAQ", "IKEA", "LEGO", "SONAR", "SWAT", "POTUS", "CAPTCHA",
];

/// Short all-caps words that are plain English when shouted.
pub const COMMON_WORDS: &[&str] = &[
    "a", "about", "above", "account", "add", "admin", "after", "again", "all", "also",
    "and", "any", "app", "apps", "are", "article", "articles", "back", "bad", "bank",
    "be", "best", "big", "blog", "book", "books", "box", "but", "buy", "by", "call",
    "can", "car", "care", "cart", "case", "cat", "center", "chat", "check", "city",
    "class", "click", "cloud", "code", "come", "contact", "cool", "cost", "data",
    "day", "deal", "deals", "dev", "do", "doc", "docs", "dog", "done", "down",
    "download", "easy", "edit", "end", "event", "events", "faq", "fast", "file",
    "files", "find", "fine", "fire", "first", "food", "for", "form", "free", "from",
    "fun", "game", "games", "get", "give", "go", "good", "great", "group", "guide",
    "hat", "have", "he", "hello", "help", "her", "here", "hey", "him", "his", "home",
    "hot", "how", "in", "index", "info", "is", "it", "item", "items", "job", "jobs",
    "join", "just", "key", "kit", "lab", "last", "learn", "less", "life", "like",
    "line", "link", "links", "list", "live", "log", "login", "logout", "long", "look",
    "love", "mail", "main", "make", "man", "map", "me", "menu", "more", "most", "my",
    "name", "need", "net", "new", "news", "next", "no", "not", "note", "notes", "now",
    "of", "off", "office", "old", "on", "one", "only", "open", "or", "order", "our",
    "out", "over", "page", "pages", "part", "pay", "people", "photo", "photos",
    "place", "plan", "play", "please", "plus", "post", "posts", "price", "pro",
    "product", "products", "profile", "read", "real", "red", "register", "report",
    "reset", "review", "reviews", "right", "run", "sale", "save", "say", "school",
    "search", "see", "sell", "send", "service", "services", "set", "settings", "she",
    "shop", "show", "sign", "site", "sites", "so", "some", "space", "start", "started",
    "stop", "store", "story", "stuff", "support", "team", "tech", "terms", "test",
    "text", "that", "the", "them", "then", "there", "they", "thing", "this", "time",
    "to", "today", "tool", "tools", "top", "tour", "track", "true", "up", "update",
    "us", "use", "user", "users", "video", "videos", "view", "wait", "want", "was",
    "way", "we", "web", "week", "welcome", "well", "what", "when", "where", "who",
    "why", "wiki", "will", "with", "work", "world", "yes", "you", "your", "zone",
];

pub fn is_common_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    COMMON_WORDS.binary_search(&lower.as_str()).is_ok()
}

// ─────────────────────────────────────────────────────────────────────────────
// Proper nouns
// ─────────────────────────────────────────────────────────────────────────────

/// Built-in pronunciations.  A value wrapped in slashes is IPA.
pub const PROPER_NOUNS: &[(&str, &str)] = &[
    ("nginx", "engine x"),
    ("MySQL", "my S Q L"),
    ("SQLite", "S Q lite"),
    ("PostgreSQL", "postgres Q L"),
    ("Kubernetes", "koo-ber-NET-eez"),
    ("GitHub", "git hub"),
    ("GitLab", "git lab"),
    ("macOS", "mac O S"),
    ("iOS", "eye O S"),
    ("iPhone", "eye phone"),
    ("Linux", "/ˈlɪnəks/"),
    ("Ubuntu", "/ʊˈbʊntuː/"),
    ("Nguyen", "/wɪn/"),
    ("Xiaomi", "/ˈʃaʊmi/"),
    ("Huawei", "/ˈwɑːweɪ/"),
    ("Porsche", "/ˈpɔːrʃə/"),
];

// ─────────────────────────────────────────────────────────────────────────────
// Homographs
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pos {
    Noun,
    Verb,
    Adjective,
    /// Past tense / participle.
    Past,
}

#[derive(Debug, Clone, Copy)]
pub struct Sense {
    pub pos: Pos,
    pub ipa: &'static str,
    pub respelling: &'static str,
}

#[derive(Debug)]
pub struct HomographEntry {
    pub word: &'static str,
    pub senses: &'static [Sense],
    /// Index into `senses` used when context is inconclusive.
    pub default: usize,
}

impl HomographEntry {
    pub fn sense_for(&self, pos: Pos) -> Option<usize> {
        self.senses.iter().position(|s| s.pos == pos)
    }
}

const fn sense(pos: Pos, ipa: &'static str, respelling: &'static str) -> Sense {
    Sense { pos, ipa, respelling }
}

pub const HOMOGRAPHS: &[HomographEntry] = &[
    HomographEntry {
        word: "resume",
        senses: &[sense(Pos::Verb, "rɪˈzuːm", "rih-ZOOM"), sense(Pos::Noun, "ˈrɛzəmeɪ", "REZ-oo-may")],
        default: 0,
    },
    HomographEntry {
        word: "read",
        senses: &[sense(Pos::Verb, "ɹiːd", "reed"), sense(Pos::Past, "ɹɛd", "red")],
        default: 0,
    },
    HomographEntry {
        word: "live",
        senses: &[sense(Pos::Verb, "lɪv", "liv"), sense(Pos::Adjective, "laɪv", "lyve")],
        default: 0,
    },
    HomographEntry {
        word: "lead",
        senses: &[sense(Pos::Verb, "liːd", "leed"), sense(Pos::Noun, "lɛd", "led")],
        default: 0,
    },
    HomographEntry {
        word: "wind",
        senses: &[sense(Pos::Noun, "wɪnd", "wihnd"), sense(Pos::Verb, "waɪnd", "wynd")],
        default: 0,
    },
    HomographEntry {
        word: "tear",
        senses: &[sense(Pos::Noun, "tɪɹ", "teer"), sense(Pos::Verb, "tɛɹ", "tair")],
        default: 0,
    },
    HomographEntry {
        word: "close",
        senses: &[sense(Pos::Verb, "kloʊz", "klohz"), sense(Pos::Adjective, "kloʊs", "klohss")],
        default: 0,
    },
    HomographEntry {
        word: "record",
        senses: &[sense(Pos::Noun, "ˈɹɛkɚd", "REK-erd"), sense(Pos::Verb, "ɹɪˈkɔɹd", "rih-KORD")],
        default: 0,
    },
    HomographEntry {
        word: "present",
        senses: &[sense(Pos::Noun, "ˈpɹɛzənt", "PREZ-ent"), sense(Pos::Verb, "pɹɪˈzɛnt", "prih-ZENT")],
        default: 0,
    },
    HomographEntry {
        word: "project",
        senses: &[sense(Pos::Noun, "ˈpɹɑdʒɛkt", "PROJ-ekt"), sense(Pos::Verb, "pɹəˈdʒɛkt", "pruh-JEKT")],
        default: 0,
    },
    HomographEntry {
        word: "permit",
        senses: &[sense(Pos::Verb, "pɚˈmɪt", "per-MIT"), sense(Pos::Noun, "ˈpɝmɪt", "PUR-mit")],
        default: 0,
    },
    HomographEntry {
        word: "object",
        senses: &[sense(Pos::Noun, "ˈɑbdʒɛkt", "OB-jekt"), sense(Pos::Verb, "əbˈdʒɛkt", "uhb-JEKT")],
        default: 0,
    },
    HomographEntry {
        word: "content",
        senses: &[sense(Pos::Noun, "ˈkɑntɛnt", "KON-tent"), sense(Pos::Adjective, "kənˈtɛnt", "kuhn-TENT")],
        default: 0,
    },
    HomographEntry {
        word: "minute",
        senses: &[sense(Pos::Noun, "ˈmɪnɪt", "MIN-it"), sense(Pos::Adjective, "maɪˈnuːt", "my-NOOT")],
        default: 0,
    },
    HomographEntry {
        word: "refuse",
        senses: &[sense(Pos::Verb, "ɹɪˈfjuːz", "rih-FYOOZ"), sense(Pos::Noun, "ˈɹɛfjuːs", "REF-yoos")],
        default: 0,
    },
    HomographEntry {
        word: "produce",
        senses: &[sense(Pos::Verb, "pɹəˈduːs", "pruh-DOOS"), sense(Pos::Noun, "ˈpɹoʊduːs", "PROH-doos")],
        default: 0,
    },
    HomographEntry {
        word: "desert",
        senses: &[sense(Pos::Noun, "ˈdɛzɚt", "DEZ-ert"), sense(Pos::Verb, "dɪˈzɝt", "dih-ZURT")],
        default: 0,
    },
    HomographEntry {
        word: "use",
        senses: &[sense(Pos::Verb, "juːz", "yooz"), sense(Pos::Noun, "juːs", "yoos")],
        default: 0,
    },
];

pub fn homograph(word: &str) -> Option<&'static HomographEntry> {
    let lower = word.to_lowercase();
    HOMOGRAPHS.iter().find(|h| h.word == lower)
}

// ─────────────────────────────────────────────────────────────────────────────
// Function words used as context cues
// ─────────────────────────────────────────────────────────────────────────────

pub const DETERMINERS: &[&str] = &[
    "a", "an", "the", "my", "your", "his", "her", "its", "our", "their", "this",
    "that", "these", "those", "each", "every", "no", "some", "any",
];

pub const MODALS: &[&str] = &[
    "to", "will", "would", "can", "could", "shall", "should", "may", "might",
    "must", "please", "let's", "don't", "didn't", "won't", "can't",
];

pub const PAST_AUXILIARIES: &[&str] = &[
    "have", "has", "had", "was", "were", "been", "be", "being", "is", "are",
    "i've", "you've", "we've", "they've",
];

pub const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "we", "they", "he", "she", "it", "who"];

/// Copulas: "it is close" takes the adjective sense.
pub const COPULAS: &[&str] = &["is", "are", "was", "were", "be", "been", "seems", "looks", "feel", "feels"];

pub fn contains_ci(list: &[&str], word: &str) -> bool {
    let lower = word.to_lowercase();
    list.iter().any(|w| *w == lower)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
