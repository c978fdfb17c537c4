//! Word lists and compiled patterns shared by the pipeline stages

use once_cell::sync::Lazy;
use regex::Regex;

pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Weekday names, Monday first
pub const WEEKDAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub const RELATIVE_DAYS: [&str; 3] = ["today", "tomorrow", "tmrw"];

pub const LOCATION_PREPOSITIONS: [&str; 6] = ["at", "in", "on", "near", "around", "beside"];

/// Words after which a number still belongs to a place name ("room 101")
pub const LOCATION_NOUNS: [&str; 5] = ["room", "building", "floor", "apt", "apartment"];

/// Prepositions after which a number is read as the start of a place name
pub const NUMBERED_PLACE_PREPOSITIONS: [&str; 3] = ["at", "in", "on"];

pub const TIME_PERIODS: [&str; 5] = ["morning", "afternoon", "evening", "night", "tonight"];

/// Tokens that end a location phrase
pub const TIME_CONNECTORS: [&str; 9] = [
    "am", "pm", "a.m.", "p.m.", "to", "from", "until", "and", "then",
];

/// Spelled-out clock values, in scan order
pub const WORD_TIMES: [(&str, &str); 14] = [
    ("twelve", "12"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
    ("eleven", "11"),
    ("noon", "12"),
    ("midnight", "0"),
];

/// Time indicator words stripped from the activity
pub const TIME_INDICATORS: [&str; 13] = [
    "at", "from", "to", "until", "till", "by", "around", "about", "starting", "am", "pm", "a.m.",
    "p.m.",
];

/// Filler phrases stripped from the activity, applied in this order
pub const FILLER_PHRASES: [&str; 18] = [
    "i have",
    "i need",
    "i want",
    "let's",
    "we have",
    "there is",
    "there's",
    "schedule",
    "plan",
    "add",
    "can you",
    "please",
    "could you",
    "would you",
    "i am",
    "i will",
    "i am going to",
    "going to",
];

pub const COMMON_WORDS: [&str; 11] = [
    "a", "an", "the", "my", "your", "our", "their", "some", "any", "am", "will",
];

/// Articles and possessives dropped from the trailing edge of a location
pub const TRAILING_ARTICLES: [&str; 6] = ["the", "a", "an", "my", "your", "our"];

/// Articles dropped from the leading edge of a location
pub const LEADING_ARTICLES: [&str; 3] = ["the", "a", "an"];

pub fn is_time_word(token: &str) -> bool {
    WORD_TIMES.iter().any(|(word, _)| *word == token)
}

pub fn is_time_period(token: &str) -> bool {
    TIME_PERIODS.contains(&token)
}

pub fn is_location_preposition(token: &str) -> bool {
    LOCATION_PREPOSITIONS.contains(&token)
}

/// True for `12`, `5.30`, `2.00` and similar tokens
pub fn is_numeric_token(token: &str) -> bool {
    let digits: String = token.chars().filter(|&c| c != '.').collect();
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

/// Month number (1-12) for a lowercase month name
pub fn month_number(name: &str) -> Option<u32> {
    MONTHS.iter().position(|m| *m == name).map(|i| i as u32 + 1)
}

/// Compile a whole-word (or whole-phrase) matcher for a literal
///
/// A trailing `\b` is only required when the literal ends in a word character, so
/// `a.m.` still matches at the end of a sentence.
pub fn whole_word(literal: &str) -> Regex {
    let mut pattern = String::new();
    if literal.chars().next().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(literal));
    if literal.chars().last().is_some_and(is_word_char) {
        pattern.push_str(r"\b");
    }
    Regex::new(&pattern).unwrap()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

const MONTH_ALTERNATION: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

/// Calendar day offsets: `in N days/weeks/months`, in priority order
pub static RELATIVE_DATE_PATTERNS: Lazy<Vec<(Regex, DateUnit)>> = Lazy::new(|| {
    [
        (r"\bin\s+(\d+)\s+days?\b", DateUnit::Days),
        (r"\bin\s+(\d+)\s+weeks?\b", DateUnit::Weeks),
        (r"\bin\s+(\d+)\s+months?\b", DateUnit::Months),
    ]
    .into_iter()
    .map(|(pattern, unit)| (Regex::new(pattern).unwrap(), unit))
    .collect()
});

/// Clock offsets: `in N hours/minutes`, in priority order
pub static RELATIVE_TIME_PATTERNS: Lazy<Vec<(Regex, TimeUnit)>> = Lazy::new(|| {
    [
        (r"\bin\s+(\d+)\s+hours?\b", TimeUnit::Hours),
        (r"\bin\s+(\d+)\s+minutes?\b", TimeUnit::Minutes),
        (r"\bin\s+(\d+)\s+hrs?\b", TimeUnit::Hours),
        (r"\bin\s+(\d+)\s+mins?\b", TimeUnit::Minutes),
    ]
    .into_iter()
    .map(|(pattern, unit)| (Regex::new(pattern).unwrap(), unit))
    .collect()
});

pub static DAY_MONTH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(\d{{1,2}})\s+({})\b", MONTH_ALTERNATION)).unwrap()
});

pub static MONTH_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b({})\s+(\d{{1,2}})\b", MONTH_ALTERNATION)).unwrap()
});

const OFFSET_UNITS: &str = "days?|weeks?|months?|hours?|hrs?|minutes?|mins?";

/// Any relative offset phrase, date or clock
pub static RELATIVE_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\bin\s+\d+\s*(?:{OFFSET_UNITS})\b")).unwrap()
});

/// Text that ends with a clock offset, checked just before a candidate mention
pub static TRAILING_TIME_OFFSET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"in\s+\d+\s*(?:hours?|minutes?|hrs?|mins?)$").unwrap()
});

/// Leading `in ` of an offset phrase, checked just before a candidate number
pub static OFFSET_LEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bin\s+$").unwrap());

/// Unit word of an offset phrase, checked just after a candidate number
pub static OFFSET_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^\s*(?:{OFFSET_UNITS})\b")).unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Days,
    Weeks,
    Months,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Hours,
    Minutes,
}

/// Whether the span `start..end` is the number of a relative offset phrase
///
/// Covers both the operand itself (`2` in `in 2 days`) and anything glued directly to the end
/// of a clock offset.
pub fn is_relative_offset_operand(sentence: &str, start: usize, end: usize) -> bool {
    let before = &sentence[..start];
    let after = &sentence[end..];
    if OFFSET_LEAD.is_match(before) && OFFSET_UNIT.is_match(after) {
        return true;
    }

    let window_start = floor_char_boundary(sentence, start.saturating_sub(10));
    TRAILING_TIME_OFFSET.is_match(&sentence[window_start..start])
}

/// Whether the span `start..end` overlaps the day number of an explicit date (`5 march`)
pub fn is_explicit_date_day(sentence: &str, start: usize, end: usize) -> bool {
    let day_first = DAY_MONTH
        .captures_iter(sentence)
        .filter_map(|caps| caps.get(1));
    let month_first = MONTH_DAY
        .captures_iter(sentence)
        .filter_map(|caps| caps.get(2));
    day_first
        .chain(month_first)
        .any(|day| start < day.end() && end > day.start())
}

/// Month names, weekday names, `today`/`tomorrow` and `next`
pub fn is_date_word(token: &str) -> bool {
    let token = token.trim_end_matches(['.', ',', '!', '?', ';']);
    token == "next"
        || MONTHS.contains(&token)
        || WEEKDAYS.contains(&token)
        || RELATIVE_DAYS.contains(&token)
}

/// Largest char boundary not above `index`
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
