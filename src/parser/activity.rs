//! Activity text cleanup
//!
//! Whatever is left of the sentence after every date, time, location and filler word has
//! been stripped is the activity.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::date_resolver::DateInfo;
use super::time_scanner::TimeMention;
use super::vocabulary::{
    is_numeric_token, whole_word, COMMON_WORDS, FILLER_PHRASES, LOCATION_PREPOSITIONS, MONTHS,
    RELATIVE_DAYS, RELATIVE_OFFSET, TIME_INDICATORS, TIME_PERIODS, WEEKDAYS,
};

/// Activity used when nothing survives the cleanup
pub const DEFAULT_ACTIVITY: &str = "event";

static DAY_QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    let targets = WEEKDAYS
        .iter()
        .chain(TIME_PERIODS.iter())
        .copied()
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:next|this)\s+({})\b", targets)).unwrap()
});

static FILLER_PATTERNS: Lazy<Vec<Regex>> =
    Lazy::new(|| FILLER_PHRASES.iter().copied().map(whole_word).collect());

static STRIPPED_WORDS: Lazy<Vec<Regex>> = Lazy::new(|| {
    WEEKDAYS
        .iter()
        .chain(MONTHS.iter())
        .chain(RELATIVE_DAYS.iter())
        .chain(TIME_INDICATORS.iter())
        .chain(LOCATION_PREPOSITIONS.iter())
        .chain(COMMON_WORDS.iter())
        .chain(TIME_PERIODS.iter())
        .copied()
        .map(whole_word)
        .collect()
});

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.,!?;]").unwrap());

/// Reduce a lowercased sentence to its activity description
///
/// `_date_info` is accepted so the call site documents that date resolution has already run;
/// date words are stripped by vocabulary rather than by position.
pub fn extract_clean_activity(
    sentence_lower: &str,
    _date_info: &DateInfo,
    locations: &[String],
    time_mentions: &[TimeMention],
) -> String {
    let mut cleaned = RELATIVE_OFFSET.replace_all(sentence_lower, "").into_owned();

    for location in locations {
        cleaned = whole_word(location).replace_all(&cleaned, "").into_owned();
    }

    for mention in time_mentions {
        let text = mention.full_match.trim();
        if !text.is_empty() {
            cleaned = whole_word(text).replace_all(&cleaned, "").into_owned();
        }
    }

    cleaned = DAY_QUALIFIER.replace_all(&cleaned, "$1").into_owned();

    for pattern in FILLER_PATTERNS.iter().chain(STRIPPED_WORDS.iter()) {
        cleaned = pattern.replace_all(&cleaned, "").into_owned();
    }

    let cleaned = PUNCTUATION.replace_all(&cleaned, "");
    let activity = cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 1 && !is_numeric_token(word))
        .collect::<Vec<_>>()
        .join(" ");

    debug!("Activity after cleanup: '{}'", activity);
    if activity.is_empty() {
        DEFAULT_ACTIVITY.to_string()
    } else {
        activity
    }
}
