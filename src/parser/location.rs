//! Location extraction
//!
//! Reads place names that follow a location preposition (`at the cafe`, `in room 101`).
//! Time-of-day phrases (`in the morning`) and clock tokens (`at 7`) are not places; the
//! scanner's mentions are used to tell a time after `at` from a numbered place.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use super::time_scanner::TimeMention;
use super::vocabulary::{
    is_date_word, is_explicit_date_day, is_location_preposition, is_numeric_token,
    is_relative_offset_operand, is_time_period, is_time_word, LEADING_ARTICLES, LOCATION_NOUNS,
    NUMBERED_PLACE_PREPOSITIONS, TIME_CONNECTORS, TIME_PERIODS, TRAILING_ARTICLES,
};

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\S+").unwrap());

static MERIDIEM_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{1,2}(?:[.:]\d{2})?)?(?:[ap]\.m\.?|[ap]m)[.,!?;]*$").unwrap()
});

struct Token<'a> {
    text: &'a str,
    span: Range<usize>,
}

struct LocationScan<'a> {
    sentence: &'a str,
    tokens: Vec<Token<'a>>,
    mentions: &'a [TimeMention],
}

impl<'a> LocationScan<'a> {
    fn new(sentence: &'a str, mentions: &'a [TimeMention]) -> Self {
        let tokens = TOKEN
            .find_iter(sentence)
            .map(|m| Token {
                text: m.as_str(),
                span: m.range(),
            })
            .collect();
        Self {
            sentence,
            tokens,
            mentions,
        }
    }

    fn text(&self, index: usize) -> &'a str {
        self.tokens[index].text
    }

    /// Whether the number at `index` reads as part of a place name
    fn is_part_of_location(&self, index: usize) -> bool {
        if index == 0 || index >= self.tokens.len() {
            return false;
        }
        let previous = self.text(index - 1);
        if LOCATION_NOUNS.contains(&previous) {
            return true;
        }
        if !NUMBERED_PLACE_PREPOSITIONS.contains(&previous) {
            return false;
        }

        let span = &self.tokens[index].span;
        let claimed_by_time = self
            .mentions
            .iter()
            .any(|m| span.start < m.end_position && span.end > m.position);
        !claimed_by_time
            && !is_relative_offset_operand(self.sentence, span.start, span.end)
            && !is_explicit_date_day(self.sentence, span.start, span.end)
    }

    fn is_stray_number(&self, index: usize) -> bool {
        is_numeric_token(self.text(index)) && !self.is_part_of_location(index)
    }

    fn starts_with_time(&self, index: usize) -> bool {
        let next = self.text(index);
        if is_time_period(next) {
            return true;
        }
        if next == "the" && index + 1 < self.tokens.len() && is_time_period(self.text(index + 1)) {
            return true;
        }
        is_time_word(next)
            || is_date_word(next)
            || self.is_stray_number(index)
            || MERIDIEM_TOKEN.is_match(next)
    }

    fn ends_phrase(&self, index: usize) -> bool {
        let word = self.text(index);
        is_location_preposition(word)
            || TIME_CONNECTORS.contains(&word)
            || self.is_stray_number(index)
            || is_time_word(word)
            || is_time_period(word)
            || is_date_word(word)
    }

    fn phrase_after(&self, preposition: usize) -> Option<String> {
        let first = preposition + 1;
        if first >= self.tokens.len() || self.starts_with_time(first) {
            return None;
        }

        let mut words: Vec<&str> = Vec::new();
        let mut j = first;
        while j < self.tokens.len() && !self.ends_phrase(j) {
            words.push(self.text(j));
            j += 1;
        }
        clean_phrase(words)
    }
}

fn clean_phrase(mut words: Vec<&str>) -> Option<String> {
    if let Some(last) = words.last_mut() {
        *last = last.trim_end_matches(['.', ',', '!', '?', ';']);
    }
    words.retain(|w| !w.is_empty());

    if words.len() > 1 && words.last().is_some_and(|w| TRAILING_ARTICLES.contains(w)) {
        words.pop();
    }
    if words.len() > 1 && LEADING_ARTICLES.contains(&words[0]) {
        words.remove(0);
    }
    if words.is_empty() || (words.len() == 1 && TRAILING_ARTICLES.contains(&words[0])) {
        return None;
    }

    let location = words.join(" ");
    if TIME_PERIODS.iter().any(|period| location.contains(period)) {
        return None;
    }
    Some(location)
}

/// Extract every location phrase from a lowercased sentence, in order of appearance
pub fn extract_locations(sentence_lower: &str, time_mentions: &[TimeMention]) -> Vec<String> {
    let scan = LocationScan::new(sentence_lower, time_mentions);

    let locations: Vec<String> = (0..scan.tokens.len())
        .filter(|&i| is_location_preposition(scan.text(i)))
        .filter_map(|i| scan.phrase_after(i))
        .collect();

    debug!("Extracted locations: {:?}", locations);
    locations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::time_scanner::extract_all_time_mentions;
    use pretty_assertions::assert_eq;

    fn locations(sentence: &str) -> Vec<String> {
        let mentions = extract_all_time_mentions(sentence);
        extract_locations(sentence, &mentions)
    }

    #[test]
    fn test_basic_place() {
        assert_eq!(locations("lunch at the cafe from 12 to 1pm"), vec!["cafe"]);
        assert_eq!(
            locations("coffee near central park tomorrow"),
            vec!["central park"]
        );
    }

    #[test]
    fn test_time_periods_are_not_places() {
        assert!(locations("run in the morning").is_empty());
        assert!(locations("read on evening walks").is_empty());
        assert!(locations("call mom at night").is_empty());
    }

    #[test]
    fn test_article_before_period_is_not_a_place() {
        assert!(locations("jog at the evening track").is_empty());
        assert!(locations("rest on the night shift").is_empty());
        assert_eq!(
            locations("jog at the evening track near the lake"),
            vec!["lake"]
        );
    }

    #[test]
    fn test_times_are_not_places() {
        assert!(locations("dinner at 7").is_empty());
        assert!(locations("dinner at 7pm").is_empty());
        assert!(locations("dinner at seven").is_empty());
        assert!(locations("call mom in 2 hours").is_empty());
    }

    #[test]
    fn test_dates_are_not_places() {
        assert!(locations("party on 24 november").is_empty());
        assert!(locations("gym on friday").is_empty());
        assert_eq!(locations("drinks at the pub on march 5"), vec!["pub"]);
    }

    #[test]
    fn test_numbered_places() {
        assert_eq!(locations("meeting in room 101 at 3pm"), vec!["room 101"]);
        assert_eq!(
            locations("party at 221 baker street"),
            vec!["221 baker street"]
        );
    }

    #[test]
    fn test_phrase_stops_at_connectors() {
        assert_eq!(
            locations("gym at the y and then lunch at joe's diner"),
            vec!["y", "joe's diner"]
        );
        assert_eq!(locations("study at library, then nap"), vec!["library"]);
    }

    #[test]
    fn test_trailing_article_dropped() {
        assert_eq!(locations("meet at office the"), vec!["office"]);
        assert!(locations("meet at the").is_empty());
    }
}
