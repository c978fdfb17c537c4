//! Time mention scanning
//!
//! Finds every clock time and time range in a lowercased sentence. Rules run from most to
//! least specific and each accepted mention claims its span, so `from 2 to 4pm` is taken as
//! one range before the bare-number rule can see the `2` or the `4`.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;

use super::vocabulary::{is_explicit_date_day, is_relative_offset_operand, whole_word, WORD_TIMES};

/// Tag of the rule that produced a mention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternTag {
    RangeAmPm,
    Range,
    FullTimeAmPm,
    TimeAmPm,
    DecimalTime,
    AtTime,
    OClock,
    Standalone,
    WordTime,
}

impl PatternTag {
    pub fn is_range(self) -> bool {
        matches!(self, PatternTag::RangeAmPm | PatternTag::Range)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentionType {
    Single,
    Range,
}

/// A substring of the sentence that denotes a time or a time range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMention {
    /// Byte offset of the whole match in the lowercased sentence
    pub position: usize,
    pub end_position: usize,
    pub pattern: PatternTag,
    pub kind: MentionType,
    /// Raw start token, e.g. `5.30` or `2 p.m.`
    pub time: String,
    pub time_span: Range<usize>,
    /// Raw end token, ranges only
    pub end_time: Option<String>,
    pub end_time_span: Option<Range<usize>>,
    /// Exact matched text
    pub full_match: String,
}

impl TimeMention {
    pub fn span(&self) -> Range<usize> {
        self.position..self.end_position
    }

    fn overlaps(&self, span: &Range<usize>) -> bool {
        span.start < self.end_position && span.end > self.position
    }
}

const AMPM: &str = r"(?:a\.m\.|p\.m\.|(?:am|pm)\b)";

struct ScanRule {
    tag: PatternTag,
    regex: Regex,
}

static SCAN_RULES: Lazy<Vec<ScanRule>> = Lazy::new(|| {
    let clock = r"\d{1,2}(?:[.:]\d{2})?";
    let lead = r"\b(?:from|between)\s+";
    let to = r"\s+(?:to|until|till|-)\s+";
    // Ranges with a marker on the end, then on the start only, then with none
    let rules = [
        (
            PatternTag::RangeAmPm,
            format!(r"{lead}({clock}\s*{AMPM}?){to}({clock}\s*{AMPM})"),
        ),
        (
            PatternTag::RangeAmPm,
            format!(r"{lead}({clock}\s*{AMPM}){to}({clock})"),
        ),
        (PatternTag::Range, format!(r"{lead}({clock}){to}({clock})")),
        (
            PatternTag::FullTimeAmPm,
            format!(r"(\d{{1,2}}[.:]\d{{2}}\s*{AMPM})"),
        ),
        (PatternTag::TimeAmPm, format!(r"(\d{{1,2}}\s*{AMPM})")),
        (PatternTag::DecimalTime, r"(\d{1,2}[.:]\d{2})".to_string()),
        (
            PatternTag::AtTime,
            format!(r"\b(?:at|by)\s+({clock}(?:\s*{AMPM}|\b))"),
        ),
        (
            PatternTag::OClock,
            r"(\d{1,2})\s*(?:o'clock|oclock|clock)".to_string(),
        ),
    ];

    rules
        .into_iter()
        .map(|(tag, pattern)| ScanRule {
            tag,
            regex: Regex::new(&pattern).unwrap(),
        })
        .collect()
});

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

static WORD_TIME_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    WORD_TIMES
        .iter()
        .map(|(word, value)| (whole_word(word), *value))
        .collect()
});

/// Scan a lowercased sentence for time mentions
///
/// The result is ordered by position and its spans never overlap.
pub fn extract_all_time_mentions(sentence_lower: &str) -> Vec<TimeMention> {
    let mut mentions: Vec<TimeMention> = Vec::new();

    for rule in SCAN_RULES.iter() {
        for caps in rule.regex.captures_iter(sentence_lower) {
            let (Some(whole), Some(first)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let second = if rule.tag.is_range() {
                caps.get(2)
            } else {
                None
            };

            let mention = TimeMention {
                position: whole.start(),
                end_position: whole.end(),
                pattern: rule.tag,
                kind: if second.is_some() {
                    MentionType::Range
                } else {
                    MentionType::Single
                },
                time: first.as_str().trim().to_string(),
                time_span: first.range(),
                end_time: second.map(|m| m.as_str().trim().to_string()),
                end_time_span: second.map(|m| m.range()),
                full_match: whole.as_str().to_string(),
            };
            try_accept(sentence_lower, &mut mentions, mention);
        }
    }

    // Bare 1-2 digit numbers not glued to other digits or followed by a separator
    for run in DIGIT_RUN.find_iter(sentence_lower) {
        let followed_by_separator = sentence_lower[run.end()..].starts_with(['.', ':']);
        if run.as_str().len() > 2 || followed_by_separator {
            continue;
        }
        let candidate = single(
            run.range(),
            run.as_str(),
            PatternTag::Standalone,
            run.as_str(),
        );
        try_accept(sentence_lower, &mut mentions, candidate);
    }

    for (regex, value) in WORD_TIME_RULES.iter() {
        for m in regex.find_iter(sentence_lower) {
            let candidate = single(m.range(), value, PatternTag::WordTime, m.as_str());
            try_accept(sentence_lower, &mut mentions, candidate);
        }
    }

    mentions.sort_by_key(|m| m.position);

    let mut seen = HashSet::new();
    mentions.retain(|m| seen.insert((m.position, m.time.clone(), m.end_time.clone())));

    let found: Vec<&str> = mentions.iter().map(|m| m.full_match.as_str()).collect();
    debug!("Found {} time mentions: {:?}", mentions.len(), found);
    mentions
}

fn single(span: Range<usize>, time: &str, pattern: PatternTag, full_match: &str) -> TimeMention {
    TimeMention {
        position: span.start,
        end_position: span.end,
        pattern,
        kind: MentionType::Single,
        time: time.to_string(),
        time_span: span,
        end_time: None,
        end_time_span: None,
        full_match: full_match.to_string(),
    }
}

fn try_accept(sentence_lower: &str, mentions: &mut Vec<TimeMention>, candidate: TimeMention) {
    if is_relative_offset_operand(sentence_lower, candidate.position, candidate.end_position) {
        debug!(
            "Skipping relative offset operand '{}'",
            candidate.full_match
        );
        return;
    }
    if is_explicit_date_day(sentence_lower, candidate.position, candidate.end_position) {
        debug!("Skipping day of explicit date '{}'", candidate.full_match);
        return;
    }
    let span = candidate.span();
    if mentions.iter().any(|existing| existing.overlaps(&span)) {
        return;
    }
    mentions.push(candidate);
}
