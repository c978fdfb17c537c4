//! Morning/afternoon/evening cues for times written without AM or PM

use std::ops::Range;

/// Half of the day implied by a time or its surroundings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Meridiem {
    Am,
    Pm,
}

/// Characters of context inspected on each side of a mention
pub const CONTEXT_WINDOW: usize = 30;

/// Checked in order, first hit wins
const PERIOD_INDICATORS: [(&str, Meridiem); 5] = [
    ("morning", Meridiem::Am),
    ("afternoon", Meridiem::Pm),
    ("evening", Meridiem::Pm),
    ("night", Meridiem::Pm),
    ("tonight", Meridiem::Pm),
];

/// Look for a time-of-day word near `span` of the lowercased sentence
pub fn detect_time_period(sentence_lower: &str, span: Range<usize>) -> Option<Meridiem> {
    let context = context_window(sentence_lower, span);
    PERIOD_INDICATORS
        .iter()
        .find(|(indicator, _)| context.contains(indicator))
        .map(|(_, meridiem)| *meridiem)
}

/// Up to [`CONTEXT_WINDOW`] characters before the span through the same after it
fn context_window(sentence: &str, span: Range<usize>) -> &str {
    let start = sentence[..span.start]
        .char_indices()
        .rev()
        .nth(CONTEXT_WINDOW - 1)
        .map_or(0, |(i, _)| i);
    let end = sentence[span.end..]
        .char_indices()
        .nth(CONTEXT_WINDOW)
        .map_or(sentence.len(), |(i, _)| span.end + i);
    &sentence[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detect(sentence: &str, token: &str) -> Option<Meridiem> {
        let start = sentence.find(token).unwrap();
        detect_time_period(sentence, start..start + token.len())
    }

    #[test]
    fn test_period_words() {
        assert_eq!(detect("run at 6 in the morning", "6"), Some(Meridiem::Am));
        assert_eq!(detect("tea at 4 this afternoon", "4"), Some(Meridiem::Pm));
        assert_eq!(detect("dinner tonight at 8", "8"), Some(Meridiem::Pm));
        assert_eq!(detect("movie at 9", "9"), None);
    }

    #[test]
    fn test_morning_checked_before_evening() {
        assert_eq!(
            detect("from morning until 5 in the evening", "5"),
            Some(Meridiem::Am)
        );
    }

    #[test]
    fn test_window_is_bounded() {
        let sentence = format!("morning{}call at 3", " ".repeat(40));
        assert_eq!(detect(&sentence, "3"), None);
    }

    #[test]
    fn test_window_respects_multibyte_text() {
        assert_eq!(
            detect("café rendezvous at 7 ce soir ánd night", "7"),
            Some(Meridiem::Pm)
        );
    }
}
