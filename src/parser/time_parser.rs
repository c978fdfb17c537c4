//! Conversion of raw time tokens into 24-hour clock values

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::time_period::Meridiem;

static MERIDIEM_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*(a\.m\.|p\.m\.|am|pm)").unwrap());

/// Convert a 12-hour value to 24-hour form
fn convert_to_24_hour(hour: u32, meridiem: Option<Meridiem>) -> u32 {
    match (hour, meridiem) {
        (12, Some(Meridiem::Am)) => 0,
        (h, Some(Meridiem::Pm)) if h < 12 => h + 12,
        (h, _) => h,
    }
}

/// Meridiem written in the token itself, if exactly one kind is present
fn explicit_meridiem(token: &str) -> Option<Meridiem> {
    let is_pm = token.contains("p.m.") || token.contains("pm");
    let is_am = token.contains("a.m.") || token.contains("am");
    match (is_am, is_pm) {
        (true, false) => Some(Meridiem::Am),
        (false, true) => Some(Meridiem::Pm),
        _ => None,
    }
}

fn has_meridiem_marker(token: &str) -> bool {
    MERIDIEM_MARKER.is_match(token)
}

/// Parse a raw time token such as `5.30`, `2 p.m.` or `14`
///
/// `context` is only consulted when the token carries no AM/PM marker of its own. A single
/// minute digit is read as tens (`5.3` is 5:30). Without a separator the whole token is the
/// hour and `default_minute` is used.
///
/// Returns `None` for anything that is not a valid clock time.
pub fn parse_time_string(
    time_str: &str,
    default_minute: u32,
    context: Option<Meridiem>,
) -> Option<(u32, u32)> {
    let token = time_str.trim().to_lowercase();
    if token.is_empty() {
        return None;
    }

    let meridiem = if has_meridiem_marker(&token) {
        explicit_meridiem(&token)
    } else {
        context
    };
    let cleaned = MERIDIEM_MARKER.replace_all(&token, "");
    let cleaned = cleaned.trim();

    let (hour, minute) = match cleaned.split_once([':', '.']) {
        Some((hour_part, rest)) => {
            let hour = hour_part.trim().parse::<u32>().ok()?;
            let minute_part = rest.split([':', '.']).next().unwrap_or("").trim();
            let minute = if minute_part.is_empty() {
                default_minute
            } else {
                let value = minute_part.parse::<u32>().ok()?;
                if minute_part.len() == 1 {
                    value * 10
                } else {
                    value
                }
            };
            (hour, minute)
        }
        None => (cleaned.parse::<u32>().ok()?, default_minute),
    };

    let hour = convert_to_24_hour(hour, meridiem);
    if hour > 23 || minute > 59 {
        debug!(
            "Rejecting out-of-range time '{}' -> {}:{:02}",
            time_str, hour, minute
        );
        return None;
    }

    Some((hour, minute))
}
