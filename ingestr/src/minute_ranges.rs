//! Google Analytics realtime minute ranges, written as `"1-2,5-6"`.

use serde_derive::{Deserialize, Serialize};

use crate::common::*;

/// A realtime report window, counted in minutes before now.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteRange {
    /// A display name, like `"1-2 minutes ago"`.
    pub name: String,
    /// The older edge of the window.
    pub start_minutes_ago: u32,
    /// The newer edge of the window.
    pub end_minutes_ago: u32,
}

/// Parse a comma-separated list of `end-start` minute ranges. Spaces are
/// ignored, and so is anything after a second `-`.
pub fn parse_minute_ranges(ranges: &str) -> Result<Vec<MinuteRange>, MinuteRangeError> {
    let ranges = ranges.trim().replace(' ', "");
    ranges
        .split(',')
        .map(|range| {
            if !range.contains('-') {
                return Err(MinuteRangeError::MissingDash);
            }
            let mut parts = range.split('-');
            let end = parts.next().unwrap_or_default();
            let start = parts.next().unwrap_or_default();
            let end_minutes_ago = parse_minutes(end, range)?;
            let start_minutes_ago = parse_minutes(start, range)?;
            Ok(MinuteRange {
                name: format!("{}-{} minutes ago", end_minutes_ago, start_minutes_ago),
                start_minutes_ago,
                end_minutes_ago,
            })
        })
        .collect()
}

fn parse_minutes(digits: &str, range: &str) -> Result<u32, MinuteRangeError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MinuteRangeError::NotDigits(range.to_owned()));
    }
    digits
        .parse()
        .map_err(|_| MinuteRangeError::NotDigits(range.to_owned()))
}

#[test]
fn parses_ranges() {
    let ranges = parse_minute_ranges(" 1-2, 5 - 6 ").unwrap();
    assert_eq!(
        ranges,
        vec![
            MinuteRange {
                name: "1-2 minutes ago".to_owned(),
                start_minutes_ago: 2,
                end_minutes_ago: 1,
            },
            MinuteRange {
                name: "5-6 minutes ago".to_owned(),
                start_minutes_ago: 6,
                end_minutes_ago: 5,
            },
        ],
    );
}

#[test]
fn serializes_for_the_data_api() {
    let ranges = parse_minute_ranges("0-29").unwrap();
    let json = serde_json::to_value(&ranges[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "name": "0-29 minutes ago",
            "startMinutesAgo": 29,
            "endMinutesAgo": 0,
        }),
    );
}

#[test]
fn extra_dashes_are_ignored() {
    let ranges = parse_minute_ranges("1-2-3").unwrap();
    assert_eq!(ranges.len(), 1);
    assert_eq!(ranges[0].name, "1-2 minutes ago");
    assert_eq!(ranges[0].end_minutes_ago, 1);
    assert_eq!(ranges[0].start_minutes_ago, 2);
}

#[test]
fn rejects_bad_ranges() {
    assert_eq!(parse_minute_ranges(""), Err(MinuteRangeError::MissingDash));
    assert_eq!(parse_minute_ranges("1-2,5"), Err(MinuteRangeError::MissingDash));
    assert_eq!(
        parse_minute_ranges("a-2"),
        Err(MinuteRangeError::NotDigits("a-2".to_owned())),
    );
    assert_eq!(
        parse_minute_ranges("1-"),
        Err(MinuteRangeError::NotDigits("1-".to_owned())),
    );
    assert_eq!(
        parse_minute_ranges("-1-2"),
        Err(MinuteRangeError::NotDigits("-1-2".to_owned())),
    );
}
