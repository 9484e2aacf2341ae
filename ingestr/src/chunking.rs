//! Splitting time ranges into smaller pieces, for APIs which limit how much
//! data we may request at once or which we want to query in parallel.

use chrono::{DateTime, Duration, Utc};

use crate::common::*;

/// 2015-01-01T00:00:00Z.
const YEAR_2015_TS: i64 = 1_420_070_400;
/// 2020-01-01T00:00:00Z.
const YEAR_2020_TS: i64 = 1_577_836_800;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;
const SECONDS_PER_YEAR: i64 = 365 * SECONDS_PER_DAY;

/// Split the Unix-timestamp range `start_ts..end_ts` into at most
/// `num_chunks` contiguous `(start, end)` pieces of equal length, rounding
/// the length up. The last piece may be shorter.
pub fn time_chunks(
    start_ts: i64,
    end_ts: i64,
    num_chunks: usize,
) -> Result<Vec<(i64, i64)>, ChunkError> {
    if num_chunks == 0 {
        return Err(ChunkError::ZeroChunks);
    }
    if start_ts >= end_ts {
        return Ok(vec![]);
    }

    let total = end_ts.saturating_sub(start_ts);
    let n = i64::try_from(num_chunks).unwrap_or(i64::MAX);
    let chunk_duration = total / n + i64::from(total % n != 0);

    let mut chunks = Vec::with_capacity(num_chunks.min(1024));
    let mut current_start = start_ts;
    while current_start < end_ts && chunks.len() < num_chunks {
        let current_end = current_start.saturating_add(chunk_duration).min(end_ts);
        chunks.push((current_start, current_end));
        current_start = current_end;
    }
    Ok(chunks)
}

/// Split `start_ts..end_ts` into chunks sized for how much data we expect in
/// each era: a few big chunks before 2015, roughly six-month chunks from 2015
/// to 2020, and one chunk per day after that.
pub fn adaptive_time_chunks(
    start_ts: i64,
    end_ts: i64,
    max_workers: usize,
) -> Result<Vec<(i64, i64)>, ChunkError> {
    let mut chunks = vec![];
    let mut current_start = start_ts;

    if current_start < YEAR_2015_TS {
        let chunk_end = YEAR_2015_TS.min(end_ts);
        if current_start < chunk_end {
            chunks.extend(time_chunks(current_start, chunk_end, max_workers.min(3))?);
        }
        current_start = chunk_end;
    }

    if current_start < YEAR_2020_TS && current_start < end_ts {
        let chunk_end = YEAR_2020_TS.min(end_ts);
        if current_start < chunk_end {
            let years = (chunk_end - current_start) as f64 / SECONDS_PER_YEAR as f64;
            let half_years = (years * 2.0) as usize;
            let num_chunks = max_workers.min(half_years.max(2));
            chunks.extend(time_chunks(current_start, chunk_end, num_chunks)?);
        }
        current_start = chunk_end;
    }

    while current_start < end_ts {
        let chunk_end = current_start.saturating_add(SECONDS_PER_DAY).min(end_ts);
        chunks.push((current_start, chunk_end));
        current_start = chunk_end;
    }

    trace!(
        "split {}..{} into {} adaptive chunks",
        start_ts,
        end_ts,
        chunks.len()
    );
    Ok(chunks)
}

/// Split `start..=end` into windows at most `max_days` long. Each window ends
/// `max_days` after it starts (or at `end`), and the next window starts one
/// day after that.
pub fn date_windows(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    max_days: u32,
) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, ChunkError> {
    if max_days == 0 {
        return Err(ChunkError::ZeroDays);
    }
    let window = Duration::days(i64::from(max_days));
    let step = Duration::days(1);

    let mut windows = vec![];
    let mut current_start = start;
    while current_start <= end {
        let current_end = current_start
            .checked_add_signed(window)
            .map_or(end, |window_end| window_end.min(end));
        windows.push((current_start, current_end));
        match current_end.checked_add_signed(step) {
            Some(next) => current_start = next,
            None => break,
        }
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn equal_chunks() {
        assert_eq!(
            time_chunks(0, 100, 4).unwrap(),
            vec![(0, 25), (25, 50), (50, 75), (75, 100)],
        );
    }

    #[test]
    fn uneven_chunks_round_up_and_clamp() {
        assert_eq!(
            time_chunks(0, 10, 3).unwrap(),
            vec![(0, 4), (4, 8), (8, 10)],
        );
        assert_eq!(time_chunks(0, 10, 4).unwrap(), vec![(0, 3), (3, 6), (6, 9), (9, 10)]);
        // Rounding up can leave us with fewer chunks than asked for.
        assert_eq!(time_chunks(0, 2, 5).unwrap(), vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn empty_and_inverted_ranges() {
        assert!(time_chunks(5, 5, 3).unwrap().is_empty());
        assert!(time_chunks(10, 5, 3).unwrap().is_empty());
        assert_eq!(time_chunks(0, 10, 0), Err(ChunkError::ZeroChunks));
    }

    #[test]
    fn adaptive_chunks_cover_range_without_gaps() {
        let start = YEAR_2015_TS - 3 * SECONDS_PER_YEAR;
        let end = YEAR_2020_TS + 3 * SECONDS_PER_DAY + 100;
        let chunks = adaptive_time_chunks(start, end, 8).unwrap();

        assert_eq!(chunks.first().unwrap().0, start);
        assert_eq!(chunks.last().unwrap().1, end);
        for pair in chunks.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }

        let pre_2015 = chunks.iter().filter(|c| c.1 <= YEAR_2015_TS).count();
        assert_eq!(pre_2015, 3);
        let mid = chunks
            .iter()
            .filter(|c| c.0 >= YEAR_2015_TS && c.1 <= YEAR_2020_TS)
            .count();
        assert_eq!(mid, 8);
        let post_2020 = chunks.iter().filter(|c| c.0 >= YEAR_2020_TS).count();
        assert_eq!(post_2020, 4);
    }

    #[test]
    fn adaptive_chunks_after_2020_are_daily() {
        let start = YEAR_2020_TS + 10 * SECONDS_PER_DAY;
        let chunks = adaptive_time_chunks(start, start + 2 * SECONDS_PER_DAY, 4).unwrap();
        assert_eq!(
            chunks,
            vec![
                (start, start + SECONDS_PER_DAY),
                (start + SECONDS_PER_DAY, start + 2 * SECONDS_PER_DAY),
            ],
        );
    }

    #[test]
    fn adaptive_chunks_need_workers_for_old_data() {
        assert_eq!(
            adaptive_time_chunks(0, YEAR_2015_TS, 0),
            Err(ChunkError::ZeroChunks),
        );
    }

    fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn short_range_is_one_window() {
        assert_eq!(
            date_windows(day(2024, 1, 1), day(2024, 1, 20), 30).unwrap(),
            vec![(day(2024, 1, 1), day(2024, 1, 20))],
        );
        assert_eq!(
            date_windows(day(2024, 1, 1), day(2024, 1, 31), 30).unwrap(),
            vec![(day(2024, 1, 1), day(2024, 1, 31))],
        );
    }

    #[test]
    fn window_boundaries() {
        assert_eq!(
            date_windows(day(2024, 1, 1), day(2024, 2, 15), 30).unwrap(),
            vec![
                (day(2024, 1, 1), day(2024, 1, 31)),
                (day(2024, 2, 1), day(2024, 2, 15)),
            ],
        );
        assert_eq!(
            date_windows(day(2024, 1, 1), day(2024, 3, 1), 30).unwrap().len(),
            2,
        );
        assert_eq!(
            date_windows(day(2024, 1, 1), day(2024, 4, 1), 30).unwrap(),
            vec![
                (day(2024, 1, 1), day(2024, 1, 31)),
                (day(2024, 2, 1), day(2024, 3, 2)),
                (day(2024, 3, 3), day(2024, 4, 1)),
            ],
        );
    }

    #[test]
    fn degenerate_windows() {
        assert!(date_windows(day(2024, 2, 1), day(2024, 1, 1), 30)
            .unwrap()
            .is_empty());
        assert_eq!(
            date_windows(day(2024, 1, 1), day(2024, 1, 1), 30).unwrap(),
            vec![(day(2024, 1, 1), day(2024, 1, 1))],
        );
        assert_eq!(
            date_windows(day(2024, 1, 1), day(2024, 1, 2), 0),
            Err(ChunkError::ZeroDays),
        );
    }
}
