//! Per-user course ratings: one entry per user, aggregates recomputed on every change.

use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::db::models::RatingEntry;

pub(crate) const MIN_RATING: u8 = 1;
pub(crate) const MAX_RATING: u8 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum RatingError {
    #[error("Rating must be a number between 1 and 5")]
    OutOfRange,
    #[error("Rating must be a whole number between 1 and 5")]
    NotWholeNumber,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RatingSummary {
    pub(crate) avg_rating: f64,
    pub(crate) total_ratings: i32,
}

/// Strict counterpart to the lenient course coercion: only a whole number from 1 to 5,
/// given as a JSON number or a numeric string, is accepted.
pub(crate) fn parse_rating(raw: &Value) -> Result<u8, RatingError> {
    let value = match raw {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or(RatingError::OutOfRange)?;

    let in_range = value.is_finite()
        && value >= f64::from(MIN_RATING)
        && value <= f64::from(MAX_RATING);

    if !in_range {
        return Err(RatingError::OutOfRange);
    }
    if value.fract() != 0.0 {
        return Err(RatingError::NotWholeNumber);
    }
    Ok(value as u8)
}

/// Inserts or updates `user_id`'s entry and returns the recomputed aggregate.
///
/// An existing entry keeps its comment unless the new one has visible text.
pub(crate) fn apply_rating(
    ratings: &mut Vec<RatingEntry>,
    user_id: &str,
    rating: u8,
    comment: &str,
    now: OffsetDateTime,
) -> RatingSummary {
    let comment = comment.trim();

    match ratings.iter_mut().find(|entry| entry.user_id == user_id) {
        Some(entry) => {
            entry.rating = rating;
            if !comment.is_empty() {
                entry.comment = comment.to_string();
            }
            entry.updated_at = now;
        }
        None => ratings.push(RatingEntry {
            user_id: user_id.to_string(),
            rating,
            comment: comment.to_string(),
            updated_at: now,
        }),
    }

    summarize(ratings)
}

pub(crate) fn summarize(ratings: &[RatingEntry]) -> RatingSummary {
    if ratings.is_empty() {
        return RatingSummary { avg_rating: 0.0, total_ratings: 0 };
    }

    let sum: f64 = ratings.iter().map(|entry| f64::from(entry.rating)).sum();
    let mean = sum / ratings.len() as f64;

    RatingSummary {
        avg_rating: (mean * 100.0).round() / 100.0,
        total_ratings: i32::try_from(ratings.len()).unwrap_or(i32::MAX),
    }
}

pub(crate) fn find_rating<'a>(ratings: &'a [RatingEntry], user_id: &str) -> Option<&'a RatingEntry> {
    ratings.iter().find(|entry| entry.user_id == user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(seconds: i64) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000 + seconds).unwrap()
    }

    #[test]
    fn parse_rating_accepts_whole_numbers_in_range() {
        assert_eq!(parse_rating(&json!(1)), Ok(1));
        assert_eq!(parse_rating(&json!(5.0)), Ok(5));
        assert_eq!(parse_rating(&json!(" 4 ")), Ok(4));
    }

    #[test]
    fn parse_rating_rejects_everything_else() {
        for raw in [json!(0), json!(6), json!("abc"), json!(""), json!(null), json!(5.5), json!(true)]
        {
            assert_eq!(parse_rating(&raw), Err(RatingError::OutOfRange), "input: {raw}");
        }
    }

    #[test]
    fn parse_rating_rejects_fractions_in_range_as_not_whole() {
        for raw in [json!(4.5), json!("2.25"), json!(1.1)] {
            assert_eq!(parse_rating(&raw), Err(RatingError::NotWholeNumber), "input: {raw}");
        }
        assert_ne!(
            RatingError::NotWholeNumber.to_string(),
            RatingError::OutOfRange.to_string()
        );
    }

    #[test]
    fn average_of_three_and_five_is_four() {
        let mut ratings = Vec::new();
        apply_rating(&mut ratings, "user-a", 3, "", at(0));
        let summary = apply_rating(&mut ratings, "user-b", 5, "", at(1));
        assert_eq!(summary, RatingSummary { avg_rating: 4.0, total_ratings: 2 });

        let summary = apply_rating(&mut ratings, "user-c", 4, "", at(2));
        assert_eq!(summary, RatingSummary { avg_rating: 4.0, total_ratings: 3 });
    }

    #[test]
    fn rerating_updates_in_place() {
        let mut ratings = Vec::new();
        apply_rating(&mut ratings, "user-a", 4, "solid", at(0));
        let summary = apply_rating(&mut ratings, "user-a", 5, "   ", at(10));

        assert_eq!(summary, RatingSummary { avg_rating: 5.0, total_ratings: 1 });
        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].rating, 5);
        assert_eq!(ratings[0].comment, "solid");
        assert_eq!(ratings[0].updated_at, at(10));
    }

    #[test]
    fn rerating_with_comment_replaces_it() {
        let mut ratings = Vec::new();
        apply_rating(&mut ratings, "user-a", 2, "meh", at(0));
        apply_rating(&mut ratings, "user-a", 4, "  better now ", at(1));

        assert_eq!(ratings[0].comment, "better now");
    }

    #[test]
    fn repeated_identical_submission_is_idempotent() {
        let mut ratings = Vec::new();
        apply_rating(&mut ratings, "user-b", 2, "", at(0));
        let first = apply_rating(&mut ratings, "user-a", 5, "", at(1));
        let second = apply_rating(&mut ratings, "user-a", 5, "", at(2));

        assert_eq!(first, second);
        assert_eq!(ratings.len(), 2);
    }

    #[test]
    fn aggregate_does_not_depend_on_submission_order() {
        let submissions = [("a", 5u8), ("b", 2), ("c", 4), ("a", 1), ("d", 3)];

        let mut forward = Vec::new();
        for (user, rating) in submissions {
            apply_rating(&mut forward, user, rating, "", at(0));
        }

        // Same final per-user ratings, applied in another order.
        let mut reordered = Vec::new();
        for (user, rating) in [("d", 3u8), ("c", 4), ("a", 1), ("b", 2)] {
            apply_rating(&mut reordered, user, rating, "", at(0));
        }

        assert_eq!(summarize(&forward), summarize(&reordered));
        assert_eq!(summarize(&forward), RatingSummary { avg_rating: 2.5, total_ratings: 4 });
    }

    #[test]
    fn average_is_rounded_to_two_decimals() {
        let mut ratings = Vec::new();
        apply_rating(&mut ratings, "a", 5, "", at(0));
        apply_rating(&mut ratings, "b", 4, "", at(0));
        let summary = apply_rating(&mut ratings, "c", 4, "", at(0));

        assert_eq!(summary.avg_rating, 4.33);
    }

    #[test]
    fn empty_ratings_average_zero() {
        assert_eq!(summarize(&[]), RatingSummary { avg_rating: 0.0, total_ratings: 0 });
    }

    #[test]
    fn find_rating_matches_user() {
        let mut ratings = Vec::new();
        apply_rating(&mut ratings, "user-a", 3, "ok", at(0));

        assert_eq!(find_rating(&ratings, "user-a").map(|entry| entry.rating), Some(3));
        assert!(find_rating(&ratings, "user-b").is_none());
    }
}
