use crate::rules::{Heat, HeatBucket};

/// Map a score to its heat bucket.
///
/// Buckets are scanned in ascending `max_score` order and the first bucket
/// whose `max_score >= score` wins, so a score equal to a threshold stays in
/// that bucket. Scores above every threshold land in the last bucket.
pub fn heat_for_score(score: f64, buckets: &[HeatBucket]) -> Heat {
    buckets
        .iter()
        .find(|bucket| bucket.max_score >= score)
        .or_else(|| buckets.last())
        .map(|bucket| bucket.heat)
        .unwrap_or(Heat::Hot)
}
