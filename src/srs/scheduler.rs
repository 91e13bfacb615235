use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::config::{MAX_EASE, MAX_INTERVAL_DAYS, MIN_EASE};
use crate::domain::{MistakeRecord, MistakeStatus, SrsState};

/// Self-assessed recall quality for a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
  Again,
  Hard,
  Good,
  Easy,
}

impl Rating {
  pub const ALL: [Rating; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|r| r.as_str() == s)
  }
}

pub fn clamp_ease(value: f64) -> f64 {
  value.clamp(MIN_EASE, MAX_EASE)
}

// f64::round rounds half away from zero, i.e. half-up for positive intervals
fn grow(interval: i64, factor: f64, floor: i64) -> i64 {
  ((interval as f64 * factor).round() as i64).clamp(floor, MAX_INTERVAL_DAYS)
}

/// Next (interval, ease) pair for a rating
pub fn next_interval(interval_days: i64, ease: f64, rating: Rating) -> (i64, f64) {
  match rating {
    Rating::Again => (1, clamp_ease(ease - 0.2)),
    Rating::Hard => (grow(interval_days, 1.2, 1), clamp_ease(ease - 0.15)),
    Rating::Good => (grow(interval_days, ease, 1), ease),
    Rating::Easy => (grow(interval_days, ease + 0.3, 2), clamp_ease(ease + 0.15)),
  }
}

/// Apply a review rating to a mistake, returning the rescheduled record.
///
/// The due date is counted in calendar days from `today`, so it is always
/// strictly after `today`. `Again` sends the record back to `Open`; every
/// other rating marks it `Reviewed`. `Fixed` is only reachable via `mark_fixed`.
pub fn apply_review(item: &MistakeRecord, rating: Rating, today: NaiveDate) -> MistakeRecord {
  apply_review_at(item, rating, today, Utc::now())
}

pub fn apply_review_at(
  item: &MistakeRecord,
  rating: Rating,
  today: NaiveDate,
  now: DateTime<Utc>,
) -> MistakeRecord {
  let (interval_days, ease) = next_interval(item.srs.interval_days, item.srs.ease, rating);

  MistakeRecord {
    updated_at: now,
    status: if rating == Rating::Again {
      MistakeStatus::Open
    } else {
      MistakeStatus::Reviewed
    },
    srs: SrsState {
      interval_days,
      ease,
      due_date: calendar::add_days(today, interval_days),
      review_count: item.srs.review_count.saturating_add(1),
      last_reviewed_at: Some(now),
    },
    ..item.clone()
  }
}

/// Explicit user action: the gap is closed and leaves the review queue
pub fn mark_fixed(item: &MistakeRecord) -> MistakeRecord {
  MistakeRecord {
    updated_at: Utc::now(),
    status: MistakeStatus::Fixed,
    ..item.clone()
  }
}

/// Explicit user action: put a fixed record back into rotation
pub fn reopen(item: &MistakeRecord) -> MistakeRecord {
  MistakeRecord {
    updated_at: Utc::now(),
    status: MistakeStatus::Open,
    ..item.clone()
  }
}
