//! Review queue views over the mistake collection.

use chrono::NaiveDate;

use crate::calendar;
use crate::config::REVIEW_PRESSURE_DAYS;
use crate::domain::MistakeRecord;

/// Open or reviewed records due on or before `today`, oldest due date first,
/// more severe first within the same day.
pub fn due_today(mistakes: &[MistakeRecord], today: NaiveDate) -> Vec<&MistakeRecord> {
  let mut due: Vec<&MistakeRecord> = mistakes
    .iter()
    .filter(|m| !m.is_fixed() && m.srs.due_date <= today)
    .collect();
  due.sort_by(|a, b| {
    a.srs
      .due_date
      .cmp(&b.srs.due_date)
      .then_with(|| b.severity.cmp(&a.severity))
  });
  due
}

/// Number of unfixed records falling due in `(today, today + days]`
pub fn due_within(mistakes: &[MistakeRecord], today: NaiveDate, days: i64) -> usize {
  let horizon = calendar::add_days(today, days);
  mistakes
    .iter()
    .filter(|m| !m.is_fixed() && m.srs.due_date > today && m.srs.due_date <= horizon)
    .count()
}

/// Dashboard summary of upcoming review load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewPressure {
  pub due_today: usize,
  pub due_next_7_days: usize,
}

pub fn review_pressure(mistakes: &[MistakeRecord], today: NaiveDate) -> ReviewPressure {
  ReviewPressure {
    due_today: mistakes
      .iter()
      .filter(|m| !m.is_fixed() && m.srs.due_date <= today)
      .count(),
    due_next_7_days: due_within(mistakes, today, REVIEW_PRESSURE_DAYS),
  }
}
