//! Persisted planner state and the operations that mutate it.
//!
//! `StorageMeta` is owned by a single caller and mutated in place; every
//! progress mutation goes through `save_progress` so the derived counters
//! never drift from the task list.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::STATE_VERSION;
use crate::domain::mistake::MistakeRecord;
use crate::domain::progress::{DailyModeId, DailyTask, ModeProgress};
use crate::reminders::{ReminderConfig, ReminderId, ReminderSettings};
use crate::srs;

/// Everything written to the state file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
  pub version: i64,
  /// Interview sessions, owned and shaped by the UI layer
  pub sessions: Vec<serde_json::Value>,
  pub meta: StorageMeta,
}

impl Default for PersistedState {
  fn default() -> Self {
    Self {
      version: STATE_VERSION,
      sessions: Vec::new(),
      meta: StorageMeta::default(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LessonLevel {
  #[default]
  L0,
  L1,
  L2,
  L3,
}

impl LessonLevel {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "L0" => Some(Self::L0),
      "L1" => Some(Self::L1),
      "L2" => Some(Self::L2),
      "L3" => Some(Self::L3),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailyLessonState {
  pub topic_override: String,
  pub level: LessonLevel,
  /// Check-in time (epoch millis) per day
  pub completed_by_date: BTreeMap<NaiveDate, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
  pub auto_jump_today_task: bool,
}

impl Default for AppSettings {
  fn default() -> Self {
    Self {
      auto_jump_today_task: true,
    }
  }
}

/// Per-domain, per-day progress; at most one entry per (domain, day)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DailyProgress {
  pub luogu: BTreeMap<NaiveDate, ModeProgress>,
  pub lanqiao: BTreeMap<NaiveDate, ModeProgress>,
}

impl DailyProgress {
  pub fn for_mode(&self, mode: DailyModeId) -> &BTreeMap<NaiveDate, ModeProgress> {
    match mode {
      DailyModeId::Luogu => &self.luogu,
      DailyModeId::Lanqiao => &self.lanqiao,
    }
  }

  pub fn for_mode_mut(&mut self, mode: DailyModeId) -> &mut BTreeMap<NaiveDate, ModeProgress> {
    match mode {
      DailyModeId::Luogu => &mut self.luogu,
      DailyModeId::Lanqiao => &mut self.lanqiao,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StorageMeta {
  pub backend_topic_cursor: u64,
  pub daily_lesson: DailyLessonState,
  pub daily_progress: DailyProgress,
  /// Newest first
  pub mistakes: Vec<MistakeRecord>,
  pub reminders: ReminderSettings,
  pub app_settings: AppSettings,
}

impl StorageMeta {
  // ==================== Daily progress ====================

  pub fn progress(&self, mode: DailyModeId, date: NaiveDate) -> Option<&ModeProgress> {
    self.daily_progress.for_mode(mode).get(&date)
  }

  /// Store a progress under its own (domain, day) key, replacing any previous one
  pub fn save_progress(&mut self, mut progress: ModeProgress) {
    progress.recount();
    progress.updated_at = Utc::now();
    self
      .daily_progress
      .for_mode_mut(progress.mode_id)
      .insert(progress.date_key, progress);
  }

  /// Apply `f` to an existing progress; returns false when there is none
  pub fn update_progress<F>(&mut self, mode: DailyModeId, date: NaiveDate, f: F) -> bool
  where
    F: FnOnce(&mut ModeProgress),
  {
    let Some(mut current) = self.progress(mode, date).cloned() else {
      return false;
    };
    f(&mut current);
    // keep the (domain, day) key authoritative
    current.mode_id = mode;
    current.date_key = date;
    self.save_progress(current);
    true
  }

  /// Edit a single task by ID
  pub fn patch_task<F>(&mut self, mode: DailyModeId, date: NaiveDate, task_id: &str, f: F) -> bool
  where
    F: FnOnce(&mut DailyTask),
  {
    let mut patched = false;
    let found = self.update_progress(mode, date, |progress| {
      if let Some(task) = progress.tasks.iter_mut().find(|t| t.task_id == task_id) {
        f(task);
        patched = true;
      }
    });
    found && patched
  }

  pub fn set_progress_notes(&mut self, mode: DailyModeId, date: NaiveDate, notes: &str) -> bool {
    self.update_progress(mode, date, |progress| progress.notes = notes.to_string())
  }

  // ==================== Mistakes ====================

  pub fn mistake(&self, id: &str) -> Option<&MistakeRecord> {
    self.mistakes.iter().find(|m| m.id == id)
  }

  /// Replace by ID, or insert as the newest record
  pub fn upsert_mistake(&mut self, item: MistakeRecord) {
    match self.mistakes.iter_mut().find(|m| m.id == item.id) {
      Some(existing) => *existing = item,
      None => self.mistakes.insert(0, item),
    }
  }

  pub fn update_mistake<F>(&mut self, id: &str, f: F) -> bool
  where
    F: FnOnce(&MistakeRecord) -> MistakeRecord,
  {
    match self.mistakes.iter_mut().find(|m| m.id == id) {
      Some(existing) => {
        let next = f(existing);
        *existing = next;
        true
      }
      None => false,
    }
  }

  /// Explicit user delete; records are never removed otherwise
  pub fn remove_mistake(&mut self, id: &str) -> bool {
    let before = self.mistakes.len();
    self.mistakes.retain(|m| m.id != id);
    self.mistakes.len() != before
  }

  pub fn due_mistakes(&self, today: NaiveDate) -> Vec<&MistakeRecord> {
    srs::due_today(&self.mistakes, today)
  }

  // ==================== Settings ====================

  pub fn update_reminder<F>(&mut self, id: ReminderId, f: F)
  where
    F: FnOnce(&mut ReminderConfig),
  {
    let config = self.reminders.get_mut(id);
    f(config);
    config.id = id;
  }

  pub fn set_auto_jump_today_task(&mut self, enabled: bool) {
    self.app_settings.auto_jump_today_task = enabled;
  }

  /// Record the daily lesson check-in for `date`
  pub fn mark_lesson_completed(&mut self, date: NaiveDate, at: DateTime<Utc>) {
    self
      .daily_lesson
      .completed_by_date
      .insert(date, at.timestamp_millis());
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::calendar::parse_date_key;
  use crate::domain::mistake::{create_mistake, NewMistake, SourceDomain};
  use crate::domain::progress::{TaskReview, TaskStatus};

  fn day(s: &str) -> NaiveDate {
    parse_date_key(s).unwrap()
  }

  fn task(id: &str) -> DailyTask {
    DailyTask {
      task_id: id.into(),
      title: id.into(),
      difficulty: "easy".into(),
      topic: None,
      url: None,
      status: TaskStatus::Todo,
      note: String::new(),
      review: TaskReview::default(),
    }
  }

  fn progress(date: &str) -> ModeProgress {
    ModeProgress {
      mode_id: DailyModeId::Lanqiao,
      date_key: day(date),
      source_id: "lanqiao-built-in".into(),
      source_title: "Built-in".into(),
      generated_at: Utc::now(),
      updated_at: Utc::now(),
      total_count: 99,
      done_count: 42,
      notes: String::new(),
      plan_type: None,
      topic: None,
      difficulty: None,
      tasks: vec![task("LQ-001"), task("LQ-002")],
    }
  }

  fn mistake(prompt: &str) -> MistakeRecord {
    create_mistake(NewMistake::new(SourceDomain::Interview, "os", prompt)).unwrap()
  }

  #[test]
  fn test_save_progress_recounts() {
    let mut meta = StorageMeta::default();
    meta.save_progress(progress("2024-01-01"));

    let stored = meta.progress(DailyModeId::Lanqiao, day("2024-01-01")).unwrap();
    assert_eq!(stored.total_count, 2);
    assert_eq!(stored.done_count, 0);
    assert!(meta.progress(DailyModeId::Luogu, day("2024-01-01")).is_none());
  }

  #[test]
  fn test_one_progress_per_mode_and_day() {
    let mut meta = StorageMeta::default();
    meta.save_progress(progress("2024-01-01"));
    let mut again = progress("2024-01-01");
    again.notes = "second".into();
    meta.save_progress(again);

    assert_eq!(meta.daily_progress.lanqiao.len(), 1);
    let stored = meta.progress(DailyModeId::Lanqiao, day("2024-01-01")).unwrap();
    assert_eq!(stored.notes, "second");
  }

  #[test]
  fn test_patch_task_updates_done_count() {
    let mut meta = StorageMeta::default();
    meta.save_progress(progress("2024-01-01"));

    let patched = meta.patch_task(DailyModeId::Lanqiao, day("2024-01-01"), "LQ-002", |t| {
      t.status = TaskStatus::Done;
      t.note = "x".into();
    });
    assert!(patched);

    let stored = meta.progress(DailyModeId::Lanqiao, day("2024-01-01")).unwrap();
    assert_eq!(stored.done_count, 1);
    assert_eq!(stored.task("LQ-002").unwrap().note, "x");
  }

  #[test]
  fn test_patch_task_missing() {
    let mut meta = StorageMeta::default();
    assert!(!meta.patch_task(DailyModeId::Lanqiao, day("2024-01-01"), "LQ-001", |_| {}));

    meta.save_progress(progress("2024-01-01"));
    assert!(!meta.patch_task(DailyModeId::Lanqiao, day("2024-01-01"), "LQ-404", |_| {}));
  }

  #[test]
  fn test_set_progress_notes() {
    let mut meta = StorageMeta::default();
    assert!(!meta.set_progress_notes(DailyModeId::Lanqiao, day("2024-01-01"), "n"));
    meta.save_progress(progress("2024-01-01"));
    assert!(meta.set_progress_notes(DailyModeId::Lanqiao, day("2024-01-01"), "n"));
    assert_eq!(meta.progress(DailyModeId::Lanqiao, day("2024-01-01")).unwrap().notes, "n");
  }

  #[test]
  fn test_upsert_mistake_prepends_then_replaces() {
    let mut meta = StorageMeta::default();
    let first = mistake("first");
    let second = mistake("second");
    meta.upsert_mistake(first.clone());
    meta.upsert_mistake(second.clone());
    assert_eq!(meta.mistakes[0].id, second.id);

    let mut edited = first.clone();
    edited.notes = "edited".into();
    meta.upsert_mistake(edited);
    assert_eq!(meta.mistakes.len(), 2);
    assert_eq!(meta.mistake(&first.id).unwrap().notes, "edited");
  }

  #[test]
  fn test_update_and_remove_mistake() {
    let mut meta = StorageMeta::default();
    let item = mistake("deadlock conditions");
    let id = item.id.clone();
    meta.upsert_mistake(item);

    assert!(meta.update_mistake(&id, |m| MistakeRecord {
      severity: 5,
      ..m.clone()
    }));
    assert_eq!(meta.mistake(&id).unwrap().severity, 5);

    assert!(meta.remove_mistake(&id));
    assert!(!meta.remove_mistake(&id));
    assert!(!meta.update_mistake(&id, |m| m.clone()));
  }

  #[test]
  fn test_update_reminder_keeps_id() {
    let mut meta = StorageMeta::default();
    meta.update_reminder(ReminderId::Luogu, |config| {
      config.time = "07:30".into();
      config.id = ReminderId::Lanqiao;
    });
    assert_eq!(meta.reminders.luogu.time, "07:30");
    assert_eq!(meta.reminders.luogu.id, ReminderId::Luogu);
  }

  #[test]
  fn test_mark_lesson_completed() {
    let mut meta = StorageMeta::default();
    let at = Utc::now();
    meta.mark_lesson_completed(day("2024-01-01"), at);
    assert_eq!(
      meta.daily_lesson.completed_by_date.get(&day("2024-01-01")),
      Some(&at.timestamp_millis())
    );
  }

  #[test]
  fn test_default_state_shape() {
    let state = PersistedState::default();
    let value = serde_json::to_value(&state).unwrap();
    assert_eq!(value["version"], 2);
    assert_eq!(value["meta"]["backendTopicCursor"], 0);
    assert!(value["meta"]["dailyProgress"]["luogu"].is_object());
    assert_eq!(value["meta"]["appSettings"]["autoJumpTodayTask"], true);
    assert_eq!(value["meta"]["reminders"]["luogu"]["time"], "14:00");
  }
}
