use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Practice domain that gets a generated daily task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyModeId {
  Luogu,   // daily quota from a fixed problem list
  Lanqiao, // topic / difficulty driven plans
}

impl DailyModeId {
  pub const ALL: [DailyModeId; 2] = [Self::Luogu, Self::Lanqiao];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Luogu => "luogu",
      Self::Lanqiao => "lanqiao",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "luogu" => Some(Self::Luogu),
      "lanqiao" => Some(Self::Lanqiao),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
  #[default]
  Todo,
  Done,
}

/// Plan shape for topic-driven domains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
  #[default]
  Daily,
  Topic,
}

impl PlanType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Daily => "daily",
      Self::Topic => "topic",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "daily" => Some(Self::Daily),
      "topic" => Some(Self::Topic),
      _ => None,
    }
  }
}

/// Difficulty selector; `All` disables the filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  #[default]
  All,
  Easy,
  Medium,
  Hard,
}

impl Difficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::All => "all",
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "all" => Some(Self::All),
      "easy" => Some(Self::Easy),
      "medium" => Some(Self::Medium),
      "hard" => Some(Self::Hard),
      _ => None,
    }
  }

  /// True if an item of difficulty `item` passes this selector
  pub fn admits(&self, item: Difficulty) -> bool {
    *self == Difficulty::All || *self == item
  }
}

/// Per-task retrospective card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TaskReview {
  #[serde(rename = "thinking", default)]
  pub approach: String,
  #[serde(default)]
  pub pitfall: String,
  #[serde(default)]
  pub complexity: String,
  /// Reusable solution template
  #[serde(default)]
  pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTask {
  /// Stable ID from the static bank
  pub task_id: String,
  pub title: String,
  pub difficulty: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub topic: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,
  pub status: TaskStatus,
  pub note: String,
  pub review: TaskReview,
}

impl DailyTask {
  pub fn is_done(&self) -> bool {
    self.status == TaskStatus::Done
  }
}

/// Generated-and-persisted task list for one domain on one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeProgress {
  pub mode_id: DailyModeId,
  pub date_key: NaiveDate,
  pub source_id: String,
  pub source_title: String,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub generated_at: DateTime<Utc>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub updated_at: DateTime<Utc>,
  pub total_count: usize,
  pub done_count: usize,
  pub notes: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub plan_type: Option<PlanType>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub topic: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub difficulty: Option<Difficulty>,
  pub tasks: Vec<DailyTask>,
}

impl ModeProgress {
  /// Recompute the derived counters from the task list
  pub fn recount(&mut self) {
    self.total_count = self.tasks.len();
    self.done_count = self.tasks.iter().filter(|t| t.is_done()).count();
  }

  pub fn task(&self, task_id: &str) -> Option<&DailyTask> {
    self.tasks.iter().find(|t| t.task_id == task_id)
  }

  pub fn remaining(&self) -> usize {
    self.total_count.saturating_sub(self.done_count)
  }

  pub fn is_complete(&self) -> bool {
    self.total_count > 0 && self.done_count >= self.total_count
  }
}
