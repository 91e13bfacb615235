use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::config::{DEFAULT_SEVERITY, INITIAL_EASE, INITIAL_INTERVAL_DAYS, UNCATEGORIZED_TOPIC};
use crate::domain::progress::{DailyModeId, DailyTask, TaskStatus};

/// Practice domain a mistake was flagged from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceDomain {
  #[serde(rename = "408")]
  Lesson408, // CS fundamentals daily lesson
  Luogu,
  Lanqiao,
  Interview,
}

impl SourceDomain {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Lesson408 => "408",
      Self::Luogu => "luogu",
      Self::Lanqiao => "lanqiao",
      Self::Interview => "interview",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "408" => Some(Self::Lesson408),
      "luogu" => Some(Self::Luogu),
      "lanqiao" => Some(Self::Lanqiao),
      "interview" => Some(Self::Interview),
      _ => None,
    }
  }
}

impl From<DailyModeId> for SourceDomain {
  fn from(mode: DailyModeId) -> Self {
    match mode {
      DailyModeId::Luogu => Self::Luogu,
      DailyModeId::Lanqiao => Self::Lanqiao,
    }
  }
}

/// Why the user got something wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
  Concept,
  Boundary,
  Complexity,
  Implementation,
  Careless,
  #[default]
  Unknown,
  Expression,
}

impl ErrorType {
  pub const ALL: [ErrorType; 7] = [
    Self::Concept,
    Self::Boundary,
    Self::Complexity,
    Self::Implementation,
    Self::Careless,
    Self::Unknown,
    Self::Expression,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Concept => "concept",
      Self::Boundary => "boundary",
      Self::Complexity => "complexity",
      Self::Implementation => "implementation",
      Self::Careless => "careless",
      Self::Unknown => "unknown",
      Self::Expression => "expression",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|t| t.as_str() == s)
  }

  /// Human-readable label
  pub fn label(&self) -> &'static str {
    match self {
      Self::Concept => "Unclear concept",
      Self::Boundary => "Boundary condition",
      Self::Complexity => "Complexity analysis",
      Self::Implementation => "Implementation detail",
      Self::Careless => "Careless slip",
      Self::Unknown => "Could not solve",
      Self::Expression => "Unclear explanation",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MistakeStatus {
  #[default]
  Open,
  Reviewed,
  Fixed,
}

impl MistakeStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Open => "open",
      Self::Reviewed => "reviewed",
      Self::Fixed => "fixed",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "open" => Some(Self::Open),
      "reviewed" => Some(Self::Reviewed),
      "fixed" => Some(Self::Fixed),
      _ => None,
    }
  }
}

/// Spaced-repetition state embedded in every mistake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SrsState {
  pub interval_days: i64,
  pub ease: f64,
  pub due_date: NaiveDate,
  pub review_count: i64,
  #[serde(
    default,
    with = "chrono::serde::ts_milliseconds_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl SrsState {
  /// Initial state for a record created on `date`: due the following day
  pub fn new(date: NaiveDate) -> Self {
    Self {
      interval_days: INITIAL_INTERVAL_DAYS,
      ease: INITIAL_EASE,
      due_date: calendar::add_days(date, INITIAL_INTERVAL_DAYS),
      review_count: 0,
      last_reviewed_at: None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeRecord {
  pub id: String,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub created_at: DateTime<Utc>,
  #[serde(with = "chrono::serde::ts_milliseconds")]
  pub updated_at: DateTime<Utc>,
  /// Calendar day the mistake was recorded
  pub date: NaiveDate,
  #[serde(rename = "sourceMode")]
  pub source_domain: SourceDomain,
  pub topic: String,
  pub tags: Vec<String>,
  pub prompt: String,
  #[serde(rename = "myAnswer", default, skip_serializing_if = "Option::is_none")]
  pub user_answer: Option<String>,
  #[serde(rename = "expected", default, skip_serializing_if = "Option::is_none")]
  pub expected_answer: Option<String>,
  pub error_type: ErrorType,
  /// 1 (minor) to 5 (critical)
  pub severity: u8,
  pub notes: String,
  pub status: MistakeStatus,
  pub srs: SrsState,
}

impl MistakeRecord {
  /// Topic used for grouping; blank topics fall into a shared bucket
  pub fn topic_key(&self) -> &str {
    normalize_topic(&self.topic)
  }

  pub fn is_fixed(&self) -> bool {
    self.status == MistakeStatus::Fixed
  }
}

pub fn normalize_topic(topic: &str) -> &str {
  let trimmed = topic.trim();
  if trimmed.is_empty() {
    UNCATEGORIZED_TOPIC
  } else {
    trimmed
  }
}

/// Clamp any integer severity into 1..=5
pub fn clamp_severity(raw: i64) -> u8 {
  raw.clamp(1, 5) as u8
}

/// Generate a unique opaque ID such as `mistake_3f9a..._18c2...`
pub fn make_id(prefix: &str) -> String {
  let entropy: u64 = rand::rng().random();
  format!("{}_{:x}_{:x}", prefix, entropy, Utc::now().timestamp_millis())
}

/// User input for flagging a new mistake
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewMistake {
  pub source_domain: Option<SourceDomain>,
  pub topic: String,
  pub prompt: String,
  pub tags: Vec<String>,
  pub user_answer: Option<String>,
  pub expected_answer: Option<String>,
  pub error_type: Option<ErrorType>,
  pub severity: Option<i64>,
  pub notes: Option<String>,
  /// Defaults to today
  pub date: Option<NaiveDate>,
}

impl NewMistake {
  pub fn new(source_domain: SourceDomain, topic: &str, prompt: &str) -> Self {
    Self {
      source_domain: Some(source_domain),
      topic: topic.to_string(),
      prompt: prompt.to_string(),
      ..Default::default()
    }
  }

  /// Flag a daily practice task as a mistake.
  /// Finished tasks are filed as less severe than unfinished ones.
  pub fn from_daily_task(mode: DailyModeId, task: &DailyTask) -> Self {
    let notes = if task.note.trim().is_empty() {
      format!("Got stuck while practicing {} problem {}.", mode.as_str(), task.task_id)
    } else {
      task.note.clone()
    };
    let topic = task.topic.clone().unwrap_or_else(|| task.title.clone());

    Self {
      source_domain: Some(mode.into()),
      topic,
      prompt: format!("{} {}", task.task_id, task.title),
      tags: vec![task.difficulty.clone()],
      error_type: Some(ErrorType::Unknown),
      severity: Some(if task.status == TaskStatus::Done { 2 } else { 3 }),
      notes: Some(notes),
      ..Default::default()
    }
  }
}

fn trimmed_opt(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_string())
    .filter(|v| !v.is_empty())
}

/// Create a mistake record stamped with the current time.
/// Returns None when the prompt is blank.
pub fn create_mistake(input: NewMistake) -> Option<MistakeRecord> {
  create_mistake_at(input, Utc::now())
}

pub fn create_mistake_at(input: NewMistake, now: DateTime<Utc>) -> Option<MistakeRecord> {
  let prompt = input.prompt.trim();
  if prompt.is_empty() {
    return None;
  }

  let date = input.date.unwrap_or_else(|| calendar::to_date_key(now));
  let mut tags: Vec<String> = Vec::with_capacity(input.tags.len());
  for tag in input.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
    if !tags.iter().any(|existing| existing == tag) {
      tags.push(tag.to_string());
    }
  }

  Some(MistakeRecord {
    id: make_id("mistake"),
    created_at: now,
    updated_at: now,
    date,
    source_domain: input.source_domain.unwrap_or(SourceDomain::Interview),
    topic: normalize_topic(&input.topic).to_string(),
    tags,
    prompt: prompt.to_string(),
    user_answer: trimmed_opt(input.user_answer),
    expected_answer: trimmed_opt(input.expected_answer),
    error_type: input.error_type.unwrap_or_default(),
    severity: clamp_severity(input.severity.unwrap_or(DEFAULT_SEVERITY as i64)),
    notes: input.notes.map(|n| n.trim().to_string()).unwrap_or_default(),
    status: MistakeStatus::Open,
    srs: SrsState::new(date),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::calendar::parse_date_key;
  use crate::domain::progress::TaskReview;

  fn day(s: &str) -> NaiveDate {
    parse_date_key(s).unwrap()
  }

  // Enum string tests

  #[test]
  fn test_source_domain_roundtrip() {
    for domain in [
      SourceDomain::Lesson408,
      SourceDomain::Luogu,
      SourceDomain::Lanqiao,
      SourceDomain::Interview,
    ] {
      assert_eq!(SourceDomain::from_str(domain.as_str()), Some(domain));
    }
    assert_eq!(SourceDomain::from_str("leetcode"), None);
  }

  #[test]
  fn test_source_domain_serializes_408() {
    let json = serde_json::to_string(&SourceDomain::Lesson408).unwrap();
    assert_eq!(json, "\"408\"");
  }

  #[test]
  fn test_error_type_from_str() {
    assert_eq!(ErrorType::from_str("careless"), Some(ErrorType::Careless));
    assert_eq!(ErrorType::from_str("carelessness"), None);
  }

  // Creation tests

  #[test]
  fn test_create_initial_srs_state() {
    let item = create_mistake(NewMistake {
      date: Some(day("2024-01-01")),
      ..NewMistake::new(SourceDomain::Luogu, "dp", "P1001 A+B")
    })
    .unwrap();

    assert_eq!(item.srs.interval_days, 1);
    assert!((item.srs.ease - 2.5).abs() < f64::EPSILON);
    assert_eq!(item.srs.due_date, day("2024-01-02"));
    assert_eq!(item.srs.review_count, 0);
    assert!(item.srs.last_reviewed_at.is_none());
    assert_eq!(item.status, MistakeStatus::Open);
    assert_eq!(item.severity, 3);
    assert_eq!(item.error_type, ErrorType::Unknown);
  }

  #[test]
  fn test_create_rejects_blank_prompt() {
    assert!(create_mistake(NewMistake::new(SourceDomain::Interview, "x", "   ")).is_none());
  }

  #[test]
  fn test_create_normalizes_fields() {
    let item = create_mistake(NewMistake {
      tags: vec![" heap ".into(), "".into(), "heap".into(), "greedy".into()],
      severity: Some(11),
      user_answer: Some("  ".into()),
      expected_answer: Some(" O(n log n) ".into()),
      ..NewMistake::new(SourceDomain::Interview, "   ", "  explain heapify  ")
    })
    .unwrap();

    assert_eq!(item.topic, "uncategorized");
    assert_eq!(item.prompt, "explain heapify");
    assert_eq!(item.tags, vec!["heap".to_string(), "greedy".to_string()]);
    assert_eq!(item.severity, 5);
    assert_eq!(item.user_answer, None);
    assert_eq!(item.expected_answer.as_deref(), Some("O(n log n)"));
  }

  #[test]
  fn test_clamp_severity() {
    assert_eq!(clamp_severity(-3), 1);
    assert_eq!(clamp_severity(0), 1);
    assert_eq!(clamp_severity(4), 4);
    assert_eq!(clamp_severity(99), 5);
  }

  #[test]
  fn test_make_id_unique() {
    let a = make_id("mistake");
    let b = make_id("mistake");
    assert!(a.starts_with("mistake_"));
    assert_ne!(a, b);
  }

  #[test]
  fn test_from_daily_task_severity_follows_status() {
    let mut task = DailyTask {
      task_id: "P1001".into(),
      title: "A+B Problem".into(),
      difficulty: "intro".into(),
      topic: None,
      url: None,
      status: TaskStatus::Todo,
      note: String::new(),
      review: TaskReview::default(),
    };

    let open = NewMistake::from_daily_task(DailyModeId::Luogu, &task);
    assert_eq!(open.severity, Some(3));
    assert_eq!(open.prompt, "P1001 A+B Problem");
    assert_eq!(open.topic, "A+B Problem");
    assert_eq!(open.tags, vec!["intro".to_string()]);
    assert_eq!(open.source_domain, Some(SourceDomain::Luogu));

    task.status = TaskStatus::Done;
    task.note = "forgot overflow".into();
    let done = NewMistake::from_daily_task(DailyModeId::Luogu, &task);
    assert_eq!(done.severity, Some(2));
    assert_eq!(done.notes.as_deref(), Some("forgot overflow"));
  }

  #[test]
  fn test_record_wire_format() {
    let item = create_mistake(NewMistake {
      date: Some(day("2024-01-01")),
      ..NewMistake::new(SourceDomain::Lesson408, "tcp", "three-way handshake")
    })
    .unwrap();
    let value = serde_json::to_value(&item).unwrap();

    assert_eq!(value["sourceMode"], "408");
    assert_eq!(value["date"], "2024-01-01");
    assert_eq!(value["srs"]["dueDate"], "2024-01-02");
    assert_eq!(value["srs"]["intervalDays"], 1);
    assert!(value["createdAt"].is_i64());
    assert!(value.get("myAnswer").is_none());

    let back: MistakeRecord = serde_json::from_value(value).unwrap();
    assert_eq!(back.srs, item.srs);
  }
}
