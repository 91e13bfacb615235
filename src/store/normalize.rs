//! Repair of untrusted persisted JSON.
//!
//! Every field of the stored state is validated independently; invalid
//! entries are dropped or replaced by defaults so one bad record never costs
//! the rest of the data. The result always satisfies the domain invariants:
//! severity in `1..=5`, ease in `[1.3, 3.5]`, interval at least one day,
//! counters consistent with the task list.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::calendar;
use crate::config::{MAX_INTERVAL_DAYS, MAX_REVIEW_COUNT, STATE_VERSION, UNCATEGORIZED_TOPIC};
use crate::domain::mistake::clamp_severity;
use crate::domain::{
    AppSettings, DailyLessonState, DailyModeId, DailyProgress, DailyTask, Difficulty, ErrorType,
    LessonLevel, MistakeRecord, MistakeStatus, ModeProgress, PersistedState, PlanType,
    SourceDomain, SrsState, StorageMeta, TaskReview, TaskStatus,
};
use crate::reminders::{is_valid_time, ReminderConfig, ReminderId, ReminderSettings};
use crate::srs::scheduler::clamp_ease;

const DEFAULT_SOURCE_TITLE: &str = "Built-in list";

type Object = Map<String, Value>;

fn string<'a>(obj: &'a Object, key: &str) -> Option<&'a str> {
    obj.get(key).and_then(Value::as_str)
}

fn non_blank<'a>(obj: &'a Object, key: &str) -> Option<&'a str> {
    string(obj, key).filter(|s| !s.trim().is_empty())
}

fn number(obj: &Object, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|n| n.is_finite())
}

fn rounded(obj: &Object, key: &str) -> Option<i64> {
    number(obj, key).map(|n| n.round() as i64)
}

fn timestamp(obj: &Object, key: &str) -> Option<DateTime<Utc>> {
    rounded(obj, key).and_then(DateTime::from_timestamp_millis)
}

fn date_key(value: &str) -> Option<NaiveDate> {
    calendar::parse_date_key(value)
}

/// Normalize any JSON value into a usable state
pub fn normalize_state(value: &Value) -> PersistedState {
    match value {
        // Pre-v2 files stored only the session list
        Value::Array(entries) => {
            tracing::debug!("Migrating legacy session list ({} entries)", entries.len());
            PersistedState {
                sessions: normalize_sessions(entries),
                ..PersistedState::default()
            }
        }
        Value::Object(obj) => PersistedState {
            version: obj.get("version").and_then(Value::as_i64).unwrap_or(STATE_VERSION),
            sessions: obj
                .get("sessions")
                .and_then(Value::as_array)
                .map(|entries| normalize_sessions(entries))
                .unwrap_or_default(),
            meta: obj.get("meta").map(normalize_meta).unwrap_or_default(),
        },
        _ => {
            tracing::warn!("State is not a JSON object, starting fresh");
            PersistedState::default()
        }
    }
}

fn normalize_sessions(entries: &[Value]) -> Vec<Value> {
    entries.iter().filter(|e| e.is_object()).cloned().collect()
}

pub fn normalize_meta(value: &Value) -> StorageMeta {
    let Some(obj) = value.as_object() else {
        return StorageMeta::default();
    };

    StorageMeta {
        backend_topic_cursor: rounded(obj, "backendTopicCursor")
            .map(|n| n.max(0) as u64)
            .unwrap_or(0),
        daily_lesson: obj.get("dailyLesson").map(normalize_daily_lesson).unwrap_or_default(),
        daily_progress: obj
            .get("dailyProgress")
            .map(normalize_daily_progress)
            .unwrap_or_default(),
        mistakes: obj
            .get("mistakes")
            .and_then(Value::as_array)
            .map(|items| normalize_mistakes(items))
            .unwrap_or_default(),
        reminders: obj.get("reminders").map(normalize_reminders).unwrap_or_default(),
        app_settings: obj
            .get("appSettings")
            .map(normalize_app_settings)
            .unwrap_or_default(),
    }
}

fn normalize_daily_lesson(value: &Value) -> DailyLessonState {
    let Some(obj) = value.as_object() else {
        return DailyLessonState::default();
    };

    let completed_by_date: BTreeMap<NaiveDate, i64> = obj
        .get("completedByDate")
        .and_then(Value::as_object)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|(key, at)| {
                    let at = at.as_f64().filter(|n| n.is_finite())?;
                    Some((date_key(key)?, at.round() as i64))
                })
                .collect()
        })
        .unwrap_or_default();

    DailyLessonState {
        topic_override: string(obj, "topicOverride").unwrap_or_default().to_string(),
        level: string(obj, "level")
            .and_then(LessonLevel::from_str)
            .unwrap_or_default(),
        completed_by_date,
    }
}

// ==================== Daily progress ====================

fn normalize_daily_progress(value: &Value) -> DailyProgress {
    let mut daily = DailyProgress::default();
    let Some(obj) = value.as_object() else {
        return daily;
    };

    for (mode_key, by_date) in obj {
        let Some(mode) = DailyModeId::from_str(mode_key) else {
            tracing::debug!("Dropping progress for unknown mode {}", mode_key);
            continue;
        };
        let Some(by_date) = by_date.as_object() else {
            continue;
        };
        for (key, progress) in by_date {
            let Some(date) = date_key(key) else {
                tracing::debug!("Dropping {} progress with bad date key {:?}", mode_key, key);
                continue;
            };
            if let Some(progress) = normalize_progress(progress, mode, date) {
                daily.for_mode_mut(mode).insert(date, progress);
            }
        }
    }
    daily
}

/// The map key decides mode and date, whatever the record itself claims.
/// Returns None when no task survives.
pub fn normalize_progress(value: &Value, mode: DailyModeId, date: NaiveDate) -> Option<ModeProgress> {
    let obj = value.as_object()?;
    let tasks: Vec<DailyTask> = obj
        .get("tasks")
        .and_then(Value::as_array)
        .map(|tasks| tasks.iter().filter_map(normalize_task).collect())
        .unwrap_or_default();
    if tasks.is_empty() {
        return None;
    }

    let now = Utc::now();
    let mut progress = ModeProgress {
        mode_id: mode,
        date_key: date,
        source_id: non_blank(obj, "sourceId")
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}-default", mode.as_str())),
        source_title: non_blank(obj, "sourceTitle")
            .unwrap_or(DEFAULT_SOURCE_TITLE)
            .to_string(),
        generated_at: timestamp(obj, "generatedAt").unwrap_or(now),
        updated_at: timestamp(obj, "updatedAt").unwrap_or(now),
        total_count: 0,
        done_count: 0,
        notes: string(obj, "notes").unwrap_or_default().to_string(),
        plan_type: string(obj, "planType").and_then(PlanType::from_str),
        topic: string(obj, "topic").map(str::to_string),
        difficulty: string(obj, "difficulty").and_then(Difficulty::from_str),
        tasks,
    };
    progress.recount();
    Some(progress)
}

pub fn normalize_task(value: &Value) -> Option<DailyTask> {
    let obj = value.as_object()?;
    Some(DailyTask {
        task_id: non_blank(obj, "taskId")?.to_string(),
        title: non_blank(obj, "title")?.to_string(),
        difficulty: non_blank(obj, "difficulty")?.to_string(),
        topic: string(obj, "topic").map(str::to_string),
        url: string(obj, "url").map(str::to_string),
        status: match string(obj, "status") {
            Some("done") => TaskStatus::Done,
            _ => TaskStatus::Todo,
        },
        note: string(obj, "note").unwrap_or_default().to_string(),
        review: obj.get("review").map(normalize_review).unwrap_or_default(),
    })
}

fn normalize_review(value: &Value) -> TaskReview {
    let Some(obj) = value.as_object() else {
        return TaskReview::default();
    };
    let field = |key: &str| string(obj, key).unwrap_or_default().to_string();
    TaskReview {
        approach: field("thinking"),
        pitfall: field("pitfall"),
        complexity: field("complexity"),
        template: field("template"),
    }
}

// ==================== Mistakes ====================

fn normalize_mistakes(items: &[Value]) -> Vec<MistakeRecord> {
    let mistakes: Vec<MistakeRecord> = items.iter().filter_map(normalize_mistake).collect();
    if mistakes.len() < items.len() {
        tracing::warn!("Dropped {} invalid mistake records", items.len() - mistakes.len());
    }
    mistakes
}

/// Records without an id, a known source domain or a prompt are dropped
pub fn normalize_mistake(value: &Value) -> Option<MistakeRecord> {
    let obj = value.as_object()?;
    let id = non_blank(obj, "id")?;
    let source_domain = string(obj, "sourceMode").and_then(SourceDomain::from_str)?;
    let prompt = non_blank(obj, "prompt")?;

    let created_at = timestamp(obj, "createdAt").unwrap_or_else(Utc::now);
    let date = string(obj, "date")
        .and_then(date_key)
        .unwrap_or_else(|| calendar::to_date_key(created_at));

    Some(MistakeRecord {
        id: id.to_string(),
        created_at,
        updated_at: timestamp(obj, "updatedAt").unwrap_or(created_at),
        date,
        source_domain,
        topic: string(obj, "topic").unwrap_or(UNCATEGORIZED_TOPIC).to_string(),
        tags: obj
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| {
                tags.iter()
                    .filter_map(Value::as_str)
                    .filter(|t| !t.trim().is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        prompt: prompt.to_string(),
        user_answer: string(obj, "myAnswer").map(str::to_string),
        expected_answer: string(obj, "expected").map(str::to_string),
        error_type: string(obj, "errorType")
            .and_then(ErrorType::from_str)
            .unwrap_or_default(),
        severity: clamp_severity(rounded(obj, "severity").unwrap_or(3)),
        notes: string(obj, "notes").unwrap_or_default().to_string(),
        status: string(obj, "status")
            .and_then(MistakeStatus::from_str)
            .unwrap_or_default(),
        srs: obj
            .get("srs")
            .map(|srs| normalize_srs(srs, date))
            .unwrap_or_else(|| SrsState::new(date)),
    })
}

/// Unusable due dates fall back to `fallback_date` (the record's own date)
pub fn normalize_srs(value: &Value, fallback_date: NaiveDate) -> SrsState {
    let Some(obj) = value.as_object() else {
        return SrsState::new(fallback_date);
    };
    let defaults = SrsState::new(fallback_date);

    SrsState {
        interval_days: rounded(obj, "intervalDays")
            .map(|n| n.clamp(1, MAX_INTERVAL_DAYS))
            .unwrap_or(defaults.interval_days),
        ease: number(obj, "ease").map(clamp_ease).unwrap_or(defaults.ease),
        due_date: string(obj, "dueDate").and_then(date_key).unwrap_or(fallback_date),
        review_count: rounded(obj, "reviewCount")
            .map(|n| n.clamp(0, MAX_REVIEW_COUNT))
            .unwrap_or(0),
        last_reviewed_at: timestamp(obj, "lastReviewedAt"),
    }
}

// ==================== Settings ====================

fn normalize_reminders(value: &Value) -> ReminderSettings {
    let mut settings = ReminderSettings::default();
    let Some(obj) = value.as_object() else {
        return settings;
    };
    for id in ReminderId::ALL {
        if let Some(entry) = obj.get(id.as_str()) {
            let fallback = settings.get(id).clone();
            *settings.get_mut(id) = normalize_reminder(entry, fallback);
        }
    }
    settings
}

fn normalize_reminder(value: &Value, fallback: ReminderConfig) -> ReminderConfig {
    let Some(obj) = value.as_object() else {
        return fallback;
    };
    ReminderConfig {
        id: string(obj, "id").and_then(ReminderId::from_str).unwrap_or(fallback.id),
        title: non_blank(obj, "title")
            .map(str::to_string)
            .unwrap_or(fallback.title),
        enabled: obj.get("enabled").and_then(Value::as_bool).unwrap_or(fallback.enabled),
        time: string(obj, "time")
            .filter(|t| is_valid_time(t))
            .map(str::to_string)
            .unwrap_or(fallback.time),
    }
}

fn normalize_app_settings(value: &Value) -> AppSettings {
    let fallback = AppSettings::default();
    AppSettings {
        auto_jump_today_task: value
            .get("autoJumpTodayTask")
            .and_then(Value::as_bool)
            .unwrap_or(fallback.auto_jump_today_task),
    }
}
