//! Shared daily-task generation: bank items become `DailyTask`s and user
//! edits from a previously saved progress are carried over by task ID.
//!
//! Regeneration never resets `status`, `note` or `review` of a task that
//! already exists for the day; bank metadata (title, difficulty, URL) is
//! always refreshed from the bank.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;

use crate::domain::{DailyModeId, DailyTask, ModeProgress, TaskReview, TaskStatus};

/// A static bank entry that can be turned into a daily task
pub trait BankItem {
    fn task_id(&self) -> &str;

    /// Task with bank metadata and default user fields
    fn to_task(&self) -> DailyTask;
}

/// Defaults for a task that has no saved state yet
pub fn fresh_task(
    task_id: &str,
    title: &str,
    difficulty: &str,
    topic: Option<&str>,
    url: Option<String>,
    note: String,
) -> DailyTask {
    DailyTask {
        task_id: task_id.to_string(),
        title: title.to_string(),
        difficulty: difficulty.to_string(),
        topic: topic.map(str::to_string),
        url,
        status: TaskStatus::Todo,
        note,
        review: TaskReview::default(),
    }
}

/// Carry user-editable fields from `previous` onto a freshly built task
pub fn carry_forward(mut task: DailyTask, previous: Option<&DailyTask>) -> DailyTask {
    if let Some(prev) = previous {
        task.status = prev.status;
        task.note = prev.note.clone();
        task.review = prev.review.clone();
    }
    task
}

/// Build the day's tasks from sampled bank items, merging by task ID
pub fn build_tasks<T: BankItem>(picked: &[&T], existing: Option<&ModeProgress>) -> Vec<DailyTask> {
    let previous_by_id: HashMap<&str, &DailyTask> = existing
        .map(|p| p.tasks.iter().map(|t| (t.task_id.as_str(), t)).collect())
        .unwrap_or_default();

    picked
        .iter()
        .map(|item| carry_forward(item.to_task(), previous_by_id.get(item.task_id()).copied()))
        .collect()
}

/// Header fields of a generated progress
#[derive(Debug, Clone)]
pub struct ProgressSource<'a> {
    pub mode_id: DailyModeId,
    pub date_key: NaiveDate,
    pub source_id: &'a str,
    pub source_title: &'a str,
}

/// Assemble a `ModeProgress`; day notes carry over verbatim from `existing`
pub fn assemble(
    source: ProgressSource<'_>,
    tasks: Vec<DailyTask>,
    existing: Option<&ModeProgress>,
    now: DateTime<Utc>,
) -> ModeProgress {
    let mut progress = ModeProgress {
        mode_id: source.mode_id,
        date_key: source.date_key,
        source_id: source.source_id.to_string(),
        source_title: source.source_title.to_string(),
        generated_at: now,
        updated_at: now,
        total_count: 0,
        done_count: 0,
        notes: existing.map(|p| p.notes.clone()).unwrap_or_default(),
        plan_type: None,
        topic: None,
        difficulty: None,
        tasks,
    };
    progress.recount();

    tracing::debug!(
        "Generated {} {} tasks for {} ({} carried over)",
        progress.total_count,
        progress.mode_id.as_str(),
        progress.date_key,
        existing
            .map(|e| progress.tasks.iter().filter(|t| e.task(&t.task_id).is_some()).count())
            .unwrap_or(0)
    );

    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date_key;

    struct Item(&'static str);

    impl BankItem for Item {
        fn task_id(&self) -> &str {
            self.0
        }

        fn to_task(&self) -> DailyTask {
            fresh_task(self.0, "fresh title", "easy", None, None, "bank hint".into())
        }
    }

    fn date() -> NaiveDate {
        parse_date_key("2024-01-01").unwrap()
    }

    fn source() -> ProgressSource<'static> {
        ProgressSource {
            mode_id: DailyModeId::Luogu,
            date_key: date(),
            source_id: "src",
            source_title: "Source",
        }
    }

    #[test]
    fn test_build_tasks_without_existing_uses_defaults() {
        let a = Item("A");
        let tasks = build_tasks(&[&a], None);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].status, TaskStatus::Todo);
        assert_eq!(tasks[0].note, "bank hint");
        assert_eq!(tasks[0].review, TaskReview::default());
    }

    #[test]
    fn test_build_tasks_carries_user_fields_only() {
        let (a, b) = (Item("A"), Item("B"));
        let first = assemble(source(), build_tasks(&[&a, &b], None), None, Utc::now());

        let mut edited = first.clone();
        edited.tasks[1].status = TaskStatus::Done;
        edited.tasks[1].note = "x".into();
        edited.tasks[1].review.pitfall = "off by one".into();
        edited.tasks[1].title = "stale title".into();
        edited.notes = "day notes".into();

        let regenerated = assemble(
            source(),
            build_tasks(&[&a, &b], Some(&edited)),
            Some(&edited),
            Utc::now(),
        );
        let b_task = regenerated.task("B").unwrap();
        assert_eq!(b_task.status, TaskStatus::Done);
        assert_eq!(b_task.note, "x");
        assert_eq!(b_task.review.pitfall, "off by one");
        assert_eq!(b_task.title, "fresh title");
        assert_eq!(regenerated.notes, "day notes");
        assert_eq!(regenerated.done_count, 1);
        assert_eq!(regenerated.total_count, 2);
    }

    #[test]
    fn test_tasks_not_in_selection_are_dropped() {
        let (a, b) = (Item("A"), Item("B"));
        let mut old = assemble(source(), build_tasks(&[&a], None), None, Utc::now());
        old.tasks[0].status = TaskStatus::Done;

        let next = assemble(source(), build_tasks(&[&b], Some(&old)), Some(&old), Utc::now());
        assert!(next.task("A").is_none());
        assert_eq!(next.done_count, 0);
    }
}
