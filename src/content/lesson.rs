//! Daily 408 lesson topic selection.
//!
//! Priority: the user's override text, then the first weak topic from the
//! mistake book that maps onto a lesson, then a weekday rotation.

use chrono::{Datelike, NaiveDate};

use crate::domain::ErrorType;
use crate::weakness::WeaknessProfile;

/// A lesson topic and the keywords that route free text to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonTopic {
    pub topic: &'static str,
    /// Lowercase
    pub keywords: &'static [&'static str],
}

pub static LESSON_TOPICS: [LessonTopic; 3] = [
    LessonTopic {
        topic: "操作系统：时间片轮转调度（RR）",
        keywords: &["操作系统", "调度", "rr", "时间片", "进程"],
    },
    LessonTopic {
        topic: "计算机网络：TCP 三次握手与重传",
        keywords: &["网络", "tcp", "握手", "重传", "rto"],
    },
    LessonTopic {
        topic: "数据库：B+Tree 索引与回表",
        keywords: &["数据库", "mysql", "索引", "回表", "b+tree"],
    },
];

/// Lesson whose title contains `text`, or one of whose keywords appears in it
pub fn find_topic(text: &str) -> Option<&'static LessonTopic> {
    let query = text.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }
    LESSON_TOPICS.iter().find(|t| {
        t.topic.to_lowercase().contains(&query) || t.keywords.iter().any(|k| query.contains(k))
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedTopic {
    pub lesson: &'static LessonTopic,
    /// Title shown to the user; an override keeps the user's own wording
    pub label: String,
}

impl PickedTopic {
    fn from_lesson(lesson: &'static LessonTopic) -> Self {
        Self {
            lesson,
            label: lesson.topic.to_string(),
        }
    }
}

pub fn pick_topic(date: NaiveDate, topic_override: &str, profile: &WeaknessProfile) -> PickedTopic {
    let custom = topic_override.trim();
    if !custom.is_empty() {
        let lesson = find_topic(custom).unwrap_or(&LESSON_TOPICS[0]);
        return PickedTopic {
            lesson,
            label: custom.to_string(),
        };
    }

    if let Some(lesson) = profile.top_topics.iter().find_map(|t| find_topic(t)) {
        tracing::debug!("Lesson topic from weak spot: {}", lesson.topic);
        return PickedTopic::from_lesson(lesson);
    }

    let weekday = date.weekday().num_days_from_sunday() as usize;
    PickedTopic::from_lesson(&LESSON_TOPICS[weekday % LESSON_TOPICS.len()])
}

/// Two short drills aimed at the most frequent recent error types
pub fn micro_practices(profile: &WeaknessProfile) -> Vec<String> {
    let Some(&top) = profile.top_error_types.first() else {
        return vec![
            "Explain the conclusion of today's first card aloud in two minutes.".to_string(),
            "Work a small example by hand and restate every step without the answer.".to_string(),
        ];
    };

    let first = match top {
        ErrorType::Concept => "State one definition and one counterexample to pin down the concept's edges.",
        ErrorType::Boundary => "List three boundary inputs for today's topic: smallest, largest, empty.",
        ErrorType::Complexity => "Say the time and space complexity of today's worked example out loud.",
        ErrorType::Implementation => "Write five lines of pseudocode keeping only key steps and conditions.",
        ErrorType::Expression => "Practice the 'conclusion, reason, example' answer template in thirty seconds.",
        ErrorType::Careless => "Before solving, write a checklist: input range, initialization, return value.",
        ErrorType::Unknown => "Pick the simplest sub-question and talk through the approach before coding.",
    };
    let mut practices = vec![first.to_string()];

    match profile.top_error_types.get(1) {
        Some(&second) if second != top => practices.push(format!(
            "Add a three-minute drill on '{}' and write a one-line review.",
            second.label()
        )),
        _ => practices.push("Copy today's most error-prone step onto a flash card.".to_string()),
    }
    practices
}
