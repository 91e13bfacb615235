//! Weakness aggregation over recent mistakes.
//!
//! Two rankings are derived from the mistake book:
//! - `profile`: most frequent topics / error types in the trailing week,
//!   used to bias lesson and drill suggestions
//! - `aggregate_risk_top`: severity-weighted topic ranking for one day,
//!   used by the daily report
//!
//! Ties keep first-encountered order so results are reproducible.

use chrono::NaiveDate;
use std::collections::HashMap;
use std::hash::Hash;

use crate::calendar;
use crate::config::{WEAKNESS_TOP_N, WEAKNESS_WINDOW_DAYS};
use crate::domain::{ErrorType, MistakeRecord, MistakeStatus, SourceDomain};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WeaknessProfile {
    pub top_topics: Vec<String>,
    pub top_error_types: Vec<ErrorType>,
}

impl WeaknessProfile {
    pub fn is_empty(&self) -> bool {
        self.top_topics.is_empty() && self.top_error_types.is_empty()
    }
}

/// Insertion-ordered tally
struct Counter<K> {
    index: HashMap<K, usize>,
    entries: Vec<(K, u32)>,
}

impl<K: Eq + Hash + Clone> Counter<K> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn add(&mut self, key: K, amount: u32) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 += amount,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, amount));
            }
        }
    }

    /// Highest counts first; `sort_by` is stable so ties stay in insertion order
    fn top(mut self, n: usize) -> Vec<(K, u32)> {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.entries.truncate(n);
        self.entries
    }
}

/// Top topics and error types among mistakes dated in the 7-day window ending at `today`
pub fn profile(mistakes: &[MistakeRecord], today: NaiveDate) -> WeaknessProfile {
    let since = calendar::add_days(today, -(WEAKNESS_WINDOW_DAYS - 1));

    let mut topics = Counter::new();
    let mut error_types = Counter::new();
    for item in mistakes.iter().filter(|m| m.date >= since && m.date <= today) {
        topics.add(item.topic_key().to_string(), 1);
        error_types.add(item.error_type, 1);
    }

    WeaknessProfile {
        top_topics: topics.top(WEAKNESS_TOP_N).into_iter().map(|(t, _)| t).collect(),
        top_error_types: error_types
            .top(WEAKNESS_TOP_N)
            .into_iter()
            .map(|(t, _)| t)
            .collect(),
    }
}

/// A topic and its accumulated risk score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRisk {
    pub topic: String,
    pub score: u32,
}

/// Rank topics by risk for the day: each mistake contributes its severity,
/// plus one while it is not fixed. Falls back to the whole book when nothing
/// was recorded on `date`.
pub fn aggregate_risk_top(mistakes: &[MistakeRecord], date: NaiveDate, limit: usize) -> Vec<TopicRisk> {
    let todays: Vec<&MistakeRecord> = mistakes.iter().filter(|m| m.date == date).collect();
    let pool: Vec<&MistakeRecord> = if todays.is_empty() {
        mistakes.iter().collect()
    } else {
        todays
    };

    let mut scores = Counter::new();
    for item in pool {
        let weight = item.severity as u32 + if item.is_fixed() { 0 } else { 1 };
        scores.add(item.topic_key().to_string(), weight);
    }

    scores
        .top(limit)
        .into_iter()
        .map(|(topic, score)| TopicRisk { topic, score })
        .collect()
}

/// Mistake-book filter; `None` fields match everything
#[derive(Debug, Clone, Default)]
pub struct MistakeFilter {
    pub source_domain: Option<SourceDomain>,
    pub error_type: Option<ErrorType>,
    pub status: Option<MistakeStatus>,
    pub min_severity: Option<u8>,
    /// Case-insensitive substring over tags and topic
    pub query: Option<String>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl MistakeFilter {
    pub fn matches(&self, item: &MistakeRecord) -> bool {
        if self.source_domain.is_some_and(|d| d != item.source_domain) {
            return false;
        }
        if self.error_type.is_some_and(|t| t != item.error_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != item.status) {
            return false;
        }
        if self.min_severity.is_some_and(|min| item.severity < min) {
            return false;
        }
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            let query = query.to_lowercase();
            let in_tags = item.tags.iter().any(|t| t.to_lowercase().contains(&query));
            let in_topic = item.topic.to_lowercase().contains(&query);
            if !in_tags && !in_topic {
                return false;
            }
        }
        if self.from_date.is_some_and(|from| item.date < from) {
            return false;
        }
        if self.to_date.is_some_and(|to| item.date > to) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, mistakes: &'a [MistakeRecord]) -> Vec<&'a MistakeRecord> {
        mistakes.iter().filter(|m| self.matches(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date_key;
    use crate::domain::{create_mistake, NewMistake};

    fn day(s: &str) -> NaiveDate {
        parse_date_key(s).unwrap()
    }

    fn record(topic: &str, date: &str, error_type: ErrorType) -> MistakeRecord {
        create_mistake(NewMistake {
            date: Some(day(date)),
            error_type: Some(error_type),
            ..NewMistake::new(SourceDomain::Lanqiao, topic, "prompt")
        })
        .unwrap()
    }

    #[test]
    fn test_profile_empty() {
        assert!(profile(&[], day("2024-01-07")).is_empty());
    }

    #[test]
    fn test_profile_window_is_inclusive_seven_days() {
        let items = vec![
            record("too-old", "2023-12-31", ErrorType::Concept),
            record("first-day", "2024-01-01", ErrorType::Boundary),
            record("today", "2024-01-07", ErrorType::Boundary),
            record("future", "2024-01-08", ErrorType::Concept),
        ];
        let p = profile(&items, day("2024-01-07"));
        assert_eq!(p.top_topics, vec!["first-day".to_string(), "today".to_string()]);
        assert_eq!(p.top_error_types, vec![ErrorType::Boundary]);
    }

    #[test]
    fn test_profile_ranks_by_count_then_first_seen() {
        let items = vec![
            record("graph", "2024-01-05", ErrorType::Careless),
            record("dp", "2024-01-05", ErrorType::Concept),
            record("string", "2024-01-05", ErrorType::Concept),
            record("dp", "2024-01-06", ErrorType::Careless),
            record("greedy", "2024-01-06", ErrorType::Implementation),
            record("string", "2024-01-06", ErrorType::Boundary),
        ];
        let p = profile(&items, day("2024-01-07"));
        // dp and string tie at 2; dp was seen first. graph beats greedy on first-seen.
        assert_eq!(p.top_topics, vec!["dp".to_string(), "string".to_string(), "graph".to_string()]);
        assert_eq!(
            p.top_error_types,
            vec![ErrorType::Careless, ErrorType::Concept, ErrorType::Implementation]
        );
    }

    #[test]
    fn test_profile_blank_topic_is_uncategorized() {
        let mut item = record("x", "2024-01-07", ErrorType::Unknown);
        item.topic = "   ".into();
        let p = profile(&[item], day("2024-01-07"));
        assert_eq!(p.top_topics, vec!["uncategorized".to_string()]);
    }

    #[test]
    fn test_aggregate_risk_prefers_today() {
        let mut fixed = record("tree", "2024-01-07", ErrorType::Concept);
        fixed.severity = 5;
        fixed.status = MistakeStatus::Fixed;
        let mut open = record("heap", "2024-01-07", ErrorType::Concept);
        open.severity = 4;
        let old = record("graph", "2024-01-01", ErrorType::Concept);

        let top = aggregate_risk_top(&[fixed, open, old], day("2024-01-07"), 3);
        assert_eq!(
            top,
            vec![
                TopicRisk { topic: "tree".into(), score: 5 },
                TopicRisk { topic: "heap".into(), score: 5 },
            ]
        );
    }

    #[test]
    fn test_aggregate_risk_falls_back_to_all() {
        let items = vec![
            record("graph", "2024-01-01", ErrorType::Concept),
            record("graph", "2024-01-02", ErrorType::Concept),
            record("dp", "2024-01-02", ErrorType::Concept),
        ];
        let top = aggregate_risk_top(&items, day("2024-01-07"), 1);
        assert_eq!(top, vec![TopicRisk { topic: "graph".into(), score: 8 }]);
    }

    #[test]
    fn test_filter() {
        let mut a = record("Dynamic Programming", "2024-01-02", ErrorType::Concept);
        a.tags = vec!["Knapsack".into()];
        a.severity = 4;
        let mut b = record("graph", "2024-01-05", ErrorType::Boundary);
        b.status = MistakeStatus::Fixed;
        let items = vec![a, b];

        let by_query = MistakeFilter {
            query: Some("knap".into()),
            ..Default::default()
        };
        assert_eq!(by_query.apply(&items).len(), 1);

        let by_topic = MistakeFilter {
            query: Some("dynamic".into()),
            min_severity: Some(4),
            ..Default::default()
        };
        assert_eq!(by_topic.apply(&items).len(), 1);

        let by_status = MistakeFilter {
            status: Some(MistakeStatus::Fixed),
            from_date: Some(day("2024-01-03")),
            ..Default::default()
        };
        let hits = by_status.apply(&items);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].topic, "graph");

        let none = MistakeFilter {
            to_date: Some(day("2024-01-01")),
            ..Default::default()
        };
        assert!(none.apply(&items).is_empty());

        assert_eq!(MistakeFilter::default().apply(&items).len(), 2);
    }
}
