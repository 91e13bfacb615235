//! Mock interview planning: question choice and the backend topic rotation.

use std::collections::HashSet;

use crate::domain::LessonLevel;

/// Pressure tier derived from the 1-10 intensity slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityTier {
    Gentle,
    Normal,
    Hell,
}

impl IntensityTier {
    pub fn from_intensity(intensity: u8) -> Self {
        match intensity {
            0..=3 => Self::Gentle,
            4..=7 => Self::Normal,
            _ => Self::Hell,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gentle => "gentle",
            Self::Normal => "normal",
            Self::Hell => "hell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewMode {
    Chat,
    Drill,
}

impl InterviewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Drill => "drill",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "chat" => Some(Self::Chat),
            "drill" => Some(Self::Drill),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankQuestion {
    pub id: &'static str,
    pub tags: &'static [&'static str],
    pub level: LessonLevel,
    pub prompt: &'static str,
    pub followups: &'static [&'static str],
}

pub static QUESTION_BANK: [BankQuestion; 3] = [
    BankQuestion {
        id: "q-meta-project-deep-dive",
        tags: &["meta/project-deep-dive", "meta/tradeoffs"],
        level: LessonLevel::L2,
        prompt: "选一个你最熟的项目：目标/架构/你的贡献/最难的问题/结果（指标）讲清楚。",
        followups: &["如果重做一次，你会怎么改？"],
    },
    BankQuestion {
        id: "q-rest-idempotency",
        tags: &["backend/rest", "backend/idempotency"],
        level: LessonLevel::L3,
        prompt: "为“创建订单”接口设计幂等：幂等键怎么生成、存哪里、过期怎么做？",
        followups: &["并发重复请求怎么保证只创建一次？"],
    },
    BankQuestion {
        id: "q-mysql-index-btree",
        tags: &["db/mysql-indexing", "db/index"],
        level: LessonLevel::L2,
        prompt: "InnoDB B+Tree 为什么适合范围查询？覆盖索引/回表是什么？",
        followups: &["你会怎么让慢查询可观测并优化？"],
    },
];

/// The project the candidate is being interviewed about
#[derive(Debug, Clone, Default)]
pub struct Project {
    pub name: String,
    pub tech: Vec<String>,
}

/// Tags worth extra weight for this project's stack
fn boosted_tags(project: Option<&Project>) -> HashSet<&'static str> {
    let mut tags = HashSet::from(["meta/project-deep-dive"]);
    let Some(project) = project else {
        return tags;
    };
    let uses = |name: &str| project.tech.iter().any(|t| t.to_lowercase().contains(name));
    if uses("spring") {
        tags.insert("backend/spring-core");
    }
    if uses("mysql") {
        tags.insert("db/mysql-indexing");
    }
    tags
}

fn score(question: &BankQuestion, boosted: &HashSet<&str>, mode: InterviewMode, tier: IntensityTier) -> u32 {
    let mut score = 0;
    for tag in question.tags {
        if boosted.contains(tag) {
            score += 3;
        }
        if tag.starts_with("db/") || tag.starts_with("backend/") {
            score += 1;
        }
    }
    if mode == InterviewMode::Drill {
        score += 1;
    }
    if tier == IntensityTier::Hell {
        score += match question.level {
            LessonLevel::L3 => 2,
            LessonLevel::L2 => 1,
            _ => 0,
        };
    }
    score
}

/// Highest-scoring question not yet asked; ties keep bank order.
///
/// Once everything has been asked the first question is repeated. Returns
/// None only for an empty bank.
pub fn choose_next_question<'a>(
    bank: &'a [BankQuestion],
    project: Option<&Project>,
    mode: InterviewMode,
    intensity: u8,
    asked: &HashSet<String>,
) -> Option<&'a BankQuestion> {
    let boosted = boosted_tags(project);
    let tier = IntensityTier::from_intensity(intensity);

    let mut best: Option<(&BankQuestion, u32)> = None;
    for question in bank.iter().filter(|q| !asked.contains(q.id)) {
        let s = score(question, &boosted, mode, tier);
        if best.is_none_or(|(_, top)| s > top) {
            best = Some((question, s));
        }
    }
    best.map(|(q, _)| q).or_else(|| bank.first())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTopic {
    pub name: &'static str,
    pub prompt: &'static str,
}

pub static BACKEND_TOPICS: [BackendTopic; 4] = [
    BackendTopic {
        name: "Idempotency for order APIs",
        prompt: "Design idempotency for a create-order API: key generation, storage and expiry.",
    },
    BackendTopic {
        name: "MySQL indexing and slow query diagnosis",
        prompt: "Explain B+Tree range scans, covering indexes and how you would diagnose a slow query.",
    },
    BackendTopic {
        name: "Redis cache consistency",
        prompt: "Keep a Redis cache consistent with MySQL under concurrent writes.",
    },
    BackendTopic {
        name: "Concurrency and lock contention",
        prompt: "Find and reduce lock contention in a hot service path.",
    },
];

pub static ALGO_WARMUPS: [&str; 4] = [
    "Top-k frequent elements",
    "LRU cache",
    "Shortest subarray with sum at least target",
    "Cycle detection in a directed graph",
];

/// One mock round: a backend topic, an algorithm warm-up and the cursor to store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockRound {
    pub backend_topic: &'static BackendTopic,
    pub algo_warmup: &'static str,
    pub next_cursor: u64,
}

pub fn plan_mock_round(cursor: u64) -> MockRound {
    let topics = BACKEND_TOPICS.len() as u64;
    let warmups = ALGO_WARMUPS.len() as u64;
    MockRound {
        backend_topic: &BACKEND_TOPICS[(cursor % topics) as usize],
        algo_warmup: ALGO_WARMUPS[(cursor.wrapping_add(1) % warmups) as usize],
        next_cursor: cursor.wrapping_add(1) % topics,
    }
}
