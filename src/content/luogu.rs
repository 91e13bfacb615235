//! Luogu daily problem list: a fixed quota drawn from a built-in source.

use chrono::{DateTime, NaiveDate, Utc};

use super::generator::{self, BankItem, ProgressSource};
use super::sampler::{self, SeedHash};
use crate::config::LUOGU_TASK_COUNT;
use crate::domain::{DailyModeId, DailyTask, ModeProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuoguItem {
    pub task_id: &'static str,
    pub title: &'static str,
    pub difficulty: &'static str,
    pub url: &'static str,
}

impl BankItem for LuoguItem {
    fn task_id(&self) -> &str {
        self.task_id
    }

    fn to_task(&self) -> DailyTask {
        generator::fresh_task(
            self.task_id,
            self.title,
            self.difficulty,
            None,
            Some(self.url.to_string()),
            String::new(),
        )
    }
}

/// A named problem list
#[derive(Debug, Clone, Copy)]
pub struct LuoguSource {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub items: &'static [LuoguItem],
}

const fn item(
    task_id: &'static str,
    title: &'static str,
    difficulty: &'static str,
    url: &'static str,
) -> LuoguItem {
    LuoguItem {
        task_id,
        title,
        difficulty,
        url,
    }
}

const DEFAULT_ITEMS: [LuoguItem; 20] = [
    item("P1001", "A+B Problem", "入门", "https://www.luogu.com.cn/problem/P1001"),
    item("P1008", "三连击", "入门", "https://www.luogu.com.cn/problem/P1008"),
    item("P1014", "Cantor 表", "入门", "https://www.luogu.com.cn/problem/P1014"),
    item("P1035", "级数求和", "入门", "https://www.luogu.com.cn/problem/P1035"),
    item("P1046", "陶陶摘苹果", "入门", "https://www.luogu.com.cn/problem/P1046"),
    item("P1055", "ISBN 号码", "普及-", "https://www.luogu.com.cn/problem/P1055"),
    item("P1089", "津津的储蓄计划", "普及-", "https://www.luogu.com.cn/problem/P1089"),
    item("P1102", "A-B 数对", "普及-", "https://www.luogu.com.cn/problem/P1102"),
    item("P1125", "笨小猴", "普及-", "https://www.luogu.com.cn/problem/P1125"),
    item("P1428", "小鱼比可爱", "入门", "https://www.luogu.com.cn/problem/P1428"),
    item("P1614", "爱与愁的心痛", "普及-", "https://www.luogu.com.cn/problem/P1614"),
    item("P1909", "买铅笔", "入门", "https://www.luogu.com.cn/problem/P1909"),
    item("P2141", "珠心算测验", "普及-", "https://www.luogu.com.cn/problem/P2141"),
    item("P2415", "集合求和", "普及-", "https://www.luogu.com.cn/problem/P2415"),
    item("P2670", "扫雷游戏", "普及-", "https://www.luogu.com.cn/problem/P2670"),
    item("P2911", "Bovine Bones G", "普及-", "https://www.luogu.com.cn/problem/P2911"),
    item("P5733", "自动修正", "入门", "https://www.luogu.com.cn/problem/P5733"),
    item("P5727", "冰雹猜想", "入门", "https://www.luogu.com.cn/problem/P5727"),
    item("P5743", "猴子吃桃", "入门", "https://www.luogu.com.cn/problem/P5743"),
    item("P1307", "数字反转", "入门", "https://www.luogu.com.cn/problem/P1307"),
];

pub const DEFAULT_SOURCE_ID: &str = "luogu-default";

pub static SOURCES: [LuoguSource; 1] = [LuoguSource {
    id: DEFAULT_SOURCE_ID,
    title: "Luogu classic starter list (built-in)",
    description: "20 common starter problems; 5 are drawn each day.",
    items: &DEFAULT_ITEMS,
}];

/// Look up a source, falling back to the built-in list for unknown IDs
pub fn find_source(source_id: &str) -> &'static LuoguSource {
    SOURCES
        .iter()
        .find(|s| s.id == source_id)
        .unwrap_or(&SOURCES[0])
}

#[derive(Debug, Clone)]
pub struct LuoguParams {
    pub date_key: NaiveDate,
    pub source_id: String,
    pub task_count: Option<usize>,
}

impl LuoguParams {
    pub fn new(date_key: NaiveDate) -> Self {
        Self {
            date_key,
            source_id: DEFAULT_SOURCE_ID.to_string(),
            task_count: None,
        }
    }

    /// `"{date}:{source}"`
    pub fn seed(&self, source: &LuoguSource) -> String {
        format!("{}:{}", self.date_key, source.id)
    }
}

/// Generate (or regenerate) the day's luogu list
pub fn generate(params: &LuoguParams, existing: Option<&ModeProgress>) -> ModeProgress {
    generate_at(params, existing, Utc::now())
}

pub fn generate_at(
    params: &LuoguParams,
    existing: Option<&ModeProgress>,
    now: DateTime<Utc>,
) -> ModeProgress {
    let source = find_source(&params.source_id);
    let count = params.task_count.unwrap_or(LUOGU_TASK_COUNT);
    let picked = sampler::sample_with(source.items, count, &params.seed(source), SeedHash::Fnv1a);
    let tasks = generator::build_tasks(&picked, existing);

    generator::assemble(
        ProgressSource {
            mode_id: DailyModeId::Luogu,
            date_key: params.date_key,
            source_id: source.id,
            source_title: source.title,
        },
        tasks,
        existing,
        now,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::parse_date_key;
    use crate::domain::TaskStatus;

    fn params(date: &str) -> LuoguParams {
        LuoguParams::new(parse_date_key(date).unwrap())
    }

    fn ids(progress: &ModeProgress) -> Vec<&str> {
        progress.tasks.iter().map(|t| t.task_id.as_str()).collect()
    }

    #[test]
    fn test_pinned_selection() {
        let progress = generate(&params("2024-01-01"), None);
        assert_eq!(ids(&progress), vec!["P1102", "P1014", "P5727", "P2141", "P1125"]);

        let progress = generate(&params("2024-01-02"), None);
        assert_eq!(ids(&progress), vec!["P1089", "P2670", "P1014", "P1614", "P5743"]);
    }

    #[test]
    fn test_same_day_same_tasks() {
        let a = generate(&params("2024-05-20"), None);
        let b = generate(&params("2024-05-20"), None);
        assert_eq!(ids(&a), ids(&b));
    }

    #[test]
    fn test_progress_header() {
        let progress = generate(&params("2024-01-01"), None);
        assert_eq!(progress.mode_id, DailyModeId::Luogu);
        assert_eq!(progress.source_id, "luogu-default");
        assert_eq!(progress.total_count, 5);
        assert_eq!(progress.done_count, 0);
        assert!(progress.notes.is_empty());
        assert!(progress.tasks.iter().all(|t| t.url.as_deref().unwrap_or("").contains(&t.task_id)));
    }

    #[test]
    fn test_unknown_source_falls_back() {
        let mut p = params("2024-01-01");
        p.source_id = "no-such-list".into();
        let progress = generate(&p, None);
        assert_eq!(progress.source_id, DEFAULT_SOURCE_ID);
        assert_eq!(ids(&progress), vec!["P1102", "P1014", "P5727", "P2141", "P1125"]);
    }

    #[test]
    fn test_custom_task_count() {
        let mut p = params("2024-01-01");
        p.task_count = Some(50);
        assert_eq!(generate(&p, None).total_count, 20);
    }

    #[test]
    fn test_regenerate_preserves_done_and_note() {
        let first = generate(&params("2024-01-01"), None);
        let mut edited = first.clone();
        edited.tasks[0].status = TaskStatus::Done;
        edited.tasks[0].note = "x".into();
        edited.recount();

        let second = generate(&params("2024-01-01"), Some(&edited));
        assert_eq!(second.tasks[0].task_id, first.tasks[0].task_id);
        assert_eq!(second.tasks[0].status, TaskStatus::Done);
        assert_eq!(second.tasks[0].note, "x");
        assert_eq!(second.done_count, 1);
    }
}
