//! Lanqiao practice: daily (2 problems) or topic-focused (3 problems) plans
//! over a built-in bank, filtered by difficulty and topic.

use chrono::{DateTime, NaiveDate, Utc};

use super::generator::{self, BankItem, ProgressSource};
use super::sampler::{self, SeedHash};
use crate::config::{LANQIAO_DAILY_TASK_COUNT, LANQIAO_TOPIC_TASK_COUNT};
use crate::domain::Difficulty::{Easy, Hard, Medium};
use crate::domain::{DailyModeId, DailyTask, Difficulty, ModeProgress, PlanType};

pub const SOURCE_ID: &str = "lanqiao-built-in";
pub const SOURCE_TITLE: &str = "Lanqiao built-in bank";

pub const TOPICS: [&str; 6] = [
    "数组与前缀和",
    "枚举与模拟",
    "贪心",
    "动态规划",
    "图论基础",
    "字符串",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanqiaoItem {
    pub task_id: &'static str,
    pub title: &'static str,
    pub topic: &'static str,
    pub difficulty: Difficulty,
    pub key_point: &'static str,
    pub source: &'static str,
    pub url: Option<&'static str>,
}

impl LanqiaoItem {
    pub fn url(&self) -> String {
        self.url
            .map(str::to_string)
            .unwrap_or_else(|| search_url(self.title))
    }
}

impl BankItem for LanqiaoItem {
    fn task_id(&self) -> &str {
        self.task_id
    }

    fn to_task(&self) -> DailyTask {
        generator::fresh_task(
            self.task_id,
            self.title,
            self.difficulty.as_str(),
            Some(self.topic),
            Some(self.url()),
            default_note(self.key_point, self.source),
        )
    }
}

const fn item(
    task_id: &'static str,
    title: &'static str,
    topic: &'static str,
    difficulty: Difficulty,
    key_point: &'static str,
    source: &'static str,
    url: &'static str,
) -> LanqiaoItem {
    LanqiaoItem {
        task_id,
        title,
        topic,
        difficulty,
        key_point,
        source,
        url: Some(url),
    }
}

pub static BANK: [LanqiaoItem; 24] = [
    item("LQ-001", "连续区间统计", "数组与前缀和", Easy, "前缀和 + 双指针", "蓝桥杯真题改编", "https://www.lanqiao.cn/problems/19709/learning/"),
    item("LQ-002", "区间最值差", "数组与前缀和", Medium, "单调队列", "蓝桥杯训练", "https://www.lanqiao.cn/problems/7936/learning/"),
    item("LQ-003", "子数组和为 K", "数组与前缀和", Medium, "前缀和 + 哈希计数", "蓝桥杯训练", "https://www.lanqiao.cn/problems/12043/learning/"),
    item("LQ-004", "数字翻转模拟", "枚举与模拟", Easy, "按位处理边界", "蓝桥杯真题改编", "https://www.lanqiao.cn/problems/8147/learning/"),
    item("LQ-005", "路径枚举校验", "枚举与模拟", Medium, "状态压缩 + 剪枝", "蓝桥杯训练", "https://www.lanqiao.cn/problems/4177/learning/"),
    item("LQ-006", "日期递推", "枚举与模拟", Easy, "闰年与月天数判断", "蓝桥杯训练", "https://www.lanqiao.cn/problems/1452/learning/"),
    item("LQ-007", "最少加油次数", "贪心", Hard, "优先队列 + 贪心决策", "蓝桥杯训练", "https://www.lanqiao.cn/problems/4389/learning/"),
    item("LQ-008", "区间覆盖最少点", "贪心", Medium, "按右端点排序", "蓝桥杯真题改编", "https://www.lanqiao.cn/problems/18427/learning/"),
    item("LQ-009", "任务调度收益", "贪心", Hard, "截止时间排序 + 小根堆", "蓝桥杯训练", "https://www.lanqiao.cn/problems/4510/learning/"),
    item("LQ-010", "楼梯方案数", "动态规划", Easy, "一维 DP 递推", "蓝桥杯训练", "https://www.lanqiao.cn/problems/806/learning/"),
    item("LQ-011", "背包价值最大化", "动态规划", Medium, "01 背包状态转移", "蓝桥杯真题改编", "https://www.lanqiao.cn/problems/3929/learning/"),
    item("LQ-012", "区间 DP 合并石子", "动态规划", Hard, "区间划分 + 枚举断点", "蓝桥杯训练", "https://www.lanqiao.cn/problems/4437/learning/"),
    item("LQ-013", "最短路模板题", "图论基础", Easy, "Dijkstra 模板", "蓝桥杯训练", "https://www.lanqiao.cn/problems/1135/learning/"),
    item("LQ-014", "最小生成树", "图论基础", Medium, "Kruskal 并查集", "蓝桥杯真题改编", "https://www.lanqiao.cn/problems/98/learning/"),
    item("LQ-015", "拓扑排序判环", "图论基础", Medium, "入度队列", "蓝桥杯训练", "https://www.lanqiao.cn/problems/5724/learning/"),
    item("LQ-016", "子串匹配计数", "字符串", Easy, "滑动窗口", "蓝桥杯训练", "https://www.lanqiao.cn/problems/2406/learning/"),
    item("LQ-017", "最短回文补全", "字符串", Medium, "KMP 前缀函数", "蓝桥杯训练", "https://www.lanqiao.cn/problems/3901/learning/"),
    item("LQ-018", "最小表示法", "字符串", Hard, "双指针最小循环同构", "蓝桥杯真题改编", "https://www.lanqiao.cn/problems/3918/learning/"),
    item("LQ-019", "矩阵路径计数", "动态规划", Easy, "二维 DP", "蓝桥杯训练", "https://www.lanqiao.cn/problems/3902/learning/"),
    item("LQ-020", "区间贪心选点", "贪心", Easy, "排序 + 末端选择", "蓝桥杯训练", "https://www.lanqiao.cn/problems/4765/learning/"),
    item("LQ-021", "模拟排队系统", "枚举与模拟", Medium, "事件驱动模拟", "蓝桥杯训练", "https://www.lanqiao.cn/problems/3758/learning/"),
    item("LQ-022", "树上最远点", "图论基础", Hard, "树形 DP / 两次 BFS", "蓝桥杯训练", "https://www.lanqiao.cn/problems/3845/learning/"),
    item("LQ-023", "字符串压缩还原", "字符串", Medium, "栈 + 解析", "蓝桥杯训练", "https://www.lanqiao.cn/problems/3897/learning/"),
    item("LQ-024", "子序列最优值", "动态规划", Hard, "状态设计与滚动数组", "蓝桥杯训练", "https://www.lanqiao.cn/problems/4180/learning/"),
];

/// Note shown on a task the user has not annotated yet
pub fn default_note(key_point: &str, source: &str) -> String {
    format!("关键点：{}；来源：{}", key_point, source)
}

/// Keyword search on the problem site
pub fn search_url(title: &str) -> String {
    format!(
        "https://www.lanqiao.cn/problems/?keyword={}",
        urlencoding::encode(title)
    )
}

/// Best link for a task: its own URL, else the bank's, else a title search
pub fn task_url(task: &DailyTask) -> String {
    if let Some(url) = task.url.as_deref().filter(|u| !u.trim().is_empty()) {
        return url.to_string();
    }
    BANK.iter()
        .find(|item| item.task_id == task.task_id)
        .map(LanqiaoItem::url)
        .unwrap_or_else(|| search_url(&task.title))
}

#[derive(Debug, Clone)]
pub struct LanqiaoParams {
    pub date_key: NaiveDate,
    pub plan_type: PlanType,
    pub topic: String,
    pub difficulty: Difficulty,
}

impl LanqiaoParams {
    pub fn new(date_key: NaiveDate) -> Self {
        Self {
            date_key,
            plan_type: PlanType::Daily,
            topic: TOPICS[0].to_string(),
            difficulty: Difficulty::All,
        }
    }

    /// `"{date}:{plan}:{topic}:{difficulty}"`
    pub fn seed(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.date_key,
            self.plan_type.as_str(),
            self.topic,
            self.difficulty.as_str()
        )
    }

    pub fn task_count(&self) -> usize {
        match self.plan_type {
            PlanType::Topic => LANQIAO_TOPIC_TASK_COUNT,
            PlanType::Daily => LANQIAO_DAILY_TASK_COUNT,
        }
    }
}

/// Candidate pool for a plan. A topic plan that matches nothing falls back to
/// the difficulty-filtered pool, and an empty difficulty filter falls back to
/// the whole bank, so a non-empty bank always yields tasks.
pub fn candidate_pool<'a>(bank: &'a [LanqiaoItem], params: &LanqiaoParams) -> Vec<&'a LanqiaoItem> {
    let mut filtered: Vec<&LanqiaoItem> = bank
        .iter()
        .filter(|item| params.difficulty.admits(item.difficulty))
        .collect();
    if filtered.is_empty() {
        tracing::debug!(
            "No lanqiao items at difficulty {}, using full bank",
            params.difficulty.as_str()
        );
        filtered = bank.iter().collect();
    }

    if params.plan_type == PlanType::Topic {
        let scoped: Vec<&LanqiaoItem> = filtered
            .iter()
            .copied()
            .filter(|item| item.topic == params.topic)
            .collect();
        if !scoped.is_empty() {
            return scoped;
        }
        tracing::debug!("No lanqiao items for topic {}, using all topics", params.topic);
    }

    filtered
}

pub fn generate(params: &LanqiaoParams, existing: Option<&ModeProgress>) -> ModeProgress {
    generate_at(params, existing, Utc::now())
}

pub fn generate_at(
    params: &LanqiaoParams,
    existing: Option<&ModeProgress>,
    now: DateTime<Utc>,
) -> ModeProgress {
    generate_from(&BANK, params, existing, now)
}

/// Generate from an arbitrary bank
pub fn generate_from(
    bank: &[LanqiaoItem],
    params: &LanqiaoParams,
    existing: Option<&ModeProgress>,
    now: DateTime<Utc>,
) -> ModeProgress {
    let pool = candidate_pool(bank, params);
    let picked: Vec<&LanqiaoItem> =
        sampler::sample_with(&pool, params.task_count(), &params.seed(), SeedHash::Djb2Xor)
            .into_iter()
            .copied()
            .collect();
    let tasks = generator::build_tasks(&picked, existing);

    let mut progress = generator::assemble(
        ProgressSource {
            mode_id: DailyModeId::Lanqiao,
            date_key: params.date_key,
            source_id: SOURCE_ID,
            source_title: SOURCE_TITLE,
        },
        tasks,
        existing,
        now,
    );
    progress.plan_type = Some(params.plan_type);
    progress.topic = Some(params.topic.clone());
    progress.difficulty = Some(params.difficulty);
    progress
}
