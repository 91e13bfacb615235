//! Daily practice content.
//!
//! Each practice domain owns a static bank and a generator:
//! - **Luogu**: 5 problems a day from a named source list
//! - **Lanqiao**: a daily (2) or topic (3) plan, filtered by difficulty
//!
//! [`lesson`] picks the day's 408 lesson from the weakness profile, and
//! [`interview`] plans mock interview rounds.
//!
//! Selections are drawn with [`sampler`] so the same day always yields the
//! same tasks, and regeneration keeps user edits via [`generator`].

pub mod generator;
pub mod interview;
pub mod lanqiao;
pub mod lesson;
pub mod luogu;
pub mod sampler;

pub use generator::BankItem;
pub use interview::{choose_next_question, plan_mock_round, IntensityTier, InterviewMode};
pub use lanqiao::{LanqiaoItem, LanqiaoParams};
pub use lesson::{micro_practices, pick_topic};
pub use luogu::{LuoguItem, LuoguParams, LuoguSource};
pub use sampler::{sample, sample_with, SeedHash};
