pub mod mistake;
pub mod progress;
pub mod state;

pub use mistake::{
  create_mistake, ErrorType, MistakeRecord, MistakeStatus, NewMistake, SourceDomain, SrsState,
};
pub use progress::{DailyModeId, DailyTask, Difficulty, ModeProgress, PlanType, TaskReview, TaskStatus};
pub use state::{AppSettings, DailyLessonState, DailyProgress, LessonLevel, PersistedState, StorageMeta};
