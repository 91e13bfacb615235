pub mod queue;
pub mod scheduler;

pub use queue::{due_today, due_within, review_pressure, ReviewPressure};
pub use scheduler::{apply_review, mark_fixed, reopen, Rating};
