use chrono::Utc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use prep_planner::config::AppConfig;
use prep_planner::content::interview::{self, InterviewMode, QUESTION_BANK};
use prep_planner::content::lanqiao::{self, LanqiaoParams};
use prep_planner::content::lesson;
use prep_planner::content::luogu::{self, LuoguParams};
use prep_planner::domain::{DailyModeId, ModeProgress};
use prep_planner::reminders::ReminderClock;
use prep_planner::store::{JsonFileStore, LogOnError, StateStore};
use prep_planner::{calendar, srs, weakness};

const USAGE: &str = "Usage: prep_planner [today|watch|mock [chat|drill] [intensity 1-10]]";

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "prep_planner=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = AppConfig::load();
  let store = JsonFileStore::in_data_dir(&config.data_dir);

  match std::env::args().nth(1).as_deref() {
    None | Some("today") => run_today(&store),
    Some("watch") => run_watch(&store, config.reminder_poll_seconds).await,
    Some("mock") => {
      let mode = std::env::args().nth(2);
      let intensity = std::env::args().nth(3);
      match parse_mock_args(mode.as_deref(), intensity.as_deref()) {
        Some((mode, intensity)) => run_mock(&store, mode, intensity),
        None => {
          eprintln!("Invalid mock arguments\n{}", USAGE);
          std::process::exit(2);
        }
      }
    }
    Some(other) => {
      eprintln!("Unknown command: {}\n{}", other, USAGE);
      std::process::exit(2);
    }
  }
}

/// Generate (or refresh) today's practice lists and summarize review load
fn run_today(store: &JsonFileStore) {
  let mut state = store.load_or_default();
  let today = calendar::today();

  // Keep whatever source and plan the user picked earlier today
  let existing = state.meta.progress(DailyModeId::Luogu, today).cloned();
  let mut params = LuoguParams::new(today);
  if let Some(p) = &existing {
    params.source_id = p.source_id.clone();
  }
  let progress = luogu::generate(&params, existing.as_ref());
  log_progress(&progress);
  state.meta.save_progress(progress);

  let existing = state.meta.progress(DailyModeId::Lanqiao, today).cloned();
  let mut params = LanqiaoParams::new(today);
  if let Some(p) = &existing {
    params.plan_type = p.plan_type.unwrap_or(params.plan_type);
    params.topic = p.topic.clone().unwrap_or(params.topic);
    params.difficulty = p.difficulty.unwrap_or(params.difficulty);
  }
  let progress = lanqiao::generate(&params, existing.as_ref());
  log_progress(&progress);
  state.meta.save_progress(progress);

  let mistakes = &state.meta.mistakes;
  let pressure = srs::review_pressure(mistakes, today);
  tracing::info!(
    "Review queue: {} due today, {} due in the next 7 days",
    pressure.due_today,
    pressure.due_next_7_days
  );
  for item in srs::due_today(mistakes, today) {
    tracing::info!("  [{}] {} (severity {})", item.topic_key(), item.prompt, item.severity);
  }

  let profile = weakness::profile(mistakes, today);
  if !profile.is_empty() {
    let error_types: Vec<&str> = profile.top_error_types.iter().map(|t| t.label()).collect();
    tracing::info!(
      "Weak spots this week: {} / {}",
      profile.top_topics.join(", "),
      error_types.join(", ")
    );
  }

  let picked = lesson::pick_topic(today, &state.meta.daily_lesson.topic_override, &profile);
  tracing::info!("Today's lesson: {}", picked.label);
  for practice in lesson::micro_practices(&profile) {
    tracing::info!("  - {}", practice);
  }

  store.save(&state).log_warn("Failed to save state");
}

fn log_progress(progress: &ModeProgress) {
  tracing::info!(
    "{} {}: {}/{} done",
    progress.mode_id.as_str(),
    progress.date_key,
    progress.done_count,
    progress.total_count
  );
  for task in &progress.tasks {
    tracing::info!(
      "  [{}] {} {} ({})",
      if task.is_done() { "x" } else { " " },
      task.task_id,
      task.title,
      task.url.as_deref().unwrap_or("-")
    );
  }
}

fn parse_mock_args(mode: Option<&str>, intensity: Option<&str>) -> Option<(InterviewMode, u8)> {
  let mode = match mode {
    None => InterviewMode::Chat,
    Some(m) => InterviewMode::from_str(m)?,
  };
  let intensity = match intensity {
    None => 5,
    Some(i) => i.parse::<u8>().ok().filter(|i| (1..=10).contains(i))?,
  };
  Some((mode, intensity))
}

/// Plan the next mock interview round and advance the topic cursor
fn run_mock(store: &JsonFileStore, mode: InterviewMode, intensity: u8) {
  let mut state = store.load_or_default();
  let round = interview::plan_mock_round(state.meta.backend_topic_cursor);

  tracing::info!(
    "Mock round ({}, {}): {}",
    mode.as_str(),
    interview::IntensityTier::from_intensity(intensity).as_str(),
    round.backend_topic.name
  );
  tracing::info!("  {}", round.backend_topic.prompt);
  tracing::info!("  Warm-up: {}", round.algo_warmup);
  if let Some(question) =
    interview::choose_next_question(&QUESTION_BANK, None, mode, intensity, &Default::default())
  {
    tracing::info!("  Opening question: {}", question.prompt);
    for followup in question.followups {
      tracing::info!("    Follow-up: {}", followup);
    }
  }

  state.meta.backend_topic_cursor = round.next_cursor;
  store.save(&state).log_warn("Failed to save state");
}

/// Poll the reminder clock until interrupted
async fn run_watch(store: &JsonFileStore, poll_seconds: u64) {
  let mut clock = ReminderClock::new();
  let mut interval = tokio::time::interval(Duration::from_secs(poll_seconds));
  tracing::info!("Watching reminders every {}s (Ctrl-C to stop)", poll_seconds);

  loop {
    tokio::select! {
      _ = interval.tick() => {
        // Re-read settings so edits take effect without a restart
        let settings = store.load_or_default().meta.reminders;
        for id in clock.tick(&settings, Utc::now()) {
          let reminder = settings.get(id);
          tracing::info!("Reminder: {} ({})", reminder.title, reminder.time);
        }
      }
      _ = tokio::signal::ctrl_c() => {
        tracing::info!("Stopping reminder watch");
        break;
      }
    }
  }
}
