//! Daily study reminders.
//!
//! The clock holds its own fire history, so a tick is a plain function of
//! `(settings, history, now)`. Whoever drives the polling loop owns the
//! `ReminderClock` and threads it through every tick.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::calendar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderId {
    Lesson408,
    Luogu,
    Lanqiao,
}

impl ReminderId {
    pub const ALL: [ReminderId; 3] = [Self::Lesson408, Self::Luogu, Self::Lanqiao];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lesson408 => "lesson408",
            Self::Luogu => "luogu",
            Self::Lanqiao => "lanqiao",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderConfig {
    pub id: ReminderId,
    pub title: String,
    pub enabled: bool,
    /// Local time as `HH:MM`
    pub time: String,
}

impl ReminderConfig {
    fn new(id: ReminderId, title: &str, time: &str) -> Self {
        Self {
            id,
            title: title.to_string(),
            enabled: true,
            time: time.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub lesson408: ReminderConfig,
    pub luogu: ReminderConfig,
    pub lanqiao: ReminderConfig,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            lesson408: ReminderConfig::new(ReminderId::Lesson408, "408 daily lesson", "09:00"),
            luogu: ReminderConfig::new(ReminderId::Luogu, "Luogu problem list", "14:00"),
            lanqiao: ReminderConfig::new(ReminderId::Lanqiao, "Lanqiao practice", "20:00"),
        }
    }
}

impl ReminderSettings {
    pub fn get(&self, id: ReminderId) -> &ReminderConfig {
        match id {
            ReminderId::Lesson408 => &self.lesson408,
            ReminderId::Luogu => &self.luogu,
            ReminderId::Lanqiao => &self.lanqiao,
        }
    }

    pub fn get_mut(&mut self, id: ReminderId) -> &mut ReminderConfig {
        match id {
            ReminderId::Lesson408 => &mut self.lesson408,
            ReminderId::Luogu => &mut self.luogu,
            ReminderId::Lanqiao => &mut self.lanqiao,
        }
    }
}

/// 24-hour `HH:MM`
pub fn is_valid_time(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
    if !digits.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let hour = (digits[0] - b'0') * 10 + (digits[1] - b'0');
    let minute = (digits[2] - b'0') * 10 + (digits[3] - b'0');
    hour < 24 && minute < 60
}

/// Reminder tick state: remembers the last `(date, HH:MM)` each reminder fired at
#[derive(Debug, Clone, Default)]
pub struct ReminderClock {
    fired: HashMap<ReminderId, String>,
}

impl ReminderClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `now` against every enabled reminder and return the ones that
    /// should fire. Each reminder fires at most once per local minute.
    pub fn tick(&mut self, settings: &ReminderSettings, now: DateTime<Utc>) -> Vec<ReminderId> {
        let date_key = calendar::to_date_key(now);
        let hhmm = calendar::local_hhmm(now);
        let history_key = format!("{}-{}", date_key, hhmm);

        let mut due = Vec::new();
        for id in ReminderId::ALL {
            let config = settings.get(id);
            if !config.enabled || config.time != hhmm {
                continue;
            }
            if self.fired.get(&id) == Some(&history_key) {
                continue;
            }
            self.fired.insert(id, history_key.clone());
            due.push(id);
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // 06:00 UTC is 14:00 at UTC+8
    fn at_utc(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_tick_fires_matching_reminder() {
        let mut clock = ReminderClock::new();
        let settings = ReminderSettings::default();
        assert_eq!(clock.tick(&settings, at_utc(6, 0, 5)), vec![ReminderId::Luogu]);
    }

    #[test]
    fn test_tick_fires_once_per_minute() {
        let mut clock = ReminderClock::new();
        let settings = ReminderSettings::default();
        assert_eq!(clock.tick(&settings, at_utc(6, 0, 5)).len(), 1);
        // second poll within the same minute
        assert!(clock.tick(&settings, at_utc(6, 0, 35)).is_empty());
    }

    #[test]
    fn test_tick_fires_again_next_day() {
        let mut clock = ReminderClock::new();
        let settings = ReminderSettings::default();
        clock.tick(&settings, at_utc(6, 0, 0));
        let next_day = Utc.with_ymd_and_hms(2024, 1, 2, 6, 0, 10).unwrap();
        assert_eq!(clock.tick(&settings, next_day), vec![ReminderId::Luogu]);
    }

    #[test]
    fn test_tick_skips_disabled() {
        let mut clock = ReminderClock::new();
        let mut settings = ReminderSettings::default();
        settings.get_mut(ReminderId::Luogu).enabled = false;
        assert!(clock.tick(&settings, at_utc(6, 0, 0)).is_empty());
    }

    #[test]
    fn test_tick_no_match() {
        let mut clock = ReminderClock::new();
        assert!(clock.tick(&ReminderSettings::default(), at_utc(6, 1, 0)).is_empty());
    }

    #[test]
    fn test_is_valid_time() {
        assert!(is_valid_time("00:00"));
        assert!(is_valid_time("23:59"));
        assert!(!is_valid_time("24:00"));
        assert!(!is_valid_time("9:00"));
        assert!(!is_valid_time("12:60"));
        assert!(!is_valid_time("ab:cd"));
    }

    #[test]
    fn test_reminder_id_roundtrip() {
        for id in ReminderId::ALL {
            assert_eq!(ReminderId::from_str(id.as_str()), Some(id));
        }
    }
}
