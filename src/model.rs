// File: src/model.rs
use chrono::{DateTime, Days, Local, NaiveTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest value the pill stepper accepts.
pub const MAX_PILL_COUNT: u8 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: String,
    pub name: String,
}

impl Medicine {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
        }
    }
}

/// Dosage text, pill count and the instant the next dose is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoseSchedule {
    #[serde(default)]
    pub dosage: String,
    #[serde(default, deserialize_with = "de_pill_count")]
    pub pill_count: u8,
    #[serde(default = "Local::now", deserialize_with = "de_target")]
    pub target: DateTime<Local>,
}

/// A missing or unreadable target falls back to the load time.
fn de_target<'de, D>(deserializer: D) -> Result<DateTime<Local>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw.clone()).unwrap_or_else(|_| {
        log::warn!("Unreadable dose time {}, using now", raw);
        Local::now()
    }))
}

fn de_pill_count<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(raw.clamp(0, MAX_PILL_COUNT as i64) as u8)
}

impl DoseSchedule {
    /// Schedule used when nothing was saved for a medicine yet.
    pub fn defaults(now: DateTime<Local>) -> Self {
        Self {
            dosage: String::new(),
            pill_count: 0,
            target: now,
        }
    }

    /// Step the pill count, staying inside `0..=MAX_PILL_COUNT`.
    pub fn step_pills(&mut self, delta: i8) {
        let next = self.pill_count as i16 + delta as i16;
        self.pill_count = next.clamp(0, MAX_PILL_COUNT as i16) as u8;
    }

    /// Move the time-of-day of the target by `minutes`, wrapping around
    /// midnight without changing the calendar date. Seconds are zeroed,
    /// the picker only works in hours and minutes.
    pub fn shift_time_of_day(&mut self, minutes: i64) {
        let current = self.target.time();
        let base = current.hour() as i64 * 60 + current.minute() as i64;
        let wrapped = (base + minutes).rem_euclid(24 * 60);

        let Some(time) = NaiveTime::from_hms_opt((wrapped / 60) as u32, (wrapped % 60) as u32, 0)
        else {
            return;
        };
        let naive = self.target.date_naive().and_time(time);

        // Local times skipped by a DST jump have no mapping; keep the old value.
        if let Some(resolved) = Local.from_local_datetime(&naive).earliest() {
            self.target = resolved;
        } else {
            log::debug!("Skipping non-existent local time {}", naive);
        }
    }

    pub fn target_label(&self) -> String {
        self.target.format("%H:%M").to_string()
    }

    /// Roll the target forward by whole calendar days until it is no longer
    /// in the past. The wall-clock time is kept across DST changes.
    pub fn roll_forward(&mut self, now: DateTime<Local>) {
        while self.target < now {
            match self.target.checked_add_days(Days::new(1)) {
                Some(next) => self.target = next,
                None => break,
            }
        }
    }
}
