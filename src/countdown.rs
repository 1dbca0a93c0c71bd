// File: src/countdown.rs
//! Remaining time until the next dose.
//!
//! The countdown runs against a concrete target instant. Once the target has
//! passed, the display holds at `00:00:00` for one minute and then counts
//! down to the same time on the following calendar day.
use chrono::{DateTime, Days, Duration, TimeZone};
use std::fmt;

/// How long the display stays at zero after the target is hit.
pub const ZERO_HOLD_SECS: i64 = 60;

/// Hour/minute/second components between two instants, each truncated toward
/// zero so all three carry the same sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Remaining {
    pub fn between<Tz: TimeZone>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> Self {
        let total = to.clone().signed_duration_since(from.clone()).num_seconds();
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }

    pub fn zero() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }

    pub fn is_negative(&self) -> bool {
        self.hours < 0 || self.minutes < 0 || self.seconds < 0
    }

    pub fn total_seconds(&self) -> i64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    /// Target still ahead.
    CountingDown(Remaining),
    /// Target passed less than a minute ago.
    ZeroHold,
    /// Counting toward the target moved one day forward.
    NextDay(Remaining),
}

impl CountdownPhase {
    pub fn remaining(&self) -> Remaining {
        match self {
            CountdownPhase::CountingDown(r) | CountdownPhase::NextDay(r) => *r,
            CountdownPhase::ZeroHold => Remaining::zero(),
        }
    }
}

impl fmt::Display for CountdownPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.remaining())
    }
}

fn next_day<Tz: TimeZone>(target: &DateTime<Tz>) -> DateTime<Tz> {
    target
        .clone()
        .checked_add_days(Days::new(1))
        .unwrap_or_else(|| target.clone() + Duration::days(1))
}

/// Classify `current` against `target`.
///
/// More than a day past the target, the rolled-over remainder is still
/// negative and is returned as-is; callers that need multi-day accuracy
/// must move `target` forward themselves.
pub fn phase<Tz: TimeZone>(current: &DateTime<Tz>, target: &DateTime<Tz>) -> CountdownPhase {
    let delta = Remaining::between(current, target);
    if !delta.is_negative() {
        return CountdownPhase::CountingDown(delta);
    }

    let elapsed = delta.total_seconds().abs();
    if elapsed <= ZERO_HOLD_SECS {
        return CountdownPhase::ZeroHold;
    }

    CountdownPhase::NextDay(Remaining::between(current, &next_day(target)))
}

/// `HH:MM:SS` until the next dose.
pub fn time_until<Tz: TimeZone>(current: &DateTime<Tz>, target: &DateTime<Tz>) -> String {
    phase(current, target).to_string()
}
