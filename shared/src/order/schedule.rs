//! Status/time classifier
//!
//! An order's [`OrderType`] is derived from its scheduled time relative to
//! "now" and is recomputed on every status change request; it is never
//! stored. The type decides which target statuses are reachable:
//!
//! | OrderType | Allowed targets |
//! |-----------|-----------------|
//! | Future    | AwaitingConfirmation, Confirmed, NotConfirmed |
//! | Past      | NotConfirmed, Completed |
//! | Current   | all |

use super::error::{OrderError, OrderResult};
use super::snapshot::OrderStatus;
use chrono::{Duration, Months, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Orders scheduled at least this far ahead are Future
pub fn future_threshold() -> Duration {
    Duration::minutes(30)
}

/// Orders scheduled at least this far behind are Past
pub fn past_threshold() -> Duration {
    Duration::days(1)
}

/// Furthest allowed scheduling horizon
const MAX_LEAD_MONTHS: u32 = 12;

/// Temporal category of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderType {
    Past,
    Current,
    Future,
}

impl OrderType {
    /// Classify by `scheduled - now`
    pub fn classify(scheduled: NaiveDateTime, now: NaiveDateTime) -> Self {
        let delta = scheduled - now;
        if delta <= -past_threshold() {
            Self::Past
        } else if delta >= future_threshold() {
            Self::Future
        } else {
            Self::Current
        }
    }

    /// Target statuses reachable from an order of this type
    pub fn allowed_statuses(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Self::Future => &[AwaitingConfirmation, Confirmed, NotConfirmed],
            Self::Past => &[NotConfirmed, Completed],
            Self::Current => &OrderStatus::ALL,
        }
    }

    pub fn allows(&self, target: OrderStatus) -> bool {
        self.allowed_statuses().contains(&target)
    }

    /// Reject `target` unless this type allows it
    pub fn check_transition(&self, target: OrderStatus) -> OrderResult<()> {
        if self.allows(target) {
            Ok(())
        } else {
            Err(OrderError::TransitionNotAllowed {
                order_type: *self,
                target,
            })
        }
    }
}

/// Minute-resolution time of day, the granularity operators schedule in
fn minute_of_day(t: NaiveTime) -> (u32, u32) {
    (t.hour(), t.minute())
}

/// Check a schedule against the wall clock
///
/// - the date must not be before today
/// - for today, the time of day must not be before the current minute
/// - the date must not be more than a year ahead
pub fn validate_schedule(scheduled: NaiveDateTime, now: NaiveDateTime) -> OrderResult<()> {
    let (date, today) = (scheduled.date(), now.date());

    if date < today || (date == today && minute_of_day(scheduled.time()) < minute_of_day(now.time()))
    {
        return Err(OrderError::ScheduleInPast(scheduled));
    }

    if let Some(horizon) = now.checked_add_months(Months::new(MAX_LEAD_MONTHS))
        && date > horizon.date()
    {
        return Err(OrderError::ScheduleTooFar(scheduled));
    }

    Ok(())
}

/// Parse an operator-entered `HH:mm` time of day
pub fn parse_time_of_day(input: &str) -> OrderResult<NaiveTime> {
    let malformed = || OrderError::MalformedTime(input.to_string());
    let text = input.trim();

    if text.len() != 5 {
        return Err(malformed());
    }
    let (hours, minutes) = text.split_once(':').ok_or_else(malformed)?;
    if !(hours.len() == 2 && minutes.len() == 2)
        || !hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit())
    {
        return Err(malformed());
    }
    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(malformed)
}
