//! Due-tier classification for vaccination records.
//!
//! One canonical policy lives here; both the dashboard badges and the
//! notifier derive urgency from [`classify`]. Thresholds: due-soon covers
//! the next three days, upcoming the next thirty.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Due-soon window in days (exclusive of today, inclusive of the bound).
pub const DUE_SOON_WINDOW_DAYS: i64 = 3;

/// Upcoming window in days.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

/// Urgency of a vaccination record relative to today.
///
/// Ordering follows urgency: `Overdue` sorts before `Scheduled`, so the
/// most pressing tier of a group is simply the minimum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum DueTier {
    /// The due date has passed.
    Overdue,
    /// The due date is today.
    DueToday,
    /// Due within [`DUE_SOON_WINDOW_DAYS`] days.
    DueSoon,
    /// Due within [`UPCOMING_WINDOW_DAYS`] days.
    Upcoming,
    /// More than [`UPCOMING_WINDOW_DAYS`] days out.
    Scheduled,
}

impl DueTier {
    /// Whether this tier warrants attention on the dashboard.
    pub fn needs_attention(self) -> bool {
        matches!(self, Self::Overdue | Self::DueToday | Self::DueSoon)
    }
}

/// Signed number of days from `today` until `due`. Negative once overdue.
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    (due - today).num_days()
}

/// Classify a due date against today.
///
/// Pure and monotonic: a smaller `due - today` never yields a safer tier.
pub fn classify(due: NaiveDate, today: NaiveDate) -> DueTier {
    let days = days_until(due, today);
    if days < 0 {
        DueTier::Overdue
    } else if days == 0 {
        DueTier::DueToday
    } else if days <= DUE_SOON_WINDOW_DAYS {
        DueTier::DueSoon
    } else if days <= UPCOMING_WINDOW_DAYS {
        DueTier::Upcoming
    } else {
        DueTier::Scheduled
    }
}
