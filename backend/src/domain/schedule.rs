//! Next-due-date calculation.
//!
//! Intervals use flat 30-day months and a 365-day year. The original
//! product shipped both 360- and 365-day year variants; 365 is the
//! canonical rule here and is pinned by test.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fixed re-vaccination intervals offered by the data-entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VaccinationInterval {
    /// 30 days.
    OneMonth,
    /// 60 days.
    TwoMonths,
    /// 90 days.
    ThreeMonths,
    /// 365 days.
    OneYear,
}

impl VaccinationInterval {
    /// Flat day offset for this interval.
    pub fn days(self) -> i64 {
        match self {
            Self::OneMonth => 30,
            Self::TwoMonths => 60,
            Self::ThreeMonths => 90,
            Self::OneYear => 365,
        }
    }
}

/// Errors raised while resolving a due-date rule.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// A manually supplied due date precedes the application date.
    #[error("next due date {requested} precedes application date {applied}")]
    ManualDateBeforeApplication {
        /// The application date of the record.
        applied: NaiveDate,
        /// The rejected manual due date.
        requested: NaiveDate,
    },
    /// Adding the interval overflowed the supported date range.
    #[error("due date out of supported range for application date {applied}")]
    OutOfRange {
        /// The application date that could not be offset.
        applied: NaiveDate,
    },
}

/// How the next due date is derived for a new record.
///
/// Serialised as a tagged union so the form can submit either
/// `{"kind":"interval","interval":"one_month"}` or
/// `{"kind":"manual","date":"2024-07-01"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DueDateRule {
    /// Add a fixed interval to the application date.
    Interval {
        /// The selected interval token.
        interval: VaccinationInterval,
    },
    /// Caller supplies the due date directly.
    Manual {
        /// The explicit next due date.
        date: NaiveDate,
    },
}

impl DueDateRule {
    /// Resolve the rule into a concrete due date.
    ///
    /// Manual dates must not precede the application date; the original UI
    /// only nudged users towards that, this enforces it server-side.
    pub fn resolve(self, date_applied: NaiveDate) -> Result<NaiveDate, ScheduleError> {
        match self {
            Self::Interval { interval } => date_applied
                .checked_add_signed(Duration::days(interval.days()))
                .ok_or(ScheduleError::OutOfRange {
                    applied: date_applied,
                }),
            Self::Manual { date } => {
                if date < date_applied {
                    Err(ScheduleError::ManualDateBeforeApplication {
                        applied: date_applied,
                        requested: date,
                    })
                } else {
                    Ok(date)
                }
            }
        }
    }
}
