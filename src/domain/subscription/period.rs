//! Billing window computation.
//!
//! Maps a subscription kind and a reference instant to the calendar
//! window the subscription covers: the containing calendar month for
//! monthly subscriptions, the containing calendar year for annual ones.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::SubscriptionKind;

/// Inclusive validity window of a subscription.
///
/// `start` is the first instant of the window (00:00:00 on day one),
/// `end` the last covered second (23:59:59 on the final day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl BillingWindow {
    /// Computes the calendar window containing `reference` for the given
    /// kind. Pure and infallible.
    pub fn for_kind(kind: SubscriptionKind, reference: Timestamp) -> Self {
        let dt = reference.as_datetime();
        let (start_date, next_start_date) = match kind {
            SubscriptionKind::Monthly => {
                let start = first_of_month(dt.year(), dt.month());
                let next = if dt.month() == 12 {
                    first_of_month(dt.year() + 1, 1)
                } else {
                    first_of_month(dt.year(), dt.month() + 1)
                };
                (start, next)
            }
            SubscriptionKind::Annual => {
                (first_of_month(dt.year(), 1), first_of_month(dt.year() + 1, 1))
            }
        };

        let start = start_date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let next_start = next_start_date.and_hms_opt(0, 0, 0).unwrap().and_utc();

        Self {
            start: Timestamp::from_datetime(start),
            end: Timestamp::from_datetime(next_start - Duration::seconds(1)),
        }
    }

    /// Closed-interval intersection test against another window.
    pub fn overlaps(&self, other: &BillingWindow) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns true if the instant falls inside the window.
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.start <= instant && instant <= self.end
    }
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    // Day 1 of a valid (year, month) always exists.
    NaiveDate::from_ymd_opt(year, month, 1).unwrap()
}
