//! Festival calendar lookups.
//!
//! The calendar is supplied at construction time (normally from the config
//! file) so the pipeline stays decoupled from any fixed year's holidays.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeSet;

use crate::core::config::CalendarSettings;

/// Set of festival dates used to flag hourly observations.
///
/// Membership is tested on the date only, independent of the hour.
#[derive(Debug, Clone, Default)]
pub struct FestivalCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl FestivalCalendar {
    /// Create a calendar from an explicit set of dates.
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Create a calendar from configuration settings.
    pub fn from_settings(settings: &CalendarSettings) -> Self {
        Self::new(settings.festival_dates.iter().copied())
    }

    /// Returns `true` if the timestamp falls on a festival date.
    pub fn is_festival(&self, ts: NaiveDateTime) -> bool {
        self.dates.contains(&ts.date())
    }

    /// Returns `true` if the date is a festival date.
    pub fn is_festival_date(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
