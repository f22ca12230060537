use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::scheduling::error::ScheduleError;

// Accepted meeting years. Interval arithmetic on dates in this range
// cannot overflow chrono's representable limits.
const MIN_MEETING_YEAR: i32 = 2000;
const MAX_MEETING_YEAR: i32 = 2100;

/// A structured meeting request, extracted from free text and validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingRequest {
    pub attendee_email: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub duration_minutes: u32,
    pub title: String,
}

impl MeetingRequest {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if !self.attendee_email.contains('@') {
            return Err(ScheduleError::Validation(format!(
                "attendee email '{}' is not an email address",
                self.attendee_email
            )));
        }
        if self.duration_minutes == 0 {
            return Err(ScheduleError::Validation(
                "meeting duration must be positive".to_string(),
            ));
        }
        if self.date.year() < MIN_MEETING_YEAR || self.date.year() > MAX_MEETING_YEAR {
            return Err(ScheduleError::Validation(format!(
                "meeting date {} is outside the supported range",
                self.date
            )));
        }
        Ok(())
    }

    /// The half-open interval this request asks for, in the given zone.
    /// A local time skipped by a DST transition is rejected; an ambiguous
    /// one resolves to the earlier instant.
    pub fn requested_interval(&self, tz: Tz) -> Result<TimeInterval, ScheduleError> {
        let naive = self.date.and_time(self.time);
        let start = tz.from_local_datetime(&naive).earliest().ok_or_else(|| {
            ScheduleError::Validation(format!(
                "local time {} does not exist in {}",
                naive, tz
            ))
        })?;
        Ok(TimeInterval::starting_at(start, self.duration_minutes))
    }
}

/// Half-open interval `[start, end)`. `end > start` by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeInterval {
    pub fn starting_at(start: DateTime<Tz>, duration_minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(duration_minutes)),
        }
    }

    /// `[s1, e1)` and `[s2, e2)` intersect iff `s1 < e2 && s2 < e1`.
    /// Touching intervals share no instant.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The full local calendar day containing `start`, half-open.
    pub fn day_window(&self) -> TimeInterval {
        let tz = self.start.timezone();
        let date = self.start.date_naive();
        TimeInterval {
            start: local_day_start(tz, date),
            end: local_day_start(tz, date + Duration::days(1)),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Start instant rendered the way responses present times to people.
    pub fn local_display(&self) -> String {
        self.start.format("%Y-%m-%d %H:%M").to_string()
    }
}

// Midnight can fall into a DST gap on transition days.
fn local_day_start(tz: Tz, date: NaiveDate) -> DateTime<Tz> {
    (0..4)
        .filter_map(|hour| {
            let naive = date.and_time(NaiveTime::MIN) + Duration::hours(hour);
            tz.from_local_datetime(&naive).earliest()
        })
        .next()
        .unwrap_or_else(|| tz.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
}

/// Event start/end as reported by the calendar backend. All-day entries
/// carry a bare date and never count as busy time.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    Timed(DateTime<Tz>),
    AllDay(NaiveDate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: EventTime,
    pub end: EventTime,
}

impl CalendarEvent {
    /// The busy interval this event occupies, or `None` for all-day and
    /// degenerate entries.
    pub fn busy_interval(&self) -> Option<TimeInterval> {
        match (&self.start, &self.end) {
            (EventTime::Timed(start), EventTime::Timed(end)) if end > start => {
                Some(TimeInterval {
                    start: *start,
                    end: *end,
                })
            }
            _ => None,
        }
    }
}

/// A calendar event that overlaps the requested interval.
#[derive(Debug, Clone, PartialEq)]
pub struct BusyEvent {
    pub summary: String,
    pub interval: TimeInterval,
}

/// Outcome of a conflict check: either the slot is free, or the overlapping
/// events plus up to three ranked alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityVerdict {
    pub available: bool,
    pub conflicts: Vec<BusyEvent>,
    pub suggested_slots: Vec<TimeInterval>,
}

impl AvailabilityVerdict {
    pub fn free() -> Self {
        Self {
            available: true,
            conflicts: Vec::new(),
            suggested_slots: Vec::new(),
        }
    }
}

/// Reference to a created calendar event.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRef {
    pub id: String,
    pub html_link: Option<String>,
}
