pub mod availability;
pub mod error;
pub mod models;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::scheduling::availability::AvailabilityResolver;
use crate::scheduling::error::ScheduleError;
use crate::scheduling::models::{
    AvailabilityVerdict, CalendarEvent, EventRef, MeetingRequest, TimeInterval,
};

/// Read/write access to the calendar backend. `list_events` returns the
/// events inside a half-open window in start-time order.
#[async_trait]
pub trait CalendarStore: Send + Sync {
    async fn list_events(
        &self,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
    ) -> Result<Vec<CalendarEvent>, ScheduleError>;

    async fn insert_event(
        &self,
        request: &MeetingRequest,
        interval: &TimeInterval,
    ) -> Result<EventRef, ScheduleError>;
}

/// Turns free text into a structured meeting request. The reference date
/// anchors relative phrases like "tomorrow" or weekday names.
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn extract(
        &self,
        text: &str,
        reference_date: NaiveDate,
    ) -> Result<MeetingRequest, ScheduleError>;
}

#[derive(Debug)]
pub enum ScheduleOutcome {
    /// The slot was free and the event is on the calendar.
    Scheduled {
        request: MeetingRequest,
        event: EventRef,
    },
    /// The slot is taken; nothing was written.
    SlotTaken {
        request: MeetingRequest,
        verdict: AvailabilityVerdict,
    },
}

/// Runs the whole pipeline for one sentence: extract, check the calendar,
/// and book the event if the slot is free.
///
/// Fail-open policy: when the availability check cannot reach the calendar,
/// the slot is assumed free and the insert proceeds. Insert failures are
/// never swallowed.
pub async fn schedule_meeting(
    extractor: &dyn Extractor,
    store: &dyn CalendarStore,
    tz: Tz,
    text: &str,
) -> Result<ScheduleOutcome, ScheduleError> {
    let reference_date = Utc::now().with_timezone(&tz).date_naive();
    let request = extractor.extract(text, reference_date).await?;
    tracing::debug!(
        "extracted '{}' with {} on {} at {}",
        request.title,
        request.attendee_email,
        request.date,
        request.time
    );

    let resolver = AvailabilityResolver::new(store, tz);
    let verdict = match resolver.check_availability(&request).await {
        Ok(verdict) => verdict,
        Err(ScheduleError::Transport(reason)) => {
            tracing::warn!("availability check failed, assuming slot is free: {}", reason);
            AvailabilityVerdict::free()
        }
        Err(err) => return Err(err),
    };

    if !verdict.available {
        return Ok(ScheduleOutcome::SlotTaken { request, verdict });
    }

    let interval = request.requested_interval(tz)?;
    let event = store.insert_event(&request, &interval).await?;
    tracing::info!(
        "scheduled '{}' at {}",
        request.title,
        interval.local_display()
    );
    Ok(ScheduleOutcome::Scheduled { request, event })
}
