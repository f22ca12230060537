use chrono::Duration;
use chrono_tz::Tz;

use crate::scheduling::CalendarStore;
use crate::scheduling::error::ScheduleError;
use crate::scheduling::models::{AvailabilityVerdict, BusyEvent, MeetingRequest, TimeInterval};

/// Offsets in minutes from the requested start that are probed for
/// alternative slots. The order is the ranking: the two slots just before
/// the request, then increasingly later ones.
pub const PROBE_OFFSETS_MIN: [i64; 6] = [-60, -30, 30, 60, 90, 120];

/// Probing stops once this many free slots are found.
pub const MAX_SUGGESTIONS: usize = 3;

/// Resolves whether a requested slot is free and, when it is not, which
/// nearby slots are. Scoped to one request; holds no session state.
pub struct AvailabilityResolver<'a> {
    store: &'a dyn CalendarStore,
    tz: Tz,
}

impl<'a> AvailabilityResolver<'a> {
    pub fn new(store: &'a dyn CalendarStore, tz: Tz) -> Self {
        Self { store, tz }
    }

    /// Checks the requested slot against every timed event on the same
    /// local calendar day. On conflict, the verdict lists the overlapping
    /// events in calendar order plus up to three alternative slots.
    pub async fn check_availability(
        &self,
        request: &MeetingRequest,
    ) -> Result<AvailabilityVerdict, ScheduleError> {
        request.validate()?;
        let requested = request.requested_interval(self.tz)?;

        // Query the whole day so events straddling the requested bounds are
        // seen; the overlap test decides, not the query window.
        let window = requested.day_window();
        let events = self.store.list_events(window.start, window.end).await?;

        let conflicts: Vec<BusyEvent> = events
            .iter()
            .filter_map(|event| {
                let interval = event.busy_interval()?;
                interval.overlaps(&requested).then(|| BusyEvent {
                    summary: event.summary.clone(),
                    interval,
                })
            })
            .collect();

        if conflicts.is_empty() {
            return Ok(AvailabilityVerdict::free());
        }

        tracing::debug!(
            "slot at {} conflicts with {} event(s)",
            requested.local_display(),
            conflicts.len()
        );
        let suggested_slots = self
            .find_alternative_slots(requested, request.duration_minutes)
            .await;

        Ok(AvailabilityVerdict {
            available: false,
            conflicts,
            suggested_slots,
        })
    }

    /// Probes the fixed offsets around the original start in order and
    /// keeps the first [`MAX_SUGGESTIONS`] candidates with no timed event
    /// overlapping them. A candidate whose check fails is skipped; later
    /// probes still run.
    pub async fn find_alternative_slots(
        &self,
        original: TimeInterval,
        duration_minutes: u32,
    ) -> Vec<TimeInterval> {
        let mut slots = Vec::new();
        for offset in PROBE_OFFSETS_MIN {
            if slots.len() == MAX_SUGGESTIONS {
                break;
            }
            let candidate = TimeInterval::starting_at(
                original.start + Duration::minutes(offset),
                duration_minutes,
            );
            match self.store.list_events(candidate.start, candidate.end).await {
                Ok(events) => {
                    let free = events
                        .iter()
                        .filter_map(|event| event.busy_interval())
                        .all(|busy| !busy.overlaps(&candidate));
                    if free {
                        slots.push(candidate);
                    }
                }
                Err(err) => {
                    tracing::warn!(
                        "could not check candidate at {}, skipping it: {}",
                        candidate.local_display(),
                        err
                    );
                }
            }
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::models::{CalendarEvent, EventRef, EventTime};
    use async_trait::async_trait;
    use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone};
    use chrono_tz::America::Chicago;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chicago(d: u32, h: u32, mi: u32) -> DateTime<Tz> {
        Chicago.with_ymd_and_hms(2024, 1, d, h, mi, 0).unwrap()
    }

    fn timed(summary: &str, start: DateTime<Tz>, end: DateTime<Tz>) -> CalendarEvent {
        CalendarEvent {
            summary: summary.to_string(),
            start: EventTime::Timed(start),
            end: EventTime::Timed(end),
        }
    }

    fn request_at_3pm() -> MeetingRequest {
        MeetingRequest {
            attendee_email: "john@email.com".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            time: NaiveTime::from_hms_opt(15, 0, 0).unwrap(),
            duration_minutes: 30,
            title: "Sync".to_string(),
        }
    }

    #[derive(Default)]
    struct FakeStore {
        events: Vec<CalendarEvent>,
        failing_starts: Vec<DateTime<Tz>>,
        list_calls: AtomicUsize,
    }

    #[async_trait]
    impl CalendarStore for FakeStore {
        async fn list_events(
            &self,
            time_min: DateTime<Tz>,
            time_max: DateTime<Tz>,
        ) -> Result<Vec<CalendarEvent>, ScheduleError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_starts.contains(&time_min) {
                return Err(ScheduleError::Transport("connection refused".to_string()));
            }
            Ok(self
                .events
                .iter()
                .filter(|event| {
                    event
                        .busy_interval()
                        .is_none_or(|busy| busy.start < time_max && time_min < busy.end)
                })
                .cloned()
                .collect())
        }

        async fn insert_event(
            &self,
            _request: &MeetingRequest,
            _interval: &TimeInterval,
        ) -> Result<EventRef, ScheduleError> {
            unreachable!("availability checks never insert events")
        }
    }

    #[tokio::test]
    async fn free_day_is_available() {
        let store = FakeStore::default();
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let verdict = resolver.check_availability(&request_at_3pm()).await.unwrap();

        assert!(verdict.available);
        assert!(verdict.conflicts.is_empty());
        assert!(verdict.suggested_slots.is_empty());
    }

    #[tokio::test]
    async fn partial_overlap_conflicts_and_suggests_earlier_slot_first() {
        let store = FakeStore {
            events: vec![timed("Standup", chicago(15, 15, 15), chicago(15, 15, 45))],
            ..Default::default()
        };
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let verdict = resolver.check_availability(&request_at_3pm()).await.unwrap();

        assert!(!verdict.available);
        assert_eq!(verdict.conflicts.len(), 1);
        assert_eq!(verdict.conflicts[0].summary, "Standup");

        // -60 and -30 are free, +30 collides with the busy block, +60 is
        // the third free slot.
        let starts: Vec<_> = verdict
            .suggested_slots
            .iter()
            .map(|slot| slot.start)
            .collect();
        assert_eq!(
            starts,
            vec![chicago(15, 14, 0), chicago(15, 14, 30), chicago(15, 16, 0)]
        );
    }

    #[tokio::test]
    async fn exact_busy_slot_suggests_first_three_probes() {
        let store = FakeStore {
            events: vec![timed("1:1", chicago(15, 15, 0), chicago(15, 15, 30))],
            ..Default::default()
        };
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let verdict = resolver.check_availability(&request_at_3pm()).await.unwrap();

        // Probes that merely touch the busy block are free, so the first
        // three offsets all qualify.
        let starts: Vec<_> = verdict
            .suggested_slots
            .iter()
            .map(|slot| slot.start)
            .collect();
        assert_eq!(
            starts,
            vec![chicago(15, 14, 0), chicago(15, 14, 30), chicago(15, 15, 30)]
        );
    }

    #[tokio::test]
    async fn fully_booked_day_yields_no_suggestions() {
        let store = FakeStore {
            events: vec![timed("Offsite", chicago(15, 8, 0), chicago(15, 20, 0))],
            ..Default::default()
        };
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let verdict = resolver.check_availability(&request_at_3pm()).await.unwrap();

        assert!(!verdict.available);
        assert!(verdict.suggested_slots.is_empty());
    }

    #[tokio::test]
    async fn all_day_events_never_conflict() {
        let store = FakeStore {
            events: vec![CalendarEvent {
                summary: "Company holiday".to_string(),
                start: EventTime::AllDay(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()),
                end: EventTime::AllDay(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()),
            }],
            ..Default::default()
        };
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let verdict = resolver.check_availability(&request_at_3pm()).await.unwrap();

        assert!(verdict.available);
    }

    #[tokio::test]
    async fn conflicts_keep_calendar_order() {
        let store = FakeStore {
            events: vec![
                timed("Early", chicago(15, 14, 30), chicago(15, 15, 10)),
                timed("Late", chicago(15, 15, 20), chicago(15, 17, 0)),
            ],
            ..Default::default()
        };
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let mut request = request_at_3pm();
        request.duration_minutes = 60;
        let verdict = resolver.check_availability(&request).await.unwrap();

        let names: Vec<_> = verdict
            .conflicts
            .iter()
            .map(|conflict| conflict.summary.as_str())
            .collect();
        assert_eq!(names, vec!["Early", "Late"]);
    }

    #[tokio::test]
    async fn failed_probe_is_skipped_and_probing_continues() {
        let store = FakeStore {
            events: vec![timed("1:1", chicago(15, 15, 0), chicago(15, 15, 30))],
            // The -60 probe at 14:00 cannot be checked.
            failing_starts: vec![chicago(15, 14, 0)],
            ..Default::default()
        };
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let verdict = resolver.check_availability(&request_at_3pm()).await.unwrap();

        let starts: Vec<_> = verdict
            .suggested_slots
            .iter()
            .map(|slot| slot.start)
            .collect();
        assert_eq!(
            starts,
            vec![chicago(15, 14, 30), chicago(15, 15, 30), chicago(15, 16, 0)]
        );
    }

    #[tokio::test]
    async fn unreachable_calendar_propagates_transport_error() {
        let store = FakeStore {
            failing_starts: vec![chicago(15, 0, 0)],
            ..Default::default()
        };
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let result = resolver.check_availability(&request_at_3pm()).await;

        assert!(matches!(result, Err(ScheduleError::Transport(_))));
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_any_query() {
        let store = FakeStore::default();
        let resolver = AvailabilityResolver::new(&store, Chicago);

        let mut request = request_at_3pm();
        request.attendee_email = "nobody".to_string();
        let result = resolver.check_availability(&request).await;

        assert!(matches!(result, Err(ScheduleError::Validation(_))));
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn far_future_date_is_rejected_before_any_query() {
        let store = FakeStore::default();
        let resolver = AvailabilityResolver::new(&store, Chicago);

        // The last date chrono can represent. Day-window arithmetic on it
        // would overflow, so validation has to stop it first.
        let mut request = request_at_3pm();
        request.date = NaiveDate::from_ymd_opt(262142, 12, 31).unwrap();
        let result = resolver.check_availability(&request).await;

        assert!(matches!(result, Err(ScheduleError::Validation(_))));
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 0);
    }
}
