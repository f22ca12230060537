//! Google Calendar v3 client. Event listing and insertion for a single
//! calendar, mapped into the scheduling types.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::scheduling::CalendarStore;
use crate::scheduling::error::ScheduleError;
use crate::scheduling::models::{CalendarEvent, EventRef, EventTime, MeetingRequest, TimeInterval};

/// Event start/end structure from the Calendar API documentation. Timed
/// events carry `dateTime`, all-day events carry a bare `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventResource {
    pub id: Option<String>,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub start: Option<EventDateTime>,
    pub end: Option<EventDateTime>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventsListResponse {
    pub items: Option<Vec<EventResource>>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// One calendar on one Google account, reached with a per-request access
/// token. Instances are built right after a token refresh and dropped when
/// the request ends.
pub struct GoogleCalendar {
    api_base_url: String,
    access_token: String,
    calendar_id: String,
    tz: Tz,
}

impl GoogleCalendar {
    pub fn new(api_base_url: &str, access_token: &str, calendar_id: &str, tz: Tz) -> Self {
        Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
            calendar_id: calendar_id.to_string(),
            tz,
        }
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base_url,
            urlencoding::encode(&self.calendar_id)
        )
    }

    fn to_calendar_event(&self, resource: EventResource) -> Option<CalendarEvent> {
        if resource.status.as_deref() == Some("cancelled") {
            return None;
        }
        let start = self.map_event_time(resource.start?)?;
        let end = self.map_event_time(resource.end?)?;
        Some(CalendarEvent {
            summary: resource.summary.unwrap_or_else(|| "Busy".to_string()),
            start,
            end,
        })
    }

    fn map_event_time(&self, value: EventDateTime) -> Option<EventTime> {
        if let Some(date_time) = value.date_time {
            return Some(EventTime::Timed(date_time.with_timezone(&self.tz)));
        }
        value.date.map(EventTime::AllDay)
    }
}

#[async_trait]
impl CalendarStore for GoogleCalendar {
    async fn list_events(
        &self,
        time_min: DateTime<Tz>,
        time_max: DateTime<Tz>,
    ) -> Result<Vec<CalendarEvent>, ScheduleError> {
        let res = Client::new()
            .get(self.events_url())
            .query(&[
                ("timeMin", time_min.to_rfc3339()),
                ("timeMax", time_max.to_rfc3339()),
                ("singleEvents", "true".to_string()),
                ("orderBy", "startTime".to_string()),
            ])
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|err| ScheduleError::Transport(format!("event list failed: {}", err)))?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ScheduleError::Transport(format!(
                "event list failed: {} ({})",
                status, text
            )));
        }
        let response: EventsListResponse = serde_json::from_str(&text)
            .map_err(|err| ScheduleError::Transport(format!("unexpected events payload: {}", err)))?;

        Ok(response
            .items
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| self.to_calendar_event(item))
            .collect())
    }

    async fn insert_event(
        &self,
        request: &MeetingRequest,
        interval: &TimeInterval,
    ) -> Result<EventRef, ScheduleError> {
        let body = json!({
            "summary": request.title,
            "description": "Scheduled by slotbot",
            "start": {"dateTime": interval.start.to_rfc3339(), "timeZone": self.tz.name()},
            "end": {"dateTime": interval.end.to_rfc3339(), "timeZone": self.tz.name()},
            "attendees": [{"email": request.attendee_email}],
        });
        let res = Client::new()
            .post(self.events_url())
            .query(&[("sendUpdates", "all")])
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|err| ScheduleError::Transport(format!("event insert failed: {}", err)))?;
        let status = res.status();
        let text = res.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ScheduleError::Transport(format!(
                "event insert failed: {} ({})",
                status, text
            )));
        }
        let created: EventResource = serde_json::from_str(&text).map_err(|err| {
            ScheduleError::Transport(format!("unexpected insert payload: {}", err))
        })?;

        Ok(EventRef {
            id: created.id.unwrap_or_default(),
            html_link: created.html_link,
        })
    }
}
