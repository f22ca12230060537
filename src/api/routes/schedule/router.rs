//! Router for the scheduling API

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::public;
use crate::api::state::AppState;
use crate::extract::OpenAiExtractor;
use crate::google::gcal::GoogleCalendar;
use crate::google::oauth::refresh_access_token;
use crate::scheduling::error::ScheduleError;
use crate::scheduling::models::MeetingRequest;
use crate::scheduling::{ScheduleOutcome, schedule_meeting};

type SharedState = Arc<RwLock<AppState>>;

async fn schedule_handler(
    State(state): State<SharedState>,
    Json(payload): Json<public::ScheduleRequest>,
) -> Result<Response, crate::api::public::ApiError> {
    if payload.text.trim().is_empty() {
        return Ok(reject("No text provided"));
    }

    let config = {
        let shared_state = state.read().expect("Unable to read shared state");
        shared_state.config.clone()
    };

    // A fresh access token per request; access tokens expire within the hour.
    let oauth = refresh_access_token(
        &config.google_token_uri,
        &config.google_client_id,
        &config.google_client_secret,
        &config.google_refresh_token,
    )
    .await?;
    let store = GoogleCalendar::new(
        &config.google_api_base_url,
        &oauth.access_token,
        &config.calendar_id,
        config.timezone,
    );
    let extractor = OpenAiExtractor::new(
        &config.openai_api_hostname,
        &config.openai_api_key,
        &config.openai_model,
    );

    match schedule_meeting(&extractor, &store, config.timezone, payload.text.trim()).await {
        Ok(ScheduleOutcome::Scheduled { request, event }) => {
            let resp = public::ScheduleSuccess {
                success: true,
                message: format!(
                    "Scheduled '{}' with {} on {} at {}",
                    request.title,
                    request.attendee_email,
                    request.date,
                    request.time.format("%H:%M"),
                ),
                details: meeting_details(&request),
                event_id: event.id,
                event_link: event.html_link,
            };
            Ok(Json(resp).into_response())
        }
        Ok(ScheduleOutcome::SlotTaken { request, verdict }) => {
            let conflicts = verdict
                .conflicts
                .iter()
                .map(|conflict| public::ConflictEntry {
                    summary: conflict.summary.clone(),
                    start: conflict.interval.start.to_rfc3339(),
                    end: conflict.interval.end.to_rfc3339(),
                })
                .collect();
            let suggestions = verdict
                .suggested_slots
                .iter()
                .map(|slot| public::SuggestedSlot {
                    start: slot.start.to_rfc3339(),
                    end: slot.end.to_rfc3339(),
                    display: slot.local_display(),
                })
                .collect();
            let resp = public::ScheduleConflict {
                success: false,
                message: "Time slot not available".to_string(),
                details: meeting_details(&request),
                conflicts,
                suggestions,
            };
            Ok(Json(resp).into_response())
        }
        // The request itself was the problem, not the service.
        Err(err @ (ScheduleError::Extraction(_) | ScheduleError::Validation(_))) => {
            Ok(reject(&err.to_string()))
        }
        Err(err) => Err(err.into()),
    }
}

fn meeting_details(request: &MeetingRequest) -> public::MeetingDetails {
    public::MeetingDetails {
        attendee: request.attendee_email.clone(),
        date: request.date.to_string(),
        time: request.time.format("%H:%M").to_string(),
        duration_minutes: request.duration_minutes,
        title: request.title.clone(),
    }
}

fn reject(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(public::ScheduleFailure {
            success: false,
            message: message.to_string(),
        }),
    )
        .into_response()
}

/// Create the scheduling router
pub fn router() -> Router<SharedState> {
    Router::new().route("/schedule-meeting", axum::routing::post(schedule_handler))
}
