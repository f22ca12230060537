//! Public types for the scheduling API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ScheduleRequest {
    pub text: String,
}

/// The meeting as it was understood, echoed back in every non-error reply.
#[derive(Serialize, Deserialize)]
pub struct MeetingDetails {
    pub attendee: String,
    pub date: String,
    pub time: String,
    pub duration_minutes: u32,
    pub title: String,
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleSuccess {
    pub success: bool,
    pub message: String,
    pub details: MeetingDetails,
    pub event_id: String,
    pub event_link: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct ConflictEntry {
    pub summary: String,
    pub start: String,
    pub end: String,
}

/// An open slot, with RFC 3339 bounds for machines and a local-time
/// rendering for people.
#[derive(Serialize, Deserialize)]
pub struct SuggestedSlot {
    pub start: String,
    pub end: String,
    pub display: String,
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleConflict {
    pub success: bool,
    pub message: String,
    pub details: MeetingDetails,
    pub conflicts: Vec<ConflictEntry>,
    pub suggestions: Vec<SuggestedSlot>,
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleFailure {
    pub success: bool,
    pub message: String,
}
