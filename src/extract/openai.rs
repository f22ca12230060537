use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use serde_json::json;

use crate::extract::prompt::{Prompt, templates};
use crate::scheduling::Extractor;
use crate::scheduling::error::ScheduleError;
use crate::scheduling::models::MeetingRequest;

const SYSTEM_MESSAGE: &str =
    "You are a scheduling assistant. You answer with a single JSON object and nothing else.";

/// Extracts meeting details through an OpenAI-compatible chat completions
/// endpoint. Anything that goes wrong on this path is an extraction
/// failure: the caller treats it as "could not understand the request".
pub struct OpenAiExtractor {
    api_hostname: String,
    api_key: String,
    model: String,
}

impl OpenAiExtractor {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Extractor for OpenAiExtractor {
    async fn extract(
        &self,
        text: &str,
        reference_date: NaiveDate,
    ) -> Result<MeetingRequest, ScheduleError> {
        let prompt = templates()
            .render(
                &Prompt::MeetingExtraction.to_string(),
                &json!({
                    "today": reference_date.format("%Y-%m-%d").to_string(),
                    "weekday": reference_date.format("%A").to_string(),
                    "tomorrow": (reference_date + chrono::Duration::days(1))
                        .format("%Y-%m-%d")
                        .to_string(),
                    "text": text,
                }),
            )
            .map_err(|err| ScheduleError::Extraction(format!("prompt render failed: {}", err)))?;

        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": SYSTEM_MESSAGE},
                {"role": "user", "content": prompt},
            ],
            "temperature": 0.3,
            "max_tokens": 300,
            "response_format": {"type": "json_object"},
        });

        let url = format!(
            "{}/v1/chat/completions",
            self.api_hostname.trim_end_matches("/")
        );
        let response = reqwest::Client::new()
            .post(url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .timeout(Duration::from_secs(30))
            .json(&payload)
            .send()
            .await
            .map_err(|err| ScheduleError::Extraction(format!("model request failed: {}", err)))?;

        if !response.status().is_success() {
            return Err(ScheduleError::Extraction(format!(
                "model endpoint returned {}",
                response.status()
            )));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|err| ScheduleError::Extraction(format!("malformed completion: {}", err)))?;
        let content = completion
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .ok_or_else(|| ScheduleError::Extraction("completion had no content".to_string()))?;

        tracing::debug!("model answered: {}", content);
        let raw: RawMeetingDetails = serde_json::from_str(sanitize_json(content))
            .map_err(|err| {
                ScheduleError::Extraction(format!("model did not return meeting JSON: {}", err))
            })?;
        raw.into_request()
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Meeting fields exactly as the model emits them, before validation.
#[derive(Debug, Deserialize)]
struct RawMeetingDetails {
    attendee: String,
    date: String,
    time: String,
    #[serde(default = "default_duration")]
    duration: u32,
    #[serde(default)]
    title: Option<String>,
}

fn default_duration() -> u32 {
    30
}

impl RawMeetingDetails {
    fn into_request(self) -> Result<MeetingRequest, ScheduleError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            ScheduleError::Validation(format!("'{}' is not a YYYY-MM-DD date", self.date))
        })?;
        let time = parse_time(&self.time)?;
        let request = MeetingRequest {
            attendee_email: self.attendee.trim().to_string(),
            date,
            time,
            duration_minutes: self.duration,
            title: match self.title.as_deref().map(str::trim) {
                Some(title) if !title.is_empty() => title.to_string(),
                _ => "Meeting".to_string(),
            },
        };
        request.validate()?;
        Ok(request)
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| ScheduleError::Validation(format!("'{}' is not a HH:MM time", value)))
}

// Models wrap JSON in markdown fences despite being told not to.
fn sanitize_json(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}
