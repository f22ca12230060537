use anyhow::Result;

use crate::core::AppConfig;
use crate::extract::OpenAiExtractor;
use crate::google::gcal::GoogleCalendar;
use crate::google::oauth::refresh_access_token;
use crate::scheduling::{ScheduleOutcome, schedule_meeting};

/// Run the scheduling pipeline for one sentence and print the outcome.
pub async fn run(text: &str) -> Result<()> {
    let config = AppConfig::default();

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

    match schedule_meeting(&extractor, &store, config.timezone, text).await? {
        ScheduleOutcome::Scheduled { request, event } => {
            println!(
                "Scheduled '{}' with {} on {} at {}",
                request.title,
                request.attendee_email,
                request.date,
                request.time.format("%H:%M")
            );
            if let Some(link) = event.html_link {
                println!("{}", link);
            }
        }
        ScheduleOutcome::SlotTaken { request, verdict } => {
            println!(
                "{} at {} is not available:",
                request.date,
                request.time.format("%H:%M")
            );
            for conflict in &verdict.conflicts {
                println!(
                    "  busy: {} ({} - {})",
                    conflict.summary,
                    conflict.interval.start.format("%H:%M"),
                    conflict.interval.end.format("%H:%M")
                );
            }
            if verdict.suggested_slots.is_empty() {
                println!("No free slots nearby on that day.");
            } else {
                println!("Free alternatives:");
                for slot in &verdict.suggested_slots {
                    println!("  {}", slot.local_display());
                }
            }
        }
    }

    Ok(())
}
