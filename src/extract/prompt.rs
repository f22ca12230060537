//! Prompt templates using Handlebars. Strict mode turns a missing
//! variable into a render error instead of silently empty output.

use std::fmt;

use handlebars::Handlebars;

#[derive(Debug)]
pub enum Prompt {
    MeetingExtraction,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

const MEETING_EXTRACTION_PROMPT: &str = r#"
Extract the meeting details from the scheduling request below.

Today's date is {{today}} ({{weekday}}). "Tomorrow" means {{tomorrow}}.
A bare day name like "Friday" means the next occurrence of that day after
today. "Morning" means 09:00, "afternoon" means 14:00 and "evening" means
17:00. Times are 24-hour clock in the requester's local time.

Reply with ONLY a JSON object, no prose and no code fences, using exactly
these keys:

{"attendee": "<email address from the text>", "date": "YYYY-MM-DD", "time": "HH:MM", "duration": <length in minutes, as an integer>, "title": "<short meeting title>"}

If no duration is mentioned use 30. "An hour" means 60. If no title can be
inferred use "Meeting".

REQUEST:
{{text}}
"#;

pub fn templates<'a>() -> Handlebars<'a> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry
        .register_template_string(
            &Prompt::MeetingExtraction.to_string(),
            MEETING_EXTRACTION_PROMPT,
        )
        .expect("Failed to register template");
    registry
}
