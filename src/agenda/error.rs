use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgendaError {
    #[error("No matching calendar from the provided calendar: {0}")]
    NoMatchingCalendar(String),

    #[error("Failed to parse the time '{value}' of event '{summary}'.")]
    MalformedEventTime { summary: String, value: String },
}
