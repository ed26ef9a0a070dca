use chrono::{DateTime, FixedOffset, NaiveDate};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub summary: String,
    pub location: Option<String>,
    pub span: EventSpan,
    pub attendees: Vec<Attendee>,
}

/// All-day events only carry civil dates; timed events keep the offset they
/// were published with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSpan {
    AllDay {
        start: NaiveDate,
        end: NaiveDate,
    },
    Timed {
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendee {
    pub is_self: bool,
    pub response_status: ResponseStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    Accepted,
    Declined,
    Tentative,
    NeedsAction,
    Unknown,
}

impl From<&str> for ResponseStatus {
    fn from(value: &str) -> Self {
        match value {
            "accepted" => ResponseStatus::Accepted,
            "declined" => ResponseStatus::Declined,
            "tentative" => ResponseStatus::Tentative,
            "needsAction" => ResponseStatus::NeedsAction,
            _ => ResponseStatus::Unknown,
        }
    }
}

impl Event {
    pub fn is_all_day(&self) -> bool {
        matches!(self.span, EventSpan::AllDay { .. })
    }

    /// Status of the authenticated user; events without a self attendee
    /// count as accepted. The last self entry wins.
    pub fn response_status(&self) -> ResponseStatus {
        self.attendees
            .iter()
            .rev()
            .find(|a| a.is_self)
            .map(|a| a.response_status)
            .unwrap_or(ResponseStatus::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_with(attendees: Vec<Attendee>) -> Event {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        Event {
            summary: "Standup".to_string(),
            location: None,
            span: EventSpan::AllDay {
                start: date,
                end: date,
            },
            attendees,
        }
    }

    #[test]
    fn test_response_status_without_self_defaults_to_accepted() {
        let event = event_with(vec![Attendee {
            is_self: false,
            response_status: ResponseStatus::Declined,
        }]);

        assert_eq!(event.response_status(), ResponseStatus::Accepted);
    }

    #[test]
    fn test_response_status_of_self_attendee() {
        let event = event_with(vec![
            Attendee {
                is_self: false,
                response_status: ResponseStatus::Accepted,
            },
            Attendee {
                is_self: true,
                response_status: ResponseStatus::Tentative,
            },
        ]);

        assert_eq!(event.response_status(), ResponseStatus::Tentative);
    }

    #[test]
    fn test_response_status_from_wire() {
        assert_eq!(ResponseStatus::from("needsAction"), ResponseStatus::NeedsAction);
        assert_eq!(ResponseStatus::from("declined"), ResponseStatus::Declined);
        assert_eq!(ResponseStatus::from(""), ResponseStatus::Unknown);
    }
}
