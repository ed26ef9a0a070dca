use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Deserialize;

use crate::agenda::error::AgendaError;
use crate::agenda::event::{Attendee as AgendaAttendee, Event, EventSpan, ResponseStatus};

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct CalendarListResponse {
    #[serde(rename = "kind")]
    pub kind: Option<String>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(rename = "items", default)]
    pub items: Vec<CalendarListEntry>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct CalendarListEntry {
    #[serde(rename = "id")]
    pub id: String,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "primary")]
    pub primary: Option<bool>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug)]
pub struct CalendarEventsResponse {
    #[serde(rename = "kind")]
    pub kind: Option<String>,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
    #[serde(rename = "items", default)]
    pub items: Vec<EventItem>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct EventItem {
    #[serde(rename = "id")]
    pub id: Option<String>,
    #[serde(rename = "status")]
    pub status: Option<String>,
    #[serde(rename = "htmlLink")]
    pub html_link: Option<String>,
    #[serde(rename = "summary")]
    pub summary: Option<String>,
    #[serde(rename = "location")]
    pub location: Option<String>,
    #[serde(rename = "attendees")]
    pub attendees: Option<Vec<Attendee>>,
    #[serde(rename = "start")]
    pub start: Option<EventDateTime>,
    #[serde(rename = "end")]
    pub end: Option<EventDateTime>,
}

#[allow(dead_code)]
#[derive(Debug, Deserialize, Clone)]
pub struct Attendee {
    #[serde(rename = "email")]
    pub email: Option<String>,

    #[serde(rename = "self")]
    pub self_field: Option<bool>,

    #[serde(rename = "responseStatus")]
    pub response_status: Option<String>,
}

#[allow(dead_code)]
#[derive(Deserialize, Debug, Clone)]
pub struct EventDateTime {
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    #[serde(rename = "timeZone")]
    pub time_zone: Option<String>,
    #[serde(rename = "date")]
    pub date: Option<String>,
}

enum Point {
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl EventItem {
    fn summary_or_default(&self) -> String {
        self.summary
            .clone()
            .unwrap_or_else(|| "(no summary)".to_string())
    }

    fn malformed(&self, value: &str) -> AgendaError {
        AgendaError::MalformedEventTime {
            summary: self.summary_or_default(),
            value: value.to_string(),
        }
    }

    fn point(&self, edt: Option<&EventDateTime>) -> Result<Point, AgendaError> {
        let Some(edt) = edt else {
            return Err(self.malformed(""));
        };

        match (&edt.date_time, &edt.date) {
            (Some(dt), _) if !dt.is_empty() => DateTime::parse_from_rfc3339(dt)
                .map(Point::DateTime)
                .map_err(|_| self.malformed(dt)),
            (_, Some(d)) if !d.is_empty() => NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .map(Point::Date)
                .map_err(|_| self.malformed(d)),
            _ => Err(self.malformed("")),
        }
    }
}

impl TryFrom<EventItem> for Event {
    type Error = AgendaError;

    fn try_from(item: EventItem) -> Result<Self, Self::Error> {
        let span = match (item.point(item.start.as_ref())?, item.point(item.end.as_ref())?) {
            (Point::Date(start), Point::Date(end)) => EventSpan::AllDay { start, end },
            (Point::DateTime(start), Point::DateTime(end)) => EventSpan::Timed { start, end },
            (Point::Date(_), Point::DateTime(end)) => {
                return Err(item.malformed(&end.to_rfc3339()))
            }
            (Point::DateTime(start), Point::Date(_)) => {
                return Err(item.malformed(&start.to_rfc3339()))
            }
        };

        let attendees = item
            .attendees
            .iter()
            .flatten()
            .map(|a| AgendaAttendee {
                is_self: a.self_field.unwrap_or(false),
                response_status: ResponseStatus::from(a.response_status.as_deref().unwrap_or("")),
            })
            .collect();

        Ok(Event {
            summary: item.summary_or_default(),
            location: item.location,
            span,
            attendees,
        })
    }
}
