use async_trait::async_trait;
use reqwest::{Client, Url};
use thiserror::Error;

use super::model::{CalendarEventsResponse, CalendarListResponse};
use crate::agenda::event::Event;
use crate::agenda::provider::CalendarProvider;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3/";

#[derive(Error, Debug)]
pub enum GoogleCalendarError {
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

pub struct GoogleCalendarClient {
    client: Client,
    access_token: String,
}

impl GoogleCalendarClient {
    pub fn new<T: Into<String>>(token: T) -> Self {
        GoogleCalendarClient {
            client: Client::new(),
            access_token: token.into(),
        }
    }

    fn endpoint(segments: &[&str]) -> Result<Url, GoogleCalendarError> {
        let mut url =
            Url::parse(API_BASE).map_err(|e| GoogleCalendarError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| GoogleCalendarError::InvalidUrl(API_BASE.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn fetch_calendar_list(
        &self,
        page_token: Option<&str>,
    ) -> Result<CalendarListResponse, GoogleCalendarError> {
        let url = Self::endpoint(&["users", "me", "calendarList"])?;

        let mut request = self.client.get(url).bearer_auth(&self.access_token);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }

        let response = request.send().await?.error_for_status()?;

        Ok(response.json::<CalendarListResponse>().await?)
    }

    pub async fn fetch_calendar_events(
        &self,
        calendar_id: &str,
        since: &str,
        until: &str,
        max_results: u32,
    ) -> Result<CalendarEventsResponse, GoogleCalendarError> {
        let url = Self::endpoint(&["calendars", calendar_id, "events"])?;
        let max_results = max_results.to_string();

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(&[
                ("timeMin", since),
                ("timeMax", until),
                ("singleEvents", "true"),
                ("showDeleted", "false"),
                ("orderBy", "startTime"),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let calendar_events_response = response.json::<CalendarEventsResponse>().await?;

        Ok(calendar_events_response)
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarClient {
    async fn calendar_ids(&self) -> anyhow::Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_calendar_list(page_token.as_deref()).await?;
            ids.extend(page.items.into_iter().map(|entry| entry.id));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(count = ids.len(), "fetched calendar list");
        Ok(ids)
    }

    async fn upcoming_events(
        &self,
        calendar_id: &str,
        since: &str,
        until: &str,
        max_results: u32,
    ) -> anyhow::Result<Vec<Event>> {
        let response = self
            .fetch_calendar_events(calendar_id, since, until, max_results)
            .await?;

        let events = response
            .items
            .into_iter()
            .map(Event::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(events)
    }
}
