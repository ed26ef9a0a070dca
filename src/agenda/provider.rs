use async_trait::async_trait;

use crate::agenda::event::Event;

/// Source of calendars and their events, already authenticated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarProvider: Send + Sync {
    async fn calendar_ids(&self) -> anyhow::Result<Vec<String>>;

    /// Events overlapping `[since, until)` (RFC 3339), ordered by start time.
    async fn upcoming_events(
        &self,
        calendar_id: &str,
        since: &str,
        until: &str,
        max_results: u32,
    ) -> anyhow::Result<Vec<Event>>;
}
