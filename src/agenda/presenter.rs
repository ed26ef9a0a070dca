use chrono::{DateTime, FixedOffset, TimeZone};

use crate::agenda::event::{Event, EventSpan, ResponseStatus};
use crate::shared::utils::date::{clock_time, same_local_day};

pub const NO_EVENTS: &str = "No upcoming events found.";

/// Semantic color of a piece of output. The terminal decides what it looks like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Affirmative,
    Alert,
    Cautionary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub tone: Option<Tone>,
}

impl Segment {
    pub fn plain<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            tone: None,
        }
    }

    pub fn toned<T: Into<String>>(text: T, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone: Some(tone),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub segments: Vec<Segment>,
}

impl RenderedLine {
    fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// The line without any tone information.
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timing {
    AllDay,
    HappeningNow,
    LaterToday,
    NotToday,
}

impl Timing {
    fn prefix(&self) -> Option<Segment> {
        match self {
            Timing::HappeningNow => Some(Segment::toned("Happening now: ", Tone::Affirmative)),
            Timing::NotToday => Some(Segment::toned("Not today: ", Tone::Cautionary)),
            Timing::AllDay | Timing::LaterToday => None,
        }
    }
}

/// Events that already started count as happening now even once their end has
/// passed; the provider only returns events ending after the window start.
pub fn classify<TZ: TimeZone>(event: &Event, now: &DateTime<TZ>) -> Timing {
    match event.span {
        EventSpan::AllDay { .. } => Timing::AllDay,
        EventSpan::Timed { start, .. } if *now >= start => Timing::HappeningNow,
        EventSpan::Timed { start, .. } if same_local_day(&start, now) => Timing::LaterToday,
        EventSpan::Timed { .. } => Timing::NotToday,
    }
}

pub fn status_tone(status: ResponseStatus) -> Tone {
    match status {
        ResponseStatus::Accepted => Tone::Affirmative,
        ResponseStatus::Declined => Tone::Alert,
        _ => Tone::Cautionary,
    }
}

pub fn format_event(
    summary: &str,
    location: Option<&str>,
    start: &DateTime<FixedOffset>,
    end: &DateTime<FixedOffset>,
) -> String {
    let location = match location {
        Some(l) if !l.is_empty() => l,
        _ => "-",
    };

    format!(
        "{} @ {} {}-{}",
        summary,
        location,
        clock_time(start),
        clock_time(end)
    )
}

fn render_event<TZ: TimeZone>(event: &Event, now: &DateTime<TZ>) -> RenderedLine {
    let timing = classify(event, now);

    match event.span {
        EventSpan::AllDay { start, .. } => RenderedLine::new(vec![Segment::plain(format!(
            "Full-day: {} ({})",
            event.summary,
            start.format("%Y-%m-%d")
        ))]),
        EventSpan::Timed { start, end } => {
            let body = format_event(&event.summary, event.location.as_deref(), &start, &end);
            let mut segments: Vec<Segment> = timing.prefix().into_iter().collect();
            segments.push(Segment::toned(body, status_tone(event.response_status())));
            RenderedLine::new(segments)
        }
    }
}

/// Turns a snapshot of upcoming events into output lines, in the order given.
///
/// Time classification tones the prefix, the response status tones the event
/// itself.
///
/// `calendar_id` names the calendar the events came from. It only tags the
/// debug log, the lines themselves do not show it.
pub fn render<TZ: TimeZone>(
    calendar_id: &str,
    events: &[Event],
    now: &DateTime<TZ>,
) -> Vec<RenderedLine> {
    tracing::debug!(
        calendar_id,
        count = events.len(),
        all_day = events.iter().filter(|e| e.is_all_day()).count(),
        "rendering events"
    );

    if events.is_empty() {
        return vec![RenderedLine::new(vec![Segment::toned(NO_EVENTS, Tone::Alert)])];
    }

    events.iter().map(|e| render_event(e, now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agenda::event::Attendee;
    use chrono::{NaiveDate, Utc};

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn timed(summary: &str, location: Option<&str>, start: &str, end: &str) -> Event {
        Event {
            summary: summary.to_string(),
            location: location.map(String::from),
            span: EventSpan::Timed {
                start: at(start),
                end: at(end),
            },
            attendees: vec![],
        }
    }

    fn with_self_status(mut event: Event, status: ResponseStatus) -> Event {
        event.attendees = vec![
            Attendee {
                is_self: false,
                response_status: ResponseStatus::Accepted,
            },
            Attendee {
                is_self: true,
                response_status: status,
            },
        ];
        event
    }

    fn now() -> DateTime<FixedOffset> {
        at("2024-01-02T09:00:00+00:00")
    }

    #[test]
    fn test_empty_list_renders_single_alert_line() {
        let lines = render("primary", &[], &now());

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "No upcoming events found.");
        assert_eq!(lines[0].segments[0].tone, Some(Tone::Alert));
    }

    #[test]
    fn test_all_day_event() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let event = Event {
            summary: "Standup".to_string(),
            location: None,
            span: EventSpan::AllDay {
                start: date,
                end: date.succ_opt().unwrap(),
            },
            attendees: vec![],
        };

        let lines = render("primary", &[event], &now());

        assert_eq!(lines[0].text(), "Full-day: Standup (2024-01-02)");
        assert_eq!(lines[0].segments.len(), 1);
        assert_eq!(lines[0].segments[0].tone, None);
    }

    #[test]
    fn test_format_event_without_location() {
        let formatted = format_event(
            "Sync",
            Some(""),
            &at("2024-01-02T10:00:00+00:00"),
            &at("2024-01-02T12:00:00+00:00"),
        );

        assert_eq!(formatted, "Sync @ - 10:00-12:00");
    }

    #[test]
    fn test_format_event_with_location_keeps_offset() {
        let formatted = format_event(
            "We eat veggie hotdogs!",
            Some("London"),
            &at("2024-01-02T10:00:00+09:00"),
            &at("2024-01-02T12:30:00+09:00"),
        );

        assert_eq!(formatted, "We eat veggie hotdogs! @ London 10:00-12:30");
    }

    #[test]
    fn test_happening_now() {
        let event = timed(
            "Sync",
            None,
            "2024-01-02T09:00:00+00:00",
            "2024-01-02T10:00:00+00:00",
        );

        let lines = render("primary", &[event], &now());

        assert_eq!(
            lines[0].segments,
            vec![
                Segment::toned("Happening now: ", Tone::Affirmative),
                Segment::toned("Sync @ - 09:00-10:00", Tone::Affirmative),
            ]
        );
    }

    #[test]
    fn test_started_event_past_its_end_is_still_happening_now() {
        let event = timed(
            "Breakfast",
            None,
            "2024-01-02T07:00:00+00:00",
            "2024-01-02T08:00:00+00:00",
        );

        assert_eq!(classify(&event, &now()), Timing::HappeningNow);
    }

    #[test]
    fn test_later_today_has_no_prefix() {
        let event = timed(
            "Lunch",
            Some("Cafeteria"),
            "2024-01-02T12:00:00+00:00",
            "2024-01-02T13:00:00+00:00",
        );

        let lines = render("primary", &[event], &now());

        assert_eq!(
            lines[0].segments,
            vec![Segment::toned("Lunch @ Cafeteria 12:00-13:00", Tone::Affirmative)]
        );
    }

    #[test]
    fn test_not_today_prefix_is_cautionary() {
        let event = timed(
            "Retro",
            None,
            "2024-01-03T10:00:00+00:00",
            "2024-01-03T11:00:00+00:00",
        );

        let lines = render("primary", &[event], &now());

        assert_eq!(lines[0].text(), "Not today: Retro @ - 10:00-11:00");
        assert_eq!(lines[0].segments[0].tone, Some(Tone::Cautionary));
    }

    #[test]
    fn test_same_day_is_judged_in_the_zone_of_now() {
        let event = timed(
            "Late call",
            None,
            "2024-01-02T23:30:00+09:00",
            "2024-01-03T00:30:00+09:00",
        );
        assert_eq!(classify(&event, &now()), Timing::LaterToday);

        let tokyo_now = at("2024-01-02T18:00:00+09:00");
        let tomorrow_in_tokyo = timed(
            "Early call",
            None,
            "2024-01-02T16:00:00+00:00",
            "2024-01-02T17:00:00+00:00",
        );
        assert_eq!(classify(&tomorrow_in_tokyo, &tokyo_now), Timing::NotToday);
    }

    #[test]
    fn test_response_status_tones() {
        let base = timed(
            "Planning",
            None,
            "2024-01-02T12:00:00+00:00",
            "2024-01-02T13:00:00+00:00",
        );

        let declined = with_self_status(base.clone(), ResponseStatus::Declined);
        let tentative = with_self_status(base.clone(), ResponseStatus::Tentative);
        let needs_action = with_self_status(base.clone(), ResponseStatus::NeedsAction);
        let accepted = with_self_status(base.clone(), ResponseStatus::Accepted);

        let lines = render("primary", &[declined, tentative, needs_action, accepted, base], &now());
        let tones: Vec<Option<Tone>> = lines
            .iter()
            .map(|l| l.segments.last().unwrap().tone)
            .collect();

        assert_eq!(
            tones,
            vec![
                Some(Tone::Alert),
                Some(Tone::Cautionary),
                Some(Tone::Cautionary),
                Some(Tone::Affirmative),
                Some(Tone::Affirmative),
            ]
        );
    }

    #[test]
    fn test_declined_event_happening_now_keeps_both_layers() {
        let event = with_self_status(
            timed(
                "Sync",
                None,
                "2024-01-02T08:30:00+00:00",
                "2024-01-02T09:30:00+00:00",
            ),
            ResponseStatus::Declined,
        );

        let lines = render("primary", &[event], &now());

        assert_eq!(lines[0].segments[0].tone, Some(Tone::Affirmative));
        assert_eq!(lines[0].segments[1].tone, Some(Tone::Alert));
    }

    #[test]
    fn test_render_keeps_order_and_is_repeatable() {
        let events = vec![
            timed(
                "Second",
                None,
                "2024-01-02T15:00:00+00:00",
                "2024-01-02T16:00:00+00:00",
            ),
            timed(
                "First",
                None,
                "2024-01-02T10:00:00+00:00",
                "2024-01-02T11:00:00+00:00",
            ),
        ];
        let now_utc = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();

        let first = render("primary", &events, &now_utc);
        let second = render("primary", &events, &now_utc);

        assert_eq!(first, second);
        assert_eq!(first[0].text(), "Second @ - 15:00-16:00");
        assert_eq!(first[1].text(), "First @ - 10:00-11:00");
    }
}
