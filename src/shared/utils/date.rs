use chrono::{DateTime, TimeZone};

/// `HH:MM` in the offset the timestamp carries.
pub fn clock_time<TZ: TimeZone>(datetime: &DateTime<TZ>) -> String
where
    TZ::Offset: std::fmt::Display,
{
    datetime.format("%H:%M").to_string()
}

/// Whether `datetime` falls on the same calendar day as `reference`, judged in
/// the time zone of `reference`.
pub fn same_local_day<A: TimeZone, B: TimeZone>(
    datetime: &DateTime<A>,
    reference: &DateTime<B>,
) -> bool {
    datetime.with_timezone(&reference.timezone()).date_naive() == reference.date_naive()
}
