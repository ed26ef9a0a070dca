pub mod calendar;
pub mod oauth;
