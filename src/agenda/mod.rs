pub mod error;
pub mod event;
pub mod galendar;
pub mod presenter;
pub mod provider;
pub mod resolver;
pub mod terminal;
pub mod window;
