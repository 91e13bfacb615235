pub mod calendar;
pub mod config;
pub mod content;
pub mod domain;
pub mod paths;
pub mod reminders;
pub mod srs;
pub mod store;
pub mod weakness;
