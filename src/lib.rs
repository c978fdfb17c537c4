pub mod api_server;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod event;
pub mod parser;

pub fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

// Re-export commonly used types
pub use calendar::{json_to_google_event, CalendarError, GoogleEvent};
pub use config::Config;
pub use event::{Event, EventRecord};
pub use parser::{get_all_events_as_dicts, parse_schedule_to_events, ScheduleParser};
