pub mod app;
pub mod config;
pub mod event;
pub mod ui;

pub use app::{App, EditMode, ReturnTo, View};
pub use config::{load_config, Config};
pub use event::{handle_key_event, Event, EventHandler};
