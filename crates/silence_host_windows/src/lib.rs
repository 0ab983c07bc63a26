pub mod app;
pub mod command_executor;
pub mod constants;
pub mod core_bridge;
pub mod error;
pub mod host_event;
pub mod hotkey_service;
pub mod overlay_view;
pub mod sound;
pub mod tray_menu;

#[cfg(windows)]
mod run;

#[cfg(test)]
mod fakes;

pub use crate::constants::WINDOW_CLASS_NAME;
pub use app::{App, HostServices};
pub use command_executor::CommandExecutor;
pub use error::{AppError, AppResult};
pub use host_event::{EventSink, HostEvent};
#[cfg(windows)]
pub use run::{RunOptions, run};
pub use silence_host_protocol::Command;
