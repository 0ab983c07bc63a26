pub mod cli;
pub mod logging;

pub use silence_host_windows::{
    App, AppError, AppResult, Command, CommandExecutor, HostEvent, HostServices,
    WINDOW_CLASS_NAME, command_executor, constants, core_bridge, overlay_view, sound, tray_menu,
};
#[cfg(windows)]
pub use silence_host_windows::{RunOptions, run};

pub use silence_settings as settings;
