pub mod defaults;
pub mod manager;
pub mod settings;

pub use manager::{ConfigManager, background_name, icon_name};
pub use settings::Settings;
