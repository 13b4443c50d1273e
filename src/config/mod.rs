mod loader;
mod settings;

pub use loader::{load_config, CaptureConfig, CaptureProfileConfig, LoadedConfig, CONFIG_FILE_NAME};
pub use settings::{CaptureSettings, SettingsBuilder};
