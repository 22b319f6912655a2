//! Configuration loading: run-parameters file, secrets file with environment
//! fallback, and the validated process-wide settings.

pub mod runconfig;
pub mod secrets;
pub mod settings;

pub use runconfig::{load_csv, DataRow, RunParams};
pub use secrets::SecretsFile;
pub use settings::{parse_flag, ServiceFlavor, Settings, SettingsBuilder, DEFAULT_XRAY_HOST};
