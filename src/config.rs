//! Resolved application settings shared by the window and the CLI handlers.

use crate::export::DEFAULT_ALL_DATA_URL;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DATA_PATH: &str = "popular_names.csv";
pub const DEFAULT_HELP_IMAGE: &str = "assets/csv-example.png";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
/// Names preselected when the window opens.
pub const DEFAULT_NAMES: [&str; 3] = ["Harry", "Gertrude", "Alberta"];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub all_data_url: String,
    pub fetch_timeout: Duration,
    pub help_image: PathBuf,
    pub default_names: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            all_data_url: DEFAULT_ALL_DATA_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            help_image: PathBuf::from(DEFAULT_HELP_IMAGE),
            default_names: DEFAULT_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}
