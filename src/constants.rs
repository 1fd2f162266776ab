use std::path::PathBuf;

pub const APP_TITLE: &str = "Clash Dashboard";

pub const VERSION_NAME: &str = env!("CARGO_PKG_VERSION");

pub const HELP_URL: &str = "https://github.com/Kr328/ClashForAndroid/wiki";

pub const DEFAULT_REQUEST_BUFFER: usize = 64;

pub const DEFAULT_TICK_INTERVAL: &str = "1s";

pub const DEFAULT_BYTES_PER_TICK: u64 = 64 * 1024;

pub const ENV_PREFIX: &str = "CLASH_DASHBOARD";

pub fn default_log_directory() -> PathBuf {
    PathBuf::from(".").join("logs")
}
