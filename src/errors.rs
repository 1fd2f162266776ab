pub mod engine {
    pub const ALREADY_RUNNING: &str = "Engine is already running. Stop it before starting again.";
    pub const NOT_RUNNING: &str = "Engine is not running";

    pub fn verification_failed(profile: &str) -> String {
        format!("Verification failed for profile '{}'", profile)
    }

    pub const NO_PROFILE: &str = "No active profile to update";
}

pub mod ui {
    pub const CONTEXT_CLOSED: &str = "UI context has shut down";

    pub fn task_failed(error: &str) -> String {
        format!("Background task failed: {}", error)
    }
}

pub mod strings {
    pub fn corrupted_yaml(path: &str, error: &str) -> String {
        format!("Corrupted string resources at {}: {}", path, error)
    }

    pub fn failed_to_read(path: &str) -> String {
        format!("Failed to read string resources from {}", path)
    }
}

pub mod settings {
    pub fn failed_to_load(path: &str) -> String {
        format!("Failed to load settings from {}", path)
    }

    pub const FAILED_TO_DESERIALIZE: &str = "Failed to deserialize settings";

    pub const REQUEST_BUFFER_ZERO: &str = "Request buffer must hold at least one request";

    pub fn invalid_tick(value: &str) -> String {
        format!("Invalid engine tick interval: {}", value)
    }

    pub const TICK_ZERO: &str = "Engine tick interval must be greater than zero";

    pub fn bytes_per_tick_too_large(value: u64) -> String {
        format!("Bytes per tick must be at most 1 GiB, got: {}", value)
    }
}

pub mod logs {
    pub const FAILED_TO_CREATE_DIR: &str = "Failed to create log directory";
}

pub mod help {
    pub fn failed_to_open(url: &str, error: &str) -> String {
        format!("Failed to open help page {}: {}", url, error)
    }
}
