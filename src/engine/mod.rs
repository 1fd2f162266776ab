pub mod mock_engine;
pub mod types;

use anyhow::Result;
use types::{ConnectionSnapshot, FetchStatus};

pub trait Engine: Send + Sync {
    // Lifecycle
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn shutdown(&mut self) -> Result<()>;

    // State Queries
    fn is_running(&self) -> bool;
    fn snapshot(&self) -> ConnectionSnapshot;

    /// Advances the traffic counter by one interval and returns the new total.
    fn tick(&mut self) -> u64;

    // Profile Updates
    fn profile_update_plan(&self) -> Result<Vec<FetchStatus>>;
    fn complete_profile_update(&mut self) -> Result<()>;
}
