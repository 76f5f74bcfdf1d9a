use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime configuration shared by the server and CLI binaries.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Root directory for persisted deal collections and debug artifacts.
    pub data_dir: PathBuf,
    /// Path to the YAML store catalog.
    pub stores_path: PathBuf,
    pub render_timeout_secs: u64,
    pub user_agent: String,
    /// Minimum candidate count for the captured-JSON strategy to be taken as
    /// authoritative without falling through to later strategies.
    pub min_captured_items: usize,
    /// Node budget applied to each captured/embedded JSON payload walk.
    pub max_walk_nodes: usize,
}
