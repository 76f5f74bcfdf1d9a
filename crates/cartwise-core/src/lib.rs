mod app_config;
mod compare;
mod config;
mod deal;
mod error;
mod stores;

pub use app_config::AppConfig;
pub use compare::{compare, ComparisonResult, StoreBreakdown};
pub use config::{load_app_config, load_app_config_from_env};
pub use deal::{Deal, Unit};
pub use error::ConfigError;
pub use stores::{load_stores, StoreConfig, StoresFile};
