pub mod app_config;
pub mod config;
pub mod generation;
pub mod location;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use generation::{GenerationCounter, Ticket};
pub use location::{
    is_valid_latitude, is_valid_longitude, Location, Priority, PriorityLabel,
    DEFAULT_TIME_WINDOW_END, DEFAULT_TIME_WINDOW_START,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
