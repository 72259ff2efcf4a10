mod error;
mod loader;
mod lower;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, parse_config};
pub use lower::OutputTarget;
pub use types::SawmillConfig;
