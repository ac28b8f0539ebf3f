pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::EnvVars;
pub use types::{ApiKeys, ConfigError, Config, Credentials, RunMode};
