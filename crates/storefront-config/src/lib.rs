//! Configuration, paths and logging for the storefront sync core.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, LogFormat, DEFAULT_ATTRIBUTE_TERMS_PAGE_SIZE, DEFAULT_LOG_LEVEL, DEFAULT_PAGE_SIZE,
};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
