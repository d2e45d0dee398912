//! Layered configuration.
//!
//! Settings are merged from several sources, highest precedence first:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`BOOKINGS_*`)
//! 3. Private project config (`bookings.local.yaml`)
//! 4. Project config (`bookings.yaml`)
//! 5. User config (`~/.bookings/config.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! ```
//! use bookings::config::{Config, ConfigBuilder};
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(Config {
//!         min_first_name_length: Some(2),
//!         ..Default::default()
//!     })
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.workflow_settings().min_first_name_length, 2);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, LOCAL_CONFIG_FILE, PROJECT_CONFIG_FILE};
pub use merger::ConfigMerger;
pub use schema::{default_room_seeds, Config, OutputFormat, RoomSeed};
pub use self::validator::ConfigValidator;
