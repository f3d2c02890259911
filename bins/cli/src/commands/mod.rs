//! CLI command handlers.

pub mod classify;
pub mod compare;
pub mod config;
pub mod info;

pub use classify::{ClassifySource, run_classify};
pub use compare::run_compare;
pub use config::{run_config_check, run_config_schema, run_config_show};
pub use info::run_info;
