//! Loader configuration module

pub mod feature_flags;
pub mod parser_config;

pub use feature_flags::*;
pub use parser_config::*;
