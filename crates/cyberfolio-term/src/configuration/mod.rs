//! Configuration management for the terminal front-end.
//!
//! Keys resolve once at startup from built-in defaults, then `config.toml`, then
//! command line flags, and are readable from anywhere afterwards.

mod config;

pub use config::*;
