//! Terminal front-end for the cyberfolio portfolio.
//!
//! Plays the boot sequence, then hands the screen to a prompt backed by the core
//! interpreter. News and link previews come from the proxy server configured by
//! `server-url`.

pub mod application;
pub mod configuration;
pub mod domain;
pub use application::ui::{destruct_terminal_for_panic, start_loop, UiProps};
pub use configuration::{Config, ConfigKey};
pub use domain::models::{Action, Event};
pub use domain::services::{AppState, PreviewState};
