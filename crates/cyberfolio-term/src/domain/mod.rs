//! Front-end state and the workers that feed it.
//!
//! Nothing here draws. Models describe what flows between tasks; services own the
//! terminal-side state and translate keyboard input and core events into it.

pub mod models;
pub mod services;
