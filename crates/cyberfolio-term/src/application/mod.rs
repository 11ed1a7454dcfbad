//! Application layer of the terminal front-end.
//!
//! Command-line parsing, turning panels into styled lines, and the draw loop that ties
//! the domain services to the screen.

pub mod cli;
pub mod render;
pub mod ui;
