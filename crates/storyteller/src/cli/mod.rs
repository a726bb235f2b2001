//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the storyteller binary.

mod commands;
mod handlers;
mod progress;

pub use commands::{Cli, Commands};
pub use handlers::{generate, preview, regenerate_audio};
pub use progress::ConsoleObserver;
