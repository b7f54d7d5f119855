//! Worker thread that owns the async runtime and the game api client.

pub mod commands;
pub mod runtime;
