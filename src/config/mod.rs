//! Configuration module for Persona Card
//!
//! User preferences and their persistence in the platform config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
