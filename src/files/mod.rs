//! File operations module for Persona Card
//!
//! Native open, save and export dialogs.

pub mod dialogs;
