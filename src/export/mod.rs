//! Card Export Module for Persona Card
//!
//! Exports the current card as a standalone HTML file or copies it to the
//! clipboard.
//!
//! - `html.rs` - HTML document generation with card styling
//! - `clipboard.rs` - Platform clipboard operations

pub mod clipboard;
pub mod html;

pub use clipboard::copy_card_to_clipboard;
pub use html::export_card_to_file;
