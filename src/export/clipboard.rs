//! Clipboard Operations for HTML Export
//!
//! Copies a rendered card to the system clipboard through arboard, as HTML
//! with a plain-text alternative.

#![allow(clippy::enum_variant_names)]

use super::html::{generate_html_fragment, generate_plain_text};
use crate::render::CardLayout;
use arboard::Clipboard;

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug)]
pub enum ClipboardError {
    /// Failed to access clipboard
    AccessError(String),
    /// Failed to set clipboard content
    WriteError(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::AccessError(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        ClipboardError::WriteError(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Operations
// ─────────────────────────────────────────────────────────────────────────────

/// Copy a card to the clipboard.
///
/// Apps that understand HTML paste the styled markup; the rest get the
/// plain-text rendering.
pub fn copy_card_to_clipboard(layout: &CardLayout) -> Result<(), ClipboardError> {
    let html = generate_html_fragment(layout);
    let plain = generate_plain_text(layout);
    copy_html_with_fallback(&html, &plain)
}

/// Copy HTML with plain text fallback to clipboard.
pub fn copy_html_with_fallback(html: &str, plain_text: &str) -> Result<(), ClipboardError> {
    let mut clipboard = Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;

    clipboard
        .set_html(html, Some(plain_text))
        .map_err(|e| ClipboardError::WriteError(e.to_string()))?;

    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clipboard_error_display() {
        let err = ClipboardError::AccessError("test".to_string());
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn test_clipboard_error_write() {
        let err = ClipboardError::WriteError("write failed".to_string());
        assert!(err.to_string().contains("write failed"));
    }

    // Copying itself needs a display server, which CI does not have.
}
