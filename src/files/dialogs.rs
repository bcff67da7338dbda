//! Native file dialog integration using the rfd crate
//!
//! Pickers for opening and saving persona documents and for choosing where
//! an HTML export goes.

use rfd::FileDialog;
use std::path::PathBuf;

/// File extension filters for supported file types.
const JSON_EXTENSIONS: &[&str] = &["json"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Opens a native file dialog for selecting a persona document.
///
/// Returns `Some(PathBuf)` if a file was selected, `None` if cancelled.
pub fn open_persona_dialog(initial_dir: Option<&PathBuf>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Open Persona")
        .add_filter("Persona Files", JSON_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}

/// Opens a native save dialog for a persona document.
pub fn save_persona_dialog(
    initial_dir: Option<&PathBuf>,
    default_name: Option<&str>,
) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Save Persona")
        .add_filter("Persona Files", JSON_EXTENSIONS);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    if let Some(name) = default_name {
        dialog = dialog.set_file_name(name);
    }

    dialog.save_file()
}

/// Opens a native save dialog for an HTML export.
pub fn export_html_dialog(
    initial_dir: Option<&PathBuf>,
    default_name: &str,
) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Export as HTML")
        .add_filter("HTML Files", HTML_EXTENSIONS)
        .set_file_name(default_name);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.save_file()
}

/// File name for a persona, derived from its display name.
///
/// Keeps letters, digits, `-` and `_`; everything else becomes `-`.
pub fn suggested_file_stem(name: &str) -> String {
    let mut stem = String::new();
    for c in name.trim().chars() {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            stem.extend(c.to_lowercase());
        } else if !stem.ends_with('-') {
            stem.push('-');
        }
    }
    let stem = stem.trim_matches('-');
    if stem.is_empty() {
        "persona".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggested_file_stem() {
        assert_eq!(suggested_file_stem("Ada Lovelace"), "ada-lovelace");
        assert_eq!(suggested_file_stem("  R&D / Lead  "), "r-d-lead");
        assert_eq!(suggested_file_stem("snake_case-name"), "snake_case-name");
        assert_eq!(suggested_file_stem("???"), "persona");
        assert_eq!(suggested_file_stem(""), "persona");
    }
}
