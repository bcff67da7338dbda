//! User settings and preferences for Persona Card
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::persona::NotifyPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Available color themes for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    /// Dark matches the card's own dark surface.
    #[default]
    Dark,
    System,
}

impl Theme {
    pub fn label(&self) -> &'static str {
        match self {
            Theme::Light => "Light",
            Theme::Dark => "Dark",
            Theme::System => "System",
        }
    }

    /// Next theme in the Light → Dark → System cycle.
    pub fn cycle(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        }
    }

    pub fn all() -> &'static [Theme] {
        &[Theme::Light, Theme::Dark, Theme::System]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Card Mode / Format
// ─────────────────────────────────────────────────────────────────────────────

/// Interaction mode of the persona card.
///
/// - `View`: read-only display
/// - `Edit`: every section becomes an input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardMode {
    #[default]
    View,
    Edit,
}

impl CardMode {
    /// Toggle between View and Edit modes.
    pub fn toggle(&self) -> Self {
        match self {
            CardMode::View => CardMode::Edit,
            CardMode::Edit => CardMode::View,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardMode::View => "View",
            CardMode::Edit => "Edit",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            CardMode::View => "👁",
            CardMode::Edit => "✏",
        }
    }
}

/// How list sections are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CardFormat {
    /// Chips in a two-column grid
    #[default]
    Card,
    /// Bulleted lists in a single column
    Bullet,
}

impl CardFormat {
    pub fn toggle(&self) -> Self {
        match self {
            CardFormat::Card => CardFormat::Bullet,
            CardFormat::Bullet => CardFormat::Card,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CardFormat::Card => "Card",
            CardFormat::Bullet => "Bullet",
        }
    }

    /// Number of layout columns used by this format.
    pub fn columns(&self) -> usize {
        match self {
            CardFormat::Card => 2,
            CardFormat::Bullet => 1,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 760.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// Serialized to JSON in the user's config directory. Every field has a
/// default, so partial or older files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Color theme (light, dark, or system)
    pub theme: Theme,

    /// Font size for card text (in points)
    pub font_size: f32,

    // ─────────────────────────────────────────────────────────────────────────
    // Card
    // ─────────────────────────────────────────────────────────────────────────
    /// Layout of list sections
    pub card_format: CardFormat,

    /// Mode the card opens in
    pub card_mode: CardMode,

    /// When edits are reported back to the library
    pub notify_policy: NotifyPolicy,

    /// Persona shown on startup
    pub last_selected_persona: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Session & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Recently opened persona files (most recent first)
    pub recent_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    pub window_size: WindowSize,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Last directory used for HTML export
    pub last_export_directory: Option<PathBuf>,

    /// Whether to open exported files after export
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Appearance
            theme: Theme::default(),
            font_size: 14.0,

            // Card
            card_format: CardFormat::default(),
            card_mode: CardMode::default(),
            notify_policy: NotifyPolicy::default(),
            last_selected_persona: None,

            // Session & History
            recent_files: Vec::new(),
            max_recent_files: 10,

            // Window State
            window_size: WindowSize::default(),

            // Export Settings
            last_export_directory: None,
            open_after_export: false,
        }
    }
}

impl Settings {
    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 32.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Used after loading a file that may have been edited by hand.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > 100 {
            self.max_recent_files = 100;
        }
        self.recent_files.truncate(self.max_recent_files);

        if self
            .last_selected_persona
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            self.last_selected_persona = None;
        }
    }

    /// Deserialize and then sanitize.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::Dark);
        assert_eq!(settings.card_format, CardFormat::Card);
        assert_eq!(settings.card_mode, CardMode::View);
        assert_eq!(settings.notify_policy, NotifyPolicy::Always);
        assert_eq!(settings.font_size, 14.0);
        assert!(settings.recent_files.is_empty());
        assert_eq!(settings.max_recent_files, 10);
        assert!(settings.last_selected_persona.is_none());
    }

    #[test]
    fn test_add_recent_file() {
        let mut settings = Settings::default();
        settings.max_recent_files = 3;

        settings.add_recent_file(PathBuf::from("/ada.json"));
        settings.add_recent_file(PathBuf::from("/bo.json"));
        settings.add_recent_file(PathBuf::from("/cy.json"));
        assert_eq!(settings.recent_files[0], PathBuf::from("/cy.json"));

        settings.add_recent_file(PathBuf::from("/ada.json"));
        assert_eq!(settings.recent_files[0], PathBuf::from("/ada.json"));
        assert_eq!(settings.recent_files.len(), 3);

        settings.add_recent_file(PathBuf::from("/di.json"));
        assert_eq!(settings.recent_files.len(), 3);
        assert!(!settings.recent_files.contains(&PathBuf::from("/bo.json")));
    }

    #[test]
    fn test_card_enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&CardMode::Edit).unwrap(), "\"edit\"");
        assert_eq!(
            serde_json::to_string(&CardFormat::Bullet).unwrap(),
            "\"bullet\""
        );
        assert_eq!(
            serde_json::from_str::<Theme>("\"system\"").unwrap(),
            Theme::System
        );
    }

    #[test]
    fn test_toggles_and_cycle() {
        assert_eq!(CardMode::View.toggle(), CardMode::Edit);
        assert_eq!(CardFormat::Bullet.toggle(), CardFormat::Card);
        assert_eq!(Theme::System.cycle(), Theme::Light);
        assert_eq!(CardFormat::Card.columns(), 2);
        assert_eq!(CardFormat::Bullet.columns(), 1);
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let json = r#"{"card_format": "bullet", "notify_policy": "on_change"}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();

        assert_eq!(settings.card_format, CardFormat::Bullet);
        assert_eq!(settings.notify_policy, NotifyPolicy::OnChange);
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_settings_deserialize_empty_json() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let mut original = Settings::default();
        original.last_selected_persona = Some("p-1".to_string());
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_sanitize_font_size() {
        let mut settings = Settings::default();
        settings.font_size = 4.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);

        settings.font_size = 100.0;
        settings.sanitize();
        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
    }

    #[test]
    fn test_sanitize_recent_files() {
        let mut settings = Settings::default();
        settings.max_recent_files = 0;
        settings.sanitize();
        assert_eq!(settings.max_recent_files, 10);

        settings.max_recent_files = 2;
        settings.recent_files = vec![
            PathBuf::from("/a.json"),
            PathBuf::from("/b.json"),
            PathBuf::from("/c.json"),
        ];
        settings.sanitize();
        assert_eq!(settings.recent_files.len(), 2);
    }

    #[test]
    fn test_sanitize_blank_selection() {
        let mut settings = Settings::default();
        settings.last_selected_persona = Some("  ".to_string());
        settings.sanitize();
        assert!(settings.last_selected_persona.is_none());
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"font_size": 4.0, "window_size": {"width": 50.0, "height": 900.0}}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, 900.0);
    }
}
