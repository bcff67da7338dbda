//! Theme System for Persona Card
//!
//! Colors and spacing shared by the application chrome and the card itself.
//!
//! The `Theme` enum in `config::settings` (Light/Dark/System) selects the
//! palette at runtime; [`ThemeColors`] holds the resolved colors and converts
//! them into egui `Visuals`.
//!
//! # Color Categories
//!
//! - **Base colors**: Background, borders, hover and selection
//! - **Text colors**: Primary, secondary, muted
//! - **Card colors**: Card surface, chips, section titles
//! - **UI colors**: Accent, success, warning, error

pub mod dark;
pub mod light;
pub mod manager;

pub use manager::ThemeManager;

use crate::config::Theme;
use eframe::egui::epaint::Shadow;
use eframe::egui::{vec2, Color32, CursorIcon, Rounding, Stroke, Visuals};

// ─────────────────────────────────────────────────────────────────────────────
// Theme Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Every color the application paints with.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    /// Base UI colors (backgrounds, borders)
    pub base: BaseColors,
    /// Text colors for the application chrome
    pub text: TextColors,
    /// Colors of the persona card
    pub card: CardColors,
    /// UI feedback colors (success, warning, error)
    pub ui: UiColors,
}

impl ThemeColors {
    /// Create theme colors for the given theme variant.
    ///
    /// `System` follows whatever `visuals` currently reports.
    pub fn from_theme(theme: Theme, visuals: &Visuals) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
            Theme::System => {
                if visuals.dark_mode {
                    Self::dark()
                } else {
                    Self::light()
                }
            }
        }
    }

    pub fn light() -> Self {
        Self {
            base: BaseColors::light(),
            text: TextColors::light(),
            card: CardColors::light(),
            ui: UiColors::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            base: BaseColors::dark(),
            text: TextColors::dark(),
            card: CardColors::dark(),
            ui: UiColors::dark(),
        }
    }

    /// Check if this is a dark theme.
    pub fn is_dark(&self) -> bool {
        self.base.background.r() < 128
    }

    /// Convert theme colors to egui Visuals.
    pub fn to_visuals(&self) -> Visuals {
        if self.is_dark() {
            dark::create_dark_visuals()
        } else {
            light::create_light_visuals()
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Base Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Base UI colors for backgrounds and borders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseColors {
    /// Primary background color
    pub background: Color32,
    /// Secondary/elevated background (panels, toolbar)
    pub background_secondary: Color32,
    /// Tertiary background (inputs)
    pub background_tertiary: Color32,
    pub border: Color32,
    /// Subtle border color (dividers)
    pub border_subtle: Color32,
    pub hover: Color32,
    pub selected: Color32,
}

impl BaseColors {
    pub fn light() -> Self {
        Self {
            background: Color32::from_rgb(246, 247, 249),
            background_secondary: Color32::from_rgb(255, 255, 255),
            background_tertiary: Color32::from_rgb(238, 240, 243),
            border: Color32::from_rgb(200, 204, 210),
            border_subtle: Color32::from_rgb(226, 229, 234),
            hover: Color32::from_rgb(232, 235, 240),
            selected: Color32::from_rgb(220, 234, 252),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(24, 26, 30),
            background_secondary: Color32::from_rgb(31, 34, 39),
            background_tertiary: Color32::from_rgb(44, 48, 55),
            border: Color32::from_rgb(62, 67, 76),
            border_subtle: Color32::from_rgb(48, 52, 59),
            hover: Color32::from_rgb(50, 55, 63),
            selected: Color32::from_rgb(40, 60, 84),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Text colors for various contexts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextColors {
    /// Primary text color (main content)
    pub primary: Color32,
    /// Secondary text color (descriptions, labels)
    pub secondary: Color32,
    /// Muted text color (hints, placeholders)
    pub muted: Color32,
}

impl TextColors {
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(30, 32, 36),
            secondary: Color32::from_rgb(80, 84, 92),
            muted: Color32::from_rgb(125, 130, 140),
        }
    }

    pub fn dark() -> Self {
        Self {
            primary: Color32::from_rgb(225, 227, 231),
            secondary: Color32::from_rgb(180, 184, 190),
            muted: Color32::from_rgb(135, 140, 148),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Card Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Colors of the persona card.
///
/// The card keeps its dark slate surface in both themes; only its border
/// and shadow adapt to the surrounding chrome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardColors {
    /// Card surface (#272B32)
    pub background: Color32,
    pub border: Color32,
    /// Name heading, summary, bullet items
    pub text: Color32,
    /// Section titles
    pub section_title: Color32,
    pub chip_fill: Color32,
    pub chip_text: Color32,
    /// Fill of edit-mode inputs
    pub input_fill: Color32,
    pub input_text: Color32,
    pub shadow_alpha: u8,
}

impl CardColors {
    const SURFACE: Color32 = Color32::from_rgb(0x27, 0x2B, 0x32);

    pub fn light() -> Self {
        Self {
            background: Self::SURFACE,
            border: Color32::from_rgb(200, 204, 210),
            text: Color32::WHITE,
            section_title: Color32::from_rgb(210, 214, 222),
            chip_fill: Color32::WHITE,
            chip_text: Color32::BLACK,
            input_fill: Color32::WHITE,
            input_text: Color32::BLACK,
            shadow_alpha: 30,
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Self::SURFACE,
            border: Color32::from_rgb(55, 60, 68),
            text: Color32::WHITE,
            section_title: Color32::from_rgb(200, 205, 214),
            chip_fill: Color32::WHITE,
            chip_text: Color32::BLACK,
            input_fill: Color32::WHITE,
            input_text: Color32::BLACK,
            shadow_alpha: 80,
        }
    }

    /// `#rrggbb` form of a color, for the HTML export.
    pub fn css(color: Color32) -> String {
        format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// UI Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Colors for UI feedback and interactive elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiColors {
    /// Primary accent color (buttons, active elements)
    pub accent: Color32,
    pub accent_hover: Color32,
    pub success: Color32,
    pub warning: Color32,
    /// Error color (errors, destructive actions)
    pub error: Color32,
}

impl UiColors {
    pub fn light() -> Self {
        Self {
            accent: Color32::from_rgb(0, 120, 212),
            accent_hover: Color32::from_rgb(0, 100, 180),
            success: Color32::from_rgb(40, 167, 69),
            warning: Color32::from_rgb(255, 193, 7),
            error: Color32::from_rgb(220, 53, 69),
        }
    }

    pub fn dark() -> Self {
        Self {
            accent: Color32::from_rgb(100, 180, 255),
            accent_hover: Color32::from_rgb(130, 200, 255),
            success: Color32::from_rgb(75, 210, 100),
            warning: Color32::from_rgb(255, 210, 50),
            error: Color32::from_rgb(255, 100, 100),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Theme Spacing
// ─────────────────────────────────────────────────────────────────────────────

/// Spacing values for consistent layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSpacing {
    /// Extra small spacing (2px)
    pub xs: f32,
    /// Small spacing (4px)
    pub sm: f32,
    /// Medium spacing (8px)
    pub md: f32,
    /// Large spacing (16px)
    pub lg: f32,
    /// Extra large spacing (24px)
    pub xl: f32,
}

impl Default for ThemeSpacing {
    fn default() -> Self {
        Self {
            xs: 2.0,
            sm: 4.0,
            md: 8.0,
            lg: 16.0,
            xl: 24.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Visuals
// ─────────────────────────────────────────────────────────────────────────────

/// Shadow strength of windows and popups.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ShadowDepth {
    pub offset: f32,
    pub blur: f32,
    pub alpha: u8,
}

/// Fill egui's `Visuals` from a palette.
///
/// `base` is egui's own light or dark visuals; everything the palette covers
/// is overwritten.
pub(crate) fn build_visuals(colors: &ThemeColors, mut visuals: Visuals, depth: ShadowDepth) -> Visuals {
    let spacing = ThemeSpacing::default();
    let rounding = Rounding::same(spacing.sm);

    visuals.panel_fill = colors.base.background;
    visuals.window_fill = colors.base.background_secondary;
    visuals.extreme_bg_color = colors.base.background_tertiary;
    visuals.faint_bg_color = colors.base.background_secondary;

    visuals.override_text_color = None;
    visuals.warn_fg_color = colors.ui.warning;
    visuals.error_fg_color = colors.ui.error;
    visuals.hyperlink_color = colors.ui.accent;

    visuals.selection.bg_fill = colors.base.selected;
    visuals.selection.stroke = Stroke::new(1.0, colors.ui.accent);

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_fill = colors.base.background_secondary;
    widgets.noninteractive.weak_bg_fill = colors.base.background_tertiary;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors.base.border_subtle);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors.text.primary);

    widgets.inactive.bg_fill = colors.base.background_tertiary;
    widgets.inactive.weak_bg_fill = colors.base.background_tertiary;
    widgets.inactive.bg_stroke = Stroke::new(1.0, colors.base.border);
    widgets.inactive.fg_stroke = Stroke::new(1.0, colors.text.secondary);

    widgets.hovered.bg_fill = colors.base.hover;
    widgets.hovered.weak_bg_fill = colors.base.hover;
    widgets.hovered.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    widgets.hovered.fg_stroke = Stroke::new(1.5, colors.text.primary);

    widgets.active.bg_fill = colors.ui.accent;
    widgets.active.weak_bg_fill = colors.base.selected;
    widgets.active.bg_stroke = Stroke::new(1.0, colors.ui.accent_hover);
    widgets.active.fg_stroke = Stroke::new(2.0, Color32::WHITE);

    widgets.open.bg_fill = colors.base.selected;
    widgets.open.weak_bg_fill = colors.base.selected;
    widgets.open.bg_stroke = Stroke::new(1.0, colors.ui.accent);
    widgets.open.fg_stroke = Stroke::new(1.0, colors.text.primary);

    for state in [
        &mut widgets.noninteractive,
        &mut widgets.inactive,
        &mut widgets.hovered,
        &mut widgets.active,
        &mut widgets.open,
    ] {
        state.rounding = rounding;
    }

    visuals.window_rounding = Rounding::same(spacing.md);
    visuals.menu_rounding = rounding;
    visuals.window_stroke = Stroke::new(1.0, colors.base.border);
    visuals.window_shadow = Shadow {
        offset: vec2(0.0, depth.offset),
        blur: depth.blur,
        spread: 0.0,
        color: Color32::from_black_alpha(depth.alpha),
    };
    visuals.popup_shadow = Shadow {
        offset: vec2(0.0, depth.offset * 1.5),
        blur: depth.blur * 1.25,
        spread: 0.0,
        color: Color32::from_black_alpha(depth.alpha.saturating_add(20)),
    };

    visuals.button_frame = true;
    visuals.striped = false;
    visuals.interact_cursor = Some(CursorIcon::PointingHand);
    visuals.dark_mode = colors.is_dark();

    visuals
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_colors_light() {
        let colors = ThemeColors::light();
        assert!(colors.base.background.r() > 200);
        assert!(!colors.is_dark());
    }

    #[test]
    fn test_theme_colors_dark() {
        let colors = ThemeColors::dark();
        assert!(colors.base.background.r() < 50);
        assert!(colors.is_dark());
    }

    #[test]
    fn test_theme_colors_from_theme() {
        assert!(ThemeColors::from_theme(Theme::Dark, &Visuals::light()).is_dark());
        assert!(!ThemeColors::from_theme(Theme::Light, &Visuals::dark()).is_dark());
        assert!(ThemeColors::from_theme(Theme::System, &Visuals::dark()).is_dark());
        assert!(!ThemeColors::from_theme(Theme::System, &Visuals::light()).is_dark());
    }

    #[test]
    fn test_card_surface_is_constant() {
        assert_eq!(
            ThemeColors::light().card.background,
            ThemeColors::dark().card.background
        );
        assert_eq!(CardColors::css(CardColors::dark().background), "#272b32");
    }

    #[test]
    fn test_chip_contrast() {
        let card = CardColors::dark();
        assert_ne!(card.chip_fill, card.chip_text);
        assert!(card.text.r() > 200);
    }

    #[test]
    fn test_text_colors_contrast() {
        assert!(TextColors::light().primary.r() < 50);
        assert!(TextColors::dark().primary.r() > 200);
    }

    #[test]
    fn test_ui_colors_feedback() {
        let colors = UiColors::light();
        assert!(colors.success.g() > colors.success.r());
        assert!(colors.error.r() > colors.error.g());
    }

    #[test]
    fn test_to_visuals_matches_background() {
        let dark = ThemeColors::dark();
        let visuals = dark.to_visuals();
        assert!(visuals.dark_mode);
        assert_eq!(visuals.panel_fill, dark.base.background);

        let light = ThemeColors::light();
        let visuals = light.to_visuals();
        assert!(!visuals.dark_mode);
        assert_eq!(visuals.panel_fill, light.base.background);
    }
}
