//! Toolbar for Persona Card
//!
//! A single row of icon buttons grouped into file, card, export and settings
//! controls. The persona dropdown sits at the left edge.

use crate::config::{CardFormat, CardMode};
use crate::theme::ThemeColors;
use eframe::egui::{self, Color32, Response, RichText, Ui, Vec2};

/// Height of the toolbar.
pub const TOOLBAR_HEIGHT: f32 = 40.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(32.0, 28.0);

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    // File operations
    /// Create a blank persona
    New,
    /// Open a persona JSON file
    Open,
    Save,
    SaveAs,
    /// Paste generated text and import it
    Import,
    /// Delete the selected persona (asks first)
    Delete,

    // Card operations
    /// Toggle between View and Edit mode
    ToggleMode,
    /// Toggle between Card and Bullet format
    ToggleFormat,
    /// Fuzzy persona finder (Ctrl+P)
    FindPersona,

    // Export operations
    ExportHtml,
    CopyAsHtml,

    // Settings
    CycleTheme,
    OpenSettings,
}

/// What the toolbar needs to know to draw its buttons.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarState<'a> {
    pub mode: CardMode,
    pub format: CardFormat,
    /// Whether a persona is currently open.
    pub has_persona: bool,
    pub theme_icon: &'static str,
    pub theme_tooltip: &'a str,
}

/// Render the toolbar buttons and return any triggered action.
pub fn show_toolbar(ui: &mut Ui, colors: &ThemeColors, state: ToolbarState<'_>) -> Option<ToolbarAction> {
    let mut action = None;
    let is_dark = colors.is_dark();
    let separator_color = colors.base.border_subtle;

    ui.horizontal_centered(|ui| {
        ui.spacing_mut().item_spacing.x = 2.0;

        // File group
        if icon_button(ui, "📄", "New Persona (Ctrl+N)", true, is_dark).clicked() {
            action = Some(ToolbarAction::New);
        }
        if icon_button(ui, "📂", "Open Persona File (Ctrl+O)", true, is_dark).clicked() {
            action = Some(ToolbarAction::Open);
        }
        if icon_button(ui, "💾", "Save (Ctrl+S)", state.has_persona, is_dark).clicked() {
            action = Some(ToolbarAction::Save);
        }
        if icon_button(ui, "📑", "Save As (Ctrl+Shift+S)", state.has_persona, is_dark).clicked()
        {
            action = Some(ToolbarAction::SaveAs);
        }
        if icon_button(ui, "📥", "Import Generated Text (Ctrl+I)", true, is_dark).clicked() {
            action = Some(ToolbarAction::Import);
        }
        if icon_button(ui, "🗑", "Delete Persona", state.has_persona, is_dark).clicked() {
            action = Some(ToolbarAction::Delete);
        }

        ui.add_space(4.0);
        vertical_separator(ui, separator_color, 20.0);
        ui.add_space(4.0);

        // Card group
        let mode_tooltip = match state.mode {
            CardMode::View => "Switch to Edit mode (Ctrl+E)",
            CardMode::Edit => "Switch to View mode (Ctrl+E)",
        };
        if toggle_button(
            ui,
            state.mode.icon(),
            mode_tooltip,
            state.mode == CardMode::Edit,
            colors,
        )
        .clicked()
        {
            action = Some(ToolbarAction::ToggleMode);
        }

        let format_tooltip = match state.format {
            CardFormat::Card => "Show lists as bullets (Ctrl+B)",
            CardFormat::Bullet => "Show lists as chips (Ctrl+B)",
        };
        if toggle_button(
            ui,
            "☰",
            format_tooltip,
            state.format == CardFormat::Bullet,
            colors,
        )
        .clicked()
        {
            action = Some(ToolbarAction::ToggleFormat);
        }

        if icon_button(ui, "🔍", "Find Persona (Ctrl+P)", true, is_dark).clicked() {
            action = Some(ToolbarAction::FindPersona);
        }

        ui.add_space(4.0);
        vertical_separator(ui, separator_color, 20.0);
        ui.add_space(4.0);

        // Export group
        if icon_button(ui, "🌐", "Export as HTML", state.has_persona, is_dark).clicked() {
            action = Some(ToolbarAction::ExportHtml);
        }
        if icon_button(ui, "📋", "Copy as HTML", state.has_persona, is_dark).clicked() {
            action = Some(ToolbarAction::CopyAsHtml);
        }

        // Settings group, right-aligned
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if icon_button(ui, "⚙", "Settings (Ctrl+,)", true, is_dark).clicked() {
                action = Some(ToolbarAction::OpenSettings);
            }
            if icon_button(ui, state.theme_icon, state.theme_tooltip, true, is_dark).clicked() {
                action = Some(ToolbarAction::CycleTheme);
            }
        });
    });

    action
}

/// Render an icon button with hover highlighting.
fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, enabled: bool, is_dark: bool) -> Response {
    let text_color = if enabled {
        if is_dark {
            Color32::from_rgb(220, 220, 220)
        } else {
            Color32::from_rgb(50, 50, 50)
        }
    } else if is_dark {
        Color32::from_rgb(100, 100, 100)
    } else {
        Color32::from_rgb(160, 160, 160)
    };

    let hover_bg = if is_dark {
        Color32::from_rgb(60, 60, 60)
    } else {
        Color32::from_rgb(220, 220, 220)
    };

    let btn = ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if btn.hovered() && enabled {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), hover_bg);
    }

    // The gear glyph sits higher than the emoji
    let y_offset = match icon {
        "⚙" => 2.0,
        _ => 0.0,
    };
    let icon_pos = egui::pos2(btn.rect.center().x, btn.rect.center().y + y_offset);

    ui.painter().text(
        icon_pos,
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(16.0),
        text_color,
    );

    btn.on_hover_text(tooltip)
}

/// Icon button that stays highlighted while its option is on.
fn toggle_button(
    ui: &mut Ui,
    icon: &str,
    tooltip: &str,
    active: bool,
    colors: &ThemeColors,
) -> Response {
    let btn = ui.add(
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if active {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), colors.base.selected);
    } else if btn.hovered() {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), colors.base.hover);
    }

    ui.painter().text(
        btn.rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(16.0),
        colors.text.primary,
    );

    btn.on_hover_text(tooltip)
}

/// Draw a vertical separator line.
fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}
