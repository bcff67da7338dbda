//! Main application module for Persona Card
//!
//! This module implements the eframe App trait for the main application,
//! wiring the toolbar, picker, card and dialogs to the application state.

// - option_map_unit_fn: Keyboard handling closure pattern is clearer than suggested alternative
#![allow(clippy::option_map_unit_fn)]

use crate::config::{CardMode, Settings, WindowSize};
use crate::export::{copy_card_to_clipboard, export_card_to_file};
use crate::files::dialogs::{
    export_html_dialog, open_persona_dialog, save_persona_dialog, suggested_file_stem,
};
use crate::render::{render_card, CardLayout};
use crate::state::AppState;
use crate::theme::ThemeManager;
use crate::ui::{
    show_toolbar, CardEdit, PersonaCard, PersonaDialog, PersonaDialogResult, PersonaPicker,
    SettingsPanel, ToolbarAction, ToolbarState, TOOLBAR_HEIGHT,
};
use eframe::egui;
use log::{debug, info, warn};

/// Application name shown in the title bar.
const APP_NAME: &str = "Persona Card";

/// Keyboard shortcut actions that need to be deferred.
///
/// These actions are detected in the input handling closure and executed
/// afterwards to avoid borrow conflicts.
#[derive(Debug, Clone, Copy)]
enum KeyboardAction {
    /// New persona (Ctrl+N)
    New,
    /// Open persona file (Ctrl+O)
    Open,
    /// Save current persona (Ctrl+S)
    Save,
    /// Save As dialog (Ctrl+Shift+S)
    SaveAs,
    /// Toggle View/Edit mode (Ctrl+E)
    ToggleMode,
    /// Toggle Card/Bullet format (Ctrl+B)
    ToggleFormat,
    /// Import generated text (Ctrl+I)
    Import,
    /// Fuzzy persona finder (Ctrl+P)
    FindPersona,
    /// Open settings panel (Ctrl+,)
    OpenSettings,
}

/// The main application struct that holds all state and implements eframe::App.
pub struct PersonaCardApp {
    /// Central application state
    state: AppState,
    theme_manager: ThemeManager,
    settings_panel: SettingsPanel,
    picker: PersonaPicker,
    card: PersonaCard,
    /// Active import or delete dialog
    persona_dialog: Option<PersonaDialog>,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Application start time for timing toast messages
    start_time: std::time::Instant,
}

impl PersonaCardApp {
    /// Create the app, loading settings and the persona library and
    /// applying the saved theme.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing {}", APP_NAME);

        let state = AppState::new();

        let mut theme_manager = ThemeManager::new(state.settings.theme);
        theme_manager.apply(&cc.egui_ctx);
        info!("Applied initial theme: {:?}", state.settings.theme);

        Self {
            state,
            theme_manager,
            settings_panel: SettingsPanel::new(),
            picker: PersonaPicker::new(),
            card: PersonaCard::new(),
            persona_dialog: None,
            last_window_size: None,
            start_time: std::time::Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn toast(&mut self, message: impl Into<String>, duration: f64) {
        let time = self.get_app_time();
        self.state.show_toast(message, time, duration);
    }

    /// Track the window size so it is restored on the next start.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().inner_rect) else {
            return;
        };
        let size = rect.size();
        let changed = self
            .last_window_size
            .map(|s| (s - size).length() > 1.0)
            .unwrap_or(true);
        if !changed {
            return;
        }

        self.last_window_size = Some(size);
        let (maximized, position) = ctx.input(|i| {
            let viewport = i.viewport();
            (
                viewport.maximized.unwrap_or(false),
                viewport.outer_rect.map(|r| r.min),
            )
        });
        let previous = &self.state.settings.window_size;
        self.state.settings.window_size = WindowSize {
            width: size.x,
            height: size.y,
            x: position.map(|p| p.x).or(previous.x),
            y: position.map(|p| p.y).or(previous.y),
            maximized,
        };
        debug!("Window size updated: {}x{}", size.x, size.y);
    }

    /// "Name - Persona Card", or just the app name with no card open.
    fn window_title(&self) -> String {
        match self.state.current_record() {
            Some(record) => format!("{} - {}", record.display_name(), APP_NAME),
            None => APP_NAME.to_string(),
        }
    }

    /// Layout of the card as it is currently shown.
    fn current_layout(&self) -> CardLayout {
        render_card(
            self.state.current_record(),
            self.state.settings.card_mode,
            self.state.settings.card_format,
        )
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    fn render_ui(&mut self, ctx: &egui::Context) {
        let colors = self.theme_manager.colors(ctx);
        let theme_tooltip = self.theme_manager.tooltip(ctx);

        // Toolbar with the persona dropdown
        let mut toolbar_action = None;
        let mut picked = None;
        egui::TopBottomPanel::top("toolbar")
            .exact_height(TOOLBAR_HEIGHT)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    picked = Some(self.picker.show_dropdown(ui, self.state.library()));
                    ui.add_space(8.0);
                    toolbar_action = show_toolbar(
                        ui,
                        &colors,
                        ToolbarState {
                            mode: self.state.settings.card_mode,
                            format: self.state.settings.card_format,
                            has_persona: self.state.current_record().is_some(),
                            theme_icon: self.theme_manager.icon(),
                            theme_tooltip: &theme_tooltip,
                        },
                    );
                });
            });

        // Status bar
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let location = self
                    .state
                    .current_file_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| {
                        if self.state.current_record().is_some() {
                            "Library".to_string()
                        } else {
                            "No card selected".to_string()
                        }
                    });
                ui.label(egui::RichText::new(location).small());

                if let Some(toast) = &self.state.ui.toast_message {
                    ui.separator();
                    ui.label(egui::RichText::new(toast).small().color(colors.ui.accent));
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} · {} · {} persona(s)",
                            self.state.settings.card_mode.label(),
                            self.state.settings.card_format.label(),
                            self.state.library().len()
                        ))
                        .small()
                        .color(colors.text.muted),
                    );
                });
            });
        });

        // Card
        let layout = self.current_layout();
        let font_size = self.state.settings.font_size;
        let mut edits = Vec::new();
        egui::CentralPanel::default().show(ctx, |ui| {
            edits = self.card.show(ui, &layout, &colors.card, font_size);
        });
        self.apply_card_edits(edits);

        // Fuzzy finder overlay
        let finder = self
            .picker
            .show_finder(ctx, self.state.library(), colors.is_dark());
        if let Some(id) = finder.selected {
            self.select_persona(&id);
        }

        if let Some(output) = picked {
            if let Some(id) = output.selected {
                self.select_persona(&id);
            } else if output.cleared {
                self.state.clear_selection();
                self.card.reset_inputs();
            }
        }

        if let Some(action) = toolbar_action {
            self.handle_toolbar_action(action, ctx);
        }
    }

    /// Merge the edits made on the card into the editor.
    fn apply_card_edits(&mut self, edits: Vec<CardEdit>) {
        if edits.is_empty() {
            return;
        }
        let Some(editor) = self.state.editor_mut() else {
            return;
        };
        for edit in edits {
            match edit {
                CardEdit::Name(name) => {
                    editor.set_name(name);
                }
                CardEdit::Summary(summary) => {
                    editor.set_summary(summary);
                }
                CardEdit::List(field, update) => {
                    editor.apply_edit(field, update);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persona Actions
    // ─────────────────────────────────────────────────────────────────────────

    fn select_persona(&mut self, id: &str) {
        if self.state.select_persona(id) {
            self.card.reset_inputs();
        }
    }

    fn handle_new_persona(&mut self) {
        self.state.new_persona();
        self.card.reset_inputs();
        self.toast("New persona created", 2.0);
    }

    /// Handle the "Open" action: pick a persona file and add it to the library.
    fn handle_open_file(&mut self) {
        let initial_dir = self
            .state
            .settings
            .recent_files
            .first()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf());

        let Some(path) = open_persona_dialog(initial_dir.as_ref()) else {
            debug!("Open dialog cancelled");
            return;
        };

        info!("Opening persona file: {}", path.display());
        match self.state.open_persona_file(&path) {
            Ok(_) => {
                self.card.reset_inputs();
                self.toast(format!("Opened: {}", path.display()), 2.0);
            }
            Err(e) => {
                warn!("Failed to open {}: {}", path.display(), e);
                self.state
                    .show_error(format!("Failed to open {}:\n{}", path.display(), e));
            }
        }
    }

    /// Handle the "Save" action.
    ///
    /// Saves to the file the persona came from; falls back to "Save As".
    fn handle_save_file(&mut self) {
        let Some(path) = self.state.current_file_path().cloned() else {
            self.handle_save_as_file();
            return;
        };

        match self.state.save_current_to(&path) {
            Ok(()) => {
                self.state.save_library_if_dirty();
                self.toast(format!("Saved: {}", path.display()), 3.0);
            }
            Err(e) => {
                warn!("Failed to save persona: {}", e);
                self.state
                    .show_error(format!("Failed to save persona:\n{}", e));
            }
        }
    }

    fn handle_save_as_file(&mut self) {
        let Some(record) = self.state.current_record() else {
            self.toast("No persona to save", 2.0);
            return;
        };
        let default_name = format!("{}.json", suggested_file_stem(&record.name));

        let initial_dir = self
            .state
            .current_file_path()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
            .or_else(|| {
                self.state
                    .settings
                    .recent_files
                    .first()
                    .and_then(|p| p.parent())
                    .map(|p| p.to_path_buf())
            });

        let Some(path) = save_persona_dialog(initial_dir.as_ref(), Some(&default_name)) else {
            debug!("Save dialog cancelled");
            return;
        };

        info!("Saving persona as: {}", path.display());
        match self.state.save_current_to(&path) {
            Ok(()) => {
                self.state.save_library_if_dirty();
                self.toast(format!("Saved: {}", path.display()), 3.0);
            }
            Err(e) => {
                warn!("Failed to save persona: {}", e);
                self.state
                    .show_error(format!("Failed to save persona:\n{}", e));
            }
        }
    }

    fn open_import_dialog(&mut self) {
        let merge_target = self
            .state
            .current_record()
            .map(|r| r.display_name().to_string());
        self.persona_dialog = Some(PersonaDialog::import_text(merge_target));
    }

    fn handle_merge(&mut self, text: &str) {
        match self.state.merge_generated_into_current(text) {
            Ok(()) => {
                self.persona_dialog = None;
                self.card.reset_inputs();
                self.toast("Generated text merged into card", 2.0);
            }
            Err(e) => {
                warn!("Merge failed: {}", e);
                if let Some(dialog) = self.persona_dialog.as_mut() {
                    dialog.set_error(e.to_string());
                }
            }
        }
    }

    fn handle_import(&mut self, text: &str) {
        match self.state.import_generated(text) {
            Ok(_) => {
                self.persona_dialog = None;
                self.card.reset_inputs();
                self.toast("Persona imported", 2.0);
            }
            Err(e) => {
                warn!("Import failed: {}", e);
                if let Some(dialog) = self.persona_dialog.as_mut() {
                    dialog.set_error(e.to_string());
                }
            }
        }
    }

    fn handle_delete_request(&mut self) {
        if let Some(record) = self.state.current_record() {
            self.persona_dialog = Some(PersonaDialog::delete_confirm(
                record.id.clone(),
                record.display_name(),
            ));
        }
    }

    fn handle_toggle_mode(&mut self) {
        self.state.toggle_card_mode();
        if self.state.settings.card_mode == CardMode::View {
            self.card.reset_inputs();
        }
    }

    /// Cycle through available themes (Light -> Dark -> System).
    fn handle_cycle_theme(&mut self, ctx: &egui::Context) {
        let new_theme = self.theme_manager.cycle();
        self.theme_manager.apply(ctx);

        self.state.settings.theme = new_theme;
        self.state.mark_settings_dirty();

        info!("Theme cycled to: {:?}", new_theme);
    }

    /// Export the view-mode card to an HTML file.
    fn handle_export_html(&mut self, ctx: &egui::Context) {
        let Some(record) = self.state.current_record() else {
            self.toast("No card to export", 2.0);
            return;
        };
        let title = record.display_name().to_string();
        let default_name = format!("{}.html", suggested_file_stem(&record.name));
        let layout = render_card(
            Some(record),
            CardMode::View,
            self.state.settings.card_format,
        );

        let initial_dir = self
            .state
            .settings
            .last_export_directory
            .clone()
            .or_else(|| {
                self.state
                    .settings
                    .recent_files
                    .first()
                    .and_then(|p| p.parent())
                    .map(|p| p.to_path_buf())
            });

        let Some(path) = export_html_dialog(initial_dir.as_ref(), &default_name) else {
            debug!("Export dialog cancelled");
            return;
        };

        let theme_colors = self.theme_manager.colors(ctx);
        match export_card_to_file(&path, &layout, &title, &theme_colors) {
            Ok(()) => {
                if let Some(parent) = path.parent() {
                    self.state.settings.last_export_directory = Some(parent.to_path_buf());
                    self.state.mark_settings_dirty();
                }

                self.toast(format!("Exported to {}", path.display()), 2.5);

                if self.state.settings.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!("Failed to open exported file: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!("Failed to export HTML: {}", e);
                self.toast(format!("Export failed: {}", e), 3.0);
            }
        }
    }

    /// Copy the view-mode card to the clipboard.
    fn handle_copy_as_html(&mut self) {
        let Some(record) = self.state.current_record() else {
            self.toast("No card to copy", 2.0);
            return;
        };
        let layout = render_card(
            Some(record),
            CardMode::View,
            self.state.settings.card_format,
        );

        match copy_card_to_clipboard(&layout) {
            Ok(()) => {
                info!("Copied card to clipboard");
                self.toast("Card copied to clipboard", 2.0);
            }
            Err(e) => {
                warn!("Failed to copy card to clipboard: {}", e);
                self.toast(format!("Copy failed: {}", e), 3.0);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Input
    // ─────────────────────────────────────────────────────────────────────────

    /// Handle keyboard shortcuts.
    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            // Ctrl+Shift+S: Save As (check first since it's more specific)
            if i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+Shift+S (Save As)");
                return Some(KeyboardAction::SaveAs);
            }

            if i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::S) {
                debug!("Keyboard shortcut: Ctrl+S (Save)");
                return Some(KeyboardAction::Save);
            }

            if i.modifiers.ctrl && i.key_pressed(egui::Key::O) {
                debug!("Keyboard shortcut: Ctrl+O (Open)");
                return Some(KeyboardAction::Open);
            }

            if i.modifiers.ctrl && i.key_pressed(egui::Key::N) {
                debug!("Keyboard shortcut: Ctrl+N (New)");
                return Some(KeyboardAction::New);
            }

            if i.modifiers.ctrl && i.key_pressed(egui::Key::E) {
                debug!("Keyboard shortcut: Ctrl+E (Toggle Mode)");
                return Some(KeyboardAction::ToggleMode);
            }

            if i.modifiers.ctrl && i.key_pressed(egui::Key::B) {
                debug!("Keyboard shortcut: Ctrl+B (Toggle Format)");
                return Some(KeyboardAction::ToggleFormat);
            }

            if i.modifiers.ctrl && i.key_pressed(egui::Key::I) {
                debug!("Keyboard shortcut: Ctrl+I (Import)");
                return Some(KeyboardAction::Import);
            }

            if i.modifiers.ctrl && i.key_pressed(egui::Key::P) {
                debug!("Keyboard shortcut: Ctrl+P (Find Persona)");
                return Some(KeyboardAction::FindPersona);
            }

            if i.modifiers.ctrl && i.key_pressed(egui::Key::Comma) {
                debug!("Keyboard shortcut: Ctrl+, (Settings)");
                return Some(KeyboardAction::OpenSettings);
            }

            None
        })
        .map(|action| match action {
            KeyboardAction::New => self.handle_new_persona(),
            KeyboardAction::Open => self.handle_open_file(),
            KeyboardAction::Save => self.handle_save_file(),
            KeyboardAction::SaveAs => self.handle_save_as_file(),
            KeyboardAction::ToggleMode => self.handle_toggle_mode(),
            KeyboardAction::ToggleFormat => self.state.toggle_card_format(),
            KeyboardAction::Import => self.open_import_dialog(),
            KeyboardAction::FindPersona => self.picker.toggle(),
            KeyboardAction::OpenSettings => self.state.toggle_settings(),
        });
    }

    fn handle_toolbar_action(&mut self, action: ToolbarAction, ctx: &egui::Context) {
        match action {
            ToolbarAction::New => {
                debug!("Toolbar: New persona");
                self.handle_new_persona();
            }
            ToolbarAction::Open => {
                debug!("Toolbar: Open file");
                self.handle_open_file();
            }
            ToolbarAction::Save => {
                debug!("Toolbar: Save");
                self.handle_save_file();
            }
            ToolbarAction::SaveAs => {
                debug!("Toolbar: Save As");
                self.handle_save_as_file();
            }
            ToolbarAction::Import => {
                debug!("Toolbar: Import generated text");
                self.open_import_dialog();
            }
            ToolbarAction::Delete => {
                debug!("Toolbar: Delete persona");
                self.handle_delete_request();
            }
            ToolbarAction::ToggleMode => {
                debug!("Toolbar: Toggle mode");
                self.handle_toggle_mode();
            }
            ToolbarAction::ToggleFormat => {
                debug!("Toolbar: Toggle format");
                self.state.toggle_card_format();
            }
            ToolbarAction::FindPersona => {
                debug!("Toolbar: Find persona");
                self.picker.toggle();
            }
            ToolbarAction::ExportHtml => {
                debug!("Toolbar: Export HTML");
                self.handle_export_html(ctx);
            }
            ToolbarAction::CopyAsHtml => {
                debug!("Toolbar: Copy as HTML");
                self.handle_copy_as_html();
            }
            ToolbarAction::CycleTheme => {
                debug!("Toolbar: Cycle theme");
                self.handle_cycle_theme(ctx);
            }
            ToolbarAction::OpenSettings => {
                debug!("Toolbar: Open settings");
                self.state.toggle_settings();
            }
        }
    }

    /// Render dialog windows.
    fn render_dialogs(&mut self, ctx: &egui::Context) {
        let is_dark = ctx.style().visuals.dark_mode;

        // Import / delete dialog
        if let Some(dialog) = self.persona_dialog.as_mut() {
            match dialog.show(ctx, is_dark) {
                PersonaDialogResult::None => {}
                PersonaDialogResult::Cancelled => self.persona_dialog = None,
                PersonaDialogResult::Import(text) => self.handle_import(&text),
                PersonaDialogResult::Merge(text) => self.handle_merge(&text),
                PersonaDialogResult::Delete(id) => {
                    self.persona_dialog = None;
                    if let Some(removed) = self.state.delete_persona(&id) {
                        self.card.reset_inputs();
                        self.toast(format!("Deleted: {}", removed.display_name()), 2.0);
                    }
                }
            }
        }

        // Error modal
        if self.state.ui.show_error_modal {
            let mut dismissed = false;
            let message = &self.state.ui.error_message;
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(egui::RichText::new("⚠").size(24.0));
                    ui.label(message.as_str());
                    ui.separator();
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if dismissed {
                self.state.dismiss_error();
            }
        }

        // Settings panel
        if self.state.ui.show_settings {
            let output = self
                .settings_panel
                .show(ctx, &mut self.state.settings, is_dark);

            if output.changed {
                // Apply theme changes immediately
                self.theme_manager.set_theme(self.state.settings.theme);
                self.theme_manager.apply(ctx);
                self.state.apply_settings_to_editor();
                self.state.mark_settings_dirty();
            }

            if output.reset_requested {
                let last_selected = self.state.settings.last_selected_persona.take();
                self.state.settings = Settings {
                    last_selected_persona: last_selected,
                    ..Settings::default()
                };
                self.theme_manager.set_theme(self.state.settings.theme);
                self.theme_manager.apply(ctx);
                self.state.apply_settings_to_editor();
                self.state.mark_settings_dirty();

                self.toast("Settings reset to defaults", 2.0);
            }

            if output.close_requested {
                self.state.ui.show_settings = false;
            }
        }
    }
}

impl eframe::App for PersonaCardApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme if needed (handles System theme changes)
        self.theme_manager.apply_if_needed(ctx);

        // Update toast message (clear if expired)
        let current_time = self.get_app_time();
        self.state.update_toast(current_time);

        let title = self.window_title();
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(title));

        self.update_window_state(ctx);

        self.render_ui(ctx);

        // Card edits reported by the editor go back into the library
        self.state.sync_edits();

        self.render_dialogs(ctx);

        // Shortcuts are ignored while a modal owns the keyboard
        if self.persona_dialog.is_none() && !self.state.ui.show_settings {
            self.handle_keyboard_shortcuts(ctx);
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }

    /// Save persistent state.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        debug!("Saving application state");
        self.state.save_library_if_dirty();
        self.state.save_settings_if_dirty();
    }

    /// Auto-save interval in seconds.
    fn auto_save_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(30)
    }
}
