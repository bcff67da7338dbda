//! Application state management for Persona Card
//!
//! This module holds the runtime state behind the UI: the persona library,
//! the editor for the selected persona, user settings and transient UI
//! state such as toasts and the error modal.

use crate::config::{load_config, save_config_silent, Settings};
use crate::error::{Error, Result};
use crate::persona::store::{
    default_library_path, load_library, save_library, set_aside_library,
};
use crate::persona::{
    parse_generated_patch, parse_generated_persona, read_persona_file, write_persona_file,
    NotifyPolicy, PersonaEditor, PersonaRecord, PersonaStore,
};
use log::{debug, info, warn};
use std::cell::Cell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// Transient UI state that is never persisted.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Whether the settings panel is open
    pub show_settings: bool,
    /// Whether to show error modal
    pub show_error_modal: bool,
    /// Error message for modal
    pub error_message: String,
    /// Temporary toast message (shown in center of status bar)
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state struct.
///
/// The library is the host-side store of every persona. The editor holds a
/// working copy of the selected one; each time it reports an edit, the copy
/// is written back to the library on the next [`AppState::sync_edits`].
pub struct AppState {
    pub settings: Settings,
    pub ui: UiState,
    settings_dirty: bool,
    library: PersonaStore,
    library_path: Option<PathBuf>,
    library_dirty: bool,
    editor: Option<PersonaEditor>,
    /// Bumped by the editor's observer on every notification.
    edit_counter: Rc<Cell<u64>>,
    synced_edits: u64,
    /// Standalone file each persona was last opened from or saved to.
    persona_files: HashMap<String, PathBuf>,
}

impl AppState {
    /// Load settings and the persona library from their default locations.
    pub fn new() -> Self {
        let settings = load_config();

        let library_path = match default_library_path() {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("Persona library disabled: {}", e);
                None
            }
        };

        Self::from_library_file(settings, library_path)
    }

    /// Load the library stored at `library_path` and build state around it.
    ///
    /// An unreadable library is moved aside before anything can overwrite
    /// it. If it cannot be moved, saving stays off for the session. Either
    /// way the error modal tells the user.
    pub fn from_library_file(settings: Settings, library_path: Option<PathBuf>) -> Self {
        let mut load_error = None;
        let (mut library, library_path) = match library_path {
            None => (PersonaStore::new(), None),
            Some(path) => match load_library(&path) {
                Ok(library) => (library, Some(path)),
                Err(e) => {
                    warn!("Failed to load persona library: {}", e);
                    match set_aside_library(&path) {
                        Ok(moved) => {
                            load_error = Some(format!(
                                "The persona library could not be read:\n{}\n\nThe old file was kept as:\n{}",
                                e,
                                moved.display()
                            ));
                            (PersonaStore::new(), Some(path))
                        }
                        Err(move_error) => {
                            warn!("Persona library saving disabled: {}", move_error);
                            load_error = Some(format!(
                                "The persona library could not be read:\n{}\n\nChanges will not be saved this session.",
                                e
                            ));
                            (PersonaStore::new(), None)
                        }
                    }
                }
            },
        };

        if library.selected_id().is_none() {
            if let Some(id) = settings.last_selected_persona.as_deref() {
                library.select(id);
            }
        }

        let mut state = Self::with_library(settings, library, library_path);
        if let Some(message) = load_error {
            state.show_error(message);
        }
        state
    }

    /// Build state around an already loaded library.
    pub fn with_library(
        settings: Settings,
        library: PersonaStore,
        library_path: Option<PathBuf>,
    ) -> Self {
        let mut state = Self {
            settings,
            ui: UiState::default(),
            settings_dirty: false,
            library,
            library_path,
            library_dirty: false,
            editor: None,
            edit_counter: Rc::new(Cell::new(0)),
            synced_edits: 0,
            persona_files: HashMap::new(),
        };
        state.open_editor_for_selection();
        info!(
            "AppState initialized with {} persona(s)",
            state.library.len()
        );
        state
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn library(&self) -> &PersonaStore {
        &self.library
    }

    pub fn editor_mut(&mut self) -> Option<&mut PersonaEditor> {
        self.editor.as_mut()
    }

    /// The persona shown on the card, if any.
    pub fn current_record(&self) -> Option<&PersonaRecord> {
        self.editor.as_ref().map(|e| e.record())
    }

    /// The file the current persona was opened from or last saved to.
    pub fn current_file_path(&self) -> Option<&PathBuf> {
        let id = &self.current_record()?.id;
        self.persona_files.get(id)
    }

    pub fn is_library_dirty(&self) -> bool {
        self.library_dirty
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editor Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    fn make_editor(
        &self,
        persona: Option<PersonaRecord>,
        initial: Option<PersonaRecord>,
    ) -> PersonaEditor {
        let counter = Rc::clone(&self.edit_counter);
        PersonaEditor::new(persona, initial)
            .with_notify_policy(self.settings.notify_policy)
            .with_observer(move || counter.set(counter.get() + 1))
    }

    fn open_editor_for_selection(&mut self) {
        let selected = self.library.selected().cloned();
        self.editor = selected.map(|record| self.make_editor(None, Some(record)));
        self.synced_edits = self.edit_counter.get();
    }

    /// Store the editor's record in the library and make it the selection.
    fn adopt_editor(&mut self, editor: PersonaEditor) -> String {
        let id = self.library.insert(editor.record().clone());
        self.library.select(&id);
        self.editor = Some(editor);
        self.synced_edits = self.edit_counter.get();
        self.library_dirty = true;
        self.remember_selection(Some(id.clone()));
        id
    }

    fn remember_selection(&mut self, id: Option<String>) {
        if self.settings.last_selected_persona != id {
            self.settings.last_selected_persona = id;
            self.mark_settings_dirty();
        }
    }

    /// Write pending editor changes back into the library.
    ///
    /// Returns `true` if the editor reported edits since the last sync.
    pub fn sync_edits(&mut self) -> bool {
        let edits = self.edit_counter.get();
        if edits == self.synced_edits {
            return false;
        }
        self.synced_edits = edits;

        let Some(editor) = self.editor.as_ref() else {
            return false;
        };
        let record = editor.record().clone();
        let id = record.id.clone();
        debug!("Syncing edits of '{}' into the library", id);
        match self.library.replace(record) {
            Ok(()) => {
                self.library_dirty = true;
                true
            }
            Err(e) => {
                // The persona left the library while it was open
                warn!("Dropping edits of '{}': {}", id, e);
                self.editor = None;
                false
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persona Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Select a persona from the library. Returns `false` for unknown ids.
    pub fn select_persona(&mut self, id: &str) -> bool {
        self.sync_edits();
        if !self.library.select(id) {
            warn!("Cannot select unknown persona '{}'", id);
            return false;
        }
        self.open_editor_for_selection();
        self.library_dirty = true;
        self.remember_selection(Some(id.to_string()));
        info!("Selected persona '{}'", id);
        true
    }

    /// Show no persona; the card falls back to its placeholder.
    pub fn clear_selection(&mut self) {
        self.sync_edits();
        self.library.clear_selection();
        self.editor = None;
        self.library_dirty = true;
        self.remember_selection(None);
    }

    /// Create a blank persona, select it and switch to edit mode.
    pub fn new_persona(&mut self) -> String {
        self.sync_edits();
        let editor = self.make_editor(None, None);
        let id = self.adopt_editor(editor);
        self.settings.card_mode = crate::config::CardMode::Edit;
        self.mark_settings_dirty();
        info!("Created persona '{}'", id);
        id
    }

    /// Open a standalone persona file into the library.
    pub fn open_persona_file(&mut self, path: &Path) -> Result<String> {
        let record = read_persona_file(path)?;
        self.sync_edits();
        let editor = self.make_editor(Some(record), None);
        let id = self.adopt_editor(editor);
        self.persona_files.insert(id.clone(), path.to_path_buf());
        self.settings.add_recent_file(path.to_path_buf());
        self.mark_settings_dirty();
        Ok(id)
    }

    /// Save the current persona to a standalone file.
    pub fn save_current_to(&mut self, path: &Path) -> Result<()> {
        self.sync_edits();
        let record = self
            .current_record()
            .ok_or_else(|| Error::Application("No persona selected".to_string()))?;
        write_persona_file(path, record)?;
        let id = record.id.clone();
        self.persona_files.insert(id, path.to_path_buf());
        self.settings.add_recent_file(path.to_path_buf());
        self.mark_settings_dirty();
        Ok(())
    }

    /// Parse generated text into a new persona and select it.
    pub fn import_generated(&mut self, text: &str) -> Result<String> {
        let record = parse_generated_persona(text)?;
        self.sync_edits();
        let editor = self.make_editor(Some(record), None);
        let id = self.adopt_editor(editor);
        info!("Imported generated persona '{}'", id);
        Ok(id)
    }

    /// Apply the sections found in generated text to the current persona.
    ///
    /// Sections missing from the text keep their current content.
    pub fn merge_generated_into_current(&mut self, text: &str) -> Result<()> {
        let patch = parse_generated_patch(text)?;
        self.sync_edits();
        let id = self
            .current_record()
            .map(|r| r.id.clone())
            .ok_or_else(|| Error::Application("No persona selected".to_string()))?;
        self.library.update(&id, &patch)?;
        self.open_editor_for_selection();
        self.library_dirty = true;
        info!("Merged generated text into persona '{}'", id);
        Ok(())
    }

    /// Remove a persona from the library.
    pub fn delete_persona(&mut self, id: &str) -> Option<PersonaRecord> {
        self.sync_edits();
        let removed = self.library.remove(id)?;
        if self.current_record().map(|r| r.id.as_str()) == Some(id) {
            self.editor = None;
        }
        self.persona_files.remove(id);
        if self.settings.last_selected_persona.as_deref() == Some(id) {
            self.remember_selection(None);
        }
        self.library_dirty = true;
        info!("Deleted persona '{}'", id);
        Some(removed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Card Settings
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_card_mode(&mut self) {
        self.settings.card_mode = self.settings.card_mode.toggle();
        self.mark_settings_dirty();
        debug!("Card mode: {:?}", self.settings.card_mode);
    }

    pub fn toggle_card_format(&mut self) {
        self.settings.card_format = self.settings.card_format.toggle();
        self.mark_settings_dirty();
        debug!("Card format: {:?}", self.settings.card_format);
    }

    pub fn set_notify_policy(&mut self, policy: NotifyPolicy) {
        self.settings.notify_policy = policy;
        self.apply_settings_to_editor();
        self.mark_settings_dirty();
    }

    /// Push settings the editor depends on into it, after the settings
    /// panel changed them in place.
    pub fn apply_settings_to_editor(&mut self) {
        let policy = self.settings.notify_policy;
        if let Some(editor) = self.editor.as_mut() {
            editor.set_notify_policy(policy);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Persistence
    // ─────────────────────────────────────────────────────────────────────────

    /// Mark settings as modified (will be saved on next save_settings_if_dirty call).
    pub fn mark_settings_dirty(&mut self) {
        self.settings_dirty = true;
    }

    /// Save settings to config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    /// Save the persona library if it changed. Returns `true` if saved.
    pub fn save_library_if_dirty(&mut self) -> bool {
        self.sync_edits();
        if !self.library_dirty {
            return false;
        }
        let Some(path) = self.library_path.as_deref() else {
            return false;
        };
        match save_library(path, &self.library) {
            Ok(()) => {
                self.library_dirty = false;
                true
            }
            Err(e) => {
                warn!("Failed to save persona library: {}", e);
                false
            }
        }
    }

    /// Flush everything before the app closes.
    pub fn shutdown(&mut self) {
        self.save_library_if_dirty();
        self.settings_dirty = true;
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // UI State Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Toggle the settings panel.
    pub fn toggle_settings(&mut self) {
        self.ui.show_settings = !self.ui.show_settings;
    }

    /// Show an error in a modal dialog.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.ui.error_message = message.into();
        self.ui.show_error_modal = true;
    }

    /// Dismiss the error modal.
    pub fn dismiss_error(&mut self) {
        self.ui.show_error_modal = false;
        self.ui.error_message.clear();
    }

    /// Show a temporary toast message (disappears after duration).
    ///
    /// `current_time` should be the current app time in seconds.
    /// `duration` is how long to show the message in seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Update toast state - clears expired toasts.
    ///
    /// Call this each frame with the current time.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
