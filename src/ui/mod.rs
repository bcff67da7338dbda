//! UI components for Persona Card
//!
//! Widgets and panels drawn by the app shell.

mod dialogs;
mod persona_card;
mod picker;
mod settings;
mod tag_input;
mod toolbar;

pub use dialogs::{PersonaDialog, PersonaDialogResult};
pub use persona_card::{CardEdit, PersonaCard};
pub use picker::PersonaPicker;
pub use settings::SettingsPanel;
pub use toolbar::{show_toolbar, ToolbarAction, ToolbarState, TOOLBAR_HEIGHT};
