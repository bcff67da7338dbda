//! Modal dialogs for persona operations.
//!
//! Importing generated text and confirming a delete both need a modal step
//! before the library changes.

use eframe::egui::{self, Color32, Key, RichText};

/// State for an active persona dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum PersonaDialog {
    /// Paste text produced by the generation service
    ImportText {
        input: String,
        error_message: Option<String>,
        /// Name of the card the text can be merged into
        merge_target: Option<String>,
    },
    /// Confirm deletion of a persona from the library
    DeleteConfirm { id: String, name: String },
}

/// Result from showing a persona dialog.
#[derive(Debug, Clone, PartialEq)]
pub enum PersonaDialogResult {
    /// No action taken (dialog still open)
    None,
    Cancelled,
    /// Parse and import the given text
    Import(String),
    /// Parse the given text and merge it into the current card
    Merge(String),
    /// Delete the persona with the given id
    Delete(String),
}

impl PersonaDialog {
    /// Import dialog. With `merge_target` set it also offers to merge the
    /// text into that card.
    pub fn import_text(merge_target: Option<String>) -> Self {
        Self::ImportText {
            input: String::new(),
            error_message: None,
            merge_target,
        }
    }

    pub fn delete_confirm(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DeleteConfirm {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Show an error under the input. Only the import dialog has one.
    pub fn set_error(&mut self, message: impl Into<String>) {
        if let PersonaDialog::ImportText { error_message, .. } = self {
            *error_message = Some(message.into());
        }
    }

    /// Show the dialog and return the result.
    pub fn show(&mut self, ctx: &egui::Context, is_dark: bool) -> PersonaDialogResult {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            return PersonaDialogResult::Cancelled;
        }

        let bg_color = if is_dark {
            Color32::from_rgb(40, 40, 45)
        } else {
            Color32::from_rgb(250, 250, 250)
        };
        let border_color = if is_dark {
            Color32::from_rgb(70, 70, 80)
        } else {
            Color32::from_rgb(180, 180, 190)
        };
        let frame = egui::Frame::window(&ctx.style())
            .fill(bg_color)
            .stroke(egui::Stroke::new(1.0, border_color))
            .rounding(8.0);

        match self {
            PersonaDialog::ImportText {
                input,
                error_message,
                merge_target,
            } => show_import_dialog(ctx, frame, input, error_message, merge_target.as_deref()),
            PersonaDialog::DeleteConfirm { id, name } => show_delete_dialog(ctx, frame, id, name),
        }
    }
}

fn show_import_dialog(
    ctx: &egui::Context,
    frame: egui::Frame,
    input: &mut String,
    error_message: &mut Option<String>,
    merge_target: Option<&str>,
) -> PersonaDialogResult {
    let mut result = PersonaDialogResult::None;

    egui::Window::new("📥 Import Generated Persona")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(frame)
        .show(ctx, |ui| {
            ui.set_min_width(480.0);

            ui.add_space(8.0);
            ui.label("Paste the generated persona text:");
            ui.label(
                RichText::new("Sections are marked with <tag>…</tag> or \"- header:\" lines.")
                    .small()
                    .weak(),
            );
            ui.add_space(4.0);

            let response = ui.add(
                egui::TextEdit::multiline(input)
                    .code_editor()
                    .desired_rows(14)
                    .desired_width(460.0),
            );
            if input.is_empty() {
                response.request_focus();
            }
            if response.changed() {
                *error_message = None;
            }

            if let Some(error) = error_message {
                ui.add_space(4.0);
                ui.colored_label(Color32::from_rgb(220, 80, 80), error.as_str());
            }

            ui.add_space(12.0);

            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let import_enabled = !input.trim().is_empty();
                    if ui
                        .add_enabled(import_enabled, egui::Button::new("Import"))
                        .on_hover_text("Add as a new card")
                        .clicked()
                    {
                        result = PersonaDialogResult::Import(input.clone());
                    }

                    if let Some(name) = merge_target {
                        if ui
                            .add_enabled(
                                import_enabled,
                                egui::Button::new(format!("Merge into {}", name)),
                            )
                            .on_hover_text("Replace only the sections found in the text")
                            .clicked()
                        {
                            result = PersonaDialogResult::Merge(input.clone());
                        }
                    }

                    ui.add_space(8.0);

                    if ui.button("Cancel").clicked() {
                        result = PersonaDialogResult::Cancelled;
                    }
                });
            });

            ui.add_space(4.0);
        });

    result
}

fn show_delete_dialog(
    ctx: &egui::Context,
    frame: egui::Frame,
    id: &str,
    name: &str,
) -> PersonaDialogResult {
    let mut result = PersonaDialogResult::None;

    egui::Window::new("🗑️ Confirm Delete")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .frame(frame)
        .show(ctx, |ui| {
            ui.set_min_width(350.0);

            ui.add_space(8.0);
            ui.label("Are you sure you want to delete this persona?");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label(RichText::new("🪪").size(16.0));
                ui.label(RichText::new(name).strong());
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let delete_button =
                        egui::Button::new(RichText::new("Delete").color(Color32::WHITE))
                            .fill(Color32::from_rgb(200, 60, 60));

                    if ui.add(delete_button).clicked()
                        || ui.input(|i| i.key_pressed(Key::Enter))
                    {
                        result = PersonaDialogResult::Delete(id.to_string());
                    }

                    ui.add_space(8.0);

                    if ui.button("Cancel").clicked() {
                        result = PersonaDialogResult::Cancelled;
                    }
                });
            });

            ui.add_space(4.0);
        });

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_dialog_starts_empty() {
        match PersonaDialog::import_text(None) {
            PersonaDialog::ImportText {
                input,
                error_message,
                merge_target,
            } => {
                assert!(input.is_empty());
                assert!(error_message.is_none());
                assert!(merge_target.is_none());
            }
            other => panic!("Expected ImportText, got {:?}", other),
        }
    }

    #[test]
    fn test_set_error_on_import_dialog() {
        let mut dialog = PersonaDialog::import_text(Some("Ada".to_string()));
        dialog.set_error("No sections found");
        assert_eq!(
            dialog,
            PersonaDialog::ImportText {
                input: String::new(),
                error_message: Some("No sections found".to_string()),
                merge_target: Some("Ada".to_string()),
            }
        );
    }

    #[test]
    fn test_set_error_ignored_on_delete_dialog() {
        let mut dialog = PersonaDialog::delete_confirm("p1", "Ada");
        dialog.set_error("ignored");
        assert_eq!(dialog, PersonaDialog::delete_confirm("p1", "Ada"));
    }
}
