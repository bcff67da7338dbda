//! Persona selection: the dropdown above the card and a Ctrl+P fuzzy finder.

#![allow(clippy::collapsible_if)]

use crate::persona::{PersonaRecord, PersonaStore};
use eframe::egui::{self, Color32, Key, RichText, Sense, Ui};

/// Maximum number of results shown by the finder.
const MAX_RESULTS: usize = 15;

/// What the user picked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PickerOutput {
    /// Persona to select.
    pub selected: Option<String>,
    /// The user chose "no card".
    pub cleared: bool,
    /// The finder was closed.
    pub closed: bool,
}

/// Dropdown and finder state.
#[derive(Debug, Clone, Default)]
pub struct PersonaPicker {
    is_open: bool,
    query: String,
    selected_index: usize,
}

impl PersonaPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn open(&mut self) {
        self.is_open = true;
        self.query.clear();
        self.selected_index = 0;
    }

    pub fn close(&mut self) {
        self.is_open = false;
        self.query.clear();
        self.selected_index = 0;
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    /// The combo box listing every persona in library order.
    pub fn show_dropdown(&mut self, ui: &mut Ui, store: &PersonaStore) -> PickerOutput {
        let mut output = PickerOutput::default();
        let current = store
            .selected()
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| "Select a card…".to_string());

        egui::ComboBox::from_id_source("persona_picker")
            .selected_text(current)
            .width(240.0)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_label(store.selected_id().is_none(), "(none)")
                    .clicked()
                {
                    output.cleared = true;
                }
                for persona in store.all() {
                    let is_current = store.selected_id() == Some(persona.id.as_str());
                    if ui
                        .selectable_label(is_current, persona.display_name())
                        .on_hover_text(&persona.summary)
                        .clicked()
                    {
                        output.selected = Some(persona.id.clone());
                    }
                }
            });

        output
    }

    /// The Ctrl+P overlay. Does nothing while closed.
    pub fn show_finder(
        &mut self,
        ctx: &egui::Context,
        store: &PersonaStore,
        is_dark: bool,
    ) -> PickerOutput {
        let mut output = PickerOutput::default();
        if !self.is_open {
            return output;
        }

        let results = finder_results(store, &self.query);

        let bg_color = if is_dark {
            Color32::from_rgb(35, 35, 40)
        } else {
            Color32::from_rgb(255, 255, 255)
        };
        let border_color = if is_dark {
            Color32::from_rgb(80, 80, 90)
        } else {
            Color32::from_rgb(180, 180, 190)
        };
        let secondary_color = if is_dark {
            Color32::from_rgb(140, 140, 150)
        } else {
            Color32::from_rgb(100, 100, 110)
        };
        let selected_bg = if is_dark {
            Color32::from_rgb(55, 65, 85)
        } else {
            Color32::from_rgb(220, 230, 245)
        };

        ctx.input(|i| {
            if i.key_pressed(Key::Escape) {
                output.closed = true;
            }
            if i.key_pressed(Key::ArrowDown) && !results.is_empty() {
                self.selected_index = (self.selected_index + 1) % results.len();
            }
            if i.key_pressed(Key::ArrowUp) && !results.is_empty() {
                self.selected_index = if self.selected_index == 0 {
                    results.len() - 1
                } else {
                    self.selected_index - 1
                };
            }
            if i.key_pressed(Key::Enter) {
                if let Some(persona) = results.get(self.selected_index) {
                    output.selected = Some(persona.id.clone());
                    output.closed = true;
                }
            }
        });

        egui::Area::new(egui::Id::new("persona_finder_overlay"))
            .anchor(egui::Align2::CENTER_TOP, [0.0, 100.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(bg_color)
                    .stroke(egui::Stroke::new(1.0, border_color))
                    .rounding(8.0)
                    .shadow(egui::epaint::Shadow {
                        offset: [0.0, 4.0].into(),
                        blur: 12.0,
                        spread: 0.0,
                        color: Color32::from_black_alpha(60),
                    })
                    .show(ui, |ui| {
                        ui.set_width(440.0);
                        ui.add_space(8.0);

                        ui.horizontal(|ui| {
                            ui.add_space(12.0);
                            let response = ui.add(
                                egui::TextEdit::singleline(&mut self.query)
                                    .hint_text("Find a persona…")
                                    .frame(false)
                                    .desired_width(400.0),
                            );
                            response.request_focus();
                            if response.changed() {
                                self.selected_index = 0;
                            }
                        });

                        ui.add_space(4.0);
                        ui.separator();

                        if results.is_empty() {
                            ui.horizontal(|ui| {
                                ui.add_space(16.0);
                                ui.label(
                                    RichText::new("No matching personas")
                                        .color(secondary_color)
                                        .italics(),
                                );
                            });
                        }

                        for (idx, persona) in results.iter().enumerate() {
                            let response = ui
                                .horizontal(|ui| {
                                    let row = ui.interact(
                                        ui.available_rect_before_wrap(),
                                        ui.id().with(idx),
                                        Sense::click(),
                                    );
                                    if idx == self.selected_index || row.hovered() {
                                        ui.painter().rect_filled(
                                            row.rect.expand2(egui::vec2(8.0, 2.0)),
                                            4.0,
                                            selected_bg,
                                        );
                                    }
                                    ui.add_space(16.0);
                                    ui.label(RichText::new(persona.display_name()).strong());
                                    if !persona.summary.is_empty() {
                                        ui.add_space(8.0);
                                        ui.label(
                                            RichText::new(truncate(&persona.summary, 48))
                                                .color(secondary_color)
                                                .small(),
                                        );
                                    }
                                    row
                                })
                                .inner;

                            if response.clicked() {
                                output.selected = Some(persona.id.clone());
                                output.closed = true;
                            }
                        }

                        ui.separator();
                        ui.horizontal(|ui| {
                            ui.add_space(12.0);
                            ui.label(
                                RichText::new("↑↓ Navigate  ⏎ Select  Esc Close")
                                    .color(secondary_color)
                                    .small(),
                            );
                        });
                        ui.add_space(6.0);
                    });
            });

        if output.closed {
            self.close();
        }

        output
    }
}

/// Best matches for `query`, capped for display.
pub fn finder_results<'a>(store: &'a PersonaStore, query: &str) -> Vec<&'a PersonaRecord> {
    let mut results = store.search(query);
    results.truncate(MAX_RESULTS);
    results
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut short: String = text.chars().take(max_chars).collect();
    short.push('…');
    short
}
