//! Persona card painter.
//!
//! Draws a [`CardLayout`] into the central panel. In edit mode the inputs
//! report their changes as [`CardEdit`]s, which the caller merges into the
//! persona editor once painting is done.

use crate::persona::{ListField, TagUpdate};
use crate::render::{CardLayout, SectionLayout};
use crate::theme::{CardColors, ThemeSpacing};
use crate::ui::tag_input::TagInputState;
use eframe::egui::{self, Color32, RichText, Rounding, Stroke, Ui};
use std::collections::HashMap;

/// Width at which the card stops growing.
const MAX_CARD_WIDTH: f32 = 860.0;

/// A change made through the card's inputs.
#[derive(Debug)]
pub enum CardEdit {
    Name(String),
    Summary(String),
    List(ListField, TagUpdate),
}

/// Painter state that outlives a frame: the text typed into each tag input.
#[derive(Debug, Default)]
pub struct PersonaCard {
    inputs: HashMap<ListField, TagInputState>,
}

impl PersonaCard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop half-typed input, e.g. after switching personas.
    pub fn reset_inputs(&mut self) {
        self.inputs.clear();
    }

    /// Paint the card and collect the edits made this frame.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        layout: &CardLayout,
        colors: &CardColors,
        font_size: f32,
    ) -> Vec<CardEdit> {
        let mut edits = Vec::new();
        let spacing = ThemeSpacing::default();

        // Nothing to edit behind the placeholder
        if layout.is_placeholder() {
            self.reset_inputs();
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(spacing.lg);
                    let width = ui.available_width().min(MAX_CARD_WIDTH);
                    ui.allocate_ui(egui::vec2(width, 0.0), |ui| {
                        card_frame(colors).show(ui, |ui| {
                            ui.set_width(width - 2.0 * spacing.xl);
                            ui.with_layout(egui::Layout::top_down(egui::Align::LEFT), |ui| {
                                self.show_rows(ui, layout, colors, font_size, &mut edits);
                            });
                        });
                    });
                    ui.add_space(spacing.lg);
                });
            });

        edits
    }

    fn show_rows(
        &mut self,
        ui: &mut Ui,
        layout: &CardLayout,
        colors: &CardColors,
        font_size: f32,
        edits: &mut Vec<CardEdit>,
    ) {
        let spacing = ThemeSpacing::default();

        for (row_index, row) in layout.rows().into_iter().enumerate() {
            if row_index > 0 {
                ui.add_space(spacing.lg);
            }
            match row {
                [single] if single.spans_full_width() || layout.columns <= 1 => {
                    self.show_section(ui, single, colors, font_size, edits);
                }
                _ => {
                    ui.columns(layout.columns, |columns| {
                        for (column, section) in columns.iter_mut().zip(row) {
                            self.show_section(column, section, colors, font_size, edits);
                        }
                    });
                }
            }
        }
    }

    fn show_section(
        &mut self,
        ui: &mut Ui,
        section: &SectionLayout,
        colors: &CardColors,
        font_size: f32,
        edits: &mut Vec<CardEdit>,
    ) {
        match section {
            SectionLayout::Placeholder { title, message } => {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.label(
                        RichText::new(*title)
                            .size(font_size * 1.6)
                            .strong()
                            .color(colors.text),
                    );
                    ui.add_space(8.0);
                    ui.label(RichText::new(*message).size(font_size).color(colors.text));
                    ui.add_space(40.0);
                });
            }
            SectionLayout::NameSummary { name, summary } => {
                ui.label(
                    RichText::new(name)
                        .size(font_size * 1.8)
                        .strong()
                        .color(colors.text),
                );
                if !summary.is_empty() {
                    ui.add_space(6.0);
                    ui.label(RichText::new(summary).size(font_size).color(colors.text));
                }
            }
            SectionLayout::ScalarInputs { name, summary } => {
                let mut name_buf = name.clone();
                let response = ui.add(
                    egui::TextEdit::singleline(&mut name_buf)
                        .hint_text("Name")
                        .font(egui::FontId::proportional(font_size * 1.4))
                        .text_color(colors.input_text)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    edits.push(CardEdit::Name(name_buf));
                }

                ui.add_space(6.0);

                let mut summary_buf = summary.clone();
                let response = ui.add(
                    egui::TextEdit::multiline(&mut summary_buf)
                        .hint_text("Summary")
                        .font(egui::FontId::proportional(font_size))
                        .text_color(colors.input_text)
                        .desired_rows(3)
                        .desired_width(f32::INFINITY),
                );
                if response.changed() {
                    edits.push(CardEdit::Summary(summary_buf));
                }
            }
            SectionLayout::BulletList { title, items, .. } => {
                section_frame(ui, title, colors, font_size, |ui| {
                    for item in items {
                        ui.horizontal_wrapped(|ui| {
                            ui.label(RichText::new("•").size(font_size).color(colors.text));
                            ui.label(RichText::new(item).size(font_size).color(colors.text));
                        });
                    }
                });
            }
            SectionLayout::Chips { title, items, .. } => {
                section_frame(ui, title, colors, font_size, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);
                        for item in items {
                            chip(ui, item, colors, font_size);
                        }
                    });
                });
            }
            SectionLayout::TagEditor { field, title, tags } => {
                let state = self.inputs.entry(*field).or_default();
                let update = section_frame(ui, title, colors, font_size, |ui| {
                    state.show(ui, ("tag_input", field.storage_name()), tags, colors)
                });
                if let Some(update) = update {
                    edits.push(CardEdit::List(*field, update));
                }
            }
        }
    }
}

fn card_frame(colors: &CardColors) -> egui::Frame {
    let spacing = ThemeSpacing::default();
    egui::Frame::none()
        .fill(colors.background)
        .stroke(Stroke::new(1.0, colors.border))
        .rounding(Rounding::same(12.0))
        .inner_margin(egui::Margin::same(spacing.xl))
        .shadow(egui::epaint::Shadow {
            offset: [0.0, 6.0].into(),
            blur: 18.0,
            spread: 0.0,
            color: Color32::from_black_alpha(colors.shadow_alpha),
        })
}

/// A labeled section: the title above whatever `add_contents` draws.
fn section_frame<R>(
    ui: &mut Ui,
    title: &str,
    colors: &CardColors,
    font_size: f32,
    add_contents: impl FnOnce(&mut Ui) -> R,
) -> R {
    ui.vertical(|ui| {
        if !title.is_empty() {
            ui.label(
                RichText::new(title)
                    .size(font_size * 1.15)
                    .strong()
                    .color(colors.section_title),
            );
            ui.add_space(4.0);
        }
        add_contents(ui)
    })
    .inner
}

/// A read-only pill.
fn chip(ui: &mut Ui, text: &str, colors: &CardColors, font_size: f32) {
    egui::Frame::none()
        .fill(colors.chip_fill)
        .rounding(Rounding::same(12.0))
        .inner_margin(egui::Margin::symmetric(10.0, 3.0))
        .show(ui, |ui| {
            ui.label(
                RichText::new(text)
                    .size(font_size * 0.9)
                    .color(colors.chip_text),
            );
        });
}
