//! Settings Panel Component for Persona Card
//!
//! A modal panel for appearance, card behavior and file handling options.
//! Changes apply live and are saved with the rest of the settings.

use crate::config::{CardFormat, CardMode, Settings, Theme};
use crate::persona::NotifyPolicy;
use eframe::egui::{self, Color32, RichText, Ui};

/// Settings panel sections for navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SettingsSection {
    #[default]
    Appearance,
    Card,
    Files,
}

impl SettingsSection {
    pub const ALL: [SettingsSection; 3] = [
        SettingsSection::Appearance,
        SettingsSection::Card,
        SettingsSection::Files,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "Appearance",
            SettingsSection::Card => "Card",
            SettingsSection::Files => "Files",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            SettingsSection::Appearance => "🎨",
            SettingsSection::Card => "🪪",
            SettingsSection::Files => "📁",
        }
    }
}

/// Result of showing the settings panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanelOutput {
    /// Whether settings were modified.
    pub changed: bool,
    pub close_requested: bool,
    /// Whether a reset to defaults was requested.
    pub reset_requested: bool,
}

/// Settings panel state and rendering.
#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    active_section: SettingsSection,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the settings panel as a modal window over a dimmed overlay.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        settings: &mut Settings,
        is_dark: bool,
    ) -> SettingsPanelOutput {
        let mut output = SettingsPanelOutput::default();

        let screen_rect = ctx.screen_rect();
        let overlay_color = if is_dark {
            Color32::from_rgba_unmultiplied(0, 0, 0, 180)
        } else {
            Color32::from_rgba_unmultiplied(0, 0, 0, 120)
        };

        egui::Area::new(egui::Id::new("settings_overlay"))
            .order(egui::Order::Middle)
            .fixed_pos(screen_rect.min)
            .show(ctx, |ui| {
                let response = ui.allocate_response(screen_rect.size(), egui::Sense::click());
                ui.painter().rect_filled(screen_rect, 0.0, overlay_color);
                if response.clicked() {
                    output.close_requested = true;
                }
            });

        egui::Window::new("⚙ Settings")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .min_width(480.0)
            .max_width(580.0)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    output.close_requested = true;
                }

                ui.horizontal(|ui| {
                    ui.vertical(|ui| {
                        ui.set_min_width(120.0);

                        for section in SettingsSection::ALL {
                            let selected = self.active_section == section;
                            let text = format!("{} {}", section.icon(), section.label());
                            if ui
                                .add_sized(
                                    [110.0, 32.0],
                                    egui::SelectableLabel::new(
                                        selected,
                                        RichText::new(text).size(14.0),
                                    ),
                                )
                                .clicked()
                            {
                                self.active_section = section;
                            }
                        }

                        ui.add_space(ui.available_height() - 40.0);

                        if ui
                            .add_sized([110.0, 28.0], egui::Button::new("↺ Reset All"))
                            .on_hover_text("Reset all settings to defaults")
                            .clicked()
                        {
                            output.reset_requested = true;
                        }
                    });

                    ui.separator();

                    ui.vertical(|ui| {
                        ui.set_min_width(330.0);
                        ui.set_min_height(300.0);

                        let changed = match self.active_section {
                            SettingsSection::Appearance => show_appearance_section(ui, settings),
                            SettingsSection::Card => show_card_section(ui, settings),
                            SettingsSection::Files => show_files_section(ui, settings),
                        };
                        output.changed |= changed;
                    });
                });

                ui.separator();

                ui.horizontal(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Close").clicked() {
                            output.close_requested = true;
                        }
                        ui.label(
                            RichText::new("Settings are saved automatically")
                                .small()
                                .weak(),
                        );
                    });
                });
            });

        output
    }
}

fn spaced_separator(ui: &mut Ui) {
    ui.add_space(16.0);
    ui.separator();
    ui.add_space(8.0);
}

/// Returns true if any setting was changed.
fn show_appearance_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Appearance");
    ui.add_space(8.0);

    ui.label(RichText::new("Theme").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for theme in Theme::all() {
            let label = match theme {
                Theme::Light => "☀ Light",
                Theme::Dark => "🌙 Dark",
                Theme::System => "💻 System",
            };
            changed |= ui
                .selectable_value(&mut settings.theme, *theme, label)
                .changed();
        }
    });

    spaced_separator(ui);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Font Size").strong());
        ui.add_space(8.0);
        ui.label(format!("{}px", settings.font_size as u32));
    });
    ui.add_space(4.0);

    changed |= ui
        .add(
            egui::Slider::new(
                &mut settings.font_size,
                Settings::MIN_FONT_SIZE..=Settings::MAX_FONT_SIZE,
            )
            .show_value(false)
            .step_by(1.0),
        )
        .changed();

    ui.horizontal(|ui| {
        for (label, size) in [("Small", 12.0), ("Medium", 14.0), ("Large", 18.0)] {
            if ui.small_button(label).clicked() {
                settings.font_size = size;
                changed = true;
            }
        }
    });

    changed
}

/// Returns true if any setting was changed.
fn show_card_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Card");
    ui.add_space(8.0);

    ui.label(RichText::new("List Layout").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for format in [CardFormat::Card, CardFormat::Bullet] {
            changed |= ui
                .selectable_value(&mut settings.card_format, format, format.label())
                .changed();
        }
    });
    ui.label(
        RichText::new("Card shows chips in two columns; Bullet lists items in one column.")
            .small()
            .weak(),
    );

    spaced_separator(ui);

    ui.label(RichText::new("Mode").strong());
    ui.add_space(4.0);
    ui.horizontal(|ui| {
        for mode in [CardMode::View, CardMode::Edit] {
            let label = format!("{} {}", mode.icon(), mode.label());
            changed |= ui
                .selectable_value(&mut settings.card_mode, mode, label)
                .changed();
        }
    });

    spaced_separator(ui);

    ui.label(RichText::new("Report Edits").strong());
    ui.add_space(4.0);
    for policy in [NotifyPolicy::Always, NotifyPolicy::OnChange] {
        changed |= ui
            .radio_value(&mut settings.notify_policy, policy, policy.label())
            .changed();
    }
    ui.label(
        RichText::new("Controls when edits are written back to the persona library.")
            .small()
            .weak(),
    );

    changed
}

/// Returns true if any setting was changed.
fn show_files_section(ui: &mut Ui, settings: &mut Settings) -> bool {
    let mut changed = false;

    ui.heading("Files");
    ui.add_space(8.0);

    changed |= ui
        .checkbox(&mut settings.open_after_export, "Open HTML After Export")
        .on_hover_text("Open exported cards in the default browser")
        .changed();

    spaced_separator(ui);

    ui.horizontal(|ui| {
        ui.label(RichText::new("Recent Files").strong());
        ui.add_space(8.0);
        ui.label(format!("Remember {} files", settings.max_recent_files));
    });
    ui.add_space(4.0);

    let mut recent_count = settings.max_recent_files as f32;
    if ui
        .add(
            egui::Slider::new(&mut recent_count, 1.0..=20.0)
                .show_value(false)
                .step_by(1.0),
        )
        .changed()
    {
        settings.max_recent_files = recent_count as usize;
        settings.recent_files.truncate(settings.max_recent_files);
        changed = true;
    }

    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui
            .button("Clear Recent Files")
            .on_hover_text("Remove all files from the recent files list")
            .clicked()
        {
            settings.recent_files.clear();
            changed = true;
        }

        if !settings.recent_files.is_empty() {
            ui.label(
                RichText::new(format!("({} files)", settings.recent_files.len()))
                    .small()
                    .weak(),
            );
        }
    });

    changed
}
