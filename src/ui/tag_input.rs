//! Tag input widget for list sections in edit mode.
//!
//! Shows the current tags as removable chips followed by a text field. Enter
//! (or a trailing comma) commits the typed text as a new tag. Clicking a chip
//! makes it the active one; Backspace on an empty field removes the active
//! tag, or the last tag when none is active. The widget never mutates the
//! record itself: it hands back a [`TagUpdate`] for the editor to merge.

use crate::persona::{Tag, TagId, TagUpdate};
use crate::theme::CardColors;
use eframe::egui::{self, Key, RichText, Rounding, Stroke, Ui};

/// Per-section state of the text field.
#[derive(Debug, Clone, Default)]
pub struct TagInputState {
    /// Text typed but not yet committed.
    pub input: String,
    /// Index of the highlighted chip.
    pub active: Option<usize>,
}

impl TagInputState {
    /// Render the widget and return the change the user made, if any.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        id_salt: impl std::hash::Hash,
        tags: &[Tag],
        colors: &CardColors,
    ) -> Option<TagUpdate> {
        let mut update = None;

        if self.active.is_some_and(|i| i >= tags.len()) {
            self.active = None;
        }

        ui.horizontal_wrapped(|ui| {
            for (index, tag) in tags.iter().enumerate() {
                let is_active = self.active == Some(index);
                match editable_chip(ui, &tag.text, colors, is_active) {
                    ChipAction::Activate => {
                        self.active = if is_active { None } else { Some(index) };
                    }
                    ChipAction::Remove => {
                        update = Some(remove_tag(tags, tag.id));
                        self.active = None;
                    }
                    ChipAction::MoveLeft => self.move_active(tags, index, -1, &mut update),
                    ChipAction::MoveRight => self.move_active(tags, index, 1, &mut update),
                    ChipAction::None => {}
                }
            }

            let was_empty = self.input.is_empty();
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .id_source(id_salt)
                    .hint_text("Add item…")
                    .desired_width(140.0)
                    .text_color(colors.input_text),
            );

            let enter = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if enter || self.input.ends_with(',') {
                if let Some(commit) = commit_input(&mut self.input) {
                    update = Some(commit);
                }
                response.request_focus();
            } else if response.has_focus()
                && was_empty
                && ui.input(|i| i.key_pressed(Key::Backspace))
            {
                if let Some(removal) = remove_at_cursor(tags, self.active) {
                    update = Some(removal);
                }
                self.active = None;
            }
        });

        update
    }

    fn move_active(
        &mut self,
        tags: &[Tag],
        index: usize,
        delta: isize,
        update: &mut Option<TagUpdate>,
    ) {
        if let Some(moved) = move_tag(tags, index, delta) {
            *update = Some(moved);
            self.active = index.checked_add_signed(delta);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Updates
// ─────────────────────────────────────────────────────────────────────────────

/// Take the typed text as a new tag appended to the current list.
///
/// Clears the input. Returns `None` when nothing but whitespace was typed.
pub fn commit_input(input: &mut String) -> Option<TagUpdate> {
    let text = input.trim().trim_end_matches(',').trim().to_string();
    input.clear();
    if text.is_empty() {
        return None;
    }
    Some(TagUpdate::compute(move |mut tags| {
        tags.push(Tag::new(text));
        tags
    }))
}

/// The list without the tag `id`.
pub fn remove_tag(tags: &[Tag], id: TagId) -> TagUpdate {
    TagUpdate::Replace(tags.iter().filter(|t| t.id != id).cloned().collect())
}

/// The list with its last tag removed, or `None` if it is already empty.
pub fn pop_last(tags: &[Tag]) -> Option<TagUpdate> {
    let (_, rest) = tags.split_last()?;
    Some(TagUpdate::Replace(rest.to_vec()))
}

/// Backspace on an empty field: drop the active tag, else the last one.
pub fn remove_at_cursor(tags: &[Tag], active: Option<usize>) -> Option<TagUpdate> {
    match active.and_then(|i| tags.get(i)) {
        Some(tag) => Some(remove_tag(tags, tag.id)),
        None => pop_last(tags),
    }
}

/// The list with the tag at `index` moved by `delta` places.
///
/// Returns `None` when the move would leave the list bounds.
pub fn move_tag(tags: &[Tag], index: usize, delta: isize) -> Option<TagUpdate> {
    let target = index.checked_add_signed(delta)?;
    if index >= tags.len() || target >= tags.len() {
        return None;
    }
    let mut reordered = tags.to_vec();
    reordered.swap(index, target);
    Some(TagUpdate::Replace(reordered))
}

// ─────────────────────────────────────────────────────────────────────────────
// Chips
// ─────────────────────────────────────────────────────────────────────────────

enum ChipAction {
    None,
    Activate,
    Remove,
    MoveLeft,
    MoveRight,
}

fn editable_chip(ui: &mut Ui, text: &str, colors: &CardColors, is_active: bool) -> ChipAction {
    let mut action = ChipAction::None;
    let stroke = if is_active {
        Stroke::new(1.5, colors.section_title)
    } else {
        Stroke::NONE
    };

    let response = egui::Frame::none()
        .fill(colors.chip_fill)
        .stroke(stroke)
        .rounding(Rounding::same(12.0))
        .inner_margin(egui::Margin::symmetric(8.0, 3.0))
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing.x = 4.0;
            let label = ui.add(
                egui::Label::new(RichText::new(text).color(colors.chip_text))
                    .sense(egui::Sense::click()),
            );
            if label.clicked() {
                action = ChipAction::Activate;
            }
            let remove = ui.add(
                egui::Button::new(RichText::new("×").color(colors.chip_text))
                    .frame(false)
                    .small(),
            );
            if remove.on_hover_text("Remove").clicked() {
                action = ChipAction::Remove;
            }
        })
        .response;

    response.context_menu(|ui| {
        if ui.button("◀ Move left").clicked() {
            action = ChipAction::MoveLeft;
            ui.close_menu();
        }
        if ui.button("Move right ▶").clicked() {
            action = ChipAction::MoveRight;
            ui.close_menu();
        }
        if ui.button("Remove").clicked() {
            action = ChipAction::Remove;
            ui.close_menu();
        }
    });

    action
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(update: TagUpdate, current: Vec<Tag>) -> Vec<Tag> {
        match update {
            TagUpdate::Replace(tags) => tags,
            TagUpdate::Compute(f) => f(current),
        }
    }

    fn texts(tags: &[Tag]) -> Vec<&str> {
        tags.iter().map(|t| t.text.as_str()).collect()
    }

    fn sample() -> Vec<Tag> {
        vec![Tag::new("Rust"), Tag::new("Go"), Tag::new("Python")]
    }

    #[test]
    fn test_commit_appends_trimmed_text() {
        let mut input = "  Haskell ".to_string();
        let update = commit_input(&mut input).unwrap();
        assert!(input.is_empty());

        let tags = apply(update, sample());
        assert_eq!(texts(&tags), vec!["Rust", "Go", "Python", "Haskell"]);
    }

    #[test]
    fn test_commit_strips_trailing_comma() {
        let mut input = "Zig,".to_string();
        let tags = apply(commit_input(&mut input).unwrap(), Vec::new());
        assert_eq!(texts(&tags), vec!["Zig"]);
    }

    #[test]
    fn test_commit_blank_input_is_ignored() {
        let mut input = "   ".to_string();
        assert!(commit_input(&mut input).is_none());
        assert!(input.is_empty());
    }

    #[test]
    fn test_remove_keeps_other_ids() {
        let tags = sample();
        let removed = apply(remove_tag(&tags, tags[1].id), Vec::new());
        assert_eq!(texts(&removed), vec!["Rust", "Python"]);
        assert_eq!(removed[0].id, tags[0].id);
        assert_eq!(removed[1].id, tags[2].id);
    }

    #[test]
    fn test_pop_last() {
        let tags = sample();
        let popped = apply(pop_last(&tags).unwrap(), Vec::new());
        assert_eq!(texts(&popped), vec!["Rust", "Go"]);
        assert!(pop_last(&[]).is_none());
    }

    #[test]
    fn test_remove_at_cursor_prefers_active_tag() {
        let tags = sample();
        let removed = apply(remove_at_cursor(&tags, Some(0)).unwrap(), Vec::new());
        assert_eq!(texts(&removed), vec!["Go", "Python"]);

        // Stale cursor falls back to the last tag
        let removed = apply(remove_at_cursor(&tags, Some(7)).unwrap(), Vec::new());
        assert_eq!(texts(&removed), vec!["Rust", "Go"]);

        assert!(remove_at_cursor(&[], None).is_none());
    }

    #[test]
    fn test_move_tag_swaps_and_keeps_ids() {
        let tags = sample();
        let moved = apply(move_tag(&tags, 0, 1).unwrap(), Vec::new());
        assert_eq!(texts(&moved), vec!["Go", "Rust", "Python"]);
        assert_eq!(moved[1].id, tags[0].id);
    }

    #[test]
    fn test_move_tag_out_of_bounds() {
        let tags = sample();
        assert!(move_tag(&tags, 0, -1).is_none());
        assert!(move_tag(&tags, 2, 1).is_none());
        assert!(move_tag(&tags, 5, -1).is_none());
    }
}
