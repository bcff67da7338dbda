//! Editing state for a single persona card.
//!
//! [`PersonaEditor`] owns the record being edited, resolves it from the
//! available seeds when created, and merges field edits into it. Every
//! accepted merge goes through [`PersonaEditor::apply_partial_update`], which
//! notifies the edit observer at least once per accepted change.

use super::section::ListField;
use super::tags::Tag;
use super::PersonaRecord;
use crate::error::{Error, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Callback invoked after an edit has been merged into the record.
pub type EditObserver = Box<dyn FnMut()>;

/// When the edit observer is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NotifyPolicy {
    /// After every merge, even when the value did not change.
    #[default]
    Always,
    /// Only when the merged value differs from the previous one.
    OnChange,
}

impl NotifyPolicy {
    pub fn label(&self) -> &'static str {
        match self {
            NotifyPolicy::Always => "Every edit",
            NotifyPolicy::OnChange => "Only real changes",
        }
    }
}

/// New contents for a list field, as emitted by the tag input.
pub enum TagUpdate {
    /// A literal replacement list.
    Replace(Vec<Tag>),
    /// A function computing the new list from the current one.
    Compute(Box<dyn FnOnce(Vec<Tag>) -> Vec<Tag>>),
}

impl TagUpdate {
    /// Wrap a closure as a deferred update.
    pub fn compute<F>(f: F) -> Self
    where
        F: FnOnce(Vec<Tag>) -> Vec<Tag> + 'static,
    {
        TagUpdate::Compute(Box::new(f))
    }
}

impl fmt::Debug for TagUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagUpdate::Replace(tags) => f.debug_tuple("Replace").field(tags).finish(),
            TagUpdate::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// A single-field partial update of a persona.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Name(String),
    Summary(String),
    List(ListField, Vec<Tag>),
}

/// Pick the record to edit: the override, else the initial value, else a
/// fresh empty persona.
pub fn resolve_record(
    persona: Option<PersonaRecord>,
    initial: Option<PersonaRecord>,
) -> PersonaRecord {
    persona.or(initial).unwrap_or_else(PersonaRecord::empty)
}

/// Local editing state of one persona card.
pub struct PersonaEditor {
    record: PersonaRecord,
    on_edit: Option<EditObserver>,
    notify_policy: NotifyPolicy,
    notifications: u64,
}

impl PersonaEditor {
    /// Create an editor seeded from `persona`, falling back to `initial`,
    /// falling back to a blank record.
    pub fn new(persona: Option<PersonaRecord>, initial: Option<PersonaRecord>) -> Self {
        let record = resolve_record(persona, initial);
        debug!("Persona editor opened for '{}'", record.id);
        Self {
            record,
            on_edit: None,
            notify_policy: NotifyPolicy::default(),
            notifications: 0,
        }
    }

    /// Attach the observer called after each accepted edit.
    pub fn with_observer<F>(mut self, on_edit: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.on_edit = Some(Box::new(on_edit));
        self
    }

    pub fn with_notify_policy(mut self, policy: NotifyPolicy) -> Self {
        self.notify_policy = policy;
        self
    }

    pub fn set_notify_policy(&mut self, policy: NotifyPolicy) {
        self.notify_policy = policy;
    }

    pub fn record(&self) -> &PersonaRecord {
        &self.record
    }

    /// Number of times the observer has been notified.
    pub fn notifications(&self) -> u64 {
        self.notifications
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edits
    // ─────────────────────────────────────────────────────────────────────────

    /// Merge one field into the record and notify the observer.
    ///
    /// Other fields keep their values. Returns whether the field changed.
    pub fn apply_partial_update(&mut self, update: FieldUpdate) -> bool {
        let changed = match update {
            FieldUpdate::Name(name) => replace_text(&mut self.record.name, name),
            FieldUpdate::Summary(summary) => replace_text(&mut self.record.summary, summary),
            FieldUpdate::List(field, tags) => {
                let list = field.get_mut(&mut self.record);
                let before = list.texts();
                list.replace_with(tags);
                debug!(
                    "Updated {} on '{}': {} tag(s)",
                    field.storage_name(),
                    self.record.id,
                    field.get(&self.record).len()
                );
                field.get(&self.record).texts() != before
            }
        };

        self.notify(changed);
        changed
    }

    /// Apply a tag-input change to a list field.
    pub fn apply_edit(&mut self, field: ListField, update: TagUpdate) -> bool {
        let tags = match update {
            TagUpdate::Replace(tags) => tags,
            TagUpdate::Compute(f) => f(field.get(&self.record).tags().to_vec()),
        };
        self.apply_partial_update(FieldUpdate::List(field, tags))
    }

    /// Apply a tag-input change addressed by section title.
    ///
    /// The title is reduced to a storage key (lower-case, no whitespace) and
    /// looked up in the section table.
    pub fn apply_edit_by_title(&mut self, title: &str, update: TagUpdate) -> Result<bool> {
        let key = super::section::storage_key_for_title(title);
        let field = ListField::from_storage_key(&key).ok_or_else(|| {
            warn!("No persona field for section title '{}'", title);
            Error::UnknownField(key)
        })?;
        Ok(self.apply_edit(field, update))
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> bool {
        self.apply_partial_update(FieldUpdate::Name(name.into()))
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) -> bool {
        self.apply_partial_update(FieldUpdate::Summary(summary.into()))
    }

    fn notify(&mut self, changed: bool) {
        if !changed && self.notify_policy == NotifyPolicy::OnChange {
            return;
        }
        self.notifications += 1;
        if let Some(on_edit) = self.on_edit.as_mut() {
            on_edit();
        }
    }
}

impl fmt::Debug for PersonaEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersonaEditor")
            .field("record", &self.record)
            .field("has_observer", &self.on_edit.is_some())
            .field("notify_policy", &self.notify_policy)
            .field("notifications", &self.notifications)
            .finish()
    }
}

fn replace_text(slot: &mut String, value: String) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::tags::{TagId, TagList};
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_editor(record: PersonaRecord) -> (PersonaEditor, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let editor = PersonaEditor::new(Some(record), None)
            .with_observer(move || counter.set(counter.get() + 1));
        (editor, calls)
    }

    fn named(id: &str, name: &str) -> PersonaRecord {
        let mut record = PersonaRecord::with_id(id);
        record.name = name.to_string();
        record
    }

    #[test]
    fn test_override_wins_over_initial() {
        let persona = named("p", "Override");
        let initial = named("i", "Initial");
        let editor = PersonaEditor::new(Some(persona.clone()), Some(initial));
        assert_eq!(editor.record(), &persona);
    }

    #[test]
    fn test_initial_used_without_override() {
        let initial = named("i", "Initial");
        let editor = PersonaEditor::new(None, Some(initial.clone()));
        assert_eq!(editor.record(), &initial);
    }

    #[test]
    fn test_fresh_record_without_seeds() {
        let a = PersonaEditor::new(None, None);
        let b = PersonaEditor::new(None, None);
        assert!(!a.record().id.is_empty());
        assert_ne!(a.record().id, b.record().id);
        for field in ListField::ALL {
            assert!(field.get(a.record()).is_empty());
        }
        assert!(a.record().is_blank());
    }

    #[test]
    fn test_edit_goals_with_literal_list() {
        let (mut editor, calls) = counting_editor(PersonaRecord::with_id("p"));
        let tag = Tag {
            id: TagId::from(0),
            text: "Grow".to_string(),
        };

        editor
            .apply_edit_by_title("Goals", TagUpdate::Replace(vec![tag]))
            .unwrap();

        assert_eq!(editor.record().goals.texts(), vec!["Grow"]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_edit_leaves_other_fields_untouched() {
        let mut record = named("p", "Ada");
        record.skills = TagList::from_texts(["Python"]);
        let (mut editor, _) = counting_editor(record);

        editor.apply_edit(ListField::Strengths, TagUpdate::Replace(vec![Tag::new("Calm")]));

        assert_eq!(editor.record().name, "Ada");
        assert_eq!(editor.record().skills.texts(), vec!["Python"]);
        assert_eq!(editor.record().strengths.texts(), vec!["Calm"]);
        assert_eq!(editor.record().id, "p");
    }

    #[test]
    fn test_title_with_spaces_resolves() {
        let (mut editor, calls) = counting_editor(PersonaRecord::with_id("p"));
        editor
            .apply_edit_by_title("Next Steps", TagUpdate::Replace(vec![Tag::new("Apply")]))
            .unwrap();
        assert_eq!(editor.record().next_steps.texts(), vec!["Apply"]);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_unknown_title_is_rejected_without_notifying() {
        let (mut editor, calls) = counting_editor(PersonaRecord::with_id("p"));
        let result = editor.apply_edit_by_title("Hobbies", TagUpdate::Replace(vec![]));
        assert!(matches!(result, Err(Error::UnknownField(key)) if key == "hobbies"));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_deferred_update_receives_current_tags() {
        let mut record = PersonaRecord::with_id("p");
        record.skills = TagList::from_texts(["Python, Go"]);
        let original_ids: Vec<TagId> = record.skills.iter().map(|t| t.id).collect();
        let (mut editor, calls) = counting_editor(record);

        editor.apply_edit(
            ListField::Skills,
            TagUpdate::compute(|mut tags| {
                assert_eq!(tags.len(), 2);
                tags.push(Tag::new("Rust"));
                tags
            }),
        );

        let skills = &editor.record().skills;
        assert_eq!(skills.texts(), vec!["Python", "Go", "Rust"]);
        let ids: Vec<TagId> = skills.iter().take(2).map(|t| t.id).collect();
        assert_eq!(ids, original_ids);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_noop_edit_notifies_by_default() {
        let mut record = PersonaRecord::with_id("p");
        record.goals = TagList::from_texts(["Grow"]);
        let current = record.goals.tags().to_vec();
        let (mut editor, calls) = counting_editor(record);

        let changed = editor.apply_edit(ListField::Goals, TagUpdate::Replace(current));

        assert!(!changed);
        assert_eq!(calls.get(), 1);
        assert_eq!(editor.notifications(), 1);
    }

    #[test]
    fn test_on_change_policy_skips_noop_edits() {
        let (editor, calls) = counting_editor(named("p", "Ada"));
        let mut editor = editor.with_notify_policy(NotifyPolicy::OnChange);

        assert!(!editor.set_name("Ada"));
        assert_eq!(calls.get(), 0);

        assert!(editor.set_name("Ada L."));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_scalar_edits_notify_each_keystroke() {
        let (mut editor, calls) = counting_editor(PersonaRecord::with_id("p"));
        editor.set_name("A");
        editor.set_name("Ad");
        editor.set_summary("S");
        assert_eq!(editor.record().name, "Ad");
        assert_eq!(editor.record().summary, "S");
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_list_update_drops_empty_tags() {
        let (mut editor, _) = counting_editor(PersonaRecord::with_id("p"));
        editor.apply_edit(
            ListField::Goals,
            TagUpdate::Replace(vec![Tag::new(""), Tag::new("Grow")]),
        );
        assert_eq!(editor.record().goals.texts(), vec!["Grow"]);
    }

    #[test]
    fn test_id_is_stable_across_edits() {
        let (mut editor, _) = counting_editor(PersonaRecord::with_id("stable"));
        editor.set_name("x");
        editor.apply_edit(ListField::Skills, TagUpdate::Replace(vec![Tag::new("Go")]));
        assert_eq!(editor.record().id, "stable");
    }

    #[test]
    fn test_editor_without_observer_still_counts() {
        let mut editor = PersonaEditor::new(None, None);
        editor.set_summary("hello");
        assert_eq!(editor.notifications(), 1);
    }
}
