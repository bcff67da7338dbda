//! Persona library: the collection of cards the application knows about.
//!
//! The store keeps personas in insertion order, tracks which one is selected,
//! applies partial updates, and persists itself as a single JSON document in
//! the config directory using the same atomic-write pattern as the settings.

use super::section::ListField;
use super::tags::ListContent;
use super::PersonaRecord;
use crate::config::get_config_dir;
use crate::error::{Error, Result};
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Library file name inside the config directory.
const LIBRARY_FILE_NAME: &str = "personas.json";

/// Current library document version.
const LIBRARY_VERSION: u32 = 1;

// ─────────────────────────────────────────────────────────────────────────────
// Partial Updates
// ─────────────────────────────────────────────────────────────────────────────

/// A shallow, partial update of a persona. Absent fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonaPatch {
    pub name: Option<String>,
    pub summary: Option<String>,
    pub goals: Option<ListContent>,
    pub next_steps: Option<ListContent>,
    pub life_experiences: Option<ListContent>,
    pub qualifications_and_education: Option<ListContent>,
    pub skills: Option<ListContent>,
    pub strengths: Option<ListContent>,
    pub value_proposition: Option<ListContent>,
}

impl PersonaPatch {
    /// Set the replacement content for a list field.
    pub fn with_list(mut self, field: ListField, content: impl Into<ListContent>) -> Self {
        *self.slot_mut(field) = Some(content.into());
        self
    }

    fn slot(&self, field: ListField) -> &Option<ListContent> {
        match field {
            ListField::Goals => &self.goals,
            ListField::NextSteps => &self.next_steps,
            ListField::LifeExperiences => &self.life_experiences,
            ListField::QualificationsAndEducation => &self.qualifications_and_education,
            ListField::Skills => &self.skills,
            ListField::Strengths => &self.strengths,
            ListField::ValueProposition => &self.value_proposition,
        }
    }

    fn slot_mut(&mut self, field: ListField) -> &mut Option<ListContent> {
        match field {
            ListField::Goals => &mut self.goals,
            ListField::NextSteps => &mut self.next_steps,
            ListField::LifeExperiences => &mut self.life_experiences,
            ListField::QualificationsAndEducation => &mut self.qualifications_and_education,
            ListField::Skills => &mut self.skills,
            ListField::Strengths => &mut self.strengths,
            ListField::ValueProposition => &mut self.value_proposition,
        }
    }

    /// Merge the present fields into `record`.
    pub fn apply_to(&self, record: &mut PersonaRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(summary) = &self.summary {
            record.summary = summary.clone();
        }
        for field in ListField::ALL {
            if let Some(content) = self.slot(field) {
                *field.get_mut(record) = content.clone().into();
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Store
// ─────────────────────────────────────────────────────────────────────────────

/// Ordered in-memory collection of personas with a current selection.
#[derive(Debug, Clone, Default)]
pub struct PersonaStore {
    personas: Vec<PersonaRecord>,
    selected: Option<String>,
}

impl PersonaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// All personas in insertion order.
    pub fn all(&self) -> &[PersonaRecord] {
        &self.personas
    }

    pub fn get(&self, id: &str) -> Option<&PersonaRecord> {
        self.personas.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Add a persona, replacing any existing one with the same id in place.
    ///
    /// Returns the persona's id.
    pub fn insert(&mut self, record: PersonaRecord) -> String {
        let id = record.id.clone();
        match self.personas.iter_mut().find(|p| p.id == id) {
            Some(existing) => *existing = record,
            None => self.personas.push(record),
        }
        debug!("Stored persona '{}' ({} total)", id, self.personas.len());
        id
    }

    /// Overwrite an existing persona with a new version of itself.
    pub fn replace(&mut self, record: PersonaRecord) -> Result<()> {
        let slot = self
            .personas
            .iter_mut()
            .find(|p| p.id == record.id)
            .ok_or_else(|| Error::PersonaNotFound(record.id.clone()))?;
        *slot = record;
        Ok(())
    }

    /// Apply a partial update to the persona with the given id.
    pub fn update(&mut self, id: &str, patch: &PersonaPatch) -> Result<()> {
        let record = self
            .personas
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::PersonaNotFound(id.to_string()))?;
        patch.apply_to(record);
        debug!("Patched persona '{}'", id);
        Ok(())
    }

    /// Remove a persona; clears the selection when it pointed at it.
    pub fn remove(&mut self, id: &str) -> Option<PersonaRecord> {
        let index = self.personas.iter().position(|p| p.id == id)?;
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Some(self.personas.remove(index))
    }

    /// Select a persona. Returns `false` if the id is unknown.
    pub fn select(&mut self, id: &str) -> bool {
        if self.contains(id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected(&self) -> Option<&PersonaRecord> {
        self.selected.as_deref().and_then(|id| self.get(id))
    }

    /// Fuzzy-search personas by name and summary, best match first.
    ///
    /// An empty query returns every persona in insertion order.
    pub fn search(&self, query: &str) -> Vec<&PersonaRecord> {
        let query = query.trim();
        if query.is_empty() {
            return self.personas.iter().collect();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, usize, &PersonaRecord)> = self
            .personas
            .iter()
            .enumerate()
            .filter_map(|(index, persona)| {
                let by_name = matcher.fuzzy_match(&persona.name, query);
                let by_summary = matcher.fuzzy_match(&persona.summary, query).map(|s| s / 2);
                by_name
                    .max(by_summary)
                    .map(|score| (score, index, persona))
            })
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        scored.into_iter().map(|(_, _, persona)| persona).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Persistence
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct LibraryDocument {
    #[serde(default = "library_version")]
    version: u32,
    #[serde(default)]
    personas: Vec<PersonaRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected: Option<String>,
}

fn library_version() -> u32 {
    LIBRARY_VERSION
}

/// Default location of the persona library.
pub fn default_library_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(LIBRARY_FILE_NAME))
}

/// Load the library at `path`. A missing or empty file yields an empty store.
pub fn load_library(path: &Path) -> Result<PersonaStore> {
    if !path.exists() {
        debug!("No persona library at {}, starting empty", path.display());
        return Ok(PersonaStore::new());
    }

    let contents = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    if contents.trim().is_empty() {
        return Ok(PersonaStore::new());
    }

    let document: LibraryDocument = serde_json::from_str(&contents)?;
    let mut store = PersonaStore::new();
    for persona in document.personas {
        store.insert(persona);
    }
    if let Some(id) = document.selected {
        store.select(&id);
    }

    info!(
        "Loaded {} persona(s) from {}",
        store.len(),
        path.display()
    );
    Ok(store)
}

/// Move an unreadable library out of the way so a fresh one can be saved.
///
/// The file is renamed to `<name>.corrupt-<unix-millis>` next to itself.
/// Returns the new location.
pub fn set_aside_library(path: &Path) -> Result<PathBuf> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut target = path.as_os_str().to_owned();
    target.push(format!(".corrupt-{}", millis));
    let target = PathBuf::from(target);

    fs::rename(path, &target).map_err(|e| Error::FileWrite {
        path: target.clone(),
        source: e,
    })?;
    warn!(
        "Moved unreadable persona library {} to {}",
        path.display(),
        target.display()
    );
    Ok(target)
}

/// Save the library to `path` with an atomic write.
pub fn save_library(path: &Path, store: &PersonaStore) -> Result<()> {
    let document = LibraryDocument {
        version: LIBRARY_VERSION,
        personas: store.personas.clone(),
        selected: store.selected.clone(),
    };
    let json = serde_json::to_string_pretty(&document)?;
    super::io::write_atomic(path, &json)?;
    info!("Saved {} persona(s) to {}", store.len(), path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn persona(id: &str, name: &str, summary: &str) -> PersonaRecord {
        let mut record = PersonaRecord::with_id(id);
        record.name = name.to_string();
        record.summary = summary.to_string();
        record
    }

    fn sample_store() -> PersonaStore {
        let mut store = PersonaStore::new();
        store.insert(persona("a", "Ada Lovelace", "Mathematician"));
        store.insert(persona("b", "Grace Hopper", "Navy officer and programmer"));
        store.insert(persona("c", "Alan Turing", "Codebreaker"));
        store
    }

    #[test]
    fn test_insert_keeps_order_and_replaces_in_place() {
        let mut store = sample_store();
        store.insert(persona("b", "Grace B. Hopper", ""));

        let ids: Vec<&str> = store.all().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(store.get("b").unwrap().name, "Grace B. Hopper");
    }

    #[test]
    fn test_update_merges_partial_fields() {
        let mut store = sample_store();
        let patch = PersonaPatch {
            summary: Some("Analyst".to_string()),
            ..PersonaPatch::default()
        }
        .with_list(ListField::Skills, "Math, Poetry");

        store.update("a", &patch).unwrap();

        let ada = store.get("a").unwrap();
        assert_eq!(ada.name, "Ada Lovelace");
        assert_eq!(ada.summary, "Analyst");
        assert_eq!(ada.skills.texts(), vec!["Math", "Poetry"]);
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = sample_store();
        let result = store.update("zzz", &PersonaPatch::default());
        assert!(matches!(result, Err(Error::PersonaNotFound(id)) if id == "zzz"));
    }

    #[test]
    fn test_patch_deserializes_from_partial_json() {
        let patch: PersonaPatch =
            serde_json::from_str(r#"{"nextSteps": ["Apply, Interview"]}"#).unwrap();
        let mut record = persona("x", "X", "");
        patch.apply_to(&mut record);
        assert_eq!(record.next_steps.texts(), vec!["Apply", "Interview"]);
        assert_eq!(record.name, "X");
    }

    #[test]
    fn test_replace_requires_existing() {
        let mut store = sample_store();
        assert!(store.replace(persona("a", "Ada", "")).is_ok());
        assert!(store.replace(persona("new", "New", "")).is_err());
    }

    #[test]
    fn test_selection_lifecycle() {
        let mut store = sample_store();
        assert!(store.selected().is_none());
        assert!(!store.select("missing"));

        assert!(store.select("c"));
        assert_eq!(store.selected().unwrap().name, "Alan Turing");

        store.remove("c");
        assert!(store.selected().is_none());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_search_empty_query_returns_all() {
        let store = sample_store();
        assert_eq!(store.search("  ").len(), 3);
    }

    #[test]
    fn test_search_ranks_name_matches() {
        let store = sample_store();
        let results = store.search("grace");
        assert!(!results.is_empty());
        assert_eq!(results[0].id, "b");
    }

    #[test]
    fn test_search_no_match() {
        let store = sample_store();
        assert!(store.search("qqqqxj").is_empty());
    }

    #[test]
    fn test_library_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(LIBRARY_FILE_NAME);

        let mut store = sample_store();
        store.update("b", &PersonaPatch::default().with_list(ListField::Goals, "Teach"))
            .unwrap();
        store.select("b");
        save_library(&path, &store).unwrap();

        let loaded = load_library(&path).unwrap();
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded.selected_id(), Some("b"));
        assert_eq!(loaded.get("b").unwrap().goals.texts(), vec!["Teach"]);
    }

    #[test]
    fn test_load_missing_or_empty_library() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(LIBRARY_FILE_NAME);
        assert!(load_library(&path).unwrap().is_empty());

        fs::write(&path, "  \n").unwrap();
        assert!(load_library(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_library_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(LIBRARY_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_library(&path), Err(Error::PersonaParse(_))));
    }

    #[test]
    fn test_load_library_with_one_bad_record_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(LIBRARY_FILE_NAME);
        fs::write(
            &path,
            r#"{"personas": [{"id": "keep", "name": "Ada"}, {"id": "bad", "goals": 42}]}"#,
        )
        .unwrap();

        match load_library(&path) {
            Err(Error::PersonaParse(message)) => {
                assert!(message.contains("a string or an array of strings"), "{}", message)
            }
            other => panic!("Expected PersonaParse, got {:?}", other.map(|s| s.len())),
        }
        // Loading never touches the file
        assert!(fs::read_to_string(&path).unwrap().contains("\"keep\""));
    }

    #[test]
    fn test_set_aside_library_keeps_contents() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(LIBRARY_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let moved = set_aside_library(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(moved.parent(), path.parent());
        let name = moved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("personas.json.corrupt-"), "{}", name);
        assert_eq!(fs::read_to_string(&moved).unwrap(), "{ not json");
    }

    #[test]
    fn test_set_aside_missing_library_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = set_aside_library(&temp_dir.path().join(LIBRARY_FILE_NAME));
        assert!(matches!(result, Err(Error::FileWrite { .. })));
    }

    #[test]
    fn test_load_ignores_dangling_selection() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join(LIBRARY_FILE_NAME);
        fs::write(&path, r#"{"personas": [{"id": "a"}], "selected": "gone"}"#).unwrap();

        let store = load_library(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.selected().is_none());
    }
}
