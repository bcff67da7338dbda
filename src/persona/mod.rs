//! Persona domain model
//!
//! A persona is a career profile: a name, a short summary and seven tag-list
//! sections. This module defines the record itself and re-exports the pieces
//! that edit, store, import and persist it.

pub mod editor;
pub mod import;
pub mod io;
pub mod section;
pub mod store;
pub mod tags;

pub use editor::{NotifyPolicy, PersonaEditor, TagUpdate};
pub use import::{parse_generated_patch, parse_generated_persona};
pub use io::{read_persona_file, write_persona_file};
pub use section::{ListField, Section};
pub use store::PersonaStore;
pub use tags::{Tag, TagId, TagList};

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static NEXT_PERSONA_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Generate an id for a persona created in this session.
///
/// Time-derived with a process-wide sequence, so ids stay unique even when
/// several personas are created within the same millisecond.
pub fn generate_persona_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let sequence = NEXT_PERSONA_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("default-{}-{}", millis, sequence)
}

/// A single persona card.
///
/// List fields accept either stored form on load (see [`tags::ListContent`]) and
/// are written back as arrays of strings. The lower-case aliases match
/// documents produced by the generation service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaRecord {
    #[serde(default = "generate_persona_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub goals: TagList,
    #[serde(default, alias = "nextsteps")]
    pub next_steps: TagList,
    #[serde(default, alias = "lifeexperiences")]
    pub life_experiences: TagList,
    #[serde(default, alias = "qualificationsandeducation")]
    pub qualifications_and_education: TagList,
    #[serde(default)]
    pub skills: TagList,
    #[serde(default)]
    pub strengths: TagList,
    #[serde(default, alias = "valueproposition")]
    pub value_proposition: TagList,
}

impl PersonaRecord {
    /// A blank persona with a freshly generated id.
    pub fn empty() -> Self {
        Self::with_id(generate_persona_id())
    }

    /// A blank persona with the given id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            summary: String::new(),
            goals: TagList::new(),
            next_steps: TagList::new(),
            life_experiences: TagList::new(),
            qualifications_and_education: TagList::new(),
            skills: TagList::new(),
            strengths: TagList::new(),
            value_proposition: TagList::new(),
        }
    }

    /// Name to show in lists; falls back when the name is blank.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "Untitled persona"
        } else {
            name
        }
    }

    /// Whether every text and list field is empty.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty()
            && self.summary.is_empty()
            && ListField::ALL.iter().all(|f| f.get(self).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_persona_id_unique() {
        let a = generate_persona_id();
        let b = generate_persona_id();
        assert!(a.starts_with("default-"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_record_is_blank() {
        let record = PersonaRecord::empty();
        assert!(!record.id.is_empty());
        assert!(record.is_blank());
        assert_eq!(record.display_name(), "Untitled persona");
    }

    #[test]
    fn test_deserialize_mixed_list_forms() {
        let json = r#"{
            "id": "p-1",
            "name": "Ada",
            "summary": "Veteran turned engineer",
            "goals": "Grow, Lead",
            "nextSteps": ["Apply, Network", "Interview"],
            "skills": ["Python, Go"]
        }"#;
        let record: PersonaRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, "p-1");
        assert_eq!(record.goals.texts(), vec!["Grow", "Lead"]);
        assert_eq!(record.next_steps.texts(), vec!["Apply", "Network", "Interview"]);
        assert_eq!(record.skills.texts(), vec!["Python", "Go"]);
        assert!(record.strengths.is_empty());
    }

    #[test]
    fn test_deserialize_lowercase_keys() {
        let json = r#"{"nextsteps": ["Enroll"], "valueproposition": "Calm, Reliable"}"#;
        let record: PersonaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.next_steps.texts(), vec!["Enroll"]);
        assert_eq!(record.value_proposition.texts(), vec!["Calm", "Reliable"]);
    }

    #[test]
    fn test_missing_id_is_generated() {
        let record: PersonaRecord = serde_json::from_str(r#"{"name": "Ada"}"#).unwrap();
        assert!(record.id.starts_with("default-"));
    }

    #[test]
    fn test_serialize_writes_arrays_in_camel_case() {
        let mut record = PersonaRecord::with_id("p-2");
        record.next_steps = TagList::from_texts(["Apply, Network"]);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["nextSteps"], serde_json::json!(["Apply", "Network"]));
        assert_eq!(value["goals"], serde_json::json!([]));
    }
}
