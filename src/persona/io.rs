//! Reading and writing standalone persona files.

use super::PersonaRecord;
use crate::error::{Error, Result};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Files saved from the generation service wrap the record as
/// `{ "persona": {...}, "persona_id": "..." }`.
#[derive(Deserialize)]
struct Envelope {
    persona: PersonaRecord,
    #[serde(default)]
    persona_id: Option<String>,
}

/// Parse a persona from JSON text, either a bare record or an envelope.
///
/// The shape is picked by the presence of a `persona` key, so a bad field
/// is reported as itself rather than as a shape mismatch.
pub fn parse_persona_json(json: &str) -> Result<PersonaRecord> {
    let value: Value = serde_json::from_str(json)?;
    let is_envelope = value
        .as_object()
        .is_some_and(|object| object.get("persona").is_some_and(Value::is_object));

    if is_envelope {
        let Envelope {
            mut persona,
            persona_id,
        } = serde_json::from_value(value)?;
        if let Some(id) = persona_id.filter(|id| !id.is_empty()) {
            persona.id = id;
        }
        Ok(persona)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

/// Read a persona from a JSON file.
pub fn read_persona_file(path: &Path) -> Result<PersonaRecord> {
    let contents = fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let record = parse_persona_json(&contents)?;
    info!("Opened persona '{}' from {}", record.id, path.display());
    Ok(record)
}

/// Write a persona to a JSON file.
pub fn write_persona_file(path: &Path, record: &PersonaRecord) -> Result<()> {
    let json = serde_json::to_string_pretty(record)?;
    write_atomic(path, &json)?;
    info!("Saved persona '{}' to {}", record.id, path.display());
    Ok(())
}

/// Write `contents` next to `path` first, then rename over it.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!("Creating directory: {}", parent.display());
            fs::create_dir_all(parent).map_err(|e| Error::FileWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    let backup = Path::new(&backup);

    fs::write(backup, contents).map_err(|e| Error::FileWrite {
        path: backup.to_path_buf(),
        source: e,
    })?;
    fs::rename(backup, path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::TagList;
    use tempfile::TempDir;

    #[test]
    fn test_parse_bare_record() {
        let record = parse_persona_json(r#"{"id": "p", "name": "Ada"}"#).unwrap();
        assert_eq!(record.id, "p");
        assert_eq!(record.name, "Ada");
    }

    #[test]
    fn test_parse_envelope_uses_persona_id() {
        let json = r#"{
            "persona": {"name": "Ada", "skills": ["Python, Go"]},
            "persona_id": "2f9c"
        }"#;
        let record = parse_persona_json(json).unwrap();
        assert_eq!(record.id, "2f9c");
        assert_eq!(record.skills.texts(), vec!["Python", "Go"]);
    }

    #[test]
    fn test_bad_field_error_names_the_problem() {
        let bare = parse_persona_json(r#"{"id": "p", "goals": 42}"#).unwrap_err();
        let message = bare.to_string();
        assert!(message.contains("invalid type"), "{}", message);
        assert!(!message.contains("did not match any variant"), "{}", message);

        let wrapped =
            parse_persona_json(r#"{"persona": {"skills": true}, "persona_id": "x"}"#).unwrap_err();
        assert!(wrapped.to_string().contains("invalid type"), "{}", wrapped);
    }

    #[test]
    fn test_write_then_read() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("cards").join("ada.json");

        let mut record = PersonaRecord::with_id("ada");
        record.name = "Ada".to_string();
        record.strengths = TagList::from_texts(["Focus, Curiosity"]);
        write_persona_file(&path, &record).unwrap();

        let loaded = read_persona_file(&path).unwrap();
        assert_eq!(loaded, record);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"Curiosity\""));
        assert!(!temp_dir.path().join("cards").join("ada.json.bak").exists());
    }

    #[test]
    fn test_read_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = read_persona_file(&temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
