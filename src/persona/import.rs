//! Import of personas from model-generated text.
//!
//! Generated profiles mark sections either as `- Name: ...` lines or as
//! `<Skills> ... </Skills>` blocks. Everything between two markers belongs to
//! the section opened by the first one, one item per non-empty line.

use super::section::ListField;
use super::store::PersonaPatch;
use super::tags::ListContent;
use super::PersonaRecord;
use crate::error::{Error, Result};
use log::{debug, info};
use regex::Regex;
use std::sync::OnceLock;

/// `- Word:` section headers and `<Word>` / `</Word>` block markers.
const SECTION_PATTERN: &str = r"-\s(\w+):|<(/?)(\w+)>";

static SECTION_REGEX: OnceLock<Regex> = OnceLock::new();

/// The compiled section pattern, built on first use.
fn section_regex() -> Result<&'static Regex> {
    if let Some(regex) = SECTION_REGEX.get() {
        return Ok(regex);
    }
    let regex = Regex::new(SECTION_PATTERN)
        .map_err(|e| Error::Application(format!("Invalid section pattern: {}", e)))?;
    Ok(SECTION_REGEX.get_or_init(|| regex))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Name,
    Summary,
    List(ListField),
}

impl Target {
    fn from_word(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("name") {
            Some(Target::Name)
        } else if word.eq_ignore_ascii_case("summary") {
            Some(Target::Summary)
        } else {
            ListField::from_storage_key(word).map(Target::List)
        }
    }
}

#[derive(Default)]
struct Collected {
    name: Vec<String>,
    summary: Vec<String>,
    lists: Vec<(ListField, Vec<String>)>,
}

impl Collected {
    fn push(&mut self, target: Target, item: String) {
        match target {
            Target::Name => self.name.push(item),
            Target::Summary => self.summary.push(item),
            Target::List(field) => match self.lists.iter_mut().find(|(f, _)| *f == field) {
                Some((_, items)) => items.push(item),
                None => self.lists.push((field, vec![item])),
            },
        }
    }

    fn push_block(&mut self, target: Option<Target>, block: &str) {
        let Some(target) = target else {
            return;
        };
        for item in block.lines().filter_map(clean_line) {
            self.push(target, item);
        }
    }
}

/// Strip bullets and padding from one generated line.
fn clean_line(line: &str) -> Option<String> {
    let cleaned = line
        .trim()
        .trim_start_matches(|c: char| c == '*' || c == '-' || c.is_whitespace())
        .trim();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Parse generated profile text into a new persona.
///
/// The result has a freshly generated id. Fails when no known section is
/// found in the text.
pub fn parse_generated_persona(text: &str) -> Result<PersonaRecord> {
    let patch = parse_generated_patch(text)?;
    let mut record = PersonaRecord::empty();
    patch.apply_to(&mut record);
    info!("Imported generated persona '{}'", record.display_name());
    Ok(record)
}

/// Parse generated profile text into a partial update.
///
/// Only the sections present in the text are set, so applying the patch to
/// an existing persona leaves its other fields alone.
pub fn parse_generated_patch(text: &str) -> Result<PersonaPatch> {
    let pattern = section_regex()?;

    let mut collected = Collected::default();
    let mut current: Option<Target> = None;
    let mut found_section = false;
    let mut last_end = 0;

    for caps in pattern.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        collected.push_block(current, &text[last_end..whole.start()]);
        last_end = whole.end();

        if let Some(word) = caps.get(1) {
            match Target::from_word(word.as_str()) {
                Some(target) => {
                    current = Some(target);
                    found_section = true;
                }
                // An unrecognised header word stays part of the open section.
                None => {
                    if let Some(target) = current {
                        collected.push(target, word.as_str().to_string());
                    }
                }
            }
        } else if let Some(word) = caps.get(3) {
            let closing = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
            let target = Target::from_word(word.as_str());
            if closing {
                if target.is_some() && target == current {
                    current = None;
                }
            } else if let Some(target) = target {
                current = Some(target);
                found_section = true;
            }
        }
    }
    collected.push_block(current, &text[last_end..]);

    if !found_section {
        return Err(Error::PersonaParse(
            "no persona sections found in generated text".to_string(),
        ));
    }

    let mut patch = PersonaPatch {
        name: (!collected.name.is_empty()).then(|| collected.name.join(" ")),
        summary: (!collected.summary.is_empty()).then(|| collected.summary.join(" ")),
        ..PersonaPatch::default()
    };
    for (field, items) in collected.lists {
        debug!("Parsed {} line(s) for {}", items.len(), field.storage_name());
        patch = patch.with_list(field, ListContent::Items(items));
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::TagList;

    const GENERATED: &str = "\
Here is the profile card:

- Name: Jordan Rivera
- Summary: A steady leader who turns logistics experience into calm,
organized project delivery.

</PersonalInfo>
<QualificationsAndEducation>
- Associate Degree in Business, Operations focus
- Forklift Certification
</QualificationsAndEducation>
<Skills>
* Inventory management, Advanced
* Team coordination
...
</Skills>
<NextSteps>
- Enroll in PMP course, Certification, 6 months
</NextSteps>
";

    #[test]
    fn test_parses_header_sections() {
        let record = parse_generated_persona(GENERATED).unwrap();
        assert_eq!(record.name, "Jordan Rivera");
        assert_eq!(
            record.summary,
            "A steady leader who turns logistics experience into calm, organized project delivery."
        );
    }

    #[test]
    fn test_parses_block_sections_and_splits_items() {
        let record = parse_generated_persona(GENERATED).unwrap();
        assert_eq!(
            record.qualifications_and_education.texts(),
            vec![
                "Associate Degree in Business",
                "Operations focus",
                "Forklift Certification"
            ]
        );
        assert_eq!(
            record.skills.texts(),
            vec!["Inventory management", "Advanced", "Team coordination"]
        );
        assert_eq!(
            record.next_steps.texts(),
            vec!["Enroll in PMP course", "Certification", "6 months"]
        );
        assert!(record.goals.is_empty());
    }

    #[test]
    fn test_imported_persona_gets_fresh_id() {
        let a = parse_generated_persona("- Name: A").unwrap();
        let b = parse_generated_persona("- Name: A").unwrap();
        assert!(!a.id.is_empty());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_header_form_for_lists() {
        let text = "- Goals:\n* Become a nurse\n* Finish degree\n- Strengths: Patience";
        let record = parse_generated_persona(text).unwrap();
        assert_eq!(record.goals.texts(), vec!["Become a nurse", "Finish degree"]);
        assert_eq!(record.strengths.texts(), vec!["Patience"]);
    }

    #[test]
    fn test_text_before_first_section_is_ignored() {
        let record = parse_generated_persona("intro line\n- Skills: Welding").unwrap();
        assert_eq!(record.skills.texts(), vec!["Welding"]);
        assert!(record.name.is_empty());
    }

    #[test]
    fn test_patch_only_sets_found_sections() {
        let patch = parse_generated_patch("<Skills>\n* Welding\n</Skills>").unwrap();
        assert!(patch.name.is_none());
        assert!(patch.summary.is_none());
        assert!(patch.goals.is_none());

        let mut record = PersonaRecord::with_id("keep");
        record.name = "Sam".to_string();
        record.goals = TagList::from_texts(["Lead a crew"]);
        patch.apply_to(&mut record);

        assert_eq!(record.id, "keep");
        assert_eq!(record.name, "Sam");
        assert_eq!(record.goals.texts(), vec!["Lead a crew"]);
        assert_eq!(record.skills.texts(), vec!["Welding"]);
    }

    #[test]
    fn test_no_sections_is_an_error() {
        let result = parse_generated_persona("just some prose without markers");
        assert!(matches!(result, Err(Error::PersonaParse(_))));
    }

    #[test]
    fn test_section_regex_is_compiled_once() {
        let first = section_regex().unwrap() as *const Regex;
        let second = section_regex().unwrap() as *const Regex;
        assert_eq!(first, second);
    }

    #[test]
    fn test_clean_line() {
        assert_eq!(clean_line("  * - item  "), Some("item".to_string()));
        assert_eq!(clean_line("..."), None);
        assert_eq!(clean_line("   "), None);
    }
}
