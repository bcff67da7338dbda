//! Sections of a persona card and the fields behind them.
//!
//! Every list section is addressed through [`ListField`], a fixed table of
//! title, storage name and accessor pairs. Title-derived keys resolve through
//! the same table so an unknown title never turns into a stray field.

use super::{PersonaRecord, TagList};

/// One of the seven tag-list fields of a persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListField {
    Goals,
    NextSteps,
    LifeExperiences,
    QualificationsAndEducation,
    Skills,
    Strengths,
    ValueProposition,
}

impl ListField {
    /// All list fields in display order.
    pub const ALL: [ListField; 7] = [
        ListField::Goals,
        ListField::NextSteps,
        ListField::LifeExperiences,
        ListField::QualificationsAndEducation,
        ListField::Skills,
        ListField::Strengths,
        ListField::ValueProposition,
    ];

    /// Human-readable section title.
    pub fn title(&self) -> &'static str {
        match self {
            ListField::Goals => "Goals",
            ListField::NextSteps => "Next Steps",
            ListField::LifeExperiences => "Life Experiences",
            ListField::QualificationsAndEducation => "Qualifications and Education",
            ListField::Skills => "Skills",
            ListField::Strengths => "Strengths",
            ListField::ValueProposition => "Value Proposition",
        }
    }

    /// Field name used in persona JSON documents.
    pub fn storage_name(&self) -> &'static str {
        match self {
            ListField::Goals => "goals",
            ListField::NextSteps => "nextSteps",
            ListField::LifeExperiences => "lifeExperiences",
            ListField::QualificationsAndEducation => "qualificationsAndEducation",
            ListField::Skills => "skills",
            ListField::Strengths => "strengths",
            ListField::ValueProposition => "valueProposition",
        }
    }

    /// Resolve a key produced by [`storage_key_for_title`] (or any storage
    /// name, case-insensitively).
    pub fn from_storage_key(key: &str) -> Option<ListField> {
        Self::ALL
            .into_iter()
            .find(|field| field.storage_name().eq_ignore_ascii_case(key))
    }

    /// Resolve a human-readable section title.
    pub fn from_title(title: &str) -> Option<ListField> {
        Self::from_storage_key(&storage_key_for_title(title))
    }

    pub fn get<'a>(&self, record: &'a PersonaRecord) -> &'a TagList {
        match self {
            ListField::Goals => &record.goals,
            ListField::NextSteps => &record.next_steps,
            ListField::LifeExperiences => &record.life_experiences,
            ListField::QualificationsAndEducation => &record.qualifications_and_education,
            ListField::Skills => &record.skills,
            ListField::Strengths => &record.strengths,
            ListField::ValueProposition => &record.value_proposition,
        }
    }

    pub fn get_mut<'a>(&self, record: &'a mut PersonaRecord) -> &'a mut TagList {
        match self {
            ListField::Goals => &mut record.goals,
            ListField::NextSteps => &mut record.next_steps,
            ListField::LifeExperiences => &mut record.life_experiences,
            ListField::QualificationsAndEducation => &mut record.qualifications_and_education,
            ListField::Skills => &mut record.skills,
            ListField::Strengths => &mut record.strengths,
            ListField::ValueProposition => &mut record.value_proposition,
        }
    }
}

/// Derive a storage key from a section title: lower-cased, whitespace removed.
///
/// `"Next Steps"` becomes `"nextsteps"`.
pub fn storage_key_for_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A titled region of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    NameSummary,
    List(ListField),
}

impl Section {
    /// All sections in display order.
    pub fn all() -> impl Iterator<Item = Section> {
        std::iter::once(Section::NameSummary).chain(ListField::ALL.into_iter().map(Section::List))
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::NameSummary => "Name and Summary",
            Section::List(field) => field.title(),
        }
    }

    /// Title shown above the section. The name/summary block has none.
    pub fn display_title(&self) -> &'static str {
        match self {
            Section::NameSummary => "",
            Section::List(field) => field.title(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_for_title() {
        assert_eq!(storage_key_for_title("Next Steps"), "nextsteps");
        assert_eq!(
            storage_key_for_title("Qualifications and Education"),
            "qualificationsandeducation"
        );
        assert_eq!(storage_key_for_title("  Value\tProposition "), "valueproposition");
    }

    #[test]
    fn test_every_title_resolves_to_its_field() {
        for field in ListField::ALL {
            assert_eq!(ListField::from_title(field.title()), Some(field));
        }
    }

    #[test]
    fn test_unknown_title_does_not_resolve() {
        assert_eq!(ListField::from_title("Hobbies"), None);
        assert_eq!(ListField::from_title("Name and Summary"), None);
    }

    #[test]
    fn test_storage_names_resolve() {
        assert_eq!(
            ListField::from_storage_key("lifeExperiences"),
            Some(ListField::LifeExperiences)
        );
    }

    #[test]
    fn test_accessors_address_distinct_fields() {
        let mut record = PersonaRecord::with_id("p1");
        for (i, field) in ListField::ALL.into_iter().enumerate() {
            *field.get_mut(&mut record) = TagList::from_texts([format!("item {}", i)]);
        }
        for (i, field) in ListField::ALL.into_iter().enumerate() {
            assert_eq!(field.get(&record).texts(), vec![format!("item {}", i)]);
        }
    }

    #[test]
    fn test_section_order() {
        let titles: Vec<&str> = Section::all().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec![
                "Name and Summary",
                "Goals",
                "Next Steps",
                "Life Experiences",
                "Qualifications and Education",
                "Skills",
                "Strengths",
                "Value Proposition",
            ]
        );
        assert_eq!(Section::NameSummary.display_title(), "");
    }
}
