//! Pure layout of a persona card.
//!
//! [`render_card`] turns a record plus the active mode and format into a
//! [`CardLayout`]: an ordered list of sections, each already in the shape the
//! painter (or the HTML exporter) draws. Nothing here touches egui, so the
//! layout rules are tested directly.

use crate::config::{CardFormat, CardMode};
use crate::persona::{ListField, PersonaRecord, Section, Tag};

/// Placeholder title shown when no persona is selected.
pub const PLACEHOLDER_TITLE: &str = "No Card Selected";

/// Placeholder message shown when no persona is selected.
pub const PLACEHOLDER_MESSAGE: &str =
    "Please select a card from the dropdown above to view its content.";

/// One section of the rendered card.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionLayout {
    /// No record resolved.
    Placeholder {
        title: &'static str,
        message: &'static str,
    },
    /// View mode: name as heading, summary as paragraph.
    NameSummary { name: String, summary: String },
    /// View mode, bullet format: one line item per tag.
    BulletList {
        field: ListField,
        title: &'static str,
        items: Vec<String>,
    },
    /// View mode, card format: one chip per tag.
    Chips {
        field: ListField,
        title: &'static str,
        items: Vec<String>,
    },
    /// Edit mode: single-line name and multi-line summary inputs.
    ScalarInputs { name: String, summary: String },
    /// Edit mode: tag input seeded with durable tags.
    TagEditor {
        field: ListField,
        title: &'static str,
        tags: Vec<Tag>,
    },
}

impl SectionLayout {
    /// Title drawn above the section. Empty for the name/summary block.
    pub fn title(&self) -> &'static str {
        match self {
            SectionLayout::Placeholder { title, .. } => *title,
            SectionLayout::NameSummary { .. } | SectionLayout::ScalarInputs { .. } => {
                Section::NameSummary.display_title()
            }
            SectionLayout::BulletList { title, .. }
            | SectionLayout::Chips { title, .. }
            | SectionLayout::TagEditor { title, .. } => *title,
        }
    }

    /// Whether the section spans every column of the grid.
    pub fn spans_full_width(&self) -> bool {
        matches!(
            self,
            SectionLayout::Placeholder { .. }
                | SectionLayout::NameSummary { .. }
                | SectionLayout::ScalarInputs { .. }
        )
    }
}

/// A fully laid-out card.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub columns: usize,
    pub sections: Vec<SectionLayout>,
}

impl CardLayout {
    pub fn is_placeholder(&self) -> bool {
        matches!(self.sections.as_slice(), [SectionLayout::Placeholder { .. }])
    }

    /// Rows of the grid: full-width sections stand alone, the rest are
    /// packed `columns` at a time in order.
    pub fn rows(&self) -> Vec<&[SectionLayout]> {
        let mut rows = Vec::new();
        let mut start = 0;
        let columns = self.columns.max(1);

        while start < self.sections.len() {
            if self.sections[start].spans_full_width() {
                rows.push(&self.sections[start..start + 1]);
                start += 1;
                continue;
            }
            let mut end = start;
            while end < self.sections.len()
                && end - start < columns
                && !self.sections[end].spans_full_width()
            {
                end += 1;
            }
            rows.push(&self.sections[start..end]);
            start = end;
        }
        rows
    }
}

/// Lay out `record` for the given mode and format.
pub fn render_card(
    record: Option<&PersonaRecord>,
    mode: CardMode,
    format: CardFormat,
) -> CardLayout {
    let Some(record) = record else {
        return CardLayout {
            columns: 1,
            sections: vec![SectionLayout::Placeholder {
                title: PLACEHOLDER_TITLE,
                message: PLACEHOLDER_MESSAGE,
            }],
        };
    };

    let sections = Section::all()
        .map(|section| render_section(record, section, mode, format))
        .collect();

    CardLayout {
        columns: format.columns(),
        sections,
    }
}

fn render_section(
    record: &PersonaRecord,
    section: Section,
    mode: CardMode,
    format: CardFormat,
) -> SectionLayout {
    match (section, mode) {
        (Section::NameSummary, CardMode::View) => SectionLayout::NameSummary {
            name: record.name.clone(),
            summary: record.summary.clone(),
        },
        (Section::NameSummary, CardMode::Edit) => SectionLayout::ScalarInputs {
            name: record.name.clone(),
            summary: record.summary.clone(),
        },
        (Section::List(field), CardMode::Edit) => SectionLayout::TagEditor {
            field,
            title: field.title(),
            tags: field.get(record).tags().to_vec(),
        },
        (Section::List(field), CardMode::View) => {
            let items = field.get(record).texts();
            match format {
                CardFormat::Bullet => SectionLayout::BulletList {
                    field,
                    title: field.title(),
                    items,
                },
                CardFormat::Card => SectionLayout::Chips {
                    field,
                    title: field.title(),
                    items,
                },
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::TagList;

    fn sample() -> PersonaRecord {
        let mut record = PersonaRecord::with_id("p");
        record.name = "Ada".to_string();
        record.summary = "Engineer".to_string();
        record.skills = TagList::from_texts(["Python, Go"]);
        record
    }

    #[test]
    fn test_absent_record_renders_placeholder() {
        for mode in [CardMode::View, CardMode::Edit] {
            for format in [CardFormat::Card, CardFormat::Bullet] {
                let layout = render_card(None, mode, format);
                assert!(layout.is_placeholder());
                assert_eq!(
                    layout.sections[0],
                    SectionLayout::Placeholder {
                        title: "No Card Selected",
                        message: "Please select a card from the dropdown above to view its content.",
                    }
                );
            }
        }
    }

    #[test]
    fn test_bullet_view_splits_joined_skills() {
        let record = sample();
        let layout = render_card(Some(&record), CardMode::View, CardFormat::Bullet);

        let skills = layout
            .sections
            .iter()
            .find_map(|s| match s {
                SectionLayout::BulletList {
                    field: ListField::Skills,
                    items,
                    ..
                } => Some(items.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(skills, vec!["Python", "Go"]);
        assert_eq!(layout.columns, 1);
    }

    #[test]
    fn test_card_view_uses_chips_and_two_columns() {
        let record = sample();
        let layout = render_card(Some(&record), CardMode::View, CardFormat::Card);
        assert_eq!(layout.columns, 2);
        assert!(matches!(
            &layout.sections[0],
            SectionLayout::NameSummary { name, summary } if name == "Ada" && summary == "Engineer"
        ));
        assert!(layout.sections[1..]
            .iter()
            .all(|s| matches!(s, SectionLayout::Chips { .. })));
    }

    #[test]
    fn test_section_order_and_titles() {
        let layout = render_card(Some(&sample()), CardMode::View, CardFormat::Card);
        let titles: Vec<&str> = layout.sections.iter().map(|s| s.title()).collect();
        assert_eq!(
            titles,
            vec![
                "",
                "Goals",
                "Next Steps",
                "Life Experiences",
                "Qualifications and Education",
                "Skills",
                "Strengths",
                "Value Proposition",
            ]
        );
    }

    #[test]
    fn test_edit_mode_hands_out_tags_with_ids() {
        let record = sample();
        let layout = render_card(Some(&record), CardMode::Edit, CardFormat::Bullet);

        assert!(matches!(layout.sections[0], SectionLayout::ScalarInputs { .. }));
        let tags = layout
            .sections
            .iter()
            .find_map(|s| match s {
                SectionLayout::TagEditor {
                    field: ListField::Skills,
                    tags,
                    ..
                } => Some(tags.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(tags, record.skills.tags().to_vec());
    }

    #[test]
    fn test_card_rows_pack_two_columns() {
        let layout = render_card(Some(&sample()), CardMode::View, CardFormat::Card);
        let rows = layout.rows();
        // name/summary alone, then seven list sections two by two
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 2);
        assert_eq!(rows[4].len(), 1);
    }

    #[test]
    fn test_bullet_rows_are_single_column() {
        let layout = render_card(Some(&sample()), CardMode::View, CardFormat::Bullet);
        assert_eq!(layout.rows().len(), 8);
    }
}
