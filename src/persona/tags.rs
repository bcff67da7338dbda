//! Tag normalization for persona list fields.
//!
//! A list field arrives either as one `", "`-joined string or as an array of
//! such strings. [`ListContent`] models that union, [`normalize`] flattens it
//! into plain tag texts, and [`TagList`] holds the normalized tags with
//! durable ids for editing.

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The literal separator between items in a stored list string.
pub const SEPARATOR: &str = ", ";

static NEXT_TAG_ID: AtomicU64 = AtomicU64::new(1);

// ─────────────────────────────────────────────────────────────────────────────
// Stored Representation
// ─────────────────────────────────────────────────────────────────────────────

/// Stored form of a list field: a single joined string or an array of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ListContent {
    /// `"a, b, c"`
    Joined(String),
    /// `["a, b", "c"]`
    Items(Vec<String>),
}

impl<'de> Deserialize<'de> for ListContent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ListContentVisitor;

        impl<'de> Visitor<'de> for ListContentVisitor {
            type Value = ListContent;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or an array of strings")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ListContent, E> {
                Ok(ListContent::Joined(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<ListContent, E> {
                Ok(ListContent::Joined(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ListContent, A::Error> {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element::<String>()? {
                    items.push(item);
                }
                Ok(ListContent::Items(items))
            }
        }

        deserializer.deserialize_any(ListContentVisitor)
    }
}

impl Default for ListContent {
    fn default() -> Self {
        ListContent::Items(Vec::new())
    }
}

impl ListContent {
    /// Normalize this content into plain tag texts.
    pub fn normalize(&self) -> Vec<String> {
        normalize(self)
    }
}

impl From<&str> for ListContent {
    fn from(s: &str) -> Self {
        ListContent::Joined(s.to_string())
    }
}

impl From<String> for ListContent {
    fn from(s: String) -> Self {
        ListContent::Joined(s)
    }
}

impl From<Vec<String>> for ListContent {
    fn from(items: Vec<String>) -> Self {
        ListContent::Items(items)
    }
}

impl From<Vec<&str>> for ListContent {
    fn from(items: Vec<&str>) -> Self {
        ListContent::Items(items.into_iter().map(str::to_string).collect())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalize / Serialize
// ─────────────────────────────────────────────────────────────────────────────

/// Split stored list content into non-empty tag texts, preserving order.
///
/// Only the exact separator `", "` splits; other whitespace stays inside the
/// segment.
pub fn normalize(content: &ListContent) -> Vec<String> {
    match content {
        ListContent::Joined(s) => split_segments(s).collect(),
        ListContent::Items(items) => items.iter().flat_map(|s| split_segments(s)).collect(),
    }
}

/// Join tag texts back into a single stored string.
pub fn serialize<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

fn split_segments(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(SEPARATOR)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tags
// ─────────────────────────────────────────────────────────────────────────────

/// Durable identifier of a tag, stable across edits and reorders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TagId(u64);

impl TagId {
    /// Allocate a fresh, process-unique id.
    pub fn next() -> Self {
        TagId(NEXT_TAG_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl From<u64> for TagId {
    fn from(raw: u64) -> Self {
        TagId(raw)
    }
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One list item as seen by the tag-input widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub text: String,
}

impl Tag {
    /// Create a tag with a freshly allocated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: TagId::next(),
            text: text.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tag List
// ─────────────────────────────────────────────────────────────────────────────

/// A normalized list field.
///
/// Deserializes from either stored form and always serializes as an array of
/// strings, one per tag. Equality compares texts only; ids are session-local.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ListContent", into = "Vec<String>")]
pub struct TagList {
    tags: Vec<Tag>,
}

impl TagList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from texts, normalizing each of them.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items: Vec<String> = texts.into_iter().map(Into::into).collect();
        Self::from(ListContent::Items(items))
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    /// Tag texts in order.
    pub fn texts(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.text.clone()).collect()
    }

    /// The list as one `", "`-joined string.
    pub fn joined(&self) -> String {
        serialize(&self.texts())
    }

    /// Replace the contents with tags coming back from the editor.
    ///
    /// A tag whose text splits into several segments becomes several tags;
    /// the first keeps the original id. Empty tags are dropped.
    pub fn replace_with(&mut self, tags: Vec<Tag>) {
        let mut normalized = Vec::with_capacity(tags.len());
        for tag in tags {
            let mut segments = split_segments(&tag.text);
            if let Some(first) = segments.next() {
                normalized.push(Tag {
                    id: tag.id,
                    text: first,
                });
                normalized.extend(segments.map(Tag::new));
            }
        }
        self.tags = normalized;
    }
}

impl PartialEq for TagList {
    fn eq(&self, other: &Self) -> bool {
        self.tags.len() == other.tags.len()
            && self
                .tags
                .iter()
                .zip(&other.tags)
                .all(|(a, b)| a.text == b.text)
    }
}

impl From<ListContent> for TagList {
    fn from(content: ListContent) -> Self {
        Self {
            tags: normalize(&content).into_iter().map(Tag::new).collect(),
        }
    }
}

impl From<TagList> for Vec<String> {
    fn from(list: TagList) -> Self {
        list.tags.into_iter().map(|t| t.text).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(content: impl Into<ListContent>) -> Vec<String> {
        normalize(&content.into())
    }

    #[test]
    fn test_normalize_joined_string() {
        assert_eq!(norm("a, b, c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_flattens_items_in_order() {
        assert_eq!(norm(vec!["a, b", "c"]), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_normalize_without_separator() {
        assert_eq!(norm("Leadership"), vec!["Leadership"]);
        assert_eq!(norm("a,b"), vec!["a,b"]);
        assert_eq!(norm("a ,b"), vec!["a ,b"]);
    }

    #[test]
    fn test_normalize_empty_inputs() {
        assert!(norm("").is_empty());
        assert!(norm(Vec::<String>::new()).is_empty());
        assert!(norm(vec!["", ""]).is_empty());
    }

    #[test]
    fn test_normalize_drops_empty_segments() {
        assert_eq!(norm("a, , b"), vec!["a", "b"]);
        assert_eq!(norm(", a, "), vec!["a"]);
    }

    #[test]
    fn test_normalize_separator_is_exact() {
        assert_eq!(norm("a,  b"), vec!["a", " b"]);
    }

    #[test]
    fn test_normalize_is_idempotent_through_serialize() {
        let inputs: Vec<ListContent> = vec![
            "a, b, c".into(),
            vec!["a, b", "c"].into(),
            "a,  b".into(),
            "x,, y".into(),
            "".into(),
            vec!["Grow, Lead", "", "Mentor"].into(),
        ];
        for input in inputs {
            let first = normalize(&input);
            let again = normalize(&ListContent::Joined(serialize(&first)));
            assert_eq!(again, first, "input: {:?}", input);

            let as_items = normalize(&ListContent::Items(first.clone()));
            assert_eq!(as_items, first);
        }
    }

    #[test]
    fn test_list_content_deserializes_both_forms() {
        let joined: ListContent = serde_json::from_str(r#""a, b""#).unwrap();
        assert_eq!(joined, ListContent::Joined("a, b".to_string()));

        let items: ListContent = serde_json::from_str(r#"["a, b", "c"]"#).unwrap();
        assert_eq!(items.normalize(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_list_content_rejects_other_shapes() {
        let err = serde_json::from_str::<ListContent>("42").unwrap_err();
        assert!(err.to_string().contains("a string or an array of strings"));
        assert!(serde_json::from_str::<TagList>(r#"{"a": 1}"#).is_err());
        assert!(serde_json::from_str::<TagList>(r#"["a", 3]"#).is_err());
    }

    #[test]
    fn test_tag_list_serializes_one_entry_per_tag() {
        let list: TagList = serde_json::from_str(r#""Python, Go""#).unwrap();
        assert_eq!(
            serde_json::to_string(&list).unwrap(),
            r#"["Python","Go"]"#
        );
    }

    #[test]
    fn test_tag_ids_are_unique() {
        let list = TagList::from_texts(["a", "b", "c"]);
        let mut ids: Vec<TagId> = list.iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_replace_with_preserves_ids_across_reorder() {
        let mut list = TagList::from_texts(["a", "b", "c"]);
        let mut reordered = list.tags().to_vec();
        reordered.swap(0, 2);
        let expected_ids: Vec<TagId> = reordered.iter().map(|t| t.id).collect();

        list.replace_with(reordered);

        assert_eq!(list.texts(), vec!["c", "b", "a"]);
        let ids: Vec<TagId> = list.iter().map(|t| t.id).collect();
        assert_eq!(ids, expected_ids);
    }

    #[test]
    fn test_replace_with_splits_joined_text() {
        let mut list = TagList::new();
        let tag = Tag {
            id: TagId::from(7),
            text: "Rust, Go".to_string(),
        };
        list.replace_with(vec![tag, Tag::new("")]);

        assert_eq!(list.texts(), vec!["Rust", "Go"]);
        assert_eq!(list.tags()[0].id, TagId::from(7));
        assert_ne!(list.tags()[1].id, TagId::from(7));
    }

    #[test]
    fn test_tag_list_equality_ignores_ids() {
        let a = TagList::from_texts(["x", "y"]);
        let b = TagList::from_texts(["x, y"]);
        assert_eq!(a, b);
        assert_ne!(a, TagList::from_texts(["y", "x"]));
    }

    #[test]
    fn test_joined() {
        let list = TagList::from_texts(["a", "b"]);
        assert_eq!(list.joined(), "a, b");
    }
}
