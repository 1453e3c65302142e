use crate::record::{Compound, Tag};

use super::keys;

/// A run of text with one packed style word per character.
///
/// The style word is opaque to the binding core; renderers decode color and
/// formatting bits out of it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledText {
    value: String,
    styling: Vec<i32>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a run where every character carries the same style word.
    pub fn uniform(value: &str, style: i32) -> Self {
        Self {
            value: value.to_string(),
            styling: vec![style; value.chars().count()],
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn styling(&self) -> &[i32] {
        &self.styling
    }

    pub fn len(&self) -> usize {
        self.styling.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styling.is_empty()
    }

    pub fn to_record(&self) -> Compound {
        let mut record = Compound::new();
        record.insert(keys::TEXT_VALUE, self.value.as_str());
        record.insert(
            keys::TEXT_STYLING,
            Tag::List(self.styling.iter().map(|style| Tag::Int(*style)).collect()),
        );
        record
    }

    /// Returns `None` when the record is not a well-formed styled run: a
    /// missing value, non-integer style words, or one style word per character
    /// not holding.
    pub fn from_record(record: &Compound) -> Option<Self> {
        let value = record.get_string(keys::TEXT_VALUE)?;
        let styling = record
            .get_list(keys::TEXT_STYLING)?
            .iter()
            .map(|tag| match tag {
                Tag::Int(style) => Some(*style),
                _ => None,
            })
            .collect::<Option<Vec<i32>>>()?;
        if styling.len() != value.chars().count() {
            return None;
        }
        Some(Self {
            value: value.to_string(),
            styling,
        })
    }
}
