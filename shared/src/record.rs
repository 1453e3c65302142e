use std::collections::{btree_map, BTreeMap};

/// A single value inside a persisted record.
#[derive(Clone, Debug, PartialEq)]
pub enum Tag {
    Byte(i8),
    Int(i32),
    Long(i64),
    String(String),
    List(Vec<Tag>),
    Compound(Compound),
}

impl Tag {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Tag::Byte(_) => "byte",
            Tag::Int(_) => "int",
            Tag::Long(_) => "long",
            Tag::String(_) => "string",
            Tag::List(_) => "list",
            Tag::Compound(_) => "compound",
        }
    }

    /// Partial structural match, see [`Compound::matches_partial`].
    pub fn matches_partial(&self, other: &Tag) -> bool {
        match (self, other) {
            (Tag::Compound(left), Tag::Compound(right)) => left.matches_partial(right),
            (Tag::List(left), Tag::List(right)) => {
                if left.is_empty() {
                    return right.is_empty();
                }
                left.iter()
                    .all(|entry| right.iter().any(|candidate| entry.matches_partial(candidate)))
            }
            (left, right) => left == right,
        }
    }
}

impl From<i32> for Tag {
    fn from(value: i32) -> Self {
        Tag::Int(value)
    }
}

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Tag::Long(value)
    }
}

impl From<&str> for Tag {
    fn from(value: &str) -> Self {
        Tag::String(value.to_string())
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::String(value)
    }
}

impl From<Compound> for Tag {
    fn from(value: Compound) -> Self {
        Tag::Compound(value)
    }
}

/// Keyed structured record, the persisted shape of every payload.
///
/// Entries are kept sorted by key so two records holding the same data always
/// compare (and iterate) identically, whatever order they were written in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compound {
    entries: BTreeMap<String, Tag>,
}

impl Compound {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Tag> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Tag> {
        self.entries.iter()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Tag>) -> Option<Tag> {
        self.entries.insert(key.to_string(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Tag> {
        self.entries.remove(key)
    }

    // Typed getters. Each returns `None` both when the key is absent and when
    // it holds a value of another kind: stripped and retyped fields look alike.

    pub fn get_byte(&self, key: &str) -> Option<i8> {
        match self.entries.get(key) {
            Some(Tag::Byte(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_int(&self, key: &str) -> Option<i32> {
        match self.entries.get(key) {
            Some(Tag::Int(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_long(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(Tag::Long(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(Tag::String(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn get_list(&self, key: &str) -> Option<&[Tag]> {
        match self.entries.get(key) {
            Some(Tag::List(value)) => Some(value.as_slice()),
            _ => None,
        }
    }

    pub fn get_compound(&self, key: &str) -> Option<&Compound> {
        match self.entries.get(key) {
            Some(Tag::Compound(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_compound_mut(&mut self, key: &str) -> Option<&mut Compound> {
        match self.entries.get_mut(key) {
            Some(Tag::Compound(value)) => Some(value),
            _ => None,
        }
    }

    /// Entries of a list field that are compounds, skipping anything else.
    pub fn compounds_in(&self, key: &str) -> impl Iterator<Item = &Compound> {
        self.get_list(key)
            .unwrap_or(&[])
            .iter()
            .filter_map(|tag| match tag {
                Tag::Compound(compound) => Some(compound),
                _ => None,
            })
    }

    /// True when every entry of `self` is present in `other` with a partially
    /// matching value. `other` may carry extra entries (captured colors, for
    /// instance) without breaking the match.
    pub fn matches_partial(&self, other: &Compound) -> bool {
        self.entries.iter().all(|(key, value)| match other.entries.get(key) {
            Some(candidate) => value.matches_partial(candidate),
            None => false,
        })
    }
}

impl FromIterator<(String, Tag)> for Compound {
    fn from_iter<I: IntoIterator<Item = (String, Tag)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
