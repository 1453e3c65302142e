use crate::record::{Compound, Tag};

use super::{
    connection_type::ConnectionType, error::PayloadError, keys, styled_text::StyledText,
};

/// One decorative element (a light, a pennant) in a cord's pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub id: String,
    pub color: Option<i32>,
}

impl Element {
    pub fn new(id: &str, color: Option<i32>) -> Self {
        Self {
            id: id.to_string(),
            color,
        }
    }

    pub fn to_record(&self) -> Compound {
        let mut record = Compound::new();
        record.insert(keys::ELEMENT_ID, self.id.as_str());
        if let Some(color) = self.color {
            let mut tag = Compound::new();
            tag.insert(keys::CUSTOM_COLOR, color);
            record.insert(keys::ELEMENT_TAG, tag);
        }
        record
    }

    pub fn from_record(record: &Compound) -> Option<Self> {
        let id = record.get_string(keys::ELEMENT_ID)?;
        let color = record
            .get_compound(keys::ELEMENT_TAG)
            .and_then(|tag| tag.get_int(keys::CUSTOM_COLOR));
        Some(Self::new(id, color))
    }
}

/// Typed view over a connection's persisted payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payload {
    HangingLights {
        pattern: Vec<Element>,
        string: String,
    },
    PennantBunting {
        pattern: Vec<Element>,
        text: Option<StyledText>,
    },
    Tinsel {
        color: Option<i32>,
    },
    Garland,
    LetterBunting {
        text: StyledText,
    },
}

impl Payload {
    /// Parses `record` as the payload of a `kind` connection.
    ///
    /// Fails with [`PayloadError::InvalidPayloadKind`] naming the first field
    /// whose shape does not fit. A missing record is only acceptable for kinds
    /// without required fields.
    pub fn from_record(
        kind: ConnectionType,
        record: Option<&Compound>,
    ) -> Result<Self, PayloadError> {
        let invalid = |field: &'static str| PayloadError::InvalidPayloadKind { kind, field };
        let empty = Compound::new();
        let record = record.unwrap_or(&empty);

        match kind {
            ConnectionType::HangingLights => {
                let pattern = read_pattern(record).ok_or_else(|| invalid(keys::PATTERN))?;
                let string = record
                    .get_string(keys::STRING)
                    .filter(|string| !string.is_empty())
                    .ok_or_else(|| invalid(keys::STRING))?;
                Ok(Payload::HangingLights {
                    pattern,
                    string: string.to_string(),
                })
            }
            ConnectionType::PennantBunting => {
                let pattern = read_pattern(record).ok_or_else(|| invalid(keys::PATTERN))?;
                let text = match record.get(keys::TEXT) {
                    None => None,
                    Some(Tag::Compound(text)) => {
                        Some(StyledText::from_record(text).ok_or_else(|| invalid(keys::TEXT))?)
                    }
                    Some(_) => return Err(invalid(keys::TEXT)),
                };
                Ok(Payload::PennantBunting { pattern, text })
            }
            ConnectionType::LetterBunting => {
                let text = record
                    .get_compound(keys::TEXT)
                    .and_then(StyledText::from_record)
                    .ok_or_else(|| invalid(keys::TEXT))?;
                Ok(Payload::LetterBunting { text })
            }
            ConnectionType::Tinsel => Ok(Payload::Tinsel {
                color: record.get_int(keys::TINSEL_COLOR),
            }),
            ConnectionType::Garland => Ok(Payload::Garland),
        }
    }

    pub fn kind(&self) -> ConnectionType {
        match self {
            Payload::HangingLights { .. } => ConnectionType::HangingLights,
            Payload::PennantBunting { .. } => ConnectionType::PennantBunting,
            Payload::Tinsel { .. } => ConnectionType::Tinsel,
            Payload::Garland => ConnectionType::Garland,
            Payload::LetterBunting { .. } => ConnectionType::LetterBunting,
        }
    }

    pub fn pattern(&self) -> &[Element] {
        match self {
            Payload::HangingLights { pattern, .. } | Payload::PennantBunting { pattern, .. } => {
                pattern
            }
            _ => &[],
        }
    }

    /// The RGB that best represents this payload: the first colored element
    /// of a pattern, or tinsel's own color.
    pub fn dominant_color(&self) -> Option<i32> {
        match self {
            Payload::Tinsel { color } => *color,
            _ => self.pattern().iter().find_map(|element| element.color),
        }
    }

    pub fn to_record(&self) -> Compound {
        let mut record = Compound::new();
        match self {
            Payload::HangingLights { pattern, string } => {
                record.insert(keys::PATTERN, write_pattern(pattern));
                record.insert(keys::STRING, string.as_str());
            }
            Payload::PennantBunting { pattern, text } => {
                record.insert(keys::PATTERN, write_pattern(pattern));
                if let Some(text) = text {
                    record.insert(keys::TEXT, text.to_record());
                }
            }
            Payload::Tinsel { color } => {
                if let Some(color) = color {
                    record.insert(keys::TINSEL_COLOR, *color);
                }
            }
            Payload::Garland => {}
            Payload::LetterBunting { text } => {
                record.insert(keys::TEXT, text.to_record());
            }
        }
        record
    }
}

// A pattern must be a non-empty list whose every entry is a well-formed element.
fn read_pattern(record: &Compound) -> Option<Vec<Element>> {
    let entries = record.get_list(keys::PATTERN)?;
    if entries.is_empty() {
        return None;
    }
    entries
        .iter()
        .map(|entry| match entry {
            Tag::Compound(element) => Element::from_record(element),
            _ => None,
        })
        .collect()
}

fn write_pattern(pattern: &[Element]) -> Tag {
    Tag::List(
        pattern
            .iter()
            .map(|element| Tag::Compound(element.to_record()))
            .collect(),
    )
}
