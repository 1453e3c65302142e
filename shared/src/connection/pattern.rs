//! Canonical default payloads, used whenever a payload has to be rebuilt from
//! nothing but a color.

use crate::record::Compound;

use super::{
    connection_type::ConnectionType,
    payload::{Element, Payload},
    styled_text::StyledText,
};

pub const HANGING_LIGHTS_LENGTH: usize = 8;
pub const PENNANT_BUNTING_LENGTH: usize = 6;

pub const DEFAULT_LIGHT: &str = "fairy_light";
pub const DEFAULT_PENNANT: &str = "triangle_pennant";
pub const DEFAULT_STRING: &str = "black_string";

/// The default payload of `kind`, every element tinted with `rgb`.
///
/// Deterministic: the same arguments always produce an identical record.
pub fn canonical_payload(kind: ConnectionType, rgb: i32) -> Payload {
    match kind {
        ConnectionType::HangingLights => Payload::HangingLights {
            pattern: uniform(DEFAULT_LIGHT, HANGING_LIGHTS_LENGTH, rgb),
            string: DEFAULT_STRING.to_string(),
        },
        ConnectionType::PennantBunting => Payload::PennantBunting {
            pattern: uniform(DEFAULT_PENNANT, PENNANT_BUNTING_LENGTH, rgb),
            text: Some(StyledText::new()),
        },
        ConnectionType::Tinsel => Payload::Tinsel { color: Some(rgb) },
        ConnectionType::Garland => Payload::Garland,
        ConnectionType::LetterBunting => Payload::LetterBunting {
            text: StyledText::new(),
        },
    }
}

pub fn canonical_record(kind: ConnectionType, rgb: i32) -> Compound {
    canonical_payload(kind, rgb).to_record()
}

fn uniform(id: &str, length: usize, rgb: i32) -> Vec<Element> {
    (0..length).map(|_| Element::new(id, Some(rgb))).collect()
}
