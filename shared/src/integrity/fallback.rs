use log::debug;

use crate::{
    color::DyeColor,
    connection::keys,
    record::Compound,
};

/// Where a fallback color was recovered from, in lookup priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSource {
    CapturedColor,
    CapturedRgb,
    OriginalColor,
    CustomColor,
    PatternElement { index: usize },
    Neutral,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FallbackColor {
    pub color: DyeColor,
    /// The raw RGB observed alongside the color, if the source carried one
    pub rgb: Option<i32>,
    pub source: ColorSource,
}

impl FallbackColor {
    /// The RGB to tint a rebuilt payload with.
    pub fn tint(&self) -> i32 {
        self.rgb.unwrap_or_else(|| self.color.rgb())
    }
}

/// Walks the fallback signals of a (possibly stripped) payload record.
pub fn resolve(record: Option<&Compound>, neutral: DyeColor) -> FallbackColor {
    let neutral = FallbackColor {
        color: neutral,
        rgb: None,
        source: ColorSource::Neutral,
    };
    let Some(record) = record else {
        debug!("no payload record left, falling back to {}", neutral.color);
        return neutral;
    };

    let captured_rgb = record.get_int(keys::CAPTURED_RGB);

    if let Some(name) = record.get_string(keys::CAPTURED_COLOR) {
        match DyeColor::from_name(name) {
            Some(color) => {
                debug!("recovered captured color {}", color);
                return FallbackColor {
                    color,
                    rgb: captured_rgb,
                    source: ColorSource::CapturedColor,
                };
            }
            None => debug!("ignoring unknown captured color name `{}`", name),
        }
    }

    if let Some(rgb) = captured_rgb {
        debug!("recovered captured rgb {:#08x}", rgb);
        return bucketed(rgb, ColorSource::CapturedRgb);
    }

    if let Some(name) = record.get_string(keys::ORIGINAL_COLOR) {
        match DyeColor::from_name(name) {
            Some(color) => {
                debug!("recovered legacy backup color {}", color);
                return FallbackColor {
                    color,
                    rgb: None,
                    source: ColorSource::OriginalColor,
                };
            }
            None => debug!("ignoring unknown backup color name `{}`", name),
        }
    }

    if let Some(rgb) = record.get_int(keys::CUSTOM_COLOR) {
        debug!("recovered raw custom color {:#08x}", rgb);
        return bucketed(rgb, ColorSource::CustomColor);
    }

    // First surviving element that still carries a color.
    let element_color = record
        .compounds_in(keys::PATTERN)
        .enumerate()
        .find_map(|(index, element)| {
            element
                .get_compound(keys::ELEMENT_TAG)
                .and_then(|tag| tag.get_int(keys::CUSTOM_COLOR))
                .map(|rgb| (index, rgb))
        });
    if let Some((index, rgb)) = element_color {
        debug!("recovered color {:#08x} from pattern element {}", rgb, index);
        return bucketed(rgb, ColorSource::PatternElement { index });
    }

    debug!("no color signal survived, falling back to {}", neutral.color);
    neutral
}

fn bucketed(rgb: i32, source: ColorSource) -> FallbackColor {
    FallbackColor {
        color: DyeColor::bucket(rgb),
        rgb: Some(rgb),
        source,
    }
}
