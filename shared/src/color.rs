use std::fmt;

/// The sixteen named dye colors a cord payload can be tinted with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DyeColor {
    White,
    Orange,
    Magenta,
    LightBlue,
    Yellow,
    Lime,
    Pink,
    Gray,
    LightGray,
    Cyan,
    Purple,
    Blue,
    Brown,
    Green,
    Red,
    Black,
}

impl DyeColor {
    pub const ALL: [DyeColor; 16] = [
        DyeColor::White,
        DyeColor::Orange,
        DyeColor::Magenta,
        DyeColor::LightBlue,
        DyeColor::Yellow,
        DyeColor::Lime,
        DyeColor::Pink,
        DyeColor::Gray,
        DyeColor::LightGray,
        DyeColor::Cyan,
        DyeColor::Purple,
        DyeColor::Blue,
        DyeColor::Brown,
        DyeColor::Green,
        DyeColor::Red,
        DyeColor::Black,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DyeColor::White => "white",
            DyeColor::Orange => "orange",
            DyeColor::Magenta => "magenta",
            DyeColor::LightBlue => "light_blue",
            DyeColor::Yellow => "yellow",
            DyeColor::Lime => "lime",
            DyeColor::Pink => "pink",
            DyeColor::Gray => "gray",
            DyeColor::LightGray => "light_gray",
            DyeColor::Cyan => "cyan",
            DyeColor::Purple => "purple",
            DyeColor::Blue => "blue",
            DyeColor::Brown => "brown",
            DyeColor::Green => "green",
            DyeColor::Red => "red",
            DyeColor::Black => "black",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|color| color.name() == name)
    }

    /// Representative RGB used when a color has to be written back into a
    /// rebuilt payload.
    pub fn rgb(self) -> i32 {
        match self {
            DyeColor::White => 0xFFFFFF,
            DyeColor::Orange => 0xFFA500,
            DyeColor::Magenta => 0xFF00FF,
            DyeColor::LightBlue => 0x87CEEB,
            DyeColor::Yellow => 0xFFFF00,
            DyeColor::Lime => 0x99CC00,
            DyeColor::Pink => 0xFFC0CB,
            DyeColor::Gray => 0x808080,
            DyeColor::LightGray => 0xD3D3D3,
            DyeColor::Cyan => 0x00FFFF,
            DyeColor::Purple => 0x800080,
            DyeColor::Blue => 0x0000FF,
            DyeColor::Brown => 0xA52A2A,
            DyeColor::Green => 0x00FF00,
            DyeColor::Red => 0xFF0000,
            DyeColor::Black => 0x000000,
        }
    }

    /// Buckets a packed `0xRRGGBB` value into a named color.
    ///
    /// This is an ordered rule list, not a nearest-color search: the first
    /// rule whose channel thresholds all hold wins, and anything no rule
    /// claims becomes [`DyeColor::White`]. Bits above the low 24 are ignored.
    pub fn bucket(rgb: i32) -> DyeColor {
        let (r, g, b) = channels(rgb);
        BUCKET_RULES
            .iter()
            .find(|rule| rule.matches(r, g, b))
            .map(|rule| rule.color)
            .unwrap_or(DyeColor::White)
    }
}

impl fmt::Display for DyeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn channels(rgb: i32) -> (u8, u8, u8) {
    let r = ((rgb >> 16) & 0xFF) as u8;
    let g = ((rgb >> 8) & 0xFF) as u8;
    let b = (rgb & 0xFF) as u8;
    (r, g, b)
}

#[derive(Clone, Copy)]
enum Threshold {
    Above(u8),
    Below(u8),
}

impl Threshold {
    fn holds(self, channel: u8) -> bool {
        match self {
            Threshold::Above(limit) => channel > limit,
            Threshold::Below(limit) => channel < limit,
        }
    }
}

struct BucketRule {
    r: Threshold,
    g: Threshold,
    b: Threshold,
    color: DyeColor,
}

impl BucketRule {
    fn matches(&self, r: u8, g: u8, b: u8) -> bool {
        self.r.holds(r) && self.g.holds(g) && self.b.holds(b)
    }
}

const fn rule(r: Threshold, g: Threshold, b: Threshold, color: DyeColor) -> BucketRule {
    BucketRule { r, g, b, color }
}

use Threshold::{Above as Gt, Below as Lt};

// Order matters: earlier rules shadow later, overlapping ones.
const BUCKET_RULES: [BucketRule; 16] = [
    rule(Gt(200), Gt(200), Gt(200), DyeColor::White),
    rule(Lt(50), Lt(50), Lt(50), DyeColor::Black),
    rule(Gt(200), Lt(100), Lt(100), DyeColor::Red),
    rule(Lt(100), Gt(200), Lt(100), DyeColor::Lime),
    rule(Lt(100), Lt(100), Gt(200), DyeColor::Blue),
    rule(Gt(200), Gt(200), Lt(100), DyeColor::Yellow),
    rule(Gt(200), Lt(100), Gt(200), DyeColor::Magenta),
    rule(Lt(100), Gt(200), Gt(200), DyeColor::Cyan),
    rule(Gt(150), Gt(100), Lt(100), DyeColor::Orange),
    rule(Gt(100), Lt(100), Gt(150), DyeColor::Purple),
    rule(Lt(100), Gt(150), Lt(100), DyeColor::Green),
    rule(Gt(150), Lt(150), Lt(150), DyeColor::Brown),
    rule(Gt(150), Gt(150), Lt(150), DyeColor::LightGray),
    rule(Gt(100), Gt(100), Gt(100), DyeColor::Gray),
    rule(Gt(200), Gt(100), Gt(100), DyeColor::Pink),
    rule(Lt(150), Gt(100), Gt(150), DyeColor::LightBlue),
];
