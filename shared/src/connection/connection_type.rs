use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConnectionType {
    HangingLights,
    PennantBunting,
    Tinsel,
    Garland,
    LetterBunting,
}

impl ConnectionType {
    pub const ALL: [ConnectionType; 5] = [
        ConnectionType::HangingLights,
        ConnectionType::PennantBunting,
        ConnectionType::Tinsel,
        ConnectionType::Garland,
        ConnectionType::LetterBunting,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ConnectionType::HangingLights => "hanging_lights",
            ConnectionType::PennantBunting => "pennant_bunting",
            ConnectionType::Tinsel => "tinsel",
            ConnectionType::Garland => "garland",
            ConnectionType::LetterBunting => "letter_bunting",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Whether the payload carries a decorative element sequence.
    pub fn has_pattern(self) -> bool {
        matches!(
            self,
            ConnectionType::HangingLights | ConnectionType::PennantBunting
        )
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
