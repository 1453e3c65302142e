use std::default::Default;

use festoon_shared::DyeColor;

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Maximum number of connections a single anchor may take on as the
    /// bound (target) side
    pub max_connections_per_anchor: usize,
    /// Number of ticks between two re-validations of every connection's
    /// persisted payload. Zero disables periodic re-validation.
    pub revalidate_interval: u16,
    /// Color used to rebuild a payload when no color signal survived
    pub neutral_color: DyeColor,
    /// Whether a leash-type tool in the off-hand is allowed alongside a
    /// connection item in the main hand
    pub leash_offhand_exempt: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            max_connections_per_anchor: 64,
            revalidate_interval: 20,
            neutral_color: DyeColor::White,
            leash_offhand_exempt: true,
        }
    }
}
