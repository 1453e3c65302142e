use festoon_shared::{Hand, ItemStack};

use crate::host::Decoration;

/// What the host should do with a right click on a fence post.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FenceUse {
    /// Let the click through untouched
    Proceed,
    /// Let the held item act but keep the fence block itself from reacting
    DenyBlockUse,
    /// Swallow the click entirely
    Cancel,
}

/// Arbitrates a fence right click between leashes and connection items.
///
/// A leash used with a connection item in the off-hand is swallowed, as is
/// any leash tie (explicit, or implied by leading mobs) onto a post already
/// carrying a decoration other than a leash knot. A connection item in the
/// off-hand otherwise keeps the fence block from reacting.
pub fn fence_use_rule(
    hand: Hand,
    held: &ItemStack,
    off_hand: &ItemStack,
    leading_mobs: bool,
    decoration: Option<&Decoration>,
) -> FenceUse {
    let mut ties_leash = held.is_leash();
    let mut outcome = FenceUse::Proceed;

    if hand == Hand::Main && off_hand.is_connection_item() {
        if ties_leash {
            return FenceUse::Cancel;
        }
        outcome = FenceUse::DenyBlockUse;
    }

    ties_leash |= leading_mobs;
    if ties_leash && decoration.is_some_and(|decoration| !decoration.is_leash_knot()) {
        return FenceUse::Cancel;
    }
    outcome
}
