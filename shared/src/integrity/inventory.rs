//! Whole-inventory passes, run when a player logs in or a container closes:
//! the moments persisted stacks are most likely to have been stripped.

use log::info;

use crate::item::ItemStack;

use super::guard::{Inspection, StateIntegrityGuard};

impl StateIntegrityGuard {
    /// Repairs every corrupted connection item in place. Returns the indices
    /// of the slots that were replaced.
    pub fn sweep(&self, slots: &mut [ItemStack]) -> Vec<usize> {
        let mut repaired = Vec::new();
        for (index, slot) in slots.iter_mut().enumerate() {
            if let Inspection::Repaired { stack, .. } = self.inspect(slot) {
                *slot = stack;
                repaired.push(index);
            }
        }
        if !repaired.is_empty() {
            info!("repaired connection items in slots {:?}", repaired);
        }
        repaired
    }

    /// Captures the dominant color of every valid connection item. Returns how
    /// many stacks changed.
    pub fn capture_all(&self, slots: &mut [ItemStack]) -> usize {
        slots
            .iter_mut()
            .filter(|slot| slot.is_connection_item())
            .map(|slot| self.capture(slot))
            .filter(|changed| *changed)
            .count()
    }
}
