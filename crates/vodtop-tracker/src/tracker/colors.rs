//! Highlight colours for addresses with concurrent sessions.
//!
//! An address gets a colour slot the first time a render sees it with two
//! or more sessions. It keeps that slot until it drops to zero sessions.
//! Slots come from an ever-increasing index taken modulo the palette size,
//! so colours repeat once the palette is exhausted.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

/// Index into the front end's highlight palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ColorSlot(pub usize);

#[derive(Debug)]
pub struct ColorAllocator {
    palette_size: usize,
    next_index: usize,
    assignments: HashMap<String, ColorSlot>,
}

impl ColorAllocator {
    /// A palette size of zero is treated as one.
    pub fn new(palette_size: usize) -> Self {
        Self {
            palette_size: palette_size.max(1),
            next_index: 0,
            assignments: HashMap::new(),
        }
    }

    /// Returns the address's slot, allocating one if it has none yet.
    pub fn assign(&mut self, address: &str) -> ColorSlot {
        if let Some(slot) = self.assignments.get(address) {
            return *slot;
        }
        let slot = ColorSlot(self.next_index % self.palette_size);
        self.next_index = self.next_index.wrapping_add(1);
        self.assignments.insert(address.to_string(), slot);
        debug!(address, slot = slot.0, "colour assigned");
        slot
    }

    /// Frees the address's slot. Returns it if one was held.
    pub fn release(&mut self, address: &str) -> Option<ColorSlot> {
        let released = self.assignments.remove(address);
        if let Some(slot) = released {
            debug!(address, slot = slot.0, "colour released");
        }
        released
    }

    pub fn slot_for(&self, address: &str) -> Option<ColorSlot> {
        self.assignments.get(address).copied()
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }
}
