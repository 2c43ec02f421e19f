use std::collections::BTreeSet;

/// Index of a light's record in the GPU light buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightSlot(pub u32);

/// Light buffer slot allocator with an explicit free-list.
///
/// Slots are handed out lowest-free-first; a released slot is reused before
/// the high-water mark grows.
#[derive(Debug, Clone)]
pub struct LightSlots {
    capacity: u32,
    next: u32,
    free: BTreeSet<u32>,
}

impl LightSlots {
    /// Allocator over `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity,
            next: 0,
            free: BTreeSet::new(),
        }
    }

    /// Take the lowest free slot, or `None` when all are in use.
    pub fn allocate(&mut self) -> Option<LightSlot> {
        if let Some(index) = self.free.pop_first() {
            return Some(LightSlot(index));
        }
        if self.next >= self.capacity {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(LightSlot(index))
    }

    /// Return a slot. Returns `false` for slots never handed out or already
    /// free.
    pub fn release(&mut self, slot: LightSlot) -> bool {
        if slot.0 >= self.next {
            return false;
        }
        self.free.insert(slot.0)
    }

    /// Number of slots currently handed out.
    #[must_use]
    pub fn in_use(&self) -> u32 {
        self.next - self.free.len() as u32
    }

    /// Total slots available.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
