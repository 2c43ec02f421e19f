//! Opaque GPU resource handles and the arena that backs them.
//!
//! Programs, textures and render targets are referred to by small index
//! handles rather than by wgpu objects, so CPU-side program copies can share a
//! GPU program without sharing ownership of it.

use std::marker::PhantomData;

/// Handle to a linked shader program owned by a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u64);

/// Handle to a sampled texture registered with a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u64);

/// Handle to an offscreen color target owned by a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(pub u64);

/// Destination of a fullscreen draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderTarget {
    /// An intermediate offscreen color target.
    Offscreen(TargetId),
    /// The swap-chain (back) buffer for the current frame.
    Screen,
}

/// An offscreen target together with the texture handle used to sample it
/// in a later stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderTargetHandle {
    /// Handle used when drawing into the target.
    pub target: TargetId,
    /// Handle used when sampling the target's color output.
    pub texture: TextureId,
}

/// Slot arena keyed by a generational `u64` handle.
///
/// The low 32 bits of a handle are the slot index and the high 32 bits the
/// slot's generation. Freed slots are reused lowest-index-first with the
/// generation bumped, so a handle to a removed value never resolves to the
/// value that later takes its slot.
#[derive(Debug)]
pub struct Arena<H, T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    _handle: PhantomData<H>,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

impl<H, T> Default for Arena<H, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            _handle: PhantomData,
        }
    }
}

const fn pack(index: u32, generation: u32) -> u64 {
    ((generation as u64) << 32) | index as u64
}

const fn unpack(raw: u64) -> (usize, u32) {
    ((raw & 0xFFFF_FFFF) as usize, (raw >> 32) as u32)
}

impl<H: From<u64> + Into<u64> + Copy, T> Arena<H, T> {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value and return its handle.
    pub fn insert(&mut self, value: T) -> H {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return H::from(pack(index, slot.generation));
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        H::from(pack(index, 0))
    }

    /// Remove a value, retiring its handle. Stale handles are ignored.
    pub fn remove(&mut self, handle: H) -> Option<T> {
        let (index, generation) = unpack(handle.into());
        let slot = self.slots.get_mut(index)?;
        if slot.generation != generation {
            return None;
        }
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index as u32);
        // Keep the lowest free index at the end so `pop` hands it out first.
        self.free.sort_unstable_by(|a, b| b.cmp(a));
        Some(value)
    }

    /// Borrow a live value. `None` for removed or stale handles.
    #[must_use]
    pub fn get(&self, handle: H) -> Option<&T> {
        let (index, generation) = unpack(handle.into());
        let slot = self.slots.get(index)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Mutably borrow a live value.
    pub fn get_mut(&mut self, handle: H) -> Option<&mut T> {
        let (index, generation) = unpack(handle.into());
        let slot = self.slots.get_mut(index)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Whether `handle` refers to a live value.
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.get(handle).is_some()
    }

    /// Iterate live values mutably, with their handles.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (H, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let handle = H::from(pack(i as u32, slot.generation));
            Some((handle, slot.value.as_mut()?))
        })
    }

    /// Number of live values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.value.is_some()).count()
    }

    /// Whether the arena holds no live values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

macro_rules! handle_conversions {
    ($($handle:ident),*) => {
        $(
            impl From<u64> for $handle {
                fn from(raw: u64) -> Self {
                    Self(raw)
                }
            }

            impl From<$handle> for u64 {
                fn from(handle: $handle) -> Self {
                    handle.0
                }
            }
        )*
    };
}

handle_conversions!(ProgramId, TextureId, TargetId);
