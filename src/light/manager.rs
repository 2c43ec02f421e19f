use super::slots::{LightSlot, LightSlots};
use super::{GpuLight, Light};

/// Owns the scene's lights and keeps the GPU light buffer in step.
#[derive(Debug, Clone)]
pub struct LightManager {
    lights: Vec<Light>,
    slots: LightSlots,
}

impl LightManager {
    /// Manager for a light buffer of `capacity` records.
    #[must_use]
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            lights: Vec::new(),
            slots: LightSlots::with_capacity(capacity),
        }
    }

    /// Take ownership of `light` and assign its buffer slot.
    ///
    /// Returns `None` (dropping the light) if the name is already taken or
    /// the buffer is full.
    pub fn add(&mut self, mut light: Light) -> Option<LightSlot> {
        if self.get(light.name()).is_some() {
            log::warn!("light '{}' already exists", light.name());
            return None;
        }
        let Some(slot) = self.slots.allocate() else {
            log::warn!(
                "light buffer full ({} slots), dropping '{}'",
                self.slots.capacity(),
                light.name()
            );
            return None;
        };
        let _ = light.assign_slot(slot);
        log::debug!("light '{}' -> slot {}", light.name(), slot.0);
        self.lights.push(light);
        Some(slot)
    }

    /// Remove a light and free its slot for reuse.
    pub fn remove(&mut self, name: &str) -> Option<Light> {
        let index = self.lights.iter().position(|l| l.name() == name)?;
        let light = self.lights.remove(index);
        if let Some(slot) = light.slot() {
            let _ = self.slots.release(slot);
        }
        Some(light)
    }

    /// Borrow a light by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Light> {
        self.lights.iter().find(|l| l.name() == name)
    }

    /// Mutably borrow a light by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Light> {
        self.lights.iter_mut().find(|l| l.name() == name)
    }

    /// All lights, in insertion order.
    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    /// Slots of the lights currently enabled.
    pub fn enabled_slots(&self) -> impl Iterator<Item = LightSlot> + '_ {
        self.lights
            .iter()
            .filter(|l| l.is_enabled())
            .filter_map(Light::slot)
    }

    /// Upload every stale light through `upload`, then clear its flag.
    ///
    /// Returns the number of lights uploaded.
    pub fn flush(&mut self, mut upload: impl FnMut(LightSlot, &GpuLight)) -> usize {
        let mut uploaded = 0;
        for light in &mut self.lights {
            if !light.requires_update() {
                continue;
            }
            let Some(slot) = light.slot() else {
                continue;
            };
            upload(slot, &light.to_gpu());
            light.clear_update_flag();
            uploaded += 1;
        }
        if uploaded > 0 {
            log::trace!("flushed {uploaded} lights");
        }
        uploaded
    }
}
