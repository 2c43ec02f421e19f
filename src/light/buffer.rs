use super::manager::LightManager;
use super::GpuLight;

/// Fixed-capacity GPU storage buffer of [`GpuLight`] records.
pub struct LightBuffer {
    buffer: wgpu::Buffer,
    capacity: u32,
}

impl LightBuffer {
    /// Zeroed buffer holding `capacity` lights.
    #[must_use]
    pub fn new(device: &wgpu::Device, capacity: u32) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Buffer"),
            size: u64::from(capacity.max(1))
                * size_of::<GpuLight>() as u64,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self { buffer, capacity }
    }

    /// Upload the stale lights of `manager`.
    pub fn sync(&self, queue: &wgpu::Queue, manager: &mut LightManager) -> usize {
        let stride = size_of::<GpuLight>() as u64;
        manager.flush(|slot, light| {
            if slot.0 < self.capacity {
                queue.write_buffer(
                    &self.buffer,
                    u64::from(slot.0) * stride,
                    bytemuck::bytes_of(light),
                );
            }
        })
    }

    /// The underlying GPU buffer.
    #[must_use]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Number of records the buffer holds.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }
}
