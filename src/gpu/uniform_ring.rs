//! Per-frame uniform buffer addressed with dynamic offsets.
//!
//! Every draw of a frame gets its own aligned slice, so two stages sharing a
//! GPU program never overwrite each other's uniforms before submission.
//! Grows 2x when a frame overflows; the new capacity takes effect at the next
//! frame because bind groups referencing the old buffer are still recorded.

/// Bump-allocated uniform buffer reset at the start of every frame.
pub struct UniformRing {
    buffer: wgpu::Buffer,
    capacity: u64,
    cursor: u64,
    alignment: u64,
    overflow: u64,
    generation: u64,
    label: String,
}

impl UniformRing {
    /// Ring with the given initial byte capacity and dynamic-offset alignment.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: u64,
        alignment: u32,
    ) -> Self {
        let alignment = u64::from(alignment.max(1));
        let capacity = align_up(initial_capacity.max(1024), alignment);
        Self {
            buffer: create_buffer(device, label, capacity),
            capacity,
            cursor: 0,
            alignment,
            overflow: 0,
            generation: 0,
            label: label.to_owned(),
        }
    }

    /// Start a new frame, growing first if the previous frame overflowed.
    ///
    /// Returns `true` if the buffer was reallocated (bind groups need
    /// recreation).
    pub fn reset(&mut self, device: &wgpu::Device) -> bool {
        let needed = self.cursor + self.overflow;
        self.cursor = 0;
        self.overflow = 0;
        if needed <= self.capacity {
            return false;
        }

        // 2x growth, minimum 1KB
        let new_capacity = align_up(
            (needed * 2).max(self.capacity + 1024),
            self.alignment,
        );
        log::debug!(
            "growing uniform ring '{}' from {} to {} bytes",
            self.label,
            self.capacity,
            new_capacity
        );
        self.buffer = create_buffer(device, &self.label, new_capacity);
        self.capacity = new_capacity;
        self.generation += 1;
        true
    }

    /// Stage `bytes` for this frame and return their dynamic offset.
    ///
    /// Returns `None` when the frame's space is exhausted; the shortfall is
    /// remembered and allocated at the next [`reset`](Self::reset).
    pub fn push(&mut self, queue: &wgpu::Queue, bytes: &[u8]) -> Option<u32> {
        let len = bytes.len() as u64;
        let offset = align_up(self.cursor, self.alignment);
        if offset + len > self.capacity {
            self.overflow += align_up(len, self.alignment);
            return None;
        }
        if len > 0 {
            queue.write_buffer(&self.buffer, offset, bytes);
        }
        self.cursor = offset + len;
        u32::try_from(offset).ok()
    }

    /// The current GPU buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Incremented on every reallocation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current capacity in bytes.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

fn create_buffer(device: &wgpu::Device, label: &str, size: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(label),
        size,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

/// Round `value` up to a multiple of `alignment`.
pub(crate) const fn align_up(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_multiples() {
        assert_eq!(align_up(0, 256), 0);
        assert_eq!(align_up(1, 256), 256);
        assert_eq!(align_up(256, 256), 256);
        assert_eq!(align_up(257, 256), 512);
        assert_eq!(align_up(96, 1), 96);
    }
}
