use bytemuck::{Pod, Zeroable};

/// Per-element record read by the host from linear memory.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ElementInstance {
    /// Element id, as assigned by the manifest order.
    pub id: f32,
    /// Pixel translation.
    pub x: f32,
    pub y: f32,
    /// Translation as a percentage of the element's own size.
    pub x_percent: f32,
    pub y_percent: f32,
    pub scale: f32,
    pub opacity: f32,
    /// Bit 0: hover skin active. Bit 1: hidden.
    pub flags: f32,
}

impl ElementInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const FLAG_HOVER: u32 = 1;
    pub const FLAG_HIDDEN: u32 = 2;
}

/// Flat buffer of element instances, rebuilt every frame.
pub struct InstanceBuffer {
    pub instances: Vec<ElementInstance>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: ElementInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}
