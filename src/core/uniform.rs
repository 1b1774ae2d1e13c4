//! Shader uniform binding.
//!
//! The camera only knows a uniform by name and an opaque handle. Resolving a
//! name that the scene never registered is not an error here: the binder logs
//! it and hands back a detached slot, and uploads to a detached slot do
//! nothing.

use glam::Mat4;

use super::gpu_context::GpuContext;
use crate::types::CameraUniform;

/// Resolves named matrix uniforms and uploads to them
pub trait UniformBinder {
    type Handle: Copy + std::fmt::Debug;

    /// Look up the slot for a named uniform
    fn resolve_uniform(&self, name: &str) -> Self::Handle;

    /// Write a matrix into a previously resolved slot
    fn upload_matrix(&self, handle: Self::Handle, matrix: &Mat4);
}

/// Index of a registered uniform buffer, or detached when the name was unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformSlot(Option<usize>);

impl UniformSlot {
    pub const DETACHED: UniformSlot = UniformSlot(None);

    pub fn is_detached(&self) -> bool {
        self.0.is_none()
    }
}

/// Binder with no GPU behind it, used for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedUniforms;

impl UniformBinder for DetachedUniforms {
    type Handle = UniformSlot;

    fn resolve_uniform(&self, _name: &str) -> UniformSlot {
        UniformSlot::DETACHED
    }

    fn upload_matrix(&self, _handle: UniformSlot, _matrix: &Mat4) {}
}

/// Named uniform buffers backed by wgpu
pub struct UniformRegistry {
    gpu: GpuContext,
    names: Vec<&'static str>,
    buffers: Vec<wgpu::Buffer>,
}

impl UniformRegistry {
    pub fn new(gpu: GpuContext) -> Self {
        Self {
            gpu,
            names: Vec::new(),
            buffers: Vec::new(),
        }
    }

    /// Create a matrix uniform buffer under `name` and return its slot
    pub fn register(&mut self, name: &'static str) -> UniformSlot {
        if let Some(index) = self.names.iter().position(|&n| n == name) {
            return UniformSlot(Some(index));
        }

        let buffer = self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(name),
            size: std::mem::size_of::<CameraUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        self.names.push(name);
        self.buffers.push(buffer);
        UniformSlot(Some(self.buffers.len() - 1))
    }

    /// Buffer behind a slot, for building bind groups
    pub fn buffer(&self, slot: UniformSlot) -> Option<&wgpu::Buffer> {
        slot.0.and_then(|index| self.buffers.get(index))
    }
}

impl UniformBinder for UniformRegistry {
    type Handle = UniformSlot;

    fn resolve_uniform(&self, name: &str) -> UniformSlot {
        match self.names.iter().position(|&n| n == name) {
            Some(index) => UniformSlot(Some(index)),
            None => {
                log::warn!("Shader has no uniform named {name:?}; uploads to it are dropped");
                UniformSlot::DETACHED
            }
        }
    }

    fn upload_matrix(&self, handle: UniformSlot, matrix: &Mat4) {
        if let Some(buffer) = self.buffer(handle) {
            let uniform = CameraUniform::from_matrix(matrix);
            self.gpu
                .queue()
                .write_buffer(buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }
}
