use glam::Mat4;

/// Matrix uniform buffer data for GPU
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub matrix: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn from_matrix(matrix: &Mat4) -> Self {
        Self {
            matrix: matrix.to_cols_array_2d(),
        }
    }
}

/// Line vertex for the reference grid
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridVertex {
    pub position: [f32; 3],
    pub shade: f32,
}

impl GridVertex {
    pub const fn new(position: [f32; 3], shade: f32) -> Self {
        Self { position, shade }
    }
}
