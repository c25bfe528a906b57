//! GPU-visible data layouts. Field order and padding mirror the WGSL structs
//! in `scene.wgsl` / `mirror.wgsl`; vec3 fields are padded out to 16 bytes.

/// Per-frame uniform data: camera matrices, eye position, fog, time
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub time: f32,
    pub fog_color: [f32; 3],
    pub fog_start: f32,
    pub fog_end: f32,
    pub _pad: [f32; 3],
}

/// Per-object uniform data
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniform {
    pub model: [[f32; 4]; 4],
    /// 1.0 skips lighting (light marker cube)
    pub emissive: f32,
    pub _pad: [f32; 3],
}

/// One light as the shader sees it
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuLight {
    pub position: [f32; 3],
    pub cut_off: f32,
    pub color: [f32; 3],
    pub outer_cut_off: f32,
    pub direction: [f32; 3],
    pub _pad: f32,
}

/// The scene's fixed light rig: point, spot, directional
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    pub fixed: GpuLight,
    pub spot: GpuLight,
    pub directional: GpuLight,
}

/// Mirror surface parameters (tint + alpha)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MirrorUniform {
    pub color: [f32; 4],
}
