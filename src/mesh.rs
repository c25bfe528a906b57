use glam::Vec3;

/// Interleaved vertex: position, color, texcoord, normal (11 floats)
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3], uv: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            color,
            uv,
            normal,
        }
    }
}

/// CPU-side mesh; `indices` absent means the mesh is drawn unindexed
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Option<Vec<u32>>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of elements a draw call covers: indices if present, else vertices
    pub fn draw_count(&self) -> u32 {
        match &self.indices {
            Some(indices) => indices.len() as u32,
            None => self.vertices.len() as u32,
        }
    }
}

const SAND: [f32; 3] = [0.83, 0.70, 0.44];
const SAND_LIGHT: [f32; 3] = [0.92, 0.86, 0.76];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

/// Square-based pyramid, apex at (0, 0.8, 0), textured base tiling 5x
pub fn pyramid() -> MeshData {
    let vertices = vec![
        // Base, facing down
        Vertex::new([-0.5, 0.0, 0.5], SAND, [0.0, 0.0], [0.0, -1.0, 0.0]),
        Vertex::new([-0.5, 0.0, -0.5], SAND, [0.0, 5.0], [0.0, -1.0, 0.0]),
        Vertex::new([0.5, 0.0, -0.5], SAND, [5.0, 5.0], [0.0, -1.0, 0.0]),
        Vertex::new([0.5, 0.0, 0.5], SAND, [5.0, 0.0], [0.0, -1.0, 0.0]),
        // -x face
        Vertex::new([-0.5, 0.0, 0.5], SAND, [0.0, 0.0], [-0.8, 0.5, 0.0]),
        Vertex::new([-0.5, 0.0, -0.5], SAND, [5.0, 0.0], [-0.8, 0.5, 0.0]),
        Vertex::new([0.0, 0.8, 0.0], SAND_LIGHT, [2.5, 5.0], [-0.8, 0.5, 0.0]),
        // -z face
        Vertex::new([-0.5, 0.0, -0.5], SAND, [5.0, 0.0], [0.0, 0.5, -0.8]),
        Vertex::new([0.5, 0.0, -0.5], SAND, [0.0, 0.0], [0.0, 0.5, -0.8]),
        Vertex::new([0.0, 0.8, 0.0], SAND_LIGHT, [2.5, 5.0], [0.0, 0.5, -0.8]),
        // +x face
        Vertex::new([0.5, 0.0, -0.5], SAND, [0.0, 0.0], [0.8, 0.5, 0.0]),
        Vertex::new([0.5, 0.0, 0.5], SAND, [5.0, 0.0], [0.8, 0.5, 0.0]),
        Vertex::new([0.0, 0.8, 0.0], SAND_LIGHT, [2.5, 5.0], [0.8, 0.5, 0.0]),
        // +z face
        Vertex::new([0.5, 0.0, 0.5], SAND, [5.0, 0.0], [0.0, 0.5, 0.8]),
        Vertex::new([-0.5, 0.0, 0.5], SAND, [0.0, 0.0], [0.0, 0.5, 0.8]),
        Vertex::new([0.0, 0.8, 0.0], SAND_LIGHT, [2.5, 5.0], [0.0, 0.5, 0.8]),
    ];
    let indices = vec![
        0, 1, 2, 0, 2, 3, //
        4, 6, 5, //
        7, 9, 8, //
        10, 12, 11, //
        13, 15, 14,
    ];
    MeshData {
        vertices,
        indices: Some(indices),
    }
}

/// Unit cube spanning x in [1,2], y/z in [-0.5,0.5], one color per face, unindexed
pub fn cube() -> MeshData {
    const RED: [f32; 3] = [1.0, 0.0, 0.0];
    const GREEN: [f32; 3] = [0.0, 1.0, 0.0];
    const BLUE: [f32; 3] = [0.0, 0.0, 1.0];
    const YELLOW: [f32; 3] = [1.0, 1.0, 0.0];
    const MAGENTA: [f32; 3] = [1.0, 0.0, 1.0];
    const CYAN: [f32; 3] = [0.0, 1.0, 1.0];

    let vertices = vec![
        // Back face
        Vertex::new([1.0, -0.5, -0.5], RED, [0.0, 0.0], [0.0, 0.0, -1.0]),
        Vertex::new([2.0, 0.5, -0.5], RED, [1.0, 1.0], [0.0, 0.0, -1.0]),
        Vertex::new([2.0, -0.5, -0.5], RED, [1.0, 0.0], [0.0, 0.0, -1.0]),
        Vertex::new([2.0, 0.5, -0.5], RED, [1.0, 1.0], [0.0, 0.0, -1.0]),
        Vertex::new([1.0, -0.5, -0.5], RED, [0.0, 0.0], [0.0, 0.0, -1.0]),
        Vertex::new([1.0, 0.5, -0.5], RED, [0.0, 1.0], [0.0, 0.0, -1.0]),
        // Front face
        Vertex::new([1.0, -0.5, 0.5], GREEN, [0.0, 0.0], [0.0, 0.0, 1.0]),
        Vertex::new([2.0, -0.5, 0.5], GREEN, [1.0, 0.0], [0.0, 0.0, 1.0]),
        Vertex::new([2.0, 0.5, 0.5], GREEN, [1.0, 1.0], [0.0, 0.0, 1.0]),
        Vertex::new([2.0, 0.5, 0.5], GREEN, [1.0, 1.0], [0.0, 0.0, 1.0]),
        Vertex::new([1.0, 0.5, 0.5], GREEN, [0.0, 1.0], [0.0, 0.0, 1.0]),
        Vertex::new([1.0, -0.5, 0.5], GREEN, [0.0, 0.0], [0.0, 0.0, 1.0]),
        // Left face
        Vertex::new([1.0, 0.5, 0.5], BLUE, [1.0, 0.0], [-1.0, 0.0, 0.0]),
        Vertex::new([1.0, 0.5, -0.5], BLUE, [1.0, 1.0], [-1.0, 0.0, 0.0]),
        Vertex::new([1.0, -0.5, -0.5], BLUE, [0.0, 1.0], [-1.0, 0.0, 0.0]),
        Vertex::new([1.0, -0.5, -0.5], BLUE, [0.0, 1.0], [-1.0, 0.0, 0.0]),
        Vertex::new([1.0, -0.5, 0.5], BLUE, [0.0, 0.0], [-1.0, 0.0, 0.0]),
        Vertex::new([1.0, 0.5, 0.5], BLUE, [1.0, 0.0], [-1.0, 0.0, 0.0]),
        // Right face
        Vertex::new([2.0, 0.5, 0.5], YELLOW, [1.0, 0.0], [1.0, 0.0, 0.0]),
        Vertex::new([2.0, -0.5, -0.5], YELLOW, [0.0, 1.0], [1.0, 0.0, 0.0]),
        Vertex::new([2.0, 0.5, -0.5], YELLOW, [1.0, 1.0], [1.0, 0.0, 0.0]),
        Vertex::new([2.0, -0.5, -0.5], YELLOW, [0.0, 1.0], [1.0, 0.0, 0.0]),
        Vertex::new([2.0, 0.5, 0.5], YELLOW, [1.0, 0.0], [1.0, 0.0, 0.0]),
        Vertex::new([2.0, -0.5, 0.5], YELLOW, [0.0, 0.0], [1.0, 0.0, 0.0]),
        // Bottom face
        Vertex::new([1.0, -0.5, -0.5], MAGENTA, [0.0, 1.0], [0.0, -1.0, 0.0]),
        Vertex::new([2.0, -0.5, -0.5], MAGENTA, [1.0, 1.0], [0.0, -1.0, 0.0]),
        Vertex::new([2.0, -0.5, 0.5], MAGENTA, [1.0, 0.0], [0.0, -1.0, 0.0]),
        Vertex::new([2.0, -0.5, 0.5], MAGENTA, [1.0, 0.0], [0.0, -1.0, 0.0]),
        Vertex::new([1.0, -0.5, 0.5], MAGENTA, [0.0, 0.0], [0.0, -1.0, 0.0]),
        Vertex::new([1.0, -0.5, -0.5], MAGENTA, [0.0, 1.0], [0.0, -1.0, 0.0]),
        // Top face
        Vertex::new([1.0, 0.5, -0.5], CYAN, [0.0, 1.0], [0.0, 1.0, 0.0]),
        Vertex::new([2.0, 0.5, 0.5], CYAN, [1.0, 0.0], [0.0, 1.0, 0.0]),
        Vertex::new([2.0, 0.5, -0.5], CYAN, [1.0, 1.0], [0.0, 1.0, 0.0]),
        Vertex::new([2.0, 0.5, 0.5], CYAN, [1.0, 0.0], [0.0, 1.0, 0.0]),
        Vertex::new([1.0, 0.5, -0.5], CYAN, [0.0, 1.0], [0.0, 1.0, 0.0]),
        Vertex::new([1.0, 0.5, 0.5], CYAN, [0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    MeshData {
        vertices,
        indices: None,
    }
}

/// 20x20 floor quad at y = 0
pub fn floor() -> MeshData {
    let vertices = vec![
        Vertex::new([-10.0, 0.0, 10.0], WHITE, [0.0, 0.0], [0.0, 1.0, 0.0]),
        Vertex::new([10.0, 0.0, 10.0], WHITE, [1.0, 0.0], [0.0, 1.0, 0.0]),
        Vertex::new([10.0, 0.0, -10.0], WHITE, [1.0, 1.0], [0.0, 1.0, 0.0]),
        Vertex::new([-10.0, 0.0, -10.0], WHITE, [0.0, 1.0], [0.0, 1.0, 0.0]),
    ];
    MeshData {
        vertices,
        indices: Some(vec![0, 1, 2, 0, 2, 3]),
    }
}

/// Small emissive cube marking a light's position
pub fn light_cube() -> MeshData {
    let corners = [
        [-0.1, -0.1, 0.1],
        [-0.1, -0.1, -0.1],
        [0.1, -0.1, -0.1],
        [0.1, -0.1, 0.1],
        [-0.1, 0.1, 0.1],
        [-0.1, 0.1, -0.1],
        [0.1, 0.1, -0.1],
        [0.1, 0.1, 0.1],
    ];
    let vertices = corners
        .iter()
        .map(|&p| {
            let n = Vec3::from_array(p).normalize();
            Vertex::new(p, WHITE, [0.0, 0.0], n.to_array())
        })
        .collect();
    let indices = vec![
        0, 1, 2, 0, 2, 3, //
        0, 4, 7, 0, 7, 3, //
        3, 7, 6, 3, 6, 2, //
        2, 6, 5, 2, 5, 1, //
        1, 5, 4, 1, 4, 0, //
        4, 5, 6, 4, 6, 7,
    ];
    MeshData {
        vertices,
        indices: Some(indices),
    }
}

/// 2x2 mirror quad in the z = -3 plane, facing +z
pub fn mirror_quad() -> MeshData {
    let vertices = vec![
        Vertex::new([-1.0, 0.0, -3.0], WHITE, [0.0, 0.0], [0.0, 0.0, 1.0]),
        Vertex::new([1.0, 0.0, -3.0], WHITE, [1.0, 0.0], [0.0, 0.0, 1.0]),
        Vertex::new([1.0, 2.0, -3.0], WHITE, [1.0, 1.0], [0.0, 0.0, 1.0]),
        Vertex::new([-1.0, 2.0, -3.0], WHITE, [0.0, 1.0], [0.0, 0.0, 1.0]),
    ];
    MeshData {
        vertices,
        indices: Some(vec![0, 1, 2, 0, 2, 3]),
    }
}

/// UV sphere tessellated ring by ring
///
/// Stack angle sweeps pi/2 -> -pi/2 so the poles sit on the z axis; normals
/// are positions over radius, texcoords are the parametric fractions.
pub fn sphere(radius: f32, sector_count: u32, stack_count: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((sector_count + 1) * (stack_count + 1)) as usize);
    let mut indices = Vec::new();

    let length_inv = 1.0 / radius;
    let sector_step = 2.0 * std::f32::consts::PI / sector_count as f32;
    let stack_step = std::f32::consts::PI / stack_count as f32;

    for i in 0..=stack_count {
        let stack_angle = std::f32::consts::FRAC_PI_2 - i as f32 * stack_step;
        let xy = radius * stack_angle.cos();
        let z = radius * stack_angle.sin();

        for j in 0..=sector_count {
            let sector_angle = j as f32 * sector_step;
            let x = xy * sector_angle.cos();
            let y = xy * sector_angle.sin();

            vertices.push(Vertex::new(
                [x, y, z],
                WHITE,
                [j as f32 / sector_count as f32, i as f32 / stack_count as f32],
                [x * length_inv, y * length_inv, z * length_inv],
            ));
        }
    }

    for i in 0..stack_count {
        let mut k1 = i * (sector_count + 1);
        let mut k2 = k1 + sector_count + 1;
        for _ in 0..sector_count {
            if i != 0 {
                indices.extend_from_slice(&[k1, k2, k1 + 1]);
            }
            if i != stack_count - 1 {
                indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            }
            k1 += 1;
            k2 += 1;
        }
    }

    MeshData {
        vertices,
        indices: Some(indices),
    }
}

/// Torus in the xz plane, tube wrapped by `side_count` segments
pub fn torus(major_radius: f32, minor_radius: f32, sector_count: u32, side_count: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((sector_count + 1) * (side_count + 1)) as usize);
    let mut indices = Vec::with_capacity((sector_count * side_count * 6) as usize);

    let sector_step = 2.0 * std::f32::consts::PI / sector_count as f32;
    let side_step = 2.0 * std::f32::consts::PI / side_count as f32;

    for i in 0..=side_count {
        let phi = i as f32 * side_step;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for j in 0..=sector_count {
            let theta = j as f32 * sector_step;
            let (sin_theta, cos_theta) = theta.sin_cos();

            let ring = major_radius + minor_radius * cos_phi;
            let position = [ring * cos_theta, minor_radius * sin_phi, ring * sin_theta];
            let normal = [cos_phi * cos_theta, sin_phi, cos_phi * sin_theta];

            vertices.push(Vertex::new(
                position,
                WHITE,
                [j as f32 / sector_count as f32, i as f32 / side_count as f32],
                normal,
            ));
        }
    }

    for i in 0..side_count {
        let mut k1 = i * (sector_count + 1);
        let mut k2 = k1 + sector_count + 1;
        for _ in 0..sector_count {
            indices.extend_from_slice(&[k1, k2, k1 + 1]);
            indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
            k1 += 1;
            k2 += 1;
        }
    }

    MeshData {
        vertices,
        indices: Some(indices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let mesh = sphere(0.5, 36, 18);
        assert_eq!(mesh.vertex_count(), 37 * 19);
        assert_eq!(mesh.draw_count(), 6 * 36 * 17);
    }

    #[test]
    fn test_sphere_normals_unit_length() {
        let mesh = sphere(2.0, 12, 6);
        for v in &mesh.vertices {
            let len = Vec3::from_array(v.normal).length();
            assert!((len - 1.0).abs() < 1e-4, "normal length {len}");
        }
    }

    #[test]
    fn test_sphere_positions_on_surface() {
        let radius = 0.5;
        let mesh = sphere(radius, 36, 18);
        for v in &mesh.vertices {
            let r = Vec3::from_array(v.position).length();
            assert!((r - radius).abs() < 1e-4, "vertex off the sphere: {r}");
        }
    }

    #[test]
    fn test_sphere_indices_in_range() {
        let mesh = sphere(1.0, 8, 4);
        let count = mesh.vertex_count() as u32;
        for &i in mesh.indices.as_ref().unwrap() {
            assert!(i < count);
        }
    }

    #[test]
    fn test_torus_counts() {
        let mesh = torus(1.0, 0.3, 24, 12);
        assert_eq!(mesh.vertex_count(), 25 * 13);
        assert_eq!(mesh.draw_count(), 6 * 24 * 12);
    }

    #[test]
    fn test_torus_tube_distance() {
        let major = 1.0;
        let minor = 0.3;
        let mesh = torus(major, minor, 16, 8);
        for v in &mesh.vertices {
            let p = Vec3::from_array(v.position);
            // Distance from the tube's center circle must equal the minor radius
            let ring = (p.x * p.x + p.z * p.z).sqrt() - major;
            let d = (ring * ring + p.y * p.y).sqrt();
            assert!((d - minor).abs() < 1e-4, "vertex off the tube: {d}");
        }
    }

    #[test]
    fn test_pyramid_counts() {
        let mesh = pyramid();
        assert_eq!(mesh.vertex_count(), 16);
        assert_eq!(mesh.draw_count(), 18);
    }

    #[test]
    fn test_cube_is_unindexed() {
        let mesh = cube();
        assert!(mesh.indices.is_none());
        assert_eq!(mesh.draw_count(), 36);
    }

    #[test]
    fn test_flat_meshes() {
        assert_eq!(floor().draw_count(), 6);
        assert_eq!(mirror_quad().draw_count(), 6);
        assert_eq!(light_cube().draw_count(), 36);
    }
}
