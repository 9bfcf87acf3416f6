// mesh.rs — 全景球网格（经纬分段，UV 对应等距柱状投影）

use crate::engine::Axis;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

/// 与常见 3D 库的 SphereGeometry 同一种参数化：
/// u 绕 Y 轴一圈，v 从北极 (+Y) 到南极；纹理第 0 行对应北极
pub fn build_sphere(radius: f32, width_segments: u32, height_segments: u32) -> SphereMesh {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let count = ((w + 1) * (h + 1)) as usize;

    let mut positions = Vec::with_capacity(count);
    let mut uvs = Vec::with_capacity(count);
    let mut indices = Vec::with_capacity((w * h * 6) as usize);

    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        let theta = std::f32::consts::PI * v;

        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            let phi = 2.0 * std::f32::consts::PI * u;

            let x = -radius * phi.cos() * theta.sin();
            let y = radius * theta.cos();
            let z = radius * phi.sin() * theta.sin();

            positions.push([x, y, z]);
            uvs.push([u, v]);
        }
    }

    let row = w + 1;
    for iy in 0..h {
        for ix in 0..w {
            let a = iy * row + ix;
            let b = a + row;

            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }

    SphereMesh {
        positions,
        uvs,
        indices,
    }
}

impl SphereMesh {
    /// 沿某轴镜像（scale -1），同时翻转三角形绕序
    pub fn invert_along(&mut self, axis: Axis) {
        let i = match axis {
            Axis::X => 0,
            #[cfg(test)]
            Axis::Y => 1,
            #[cfg(test)]
            Axis::Z => 2,
        };
        for p in &mut self.positions {
            p[i] = -p[i];
        }
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.uvs)
            .map(|(position, uv)| Vertex {
                position: *position,
                uv: *uv,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_counts() {
        let mesh = build_sphere(500.0, 60, 40);
        assert_eq!(mesh.positions.len(), 61 * 41);
        assert_eq!(mesh.uvs.len(), mesh.positions.len());
        assert_eq!(mesh.indices.len(), 60 * 40 * 6);
        assert!(mesh
            .indices
            .iter()
            .all(|i| (*i as usize) < mesh.positions.len()));
    }

    #[test]
    fn test_vertices_on_radius() {
        let mesh = build_sphere(500.0, 16, 8);
        for p in &mesh.positions {
            let len = (p[0] * p[0] + p[1] * p[1] + p[2] * p[2]).sqrt();
            assert!((len - 500.0).abs() < 0.05);
        }
        // 第一行是北极
        assert!((mesh.positions[0][1] - 500.0).abs() < 1e-3);
        assert_eq!(mesh.uvs[0], [0.0, 0.0]);
    }

    #[test]
    fn test_invert_x_mirrors_and_flips_winding() {
        let original = build_sphere(10.0, 8, 4);
        let mut inverted = original.clone();
        inverted.invert_along(Axis::X);

        for (a, b) in original.positions.iter().zip(&inverted.positions) {
            assert_eq!(a[0], -b[0]);
            assert_eq!(a[1], b[1]);
            assert_eq!(a[2], b[2]);
        }
        assert_eq!(
            original.indices[..3],
            [inverted.indices[0], inverted.indices[2], inverted.indices[1]]
        );
    }

    #[test]
    fn test_invert_y_and_z_keep_other_axes() {
        let original = build_sphere(10.0, 8, 4);
        let mut inverted = original.clone();
        inverted.invert_along(Axis::Y);
        inverted.invert_along(Axis::Z);

        for (a, b) in original.positions.iter().zip(&inverted.positions) {
            assert_eq!(a[0], b[0]);
            assert_eq!(a[1], -b[1]);
            assert_eq!(a[2], -b[2]);
        }
        // 两次翻转绕序恢复
        assert_eq!(original.indices, inverted.indices);
    }

    #[test]
    fn test_vertices_interleave() {
        let mesh = build_sphere(1.0, 4, 2);
        let verts = mesh.vertices();
        assert_eq!(verts.len(), mesh.positions.len());
        assert_eq!(verts[3].position, mesh.positions[3]);
        assert_eq!(verts[3].uv, mesh.uvs[3]);
    }
}
