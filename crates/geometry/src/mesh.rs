use glam::Vec3;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a vertex and return its index.
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        index
    }

    /// Append a flat-shaded triangle. The normal follows the winding.
    pub fn push_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        let ia = self.push_vertex(a, normal);
        let ib = self.push_vertex(b, normal);
        let ic = self.push_vertex(c, normal);
        self.indices.extend([ia, ib, ic]);
    }

    /// Append a flat quad `a b c d` (counter-clockwise) as two triangles.
    pub fn push_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) {
        self.push_triangle(a, b, c);
        self.push_triangle(a, c, d);
    }

    pub fn bounds(&self) -> Option<Aabb> {
        let mut iter = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Aabb { min, max })
    }

    /// Face normal of triangle `t`, from its winding.
    pub fn face_normal(&self, t: usize) -> Vec3 {
        let [a, b, c] = self.triangle(t);
        (b - a).cross(c - a).normalize_or_zero()
    }

    pub fn triangle(&self, t: usize) -> [Vec3; 3] {
        let i = &self.indices[t * 3..t * 3 + 3];
        [
            Vec3::from_array(self.positions[i[0] as usize]),
            Vec3::from_array(self.positions[i[1] as usize]),
            Vec3::from_array(self.positions[i[2] as usize]),
        ]
    }

    /// Signed volume enclosed by the mesh (divergence theorem). Positive
    /// when the surface is closed and its triangles face outward.
    pub fn signed_volume(&self) -> f32 {
        (0..self.triangle_count())
            .map(|t| {
                let [a, b, c] = self.triangle(t);
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_triangle_uses_winding_for_normal() {
        let mut mesh = MeshData::new();
        mesh.push_triangle(Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.face_normal(0), Vec3::Z);
    }

    #[test]
    fn bounds_of_empty_mesh() {
        assert!(MeshData::new().bounds().is_none());
    }

    #[test]
    fn bounds_cover_all_points() {
        let mut mesh = MeshData::new();
        mesh.push_quad(
            Vec3::new(-1.0, -2.0, 0.0),
            Vec3::new(3.0, -2.0, 0.0),
            Vec3::new(3.0, 4.0, 0.0),
            Vec3::new(-1.0, 4.0, 0.0),
        );
        let b = mesh.bounds().unwrap();
        assert_eq!(b.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(b.max, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(b.size(), Vec3::new(4.0, 6.0, 0.0));
    }
}
