use crate::{GeometryError, MeshData};
use glam::Vec3;
use std::f32::consts::TAU;

/// A `width` x `height` quad in the XY plane, centred on the origin and
/// facing +Z.
pub fn plane(width: f32, height: f32) -> Result<MeshData, GeometryError> {
    if !(width > 0.0 && height > 0.0) {
        return Err(GeometryError::InvalidParameter {
            name: "plane size",
            reason: "width and height must be positive",
        });
    }
    let (hw, hh) = (width * 0.5, height * 0.5);
    let mut mesh = MeshData::new();
    mesh.push_quad(
        Vec3::new(-hw, -hh, 0.0),
        Vec3::new(hw, -hh, 0.0),
        Vec3::new(hw, hh, 0.0),
        Vec3::new(-hw, hh, 0.0),
    );
    Ok(mesh)
}

/// Parameters for [`cylinder`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderParams {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
}

impl CylinderParams {
    /// A closed cylinder with equal radii and one height segment.
    pub fn new(radius: f32, height: f32, radial_segments: u32) -> Self {
        Self {
            radius_top: radius,
            radius_bottom: radius,
            height,
            radial_segments,
            height_segments: 1,
            open_ended: false,
        }
    }
}

/// Cylinder centred on the origin with its axis along Y. The side is
/// smooth shaded, the caps flat.
pub fn cylinder(params: &CylinderParams) -> Result<MeshData, GeometryError> {
    if params.radial_segments < 3 {
        return Err(GeometryError::InvalidParameter {
            name: "radial_segments",
            reason: "must be at least 3",
        });
    }
    if params.height_segments == 0 {
        return Err(GeometryError::InvalidParameter {
            name: "height_segments",
            reason: "must be at least 1",
        });
    }
    if !(params.height > 0.0) {
        return Err(GeometryError::InvalidParameter {
            name: "height",
            reason: "must be positive",
        });
    }
    if params.radius_top < 0.0
        || params.radius_bottom < 0.0
        || params.radius_top + params.radius_bottom <= 0.0
    {
        return Err(GeometryError::InvalidParameter {
            name: "radius",
            reason: "radii must be non-negative and not both zero",
        });
    }

    let radial = params.radial_segments as usize;
    let rows = params.height_segments as usize;
    let half = params.height * 0.5;
    let slope = (params.radius_bottom - params.radius_top) / params.height;
    let angle = |x: usize| x as f32 / radial as f32 * TAU;
    let ring_point = |radius: f32, theta: f32, y: f32| {
        Vec3::new(radius * theta.sin(), y, radius * theta.cos())
    };

    let mut mesh = MeshData::new();

    // side: rows + 1 rings of radial + 1 vertices (the seam is duplicated)
    let mut grid = Vec::with_capacity(rows + 1);
    for row in 0..=rows {
        let v = row as f32 / rows as f32;
        let radius = v * (params.radius_bottom - params.radius_top) + params.radius_top;
        let y = half - v * params.height;
        let ring: Vec<u32> = (0..=radial)
            .map(|x| {
                let theta = angle(x);
                let normal = Vec3::new(theta.sin(), slope, theta.cos()).normalize();
                mesh.push_vertex(ring_point(radius, theta, y), normal)
            })
            .collect();
        grid.push(ring);
    }
    for row in 0..rows {
        for x in 0..radial {
            let a = grid[row][x];
            let b = grid[row + 1][x];
            let c = grid[row + 1][x + 1];
            let d = grid[row][x + 1];
            mesh.indices.extend([a, b, d, b, c, d]);
        }
    }

    if !params.open_ended {
        if params.radius_top > 0.0 {
            let center = Vec3::new(0.0, half, 0.0);
            for x in 0..radial {
                let p0 = ring_point(params.radius_top, angle(x), half);
                let p1 = ring_point(params.radius_top, angle(x + 1), half);
                mesh.push_triangle(center, p0, p1);
            }
        }
        if params.radius_bottom > 0.0 {
            let center = Vec3::new(0.0, -half, 0.0);
            for x in 0..radial {
                let p0 = ring_point(params.radius_bottom, angle(x), -half);
                let p1 = ring_point(params.radius_bottom, angle(x + 1), -half);
                mesh.push_triangle(center, p1, p0);
            }
        }
    }

    Ok(mesh)
}
