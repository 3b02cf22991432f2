use crate::GeometryError;
use glam::Vec2;

const EPSILON: f32 = 1e-6;

/// A closed 2-D outline traced with `move_to`/`line_to`.
///
/// The outline is implicitly closed; a final `line_to` back onto the start
/// point is accepted and dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    points: Vec<Vec2>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rectangle with one corner on the origin, traced the same way the car
    /// body outlines are: up the Y axis first, then across.
    pub fn rectangle(width: f32, length: f32) -> Self {
        let mut shape = Self::new();
        shape
            .move_to(0.0, 0.0)
            .line_to(0.0, length)
            .line_to(width, length)
            .line_to(width, 0.0)
            .line_to(0.0, 0.0);
        shape
    }

    /// Start a new outline, discarding any previous points.
    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.points.clear();
        self.points.push(Vec2::new(x, y));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.points.push(Vec2::new(x, y));
        self
    }

    /// Raw points as traced.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Signed area of the traced points; positive when counter-clockwise.
    pub fn signed_area(&self) -> f32 {
        signed_area(&self.points)
    }

    /// The outline normalised for extrusion: consecutive duplicates and the
    /// closing point removed, wound counter-clockwise.
    pub fn outline(&self) -> Result<Vec<Vec2>, GeometryError> {
        let mut pts: Vec<Vec2> = Vec::with_capacity(self.points.len());
        for p in &self.points {
            if pts.last().is_none_or(|last| last.distance(*p) > EPSILON) {
                pts.push(*p);
            }
        }
        while pts.len() > 1 && pts[0].distance(pts[pts.len() - 1]) <= EPSILON {
            pts.pop();
        }
        if pts.len() < 3 {
            return Err(GeometryError::TooFewPoints(pts.len()));
        }
        let area = signed_area(&pts);
        if area.abs() <= EPSILON {
            return Err(GeometryError::DegenerateShape);
        }
        if area < 0.0 {
            pts.reverse();
        }
        Ok(pts)
    }
}

fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

fn cross(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a - o).perp_dot(b - o)
}

/// Inclusive of the edges: a reflex vertex touching the candidate ear's
/// diagonal must still block it.
fn inside_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    if [a, b, c].iter().any(|v| v.distance(p) <= EPSILON) {
        return false;
    }
    cross(a, b, p) >= -EPSILON && cross(b, c, p) >= -EPSILON && cross(c, a, p) >= -EPSILON
}

/// Ear-clipping triangulation of a counter-clockwise simple polygon.
/// Returns index triples into `outline`, each wound counter-clockwise.
pub(crate) fn triangulate(outline: &[Vec2]) -> Result<Vec<[usize; 3]>, GeometryError> {
    if outline.len() < 3 {
        return Err(GeometryError::TooFewPoints(outline.len()));
    }
    let mut remaining: Vec<usize> = (0..outline.len()).collect();
    let mut triangles = Vec::with_capacity(outline.len() - 2);

    while remaining.len() > 3 {
        let n = remaining.len();
        let mut clipped = false;
        for i in 0..n {
            let prev = remaining[(i + n - 1) % n];
            let cur = remaining[i];
            let next = remaining[(i + 1) % n];
            let (a, b, c) = (outline[prev], outline[cur], outline[next]);
            let turn = cross(a, b, c);
            if turn.abs() <= EPSILON {
                // collinear: drop the middle point, no area lost
                remaining.remove(i);
                clipped = true;
                break;
            }
            if turn < 0.0 {
                continue;
            }
            let blocked = remaining
                .iter()
                .filter(|&&k| k != prev && k != cur && k != next)
                .any(|&k| inside_triangle(outline[k], a, b, c));
            if blocked {
                continue;
            }
            triangles.push([prev, cur, next]);
            remaining.remove(i);
            clipped = true;
            break;
        }
        if !clipped {
            return Err(GeometryError::Triangulation);
        }
    }

    let (a, b, c) = (remaining[0], remaining[1], remaining[2]);
    if cross(outline[a], outline[b], outline[c]).abs() > EPSILON {
        triangles.push([a, b, c]);
    }
    if triangles.is_empty() {
        return Err(GeometryError::DegenerateShape);
    }
    Ok(triangles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rectangle_outline_is_normalised() {
        let shape = Shape::rectangle(8.0, 12.0);
        // traced clockwise with a closing point
        assert_eq!(shape.points().len(), 5);
        assert!(shape.signed_area() < 0.0);

        let outline = shape.outline().unwrap();
        assert_eq!(outline.len(), 4);
        assert!((signed_area(&outline) - 96.0).abs() < 1e-4);
    }

    #[test]
    fn too_few_points_rejected() {
        let mut shape = Shape::new();
        shape.move_to(0.0, 0.0).line_to(1.0, 0.0).line_to(0.0, 0.0);
        assert!(matches!(
            shape.outline(),
            Err(GeometryError::TooFewPoints(2))
        ));
    }

    #[test]
    fn collinear_outline_rejected() {
        let mut shape = Shape::new();
        shape.move_to(0.0, 0.0).line_to(1.0, 0.0).line_to(2.0, 0.0);
        assert!(matches!(shape.outline(), Err(GeometryError::DegenerateShape)));
    }

    #[test]
    fn move_to_restarts_outline() {
        let mut shape = Shape::new();
        shape.move_to(5.0, 5.0).line_to(6.0, 6.0);
        shape.move_to(0.0, 0.0);
        assert_eq!(shape.points(), &[Vec2::ZERO]);
    }

    #[test]
    fn triangulate_square() {
        let outline = Shape::rectangle(2.0, 2.0).outline().unwrap();
        let tris = triangulate(&outline).unwrap();
        assert_eq!(tris.len(), 2);
        let area: f32 = tris
            .iter()
            .map(|t| cross(outline[t[0]], outline[t[1]], outline[t[2]]) * 0.5)
            .sum();
        assert!((area - 4.0).abs() < 1e-5);
    }

    #[test]
    fn triangulate_concave_l_shape() {
        let mut shape = Shape::new();
        shape
            .move_to(0.0, 0.0)
            .line_to(2.0, 0.0)
            .line_to(2.0, 1.0)
            .line_to(1.0, 1.0)
            .line_to(1.0, 2.0)
            .line_to(0.0, 2.0);
        let outline = shape.outline().unwrap();
        let tris = triangulate(&outline).unwrap();
        assert_eq!(tris.len(), 4);
        for t in &tris {
            assert!(cross(outline[t[0]], outline[t[1]], outline[t[2]]) > 0.0);
        }
        let area: f32 = tris
            .iter()
            .map(|t| cross(outline[t[0]], outline[t[1]], outline[t[2]]) * 0.5)
            .sum();
        assert!((area - 3.0).abs() < 1e-5);
    }
}
