//! Planar polygons, the unit the BSP kernel splits and classifies.

use crate::float_types::parry3d::bounding_volume::Aabb;
use crate::float_types::{EPSILON, Real};
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use geo::{Coord, LineString, Polygon as GeoPolygon, TriangulateEarcut};
use nalgebra::Point3;

/// A planar polygon with its cached plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    pub plane: Plane,
}

impl Polygon {
    /// Create a polygon, deriving the plane from the vertex loop.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon { vertices, plane }
    }

    /// Create a polygon that keeps an already-known plane.
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Self {
        Polygon { vertices, plane }
    }

    /// Polygon from bare positions; every vertex gets the face normal.
    pub fn from_points(points: &[Point3<Real>]) -> Self {
        let vertices: Vec<Vertex> = points
            .iter()
            .map(|p| Vertex::new(*p, nalgebra::Vector3::zeros()))
            .collect();
        let mut polygon = Self::new(vertices);
        polygon.set_new_normal();
        polygon
    }

    /// Reverse winding, vertex normals and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.vertices.iter_mut().for_each(Vertex::flip);
        self.plane.flip();
    }

    /// Overwrite every vertex normal with the plane normal.
    pub fn set_new_normal(&mut self) {
        let normal = self.plane.normal();
        self.vertices.iter_mut().for_each(|v| v.normal = normal);
    }

    /// Axis-aligned bounds of the vertex loop.
    pub fn bounding_box(&self) -> Aabb {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        for v in &self.vertices {
            mins = mins.inf(&v.pos);
            maxs = maxs.sup(&v.pos);
        }
        Aabb::new(mins, maxs)
    }

    /// Vector area (half the Newell normal); its norm is the polygon area.
    pub fn area(&self) -> Real {
        let n = self.vertices.len();
        if n < 3 {
            return 0.0;
        }
        let origin = self.vertices[0].pos;
        (1..n - 1)
            .map(|i| {
                (self.vertices[i].pos - origin).cross(&(self.vertices[i + 1].pos - origin))
            })
            .fold(nalgebra::Vector3::zeros(), |acc, c| acc + c)
            .dot(&self.plane.normal)
            .abs()
            * 0.5
    }

    /// True when every turn of the loop has the same sense as the plane normal.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        if n <= 3 {
            return true;
        }
        (0..n).all(|i| {
            let a = &self.vertices[i].pos;
            let b = &self.vertices[(i + 1) % n].pos;
            let c = &self.vertices[(i + 2) % n].pos;
            (b - a).cross(&(c - b)).dot(&self.plane.normal) >= -EPSILON
        })
    }

    /// Triangulate this polygon into a list of triangles, each triangle is `[v0, v1, v2]`.
    ///
    /// Convex loops are fanned; anything else is projected to 2D and ear-cut.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        let n = self.vertices.len();
        if n < 3 {
            return Vec::new();
        }
        if n == 3 {
            return vec![[
                self.vertices[0].clone(),
                self.vertices[1].clone(),
                self.vertices[2].clone(),
            ]];
        }
        if self.is_convex() {
            return (1..n - 1)
                .map(|i| {
                    [
                        self.vertices[0].clone(),
                        self.vertices[i].clone(),
                        self.vertices[i + 1].clone(),
                    ]
                })
                .collect();
        }

        let (to_xy, _) = self.plane.to_xy_transform();
        let coords: Vec<Coord<Real>> = self
            .vertices
            .iter()
            .map(|v| {
                let p = to_xy.transform_point(&v.pos);
                Coord { x: p.x, y: p.y }
            })
            .collect();

        let triangulation =
            GeoPolygon::new(LineString::new(coords), Vec::new()).earcut_triangles_raw();
        triangulation
            .triangle_indices
            .chunks_exact(3)
            // a repeated closing coordinate maps back onto vertex 0
            .map(|tri| {
                [
                    self.vertices[tri[0] % n].clone(),
                    self.vertices[tri[1] % n].clone(),
                    self.vertices[tri[2] % n].clone(),
                ]
            })
            .map(|tri| orient_like(tri, &self.plane))
            .collect()
    }
}

/// Ear-cut output may come back clockwise; restore the polygon's winding.
fn orient_like(mut tri: [Vertex; 3], plane: &Plane) -> [Vertex; 3] {
    let n = (tri[1].pos - tri[0].pos).cross(&(tri[2].pos - tri[0].pos));
    if n.dot(&plane.normal) < 0.0 {
        tri.swap(1, 2);
    }
    tri
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn flip_reverses_everything() {
        let mut poly = Polygon::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        poly.flip();
        assert_relative_eq!(poly.plane.normal.z, -1.0, epsilon = 1e-12);
        assert_eq!(poly.vertices[0].pos, Point3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(poly.vertices[0].normal.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn concave_polygon_triangulates_with_same_area() {
        // an L shape, area 3
        let poly = Polygon::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ]);
        assert!(!poly.is_convex());
        let tris = poly.triangulate();
        assert_eq!(tris.len(), 4);
        let area: Real = tris
            .iter()
            .map(|t| (t[1].pos - t[0].pos).cross(&(t[2].pos - t[0].pos)).z * 0.5)
            .sum();
        assert_relative_eq!(area, 3.0, epsilon = 1e-9);
        assert_relative_eq!(poly.area(), 3.0, epsilon = 1e-9);
    }

    #[test]
    fn convex_polygon_fans() {
        let poly = Polygon::from_points(&[
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ]);
        assert_eq!(poly.triangulate().len(), 2);
        let bb = poly.bounding_box();
        assert_eq!(bb.mins, Point3::new(0.0, 0.0, 1.0));
        assert_eq!(bb.maxs, Point3::new(1.0, 1.0, 1.0));
    }
}
