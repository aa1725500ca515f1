//! Oriented planes and the polygon splitting that drives the BSP kernel.

use crate::float_types::{EPSILON, Real, tolerance};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Isometry3, Matrix4, Point3, Rotation3, Translation3, Vector3};

// Point/polygon classification bits
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane in Hessian normal form: `normal · p = w`, with a unit `normal`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Build from a (possibly non-unit) normal and a point on the plane.
    pub fn from_normal_and_point(normal: Vector3<Real>, point: &Point3<Real>) -> Self {
        let normal = normal.normalize();
        let w = normal.dot(&point.coords);
        Plane { normal, w }
    }

    /// Plane through three points; the normal follows `(b - a) × (c - a)`.
    pub fn from_points(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Self {
        let n = (b - a).cross(&(c - a));
        if n.norm_squared() < EPSILON * EPSILON {
            return Plane {
                normal: Vector3::z(),
                w: a.z,
            };
        }
        Self::from_normal_and_point(n, a)
    }

    /// Plane of an arbitrary (possibly non-convex) vertex loop.
    ///
    /// Uses Newell's method so the normal agrees with the loop winding even
    /// when the first three vertices are collinear.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        let n = vertices.len();
        if n < 3 {
            return Plane {
                normal: Vector3::z(),
                w: 0.0,
            };
        }

        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (i, current) in vertices.iter().enumerate() {
            let next = &vertices[(i + 1) % n];
            normal.x += (current.pos.y - next.pos.y) * (current.pos.z + next.pos.z);
            normal.y += (current.pos.z - next.pos.z) * (current.pos.x + next.pos.x);
            normal.z += (current.pos.x - next.pos.x) * (current.pos.y + next.pos.y);
            centroid += current.pos.coords;
        }
        centroid /= n as Real;

        if normal.norm_squared() < EPSILON * EPSILON {
            return Self::from_points(&vertices[0].pos, &vertices[1].pos, &vertices[2].pos);
        }
        Self::from_normal_and_point(normal, &Point3::from(centroid))
    }

    pub const fn normal(&self) -> Vector3<Real> {
        self.normal
    }

    pub const fn offset(&self) -> Real {
        self.w
    }

    /// Flip the plane (reverse normal and offset)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance of `point` from the plane; positive in front.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as FRONT, BACK or COPLANAR within [`tolerance`].
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        let eps = tolerance();
        if t < -eps {
            BACK
        } else if t > eps {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Bitwise OR of the classification of every vertex of `polygon`.
    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Splits `polygon` by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let vertex_i = &polygon.vertices[i];
                    let vertex_j = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(vertex_i.clone());
                    }
                    if type_i != FRONT {
                        split_back.push(vertex_i.clone());
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vertex_j.pos - vertex_i.pos));
                        if denom.abs() > EPSILON {
                            let t = (self.w - self.normal.dot(&vertex_i.pos.coords)) / denom;
                            let crossing = vertex_i.interpolate(vertex_j, t);
                            split_front.push(crossing.clone());
                            split_back.push(crossing);
                        }
                    }
                }

                // keep the parent plane so fragments stay exactly coplanar
                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane.clone()));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane.clone()));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }

    /// Returns `(to_xy, from_xy)`: the first maps points on this plane into
    /// the XY plane with the normal along +Z, the second maps them back.
    pub fn to_xy_transform(&self) -> (Matrix4<Real>, Matrix4<Real>) {
        let rot = Rotation3::rotation_between(&self.normal, &Vector3::z())
            .unwrap_or_else(|| {
                // normal points along -Z
                Rotation3::from_axis_angle(&Vector3::x_axis(), crate::float_types::PI)
            });
        let iso_rot = Isometry3::from_parts(Translation3::identity(), rot.into());

        let p0 = Point3::from(self.normal * self.w);
        let shift_z = -iso_rot.transform_point(&p0).z;
        let to_xy =
            Translation3::new(0.0, 0.0, shift_z).to_homogeneous() * iso_rot.to_homogeneous();
        let from_xy = to_xy.try_inverse().unwrap_or_else(Matrix4::identity);
        (to_xy, from_xy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(z: Real) -> Polygon {
        Polygon::new(vec![
            Vertex::new(Point3::new(-1.0, -1.0, z), Vector3::z()),
            Vertex::new(Point3::new(1.0, -1.0, z), Vector3::z()),
            Vertex::new(Point3::new(1.0, 1.0, z), Vector3::z()),
            Vertex::new(Point3::new(-1.0, 1.0, z), Vector3::z()),
        ])
    }

    #[test]
    fn newell_plane_matches_winding() {
        let plane = square(2.0).plane;
        assert_relative_eq!(plane.normal, Vector3::z(), epsilon = 1e-12);
        assert_relative_eq!(plane.w, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn orient_point_respects_tolerance() {
        let plane = Plane::from_normal_and_point(Vector3::y(), &Point3::origin());
        assert_eq!(plane.orient_point(&Point3::new(0.0, 1.0, 0.0)), FRONT);
        assert_eq!(plane.orient_point(&Point3::new(0.0, -1.0, 0.0)), BACK);
        assert_eq!(plane.orient_point(&Point3::new(3.0, 1e-9, 0.0)), COPLANAR);
    }

    #[test]
    fn split_spanning_square() {
        let plane = Plane::from_normal_and_point(Vector3::x(), &Point3::origin());
        let (cf, cb, front, back) = plane.split_polygon(&square(0.0));
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        assert!(front[0].vertices.iter().all(|v| v.pos.x >= -1e-9));
        assert!(back[0].vertices.iter().all(|v| v.pos.x <= 1e-9));
        assert_eq!(front[0].vertices.len(), 4);
    }

    #[test]
    fn coplanar_goes_by_orientation() {
        let plane = Plane::from_normal_and_point(-Vector3::z(), &Point3::origin());
        let (cf, cb, _, _) = plane.split_polygon(&square(0.0));
        assert!(cf.is_empty());
        assert_eq!(cb.len(), 1);
    }

    #[test]
    fn xy_transform_round_trip() {
        let plane =
            Plane::from_normal_and_point(Vector3::new(1.0, 1.0, 0.0), &Point3::new(1.0, 2.0, 3.0));
        let (to_xy, from_xy) = plane.to_xy_transform();
        let p = Point3::new(1.0, 2.0, 3.0);
        let flat = to_xy.transform_point(&p);
        assert_relative_eq!(flat.z, 0.0, epsilon = 1e-9);
        let back = from_xy.transform_point(&flat);
        assert_relative_eq!(back, p, epsilon = 1e-9);
    }
}
