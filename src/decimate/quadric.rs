//! Quadric error metric.

use crate::float_types::Real;
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

/// Sum of squared distances to a set of planes, as `vᵀ Q v` with `v = [x, y, z, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadric(Matrix4<Real>);

impl Default for Quadric {
    fn default() -> Self {
        Self(Matrix4::zeros())
    }
}

impl Quadric {
    /// Quadric of the plane `normal · p + d = 0`; `normal` must be unit length.
    pub fn from_plane(normal: &Vector3<Real>, d: Real) -> Self {
        let p = Vector4::new(normal.x, normal.y, normal.z, d);
        Self(p * p.transpose())
    }

    /// Quadric of the plane through a triangle, or `None` if it is degenerate.
    pub fn from_triangle(a: &Point3<Real>, b: &Point3<Real>, c: &Point3<Real>) -> Option<Self> {
        let normal = (b - a).cross(&(c - a)).try_normalize(1e-12)?;
        Some(Self::from_plane(&normal, -normal.dot(&a.coords)))
    }

    pub fn add(&mut self, other: &Self) {
        self.0 += other.0;
    }

    pub fn evaluate(&self, p: &Point3<Real>) -> Real {
        let v = p.to_homogeneous();
        v.dot(&(self.0 * v))
    }

    /// Point minimising the error, or `None` when the 3×3 system is singular
    /// (all planes parallel, or sharing a line).
    pub fn optimal_point(&self) -> Option<Point3<Real>> {
        let a: Matrix3<Real> = self.0.fixed_view::<3, 3>(0, 0).into_owned();
        if a.determinant().abs() < 1e-10 {
            return None;
        }
        let b: Vector3<Real> = self.0.fixed_view::<3, 1>(0, 3).into_owned();
        a.try_inverse().map(|inv| Point3::from(-(inv * b)))
    }
}
