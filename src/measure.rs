//! World-space extents of scene objects.

use crate::float_types::Real;
use crate::mesh::Mesh;
use nalgebra::Point3;

/// Axis-aligned extrema of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: Real,
    pub max_x: Real,
    pub min_y: Real,
    pub max_y: Real,
    pub min_z: Real,
    pub max_z: Real,
}

impl BoundingBox {
    /// Extrema of `points`, or `None` if there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<Real>>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bb = BoundingBox {
            min_x: first.x,
            max_x: first.x,
            min_y: first.y,
            max_y: first.y,
            min_z: first.z,
            max_z: first.z,
        };
        for p in iter {
            bb.min_x = bb.min_x.min(p.x);
            bb.max_x = bb.max_x.max(p.x);
            bb.min_y = bb.min_y.min(p.y);
            bb.max_y = bb.max_y.max(p.y);
            bb.min_z = bb.min_z.min(p.z);
            bb.max_z = bb.max_z.max(p.z);
        }
        Some(bb)
    }

    /// Extrema over every vertex of `mesh`.
    pub fn of_mesh(mesh: &Mesh) -> Option<Self> {
        Self::from_points(mesh.polygons.iter().flat_map(|p| p.vertices.iter().map(|v| &v.pos)))
    }

    pub fn width_x(&self) -> Real {
        self.max_x - self.min_x
    }

    pub fn height_y(&self) -> Real {
        self.max_y - self.min_y
    }

    pub fn depth_z(&self) -> Real {
        self.max_z - self.min_z
    }

    /// Half the X extent; the radius of a part that is round in X.
    pub fn half_width_x(&self) -> Real {
        self.width_x() / 2.0
    }

    pub fn center(&self) -> Point3<Real> {
        Point3::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CSG;

    #[test]
    fn box_of_translated_cuboid() {
        let mesh = Mesh::cuboid(4.0, 2.0, 6.0).translate(-2.0, 1.0, -3.0);
        let bb = BoundingBox::of_mesh(&mesh).expect("non-empty");
        assert_eq!(bb.min_x, -2.0);
        assert_eq!(bb.max_y, 3.0);
        assert_eq!(bb.half_width_x(), 2.0);
        assert_eq!(bb.height_y(), 2.0);
        assert_eq!(bb.depth_z(), 6.0);
        assert_eq!(bb.center(), Point3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn empty_set_has_no_box() {
        assert!(BoundingBox::of_mesh(&Mesh::new()).is_none());
    }
}
