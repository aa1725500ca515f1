//! Primitive solids used by the cap and pouch constructors.

use crate::float_types::{FRAC_PI_2, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::traits::CSG;
use nalgebra::{Point3, Rotation3, Translation3, Vector3};
use serde::{Deserialize, Serialize};

/// Tessellation used for every cylinder unless told otherwise.
pub const DEFAULT_SEGMENTS: usize = 128;

/// World axis a cylinder's length runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
    Z,
}

impl Axis {
    /// Unit vector along the axis.
    pub fn unit(self) -> Vector3<Real> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// Rotation taking a Z-aligned primitive onto this axis.
    ///
    /// `X` turns 90° about Y and `Y` turns 90° about X.
    pub fn rotation(self) -> Rotation3<Real> {
        match self {
            Axis::X => Rotation3::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
            Axis::Y => Rotation3::from_axis_angle(&Vector3::x_axis(), FRAC_PI_2),
            Axis::Z => Rotation3::identity(),
        }
    }
}

/// Parameters of a cylinder primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct CylinderSpec {
    pub radius: Real,
    /// Length along `axis`.
    pub depth: Real,
    pub location: Point3<Real>,
    pub axis: Axis,
    pub segments: usize,
}

impl CylinderSpec {
    /// A cylinder centred on the origin along `axis` with the default tessellation.
    pub fn new(radius: Real, depth: Real, axis: Axis) -> Self {
        Self {
            radius,
            depth,
            location: Point3::origin(),
            axis,
            segments: DEFAULT_SEGMENTS,
        }
    }

    pub const fn at(mut self, location: Point3<Real>) -> Self {
        self.location = location;
        self
    }

    pub const fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Tessellate into a closed solid.
    pub fn build(&self) -> Mesh {
        let local = Mesh::cylinder(self.radius, self.depth, self.segments);
        let placement = Translation3::from(self.location.coords).to_homogeneous()
            * self.axis.rotation().to_homogeneous();
        local.transform(&placement)
    }
}

impl Mesh {
    /// Axis-aligned box spanning `[0, width] × [0, length] × [0, height]`.
    pub fn cuboid(width: Real, length: Real, height: Real) -> Mesh {
        let p = |x: Real, y: Real, z: Real| Point3::new(x * width, y * length, z * height);
        let faces = [
            [p(0., 0., 0.), p(0., 0., 1.), p(0., 1., 1.), p(0., 1., 0.)],
            [p(1., 0., 0.), p(1., 1., 0.), p(1., 1., 1.), p(1., 0., 1.)],
            [p(0., 0., 0.), p(1., 0., 0.), p(1., 0., 1.), p(0., 0., 1.)],
            [p(0., 1., 0.), p(0., 1., 1.), p(1., 1., 1.), p(1., 1., 0.)],
            [p(0., 0., 0.), p(0., 1., 0.), p(1., 1., 0.), p(1., 0., 0.)],
            [p(0., 0., 1.), p(1., 0., 1.), p(1., 1., 1.), p(0., 1., 1.)],
        ];
        Mesh::from_polygons(faces.iter().map(|f| Polygon::from_points(f)).collect())
    }

    /// Closed cylinder along +Z, centred on the origin, spanning `z ∈ [-depth/2, depth/2]`.
    ///
    /// Side faces are quads; the two end faces are single `segments`-gons.
    pub fn cylinder(radius: Real, depth: Real, segments: usize) -> Mesh {
        let segments = segments.max(3);
        let half = depth * 0.5;
        let ring = |z: Real| -> Vec<Point3<Real>> {
            (0..segments)
                .map(|i| {
                    let angle = TAU * i as Real / segments as Real;
                    Point3::new(radius * angle.cos(), radius * angle.sin(), z)
                })
                .collect()
        };
        let bottom = ring(-half);
        let top = ring(half);

        let mut polygons = Vec::with_capacity(segments + 2);
        polygons.push(Polygon::from_points(&top));
        polygons.push(Polygon::from_points(
            &bottom.iter().rev().copied().collect::<Vec<_>>(),
        ));
        for i in 0..segments {
            let j = (i + 1) % segments;
            polygons.push(Polygon::from_points(&[bottom[i], bottom[j], top[j], top[i]]));
        }
        Mesh::from_polygons(polygons)
    }
}
