//! Magnet pouches: sealed cylindrical sockets seated into the part.
//!
//! Socket dimensions scale linearly from a reference magnet of
//! 3/8" × 1/8" (9.525 × 3.175 mm). Each pouch is seated in two steps: a
//! slightly shrunk convex envelope is cut out of the part, then the socket
//! is fused into the gap, so the socket wall replaces whatever was there.

use crate::errors::{Result, ThimbleError};
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::shapes::{Axis, CylinderSpec};
use crate::scene::{BooleanOp, Scene};
use crate::traits::CSG;
use nalgebra::{Point3, Translation3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const REF_MAGNET_DIAMETER: Real = 9.525;
pub const REF_MAGNET_THICKNESS: Real = 3.175;

/// Envelope scale relative to the socket's outer shell.
pub const CONVEX_SHRINK: Real = 0.99;

/// A disc magnet, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagnetSpec {
    pub diameter: Real,
    pub thickness: Real,
}

impl MagnetSpec {
    pub const fn new(diameter: Real, thickness: Real) -> Self {
        Self { diameter, thickness }
    }
}

impl Default for MagnetSpec {
    fn default() -> Self {
        Self::new(9.0, 3.0)
    }
}

/// Radii (`*_xy`) and depths (`*_z`) of the socket's three cylinders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PouchDimensions {
    /// Magnet cavity.
    pub mid_xy: Real,
    pub mid_z: Real,
    /// Outer shell.
    pub outer_xy: Real,
    pub outer_z: Real,
    /// Lid recess.
    pub lid_xy: Real,
    pub lid_z: Real,
}

impl PouchDimensions {
    pub fn from_magnet(magnet: &MagnetSpec) -> Self {
        let mid_xy = 5.0 * magnet.diameter / REF_MAGNET_DIAMETER;
        let mid_z = 3.0 * magnet.thickness / REF_MAGNET_THICKNESS;
        Self {
            mid_xy,
            mid_z,
            outer_xy: mid_xy + 1.0,
            outer_z: mid_z + 2.0,
            lid_xy: 4.0 * magnet.diameter / REF_MAGNET_DIAMETER,
            lid_z: mid_z + 1.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mid_xy > 0.0 && self.mid_z > 0.0 {
            Ok(())
        } else {
            Err(ThimbleError::InvalidDimensions(format!(
                "magnet cavity {} × {} is empty",
                self.mid_xy, self.mid_z
            )))
        }
    }
}

/// Radius halfway between the part's outer and inner walls.
pub fn mid_radius(outer: Real, inner: Real) -> Real {
    0.5 * (outer + inner)
}

/// Four pouch centres on a circle of radius `mid_radius` in the X–Z plane
/// through `(0, center_y, center_z)`: east, west, up, down.
pub fn pouch_centers(mid_radius: Real, center_y: Real, center_z: Real) -> [Point3<Real>; 4] {
    // exact quarter turns of (r, 0)
    [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)]
        .map(|(cx, cz)| Point3::new(cx * mid_radius, center_y, center_z + cz * mid_radius))
}

/// Where a pouch built at the origin ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PouchPlacement {
    pub center: Point3<Real>,
    pub axis: Axis,
}

impl PouchPlacement {
    pub const fn new(center: Point3<Real>, axis: Axis) -> Self {
        Self { center, axis }
    }

    /// `center` pushed half the shell depth along `axis`, so the socket's
    /// near face sits on `center`.
    pub fn location(&self, outer_z: Real) -> Point3<Real> {
        self.center + self.axis.unit() * (outer_z / 2.0)
    }
}

/// Shrunk convex envelope of `socket`, scaled about its own centre.
#[cfg(feature = "chull-io")]
fn convex_envelope(socket: &Mesh, dims: &PouchDimensions, axis: Axis, segments: usize) -> Mesh {
    match socket.convex_hull() {
        Some(hull) => {
            let pivot = nalgebra::center(&hull.bounding_box().mins, &hull.bounding_box().maxs);
            hull.scale_about(pivot, CONVEX_SHRINK)
        },
        None => envelope_cylinder(dims, axis, segments),
    }
}

#[cfg(not(feature = "chull-io"))]
fn convex_envelope(_socket: &Mesh, dims: &PouchDimensions, axis: Axis, segments: usize) -> Mesh {
    envelope_cylinder(dims, axis, segments)
}

fn envelope_cylinder(dims: &PouchDimensions, axis: Axis, segments: usize) -> Mesh {
    CylinderSpec::new(dims.outer_xy * CONVEX_SHRINK, dims.outer_z * CONVEX_SHRINK, axis)
        .with_segments(segments)
        .build()
}

/// Build socket `name` and its envelope `{name}_convex` for a magnet seated
/// at `center`. Returns `(convex_name, pouch_name)`.
///
/// The socket is an outer shell with the magnet cavity and lid recess
/// subtracted; all three share one centre, so the cavity is sealed.
pub fn create_pouch(
    scene: &mut Scene,
    magnet: &MagnetSpec,
    center: Point3<Real>,
    name: &str,
    axis: Axis,
    segments: usize,
) -> Result<(String, String)> {
    let dims = PouchDimensions::from_magnet(magnet);
    let convex_name = format!("{name}_convex");
    let cavity = format!("{name}_cylinder1");
    let lid = format!("{name}_cylinder3");

    let cylinder = |radius: Real, depth: Real| {
        CylinderSpec::new(radius, depth, axis).with_segments(segments)
    };
    scene.add_cylinder(name, &cylinder(dims.outer_xy, dims.outer_z));
    scene.add_cylinder(cavity.as_str(), &cylinder(dims.mid_xy, dims.mid_z));
    scene.add_cylinder(lid.as_str(), &cylinder(dims.lid_xy, dims.lid_z));
    scene.apply_boolean(name, &cavity, BooleanOp::Difference, true)?;
    scene.apply_boolean(name, &lid, BooleanOp::Difference, true)?;

    let envelope = convex_envelope(scene.object(name)?, &dims, axis, segments);
    scene.add(convex_name.as_str(), envelope);

    let location = PouchPlacement::new(center, axis).location(dims.outer_z);
    let shift = Translation3::from(location.coords).to_homogeneous();
    for object in [convex_name.as_str(), name] {
        let mesh = scene.object(object)?.transform(&shift);
        scene.add(object, mesh);
    }
    debug!(name, ?location, outer_xy = dims.outer_xy, outer_z = dims.outer_z, "created pouch");

    Ok((convex_name, name.to_string()))
}

/// Seat a pouch at every centre: cut the envelope out of `target`, then
/// fuse the socket in. Returns the number of pouches inserted.
pub fn insert_pouches(
    scene: &mut Scene,
    target: &str,
    magnet: &MagnetSpec,
    centers: &[Point3<Real>],
    axis: Axis,
    segments: usize,
) -> Result<usize> {
    scene.object(target)?;
    for (i, center) in centers.iter().enumerate() {
        let name = format!("pouch{i}");
        let (convex, pouch) = create_pouch(scene, magnet, *center, &name, axis, segments)?;
        scene.apply_boolean(target, &convex, BooleanOp::Difference, true)?;
        scene.apply_boolean(target, &pouch, BooleanOp::Union, true)?;
        info!(index = i, ?center, faces = scene.face_count(target)?, "seated pouch");
    }
    Ok(centers.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_magnet_gives_round_numbers() {
        let dims = PouchDimensions::from_magnet(&MagnetSpec::new(
            REF_MAGNET_DIAMETER,
            REF_MAGNET_THICKNESS,
        ));
        assert_relative_eq!(dims.mid_xy, 5.0, epsilon = 1e-12);
        assert_relative_eq!(dims.outer_xy, 6.0, epsilon = 1e-12);
        assert_relative_eq!(dims.mid_z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(dims.outer_z, 5.0, epsilon = 1e-12);
        assert_relative_eq!(dims.lid_xy, 4.0, epsilon = 1e-12);
        assert_relative_eq!(dims.lid_z, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn nine_by_three_magnet() {
        let dims = PouchDimensions::from_magnet(&MagnetSpec::default());
        assert_relative_eq!(dims.mid_xy, 4.724409, epsilon = 1e-6);
        assert_relative_eq!(dims.outer_xy, 5.724409, epsilon = 1e-6);
        assert_relative_eq!(dims.mid_z, 2.834646, epsilon = 1e-6);
        assert_relative_eq!(dims.outer_z, 4.834646, epsilon = 1e-6);
        assert_relative_eq!(dims.lid_xy, 3.779528, epsilon = 1e-6);
        assert_relative_eq!(dims.lid_z, 3.834646, epsilon = 1e-6);
        assert!(dims.validate().is_ok());
    }

    #[test]
    fn centres_are_exact_quarter_turns() {
        let c = pouch_centers(13.0, 2.0, -1.0);
        assert_eq!(c[0], Point3::new(13.0, 2.0, -1.0));
        assert_eq!(c[1], Point3::new(-13.0, 2.0, -1.0));
        assert_eq!(c[2], Point3::new(0.0, 2.0, 12.0));
        assert_eq!(c[3], Point3::new(0.0, 2.0, -14.0));
        assert_relative_eq!(mid_radius(20.0, 6.0), 13.0);
    }

    #[test]
    fn placement_shifts_along_axis() {
        let p = PouchPlacement::new(Point3::new(1.0, 2.0, 3.0), Axis::Y).location(4.0);
        assert_eq!(p, Point3::new(1.0, 4.0, 3.0));
        let p = PouchPlacement::new(Point3::origin(), Axis::X).location(4.0);
        assert_eq!(p, Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn pouch_and_envelope_share_a_location() {
        let mut scene = Scene::new();
        let magnet = MagnetSpec::default();
        let (convex, pouch) =
            create_pouch(&mut scene, &magnet, Point3::new(10.0, 0.0, 0.0), "pouch0", Axis::Y, 32)
                .expect("pouch");
        assert_eq!((convex.as_str(), pouch.as_str()), ("pouch0_convex", "pouch0"));
        assert_eq!(scene.names().collect::<Vec<_>>(), vec!["pouch0", "pouch0_convex"]);

        let dims = PouchDimensions::from_magnet(&magnet);
        let shell = scene.bounding_box(&pouch).expect("pouch bounds");
        let env = scene.bounding_box(&convex).expect("envelope bounds");
        assert_relative_eq!(shell.min_y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(shell.max_y, dims.outer_z, epsilon = 1e-9);
        assert_relative_eq!(shell.center().x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(env.center().y, shell.center().y, epsilon = 1e-9);
        assert_relative_eq!(env.height_y(), dims.outer_z * CONVEX_SHRINK, epsilon = 1e-9);
        assert!(env.width_x() < shell.width_x());

        // sealed cavity: the centre of the socket is empty
        let socket = scene.object(&pouch).expect("socket");
        assert!(!socket.contains_vertex(&shell.center()));
        assert!(socket.signed_volume() > 0.0);
    }
}
