//! `Mesh` struct and implementations of the `CSG` trait for `Mesh`

use crate::float_types::{
    parry3d::{
        bounding_volume::{Aabb, BoundingVolume},
        query::{Ray, RayCast},
        shape::Triangle,
    },
    {EPSILON, Real},
};
use crate::mesh::{bsp::Node, plane::Plane, polygon::Polygon};
use crate::traits::CSG;
use nalgebra::{Isometry3, Matrix4, Point3, Vector3, partial_max, partial_min};
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod bsp;
#[cfg(feature = "chull-io")]
pub mod convex_hull;
pub mod manifold;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// A closed (or nearly closed) polygonal solid.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// 3D polygons for volumetric shapes
    pub polygons: Vec<Polygon>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<Aabb>,
}

impl PartialEq for Mesh {
    fn eq(&self, other: &Self) -> bool {
        self.polygons == other.polygons
    }
}

impl Mesh {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    /// Split polygons into (may_touch, cannot_touch) using bounding‑box tests
    fn partition_polys(polys: &[Polygon], other_bb: &Aabb) -> (Vec<Polygon>, Vec<Polygon>) {
        let mut maybe = Vec::new();
        let mut never = Vec::new();
        for p in polys {
            if p.bounding_box().intersects(other_bb) {
                maybe.push(p.clone());
            } else {
                never.push(p.clone());
            }
        }
        (maybe, never)
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Number of polygonal faces, counted the way a modeller counts them.
    pub fn face_count(&self) -> usize {
        self.polygons.len()
    }

    /// Number of triangles the mesh would have after [`Mesh::triangulate`].
    pub fn triangle_count(&self) -> usize {
        self.polygons
            .iter()
            .map(|p| p.vertices.len().saturating_sub(2))
            .sum()
    }

    /// Triangulate each polygon in the Mesh returning a Mesh containing triangles
    pub fn triangulate(&self) -> Mesh {
        let triangles = self
            .polygons
            .iter()
            .flat_map(|poly| {
                poly.triangulate()
                    .into_iter()
                    .map(move |triangle| Polygon::with_plane(triangle.to_vec(), poly.plane.clone()))
            })
            .collect::<Vec<_>>();

        Mesh::from_polygons(triangles)
    }

    /// Signed enclosed volume; positive when faces wind outward.
    pub fn signed_volume(&self) -> Real {
        self.polygons
            .iter()
            .flat_map(Polygon::triangulate)
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// Casts a ray defined by `origin` + t * `direction` against all triangles
    /// of this mesh and returns a list of (intersection_point, distance),
    /// sorted by ascending distance.
    pub fn ray_intersections(
        &self,
        origin: &Point3<Real>,
        direction: &Vector3<Real>,
    ) -> Vec<(Point3<Real>, Real)> {
        let ray = Ray::new(*origin, *direction);
        let iso = Isometry3::identity();

        let mut hits: Vec<(Point3<Real>, Real)> = self
            .polygons
            .iter()
            .flat_map(Polygon::triangulate)
            .filter_map(|[a, b, c]| {
                Triangle::new(a.pos, b.pos, c.pos)
                    .cast_ray_and_get_normal(&iso, &ray, Real::MAX, true)
                    .map(|hit| (ray.point_at(hit.time_of_impact), hit.time_of_impact))
            })
            .collect();

        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        // shared edges report the same hit twice
        hits.dedup_by(|a, b| (a.1 - b.1).abs() < EPSILON);
        hits
    }

    /// Even-odd containment test along a skewed ray.
    pub fn contains_vertex(&self, point: &Point3<Real>) -> bool {
        self.ray_intersections(point, &Vector3::new(1.0, 1.3, 0.7))
            .len()
            % 2
            == 1
    }
}

impl CSG for Mesh {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh::default()
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh) -> Mesh {
        // avoid splitting obvious non‑intersecting faces
        let (a_clip, a_passthru) = Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, b_passthru) = Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);
        final_polys.extend(b_passthru);
        Mesh::from_polygons(final_polys)
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh) -> Mesh {
        let (a_clip, a_passthru) = Self::partition_polys(&self.polygons, &other.bounding_box());
        let (b_clip, _b_passthru) = Self::partition_polys(&other.polygons, &self.bounding_box());

        let mut a = Node::from_polygons(&a_clip);
        let mut b = Node::from_polygons(&b_clip);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        let mut final_polys = a.all_polygons();
        final_polys.extend(a_passthru);
        Mesh::from_polygons(final_polys)
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    fn intersection(&self, other: &Mesh) -> Mesh {
        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygons(a.all_polygons())
    }

    /// Apply an arbitrary 3D transform (as a 4x4 matrix) to the mesh.
    ///
    /// A singular matrix leaves normals untransformed; the planes are
    /// recomputed from the moved vertices either way.
    fn transform(&self, mat: &Matrix4<Real>) -> Mesh {
        let mat_inv_transpose = mat
            .try_inverse()
            .map(|m| m.transpose())
            .unwrap_or_else(Matrix4::identity);
        let mut mesh = self.clone();

        let apply = |poly: &mut Polygon| {
            for vert in &mut poly.vertices {
                vert.pos = mat.transform_point(&vert.pos);
                let normal = mat_inv_transpose.transform_vector(&vert.normal);
                vert.normal = normal.try_normalize(EPSILON).unwrap_or(normal);
            }
            poly.plane = Plane::from_vertices(&poly.vertices);
        };

        #[cfg(feature = "parallel")]
        mesh.polygons.par_iter_mut().for_each(apply);
        #[cfg(not(feature = "parallel"))]
        mesh.polygons.iter_mut().for_each(apply);

        mesh.invalidate_bounding_box();
        mesh
    }

    /// Returns a [`parry3d::bounding_volume::Aabb`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> Aabb {
        *self.bounding_box.get_or_init(|| {
            let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
            let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);

            for v in self.polygons.iter().flat_map(|p| &p.vertices) {
                for axis in 0..3 {
                    if let Some(lo) = partial_min(&mins[axis], &v.pos[axis]) {
                        mins[axis] = *lo;
                    }
                    if let Some(hi) = partial_max(&maxs[axis], &v.pos[axis]) {
                        maxs[axis] = *hi;
                    }
                }
            }

            // no polygons: a trivial AABB at the origin
            if mins.x > maxs.x {
                return Aabb::new(Point3::origin(), Point3::origin());
            }
            Aabb::new(mins, maxs)
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh {
        let mut mesh = self.clone();
        mesh.polygons.iter_mut().for_each(Polygon::flip);
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn union_of_overlapping_cubes_has_expected_volume() {
        let a = Mesh::cuboid(2.0, 2.0, 2.0);
        let b = Mesh::cuboid(2.0, 2.0, 2.0).translate(1.0, 0.0, 0.0);
        let u = a.union(&b);
        assert_relative_eq!(u.signed_volume(), 12.0, epsilon = 1e-6);
        let bb = u.bounding_box();
        assert_relative_eq!(bb.maxs.x, 3.0, epsilon = 1e-9);
    }

    #[test]
    fn difference_carves_a_notch() {
        let a = Mesh::cuboid(2.0, 2.0, 2.0);
        let b = Mesh::cuboid(1.0, 1.0, 4.0).translate(0.5, 0.5, -1.0);
        let d = a.difference(&b);
        assert_relative_eq!(d.signed_volume(), 6.0, epsilon = 1e-6);
        assert!(!d.contains_vertex(&Point3::new(1.0, 1.0, 1.0)));
        assert!(d.contains_vertex(&Point3::new(0.2, 0.2, 1.0)));
    }

    #[test]
    fn intersection_keeps_the_overlap() {
        let a = Mesh::cuboid(2.0, 2.0, 2.0);
        let b = Mesh::cuboid(2.0, 2.0, 2.0).translate(1.0, 1.0, 1.0);
        assert_relative_eq!(a.intersection(&b).signed_volume(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn disjoint_union_passes_polygons_through() {
        let a = Mesh::cuboid(1.0, 1.0, 1.0);
        let b = Mesh::cuboid(1.0, 1.0, 1.0).translate(5.0, 0.0, 0.0);
        let u = a.union(&b);
        assert_eq!(u.polygons.len(), 12);
        assert_relative_eq!(u.signed_volume(), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn inverse_negates_volume() {
        let cube = Mesh::cuboid(1.0, 2.0, 3.0);
        assert_relative_eq!(cube.inverse().signed_volume(), -6.0, epsilon = 1e-9);
    }

    #[test]
    fn transform_invalidates_cached_bounds() {
        let cube = Mesh::cuboid(1.0, 1.0, 1.0);
        let _ = cube.bounding_box();
        let moved = cube.translate(0.0, 0.0, 10.0);
        assert_relative_eq!(moved.bounding_box().mins.z, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn empty_mesh_has_origin_bounds() {
        let bb = Mesh::new().bounding_box();
        assert_eq!(bb.mins, Point3::origin());
        assert_eq!(bb.maxs, Point3::origin());
    }
}
