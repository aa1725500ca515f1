//! Convex hull of a mesh's vertex cloud.

use crate::float_types::Real;
use crate::mesh::{Mesh, polygon::Polygon};
use chull::ConvexHullWrapper;
use hashbrown::HashSet;
use nalgebra::Point3;

impl Mesh {
    /// Convex hull of every vertex in the mesh, as outward-wound triangles.
    ///
    /// Returns `None` when the points are degenerate (fewer than four, or
    /// all coplanar).
    pub fn convex_hull(&self) -> Option<Mesh> {
        // shared corners repeat once per incident polygon
        let mut seen = HashSet::new();
        let points: Vec<Vec<Real>> = self
            .polygons
            .iter()
            .flat_map(|poly| poly.vertices.iter())
            .filter(|v| seen.insert([v.pos.x.to_bits(), v.pos.y.to_bits(), v.pos.z.to_bits()]))
            .map(|v| vec![v.pos.x, v.pos.y, v.pos.z])
            .collect();
        if points.len() < 4 {
            return None;
        }

        let hull = ConvexHullWrapper::try_new(&points, None).ok()?;
        let (verts, indices) = hull.vertices_indices();

        let polygons: Vec<Polygon> = indices
            .chunks_exact(3)
            .map(|tri| {
                let p = |i: usize| Point3::new(verts[i][0], verts[i][1], verts[i][2]);
                Polygon::from_points(&[p(tri[0]), p(tri[1]), p(tri[2])])
            })
            .collect();

        let mut hull = Mesh::from_polygons(polygons);
        // the wrapper does not promise a winding
        if hull.signed_volume() < 0.0 {
            hull.polygons.iter_mut().for_each(Polygon::flip);
        }
        Some(hull)
    }
}
