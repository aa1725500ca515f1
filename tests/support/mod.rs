//! Test support library
//! Provides various helper functions & utilities for tests.
#![allow(dead_code)]

use nalgebra::{Point3, Vector3};
use std::path::{Path, PathBuf};
use thimble::{
    float_types::{Real, TAU},
    io::save_mesh,
    mesh::{Mesh, polygon::Polygon, vertex::Vertex},
};

/// Returns the approximate bounding box `[min_x, min_y, min_z, max_x, max_y, max_z]`
/// for a set of polygons.
pub fn bounding_box(polygons: &[Polygon]) -> [Real; 6] {
    let mut bb = [Real::MAX, Real::MAX, Real::MAX, Real::MIN, Real::MIN, Real::MIN];
    for p in polygons.iter().flat_map(|poly| poly.vertices.iter().map(|v| v.pos)) {
        bb[0] = bb[0].min(p.x);
        bb[1] = bb[1].min(p.y);
        bb[2] = bb[2].min(p.z);
        bb[3] = bb[3].max(p.x);
        bb[4] = bb[4].max(p.y);
        bb[5] = bb[5].max(p.z);
    }
    bb
}

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Helper to make a simple Polygon in 3D with given vertices.
pub fn make_polygon_3d(points: &[[Real; 3]]) -> Polygon {
    let verts = points
        .iter()
        .map(|p| Vertex::new(Point3::new(p[0], p[1], p[2]), Vector3::z()))
        .collect();
    Polygon::new(verts)
}

/// Quad wound so its normal points along `outward`.
fn oriented_quad(mut points: [Point3<Real>; 4], outward: Vector3<Real>) -> Polygon {
    let normal = (points[1] - points[0]).cross(&(points[2] - points[0]));
    if normal.dot(&outward) < 0.0 {
        points.reverse();
    }
    Polygon::from_points(&points)
}

/// A closed hollow tube along Y, spanning `y ∈ [-height/2, height/2]`:
/// a stand-in for a scanned thimble body.
pub fn tube(outer: Real, inner: Real, height: Real, segments: usize) -> Mesh {
    let half = height / 2.0;
    let at = |r: Real, i: usize, y: Real| {
        let a = TAU * (i % segments) as Real / segments as Real;
        Point3::new(r * a.cos(), y, r * a.sin())
    };
    let mut polygons = Vec::with_capacity(4 * segments);
    for i in 0..segments {
        let mid = TAU * (i as Real + 0.5) / segments as Real;
        let radial = Vector3::new(mid.cos(), 0.0, mid.sin());
        polygons.push(oriented_quad(
            [
                at(outer, i, -half),
                at(outer, i + 1, -half),
                at(outer, i + 1, half),
                at(outer, i, half),
            ],
            radial,
        ));
        polygons.push(oriented_quad(
            [
                at(inner, i, -half),
                at(inner, i + 1, -half),
                at(inner, i + 1, half),
                at(inner, i, half),
            ],
            -radial,
        ));
        polygons.push(oriented_quad(
            [
                at(inner, i, half),
                at(outer, i, half),
                at(outer, i + 1, half),
                at(inner, i + 1, half),
            ],
            Vector3::y(),
        ));
        polygons.push(oriented_quad(
            [
                at(inner, i, -half),
                at(outer, i, -half),
                at(outer, i + 1, -half),
                at(inner, i + 1, -half),
            ],
            -Vector3::y(),
        ));
    }
    Mesh::from_polygons(polygons)
}

/// Write `mesh` into `dir` under `file_name` and return the path.
pub fn write_fixture(dir: &Path, file_name: &str, mesh: &Mesh) -> PathBuf {
    let path = dir.join(file_name);
    save_mesh(mesh, "fixture", &path).expect("fixture mesh should be writable");
    path
}
