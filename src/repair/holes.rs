//! Boundary loop detection and hole filling.

use crate::float_types::{EPSILON, Real};
use crate::indexed::IndexedMesh;
use crate::indexed::adjacency::face_edges;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use geo::{Coord, LineString, Polygon as GeoPolygon, TriangulateEarcut};
use hashbrown::HashMap;
use nalgebra::{Point3, Vector3};
use tracing::{debug, info, warn};

/// A closed chain of boundary vertices, ordered so that a face spanning
/// the loop in this order winds consistently with its neighbours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryLoop {
    pub vertices: Vec<u32>,
}

impl BoundaryLoop {
    pub fn edge_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Trace every hole in the mesh.
///
/// Each boundary half-edge `a -> b` of a face becomes `b -> a` in the loop,
/// so the fill inherits the surrounding winding. Vertices where several
/// loops touch are split greedily; chains that do not close are dropped.
pub fn detect_holes(mesh: &IndexedMesh) -> Vec<BoundaryLoop> {
    let mut directed: HashMap<(u32, u32), usize> = HashMap::new();
    for face in &mesh.faces {
        for edge in face_edges(face) {
            *directed.entry(edge).or_insert(0) += 1;
        }
    }

    // outgoing loop edges per vertex
    let mut next: HashMap<u32, Vec<u32>> = HashMap::new();
    for (&(a, b), _) in directed.iter() {
        if !directed.contains_key(&(b, a)) {
            next.entry(b).or_default().push(a);
        }
    }
    let mut starts: Vec<u32> = next.keys().copied().collect();
    starts.sort_unstable();

    let mut loops = Vec::new();
    for start in starts {
        while next.get(&start).is_some_and(|out| !out.is_empty()) {
            let mut chain = vec![start];
            let mut current = start;
            let closed = loop {
                let Some(step) = next.get_mut(&current).and_then(Vec::pop) else {
                    break false;
                };
                if step == start {
                    break true;
                }
                chain.push(step);
                current = step;
                if chain.len() > mesh.positions.len() {
                    break false;
                }
            };
            if closed && chain.len() >= 3 {
                loops.push(BoundaryLoop { vertices: chain });
            } else {
                warn!(start, len = chain.len(), "boundary chain does not close");
            }
        }
    }

    debug!(holes = loops.len(), "detected boundary loops");
    loops
}

/// Triangulate a boundary loop by projecting it onto its best-fit plane
/// and ear-cutting. The triangles wind like the loop.
pub fn fill_hole(mesh: &IndexedMesh, boundary: &BoundaryLoop) -> Vec<[u32; 3]> {
    let n = boundary.vertices.len();
    if n < 3 {
        return Vec::new();
    }
    let ids = &boundary.vertices;
    if n == 3 {
        return vec![[ids[0], ids[1], ids[2]]];
    }

    let loop_vertices: Vec<Vertex> = ids
        .iter()
        .map(|&i| Vertex::new(mesh.positions[i as usize], Vector3::zeros()))
        .collect();
    let plane = Plane::from_vertices(&loop_vertices);
    let (to_xy, _) = plane.to_xy_transform();
    let coords: Vec<Coord<Real>> = loop_vertices
        .iter()
        .map(|v| {
            let p = to_xy.transform_point(&v.pos);
            Coord { x: p.x, y: p.y }
        })
        .collect();

    let raw = GeoPolygon::new(LineString::new(coords), Vec::new()).earcut_triangles_raw();
    let mut triangles: Vec<[u32; 3]> = raw
        .triangle_indices
        .chunks_exact(3)
        .map(|t| [ids[t[0] % n], ids[t[1] % n], ids[t[2] % n]])
        .filter(|&[a, b, c]| a != b && b != c && a != c)
        .map(|tri| orient_to(tri, &mesh.positions, &plane.normal))
        .collect();

    // earcut gives up on self-overlapping projections; fan instead
    if triangles.is_empty() {
        triangles = (1..n - 1).map(|i| [ids[0], ids[i], ids[i + 1]]).collect();
    }
    triangles
}

fn orient_to(mut tri: [u32; 3], positions: &[Point3<Real>], normal: &Vector3<Real>) -> [u32; 3] {
    let [a, b, c] = tri.map(|i| positions[i as usize]);
    let n = (b - a).cross(&(c - a));
    if n.norm_squared() > EPSILON * EPSILON && n.dot(normal) < 0.0 {
        tri.swap(1, 2);
    }
    tri
}

/// Fill every hole with at most `max_edges` edges; `0` means no limit.
///
/// Returns the number of holes filled.
pub fn fill_holes(mesh: &mut IndexedMesh, max_edges: usize) -> usize {
    let holes = detect_holes(mesh);
    let mut filled = 0;
    for hole in &holes {
        if max_edges != 0 && hole.edge_count() > max_edges {
            warn!(edges = hole.edge_count(), max_edges, "skipping large hole");
            continue;
        }
        let triangles = fill_hole(mesh, hole);
        if triangles.is_empty() {
            continue;
        }
        mesh.faces.extend(triangles);
        filled += 1;
    }
    if filled > 0 {
        info!(filled, "filled holes");
    }
    filled
}
