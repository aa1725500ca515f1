//! T-junction removal for boolean output.

use super::weld::{cell_of, weld_vertices};
use crate::float_types::Real;
use crate::indexed::IndexedMesh;
use crate::indexed::adjacency::face_edges;
use crate::mesh::Mesh;
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use tracing::debug;

/// Split every face edge that has another vertex lying on it.
///
/// A BSP boolean cuts a polygon where its neighbour stays whole, which
/// leaves a vertex in the middle of the neighbour's edge. The surface is
/// closed but its edges no longer pair up. A vertex counts as on an edge
/// when it is within `epsilon` of the segment and more than `epsilon` from
/// both ends. Only vertices used by some face are considered.
///
/// Slivers thinner than `epsilon` are dropped first; their far vertex then
/// splits the face across the long edge instead.
///
/// Returns the number of splits made.
pub fn split_t_junctions(mesh: &mut IndexedMesh, epsilon: Real) -> usize {
    if mesh.faces.is_empty() || epsilon <= 0.0 {
        return 0;
    }
    let before = mesh.faces.len();
    let positions = &mesh.positions;
    mesh.faces.retain(|face| !is_sliver(positions, face, epsilon));
    let slivers = before - mesh.faces.len();

    let grid = VertexGrid::new(mesh, epsilon);

    let faces = std::mem::take(&mut mesh.faces);
    let mut splits = 0;
    for face in faces {
        let mut pending = vec![face];
        while let Some(face) = pending.pop() {
            let Some((edge, v)) = grid.find_split(&mesh.positions, &face, epsilon) else {
                mesh.faces.push(face);
                continue;
            };
            let (a, b, c) = (face[edge], face[(edge + 1) % 3], face[(edge + 2) % 3]);
            // second half first so the output keeps a -> b order along the edge
            pending.push([v, b, c]);
            pending.push([a, v, c]);
            splits += 1;
        }
    }

    if splits > 0 || slivers > 0 {
        debug!(splits, slivers, faces = mesh.faces.len(), "split t-junctions");
    }
    splits
}

fn is_sliver(positions: &[Point3<Real>], face: &[u32; 3], epsilon: Real) -> bool {
    let [a, b, c] = [face[0], face[1], face[2]].map(|v| positions[v as usize]);
    let longest = (b - a).norm().max((c - b).norm()).max((a - c).norm());
    let double_area = (b - a).cross(&(c - a)).norm();
    longest > 0.0 && double_area < epsilon * longest
}

/// Weld and split T-junctions on a polygon mesh, leaving it as triangles
/// whose edges pair up wherever the surface is closed.
///
/// Unlike [`finalize_for_print`](super::finalize_for_print) this never adds
/// or reorients faces. Returns the number of T-junction splits.
pub fn stitch_seams(mesh: &mut Mesh, epsilon: Real) -> usize {
    let mut indexed = IndexedMesh::from_mesh(mesh);
    weld_vertices(&mut indexed, epsilon);
    let splits = split_t_junctions(&mut indexed, epsilon);
    *mesh = indexed.to_mesh();
    splits
}

/// Referenced vertices bucketed by a cell about one mean edge long.
struct VertexGrid {
    cell_size: Real,
    cells: HashMap<(i64, i64, i64), Vec<u32>>,
}

impl VertexGrid {
    fn new(mesh: &IndexedMesh, epsilon: Real) -> Self {
        let mut total = 0.0;
        let mut edges = 0usize;
        let mut referenced = vec![false; mesh.positions.len()];
        for face in &mesh.faces {
            for (a, b) in face_edges(face) {
                total += (mesh.positions[b as usize] - mesh.positions[a as usize]).norm();
                edges += 1;
            }
            for &v in face {
                referenced[v as usize] = true;
            }
        }
        let cell_size = (total / edges.max(1) as Real).max(epsilon * 4.0);

        let mut cells: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
        for (idx, pos) in mesh.positions.iter().enumerate() {
            if referenced[idx] {
                cells.entry(cell_of(pos, cell_size)).or_default().push(idx as u32);
            }
        }
        Self { cell_size, cells }
    }

    /// Vertices in the cells around the segment `a..b`.
    ///
    /// Samples are at most one cell apart, so every point within half a
    /// cell of the segment falls in a neighbour of some sample's cell.
    fn near_segment(&self, a: &Point3<Real>, b: &Point3<Real>) -> Vec<u32> {
        let steps = ((b - a).norm() / self.cell_size).ceil().max(1.0) as usize;
        let mut visited = HashSet::new();
        let mut found = Vec::new();
        for i in 0..=steps {
            let p = a + (b - a) * (i as Real / steps as Real);
            let (cx, cy, cz) = cell_of(&p, self.cell_size);
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let key = (cx + dx, cy + dy, cz + dz);
                        if !visited.insert(key) {
                            continue;
                        }
                        if let Some(vertices) = self.cells.get(&key) {
                            found.extend_from_slice(vertices);
                        }
                    }
                }
            }
        }
        found
    }

    /// First edge of `face` with a vertex on it, and the vertex nearest
    /// that edge's start.
    fn find_split(
        &self,
        positions: &[Point3<Real>],
        face: &[u32; 3],
        epsilon: Real,
    ) -> Option<(usize, u32)> {
        for edge in 0..3 {
            let start = positions[face[edge] as usize];
            let end = positions[face[(edge + 1) % 3] as usize];
            let length = (end - start).norm();
            if length <= 2.0 * epsilon {
                continue;
            }
            let dir = (end - start) / length;

            let mut nearest: Option<(Real, u32)> = None;
            for v in self.near_segment(&start, &end) {
                if face.contains(&v) {
                    continue;
                }
                let offset = positions[v as usize] - start;
                let along = offset.dot(&dir);
                if along <= epsilon || along >= length - epsilon {
                    continue;
                }
                if (offset - dir * along).norm() >= epsilon {
                    continue;
                }
                if nearest.is_none_or(|(best, _)| along < best) {
                    nearest = Some((along, v));
                }
            }
            if let Some((_, v)) = nearest {
                return Some((edge, v));
            }
        }
        None
    }
}
