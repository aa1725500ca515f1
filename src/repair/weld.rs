//! Vertex welding and face cleanup.

use crate::float_types::Real;
use crate::indexed::IndexedMesh;
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use tracing::debug;

/// Merge vertices closer than `epsilon` ("remove doubles").
///
/// Positions are bucketed into a grid of `2·epsilon` cells and only the
/// 27 surrounding cells are compared. Faces collapsed by the merge are
/// dropped and unreferenced vertices removed. Returns the number of
/// vertices merged away.
pub fn weld_vertices(mesh: &mut IndexedMesh, epsilon: Real) -> usize {
    if mesh.positions.is_empty() || epsilon <= 0.0 {
        return 0;
    }
    let cell_size = epsilon * 2.0;

    let mut grid: HashMap<(i64, i64, i64), Vec<u32>> = HashMap::new();
    for (idx, pos) in mesh.positions.iter().enumerate() {
        grid.entry(cell_of(pos, cell_size)).or_default().push(idx as u32);
    }

    let mut remap: Vec<u32> = (0..mesh.positions.len() as u32).collect();
    let mut merged = 0;

    for (idx, pos) in mesh.positions.iter().enumerate() {
        let idx = idx as u32;
        if remap[idx as usize] != idx {
            continue;
        }
        let (cx, cy, cz) = cell_of(pos, cell_size);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = grid.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &other in candidates {
                        if other <= idx || remap[other as usize] != other {
                            continue;
                        }
                        if (pos - mesh.positions[other as usize]).norm() < epsilon {
                            remap[other as usize] = idx;
                            merged += 1;
                        }
                    }
                }
            }
        }
    }

    if merged == 0 {
        return 0;
    }

    for face in &mut mesh.faces {
        for v in face.iter_mut() {
            *v = remap[*v as usize];
        }
    }
    let degenerate = remove_collapsed_faces(mesh);
    mesh.remove_unreferenced();
    debug!(merged, degenerate, "welded vertices");
    merged
}

pub(super) fn cell_of(pos: &Point3<Real>, cell_size: Real) -> (i64, i64, i64) {
    (
        (pos.x / cell_size).floor() as i64,
        (pos.y / cell_size).floor() as i64,
        (pos.z / cell_size).floor() as i64,
    )
}

/// Drop faces that reference the same vertex twice.
pub fn remove_collapsed_faces(mesh: &mut IndexedMesh) -> usize {
    let before = mesh.faces.len();
    mesh.faces.retain(|&[a, b, c]| a != b && b != c && a != c);
    before - mesh.faces.len()
}

/// Drop faces whose vertex set repeats an earlier face, in either winding.
pub fn remove_duplicate_faces(mesh: &mut IndexedMesh) -> usize {
    let before = mesh.faces.len();
    let mut seen = HashSet::new();
    mesh.faces.retain(|face| {
        let mut key = *face;
        key.sort_unstable();
        seen.insert(key)
    });
    before - mesh.faces.len()
}
