//! Best-effort manifold repair.

use super::RepairOutcome;
use super::holes::fill_holes;
use super::weld::{remove_collapsed_faces, remove_duplicate_faces};
use crate::indexed::IndexedMesh;
use hashbrown::HashSet;
use tracing::{debug, warn};

/// Try to leave every edge shared by exactly two faces.
///
/// Removes collapsed and duplicate faces, trims faces beyond the second on
/// over-shared edges, then fills the holes that opens up. Whatever the
/// result, the mesh is left in its best state; the outcome only reports
/// whether it ended up closed and two-manifold.
pub fn make_manifold(mesh: &mut IndexedMesh) -> RepairOutcome {
    if mesh.is_empty() {
        return RepairOutcome::Failed("mesh has no faces".to_string());
    }
    let before = mesh.clone();

    let collapsed = remove_collapsed_faces(mesh);
    let duplicates = remove_duplicate_faces(mesh);

    let adjacency = mesh.adjacency();
    let mut excess: HashSet<usize> = HashSet::new();
    for (_, faces) in adjacency.non_manifold_edges() {
        excess.extend(faces.iter().skip(2).copied());
    }
    let trimmed = excess.len();
    if trimmed > 0 {
        let mut index = 0;
        mesh.faces.retain(|_| {
            let keep = !excess.contains(&index);
            index += 1;
            keep
        });
    }
    mesh.remove_unreferenced();

    let filled = if collapsed + duplicates + trimmed > 0 {
        fill_holes(mesh, 0)
    } else {
        0
    };
    debug!(collapsed, duplicates, trimmed, filled, "manifold pass");

    let adjacency = mesh.adjacency();
    if !adjacency.is_manifold() || !adjacency.is_watertight() {
        let reason = format!(
            "{} boundary and {} non-manifold edges remain",
            adjacency.boundary_edge_count(),
            adjacency.non_manifold_edge_count()
        );
        warn!(%reason, "manifold repair incomplete");
        return RepairOutcome::Failed(reason);
    }

    if *mesh == before {
        RepairOutcome::Unchanged
    } else {
        RepairOutcome::Repaired
    }
}
