//! Print preparation: the fixed cleanup sequence run before export.

use super::RepairOutcome;
use super::holes::fill_holes;
use super::manifold::make_manifold;
use super::normals::make_normals_consistent;
use super::tjunction::split_t_junctions;
use super::weld::weld_vertices;
use crate::float_types::Real;
use crate::indexed::IndexedMesh;
use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Knobs for [`finalize_for_print`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizeParams {
    /// Vertices closer than this are merged, and a vertex closer than this
    /// to another face's edge splits that edge.
    pub merge_distance: Real,
    /// Largest hole to fill, in edges; `0` fills every hole.
    pub max_hole_edges: usize,
}

impl Default for FinalizeParams {
    fn default() -> Self {
        Self {
            merge_distance: 1e-5,
            max_hole_edges: 0,
        }
    }
}

/// What [`finalize_for_print`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeReport {
    pub vertices_welded: usize,
    pub t_junctions_split: usize,
    pub faces_flipped: usize,
    pub holes_filled: usize,
    pub manifold: RepairOutcome,
    /// Face count of the finished, all-triangle mesh.
    pub triangles: usize,
}

/// Clean `mesh` up for printing, in place.
///
/// Weld, split T-junctions, orient outward, fill holes, attempt manifold
/// repair, then leave the mesh as triangles. Boolean output needs the split
/// before any topology pass sees it. A failed manifold repair is logged and
/// does not stop the sequence.
pub fn finalize_for_print(mesh: &mut Mesh, params: &FinalizeParams) -> FinalizeReport {
    let mut indexed = IndexedMesh::from_mesh(mesh);

    let vertices_welded = weld_vertices(&mut indexed, params.merge_distance);
    let t_junctions_split = split_t_junctions(&mut indexed, params.merge_distance);
    let faces_flipped = make_normals_consistent(&mut indexed);
    let holes_filled = fill_holes(&mut indexed, params.max_hole_edges);

    let manifold = make_manifold(&mut indexed);
    if let RepairOutcome::Failed(reason) = &manifold {
        warn!(%reason, "make manifold failed, continuing");
    }

    *mesh = indexed.to_mesh();
    let report = FinalizeReport {
        vertices_welded,
        t_junctions_split,
        faces_flipped,
        holes_filled,
        manifold,
        triangles: mesh.face_count(),
    };
    info!(
        welded = report.vertices_welded,
        t_junctions = report.t_junctions_split,
        flipped = report.faces_flipped,
        holes = report.holes_filled,
        triangles = report.triangles,
        "finalized for print"
    );
    report
}
