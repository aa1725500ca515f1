//! Mesh cleanup operators on [`IndexedMesh`](crate::indexed::IndexedMesh).
//!
//! Each operator mutates in place and returns a count of what it changed.
//! [`finalize_for_print`] chains them in the order a slicer-ready export
//! needs.

pub mod finalize;
pub mod holes;
pub mod manifold;
pub mod normals;
pub mod tjunction;
pub mod weld;

pub use finalize::{FinalizeParams, FinalizeReport, finalize_for_print};
pub use holes::{BoundaryLoop, detect_holes, fill_holes};
pub use manifold::make_manifold;
pub use normals::make_normals_consistent;
pub use tjunction::{split_t_junctions, stitch_seams};
pub use weld::{remove_collapsed_faces, remove_duplicate_faces, weld_vertices};

/// Result of a best-effort repair that is allowed to fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairOutcome {
    Repaired,
    Unchanged,
    Failed(String),
}

impl RepairOutcome {
    pub const fn is_failed(&self) -> bool {
        matches!(self, RepairOutcome::Failed(_))
    }
}
