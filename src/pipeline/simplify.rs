//! Optional single-pass decimation ahead of the pouch booleans.

use crate::decimate::{DecimateParams, decimate_mesh};
use crate::errors::Result;
use crate::float_types::Real;
use crate::indexed::IndexedMesh;
use crate::scene::Scene;
use std::path::Path;
use tracing::info;

/// What [`simplify_object`] did to the object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimplifyOutcome {
    /// Already within budget; the object was not touched.
    Skipped { faces: usize },
    Decimated {
        ratio: Real,
        faces_before: usize,
        faces_after: usize,
    },
}

impl SimplifyOutcome {
    /// Face count after the step.
    pub fn faces(&self) -> usize {
        match *self {
            SimplifyOutcome::Skipped { faces } => faces,
            SimplifyOutcome::Decimated { faces_after, .. } => faces_after,
        }
    }
}

/// Fraction of faces to keep, or `None` when `poly_count` is already
/// within `target_faces`.
pub fn decimation_ratio(poly_count: usize, target_faces: usize) -> Option<Real> {
    (poly_count > target_faces).then(|| target_faces as Real / poly_count as Real)
}

/// Decimate object `name` down to about `target_faces` faces.
///
/// When decimation runs and `export_path` is given, the intermediate mesh
/// is written there.
pub fn simplify_object(
    scene: &mut Scene,
    name: &str,
    target_faces: usize,
    export_path: Option<&Path>,
) -> Result<SimplifyOutcome> {
    let mesh = scene.object(name)?;
    let faces_before = mesh.face_count();
    let Some(ratio) = decimation_ratio(faces_before, target_faces) else {
        info!(name, faces = faces_before, target_faces, "no simplification needed");
        return Ok(SimplifyOutcome::Skipped {
            faces: faces_before,
        });
    };

    let indexed = IndexedMesh::from_mesh(mesh);
    let result = decimate_mesh(&indexed, &DecimateParams::with_target_ratio(ratio));
    info!(name, ratio, %result, "simplified");
    scene.add(name, result.mesh.to_mesh());

    if let Some(path) = export_path {
        scene.export(name, path)?;
    }
    Ok(SimplifyOutcome::Decimated {
        ratio,
        faces_before,
        faces_after: scene.face_count(name)?,
    })
}
