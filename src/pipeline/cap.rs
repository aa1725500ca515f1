//! Cap job: fuse flush end caps onto the part, clean it up, export.

use super::PART;
use crate::config::CapConfig;
use crate::errors::Result;
use crate::fixtures::{CapParams, add_caps};
use crate::float_types::Real;
use crate::repair::{FinalizeReport, finalize_for_print};
use crate::scene::Scene;
use std::path::Path;
use tracing::warn;

/// Derived dimensions and results of a [`CapPipeline`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct CapReport {
    pub params: CapParams,
    pub imported_faces: usize,
    pub finalize: FinalizeReport,
}

impl CapReport {
    /// Triangle count of the exported mesh.
    pub fn faces(&self) -> usize {
        self.finalize.triangles
    }
}

#[derive(Debug, Clone, Default)]
pub struct CapPipeline {
    pub config: CapConfig,
}

impl CapPipeline {
    pub const fn new(config: CapConfig) -> Self {
        Self { config }
    }

    /// Cap dimensions for a part with the given X and Y extremes.
    ///
    /// The outer radius is half the part's X width; the bore is a fixed
    /// fraction of it.
    pub fn cap_params(&self, min_x: Real, max_x: Real, min_y: Real, max_y: Real) -> CapParams {
        let outer_radius = (max_x - min_x) / 2.0;
        CapParams::new(outer_radius, outer_radius * self.config.inner_ratio, min_y, max_y)
            .with_thickness(self.config.thickness)
            .with_segments(self.config.segments)
    }

    /// Import `input`, add caps, finalize, and write `obj_out` (and
    /// `stl_out` first, when given).
    pub fn run(
        &self,
        scene: &mut Scene,
        input: &Path,
        obj_out: &Path,
        stl_out: Option<&Path>,
    ) -> Result<CapReport> {
        scene.clear();
        scene.import(input, PART)?;
        let imported_faces = scene.face_count(PART)?;

        let bb = scene.bounding_box(PART)?;
        let params = self.cap_params(bb.min_x, bb.max_x, bb.min_y, bb.max_y);
        if let Err(err) = params.validate() {
            warn!(%err, "cap dimensions look degenerate, building anyway");
        }
        add_caps(scene, PART, &params)?;

        let finalize = finalize_for_print(scene.object_mut(PART)?, &self.config.finalize);

        if let Some(path) = stl_out {
            scene.export(PART, path)?;
        }
        scene.export(PART, obj_out)?;

        Ok(CapReport {
            params,
            imported_faces,
            finalize,
        })
    }
}
