//! Pouch job: optionally decimate, seat four magnet pouches, stitch the
//! boolean seams, export.

use super::PART;
use super::simplify::{SimplifyOutcome, simplify_object};
use crate::config::PouchConfig;
use crate::errors::Result;
use crate::fixtures::{PouchDimensions, insert_pouches, mid_radius, pouch_centers};
use crate::float_types::Real;
use crate::repair::stitch_seams;
use crate::scene::Scene;
use nalgebra::Point3;
use std::path::Path;
use tracing::info;

/// Derived dimensions and results of a [`PouchPipeline`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct PouchReport {
    pub simplify: SimplifyOutcome,
    pub outer_radius: Real,
    pub inner_radius: Real,
    pub mid_radius: Real,
    pub dimensions: PouchDimensions,
    pub centers: [Point3<Real>; 4],
    pub t_junctions_split: usize,
    /// Face count of the exported mesh.
    pub faces: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PouchPipeline {
    pub config: PouchConfig,
}

impl PouchPipeline {
    pub const fn new(config: PouchConfig) -> Self {
        Self { config }
    }

    /// Import `input`, decimate it if it is over budget (writing the
    /// intermediate to `simplified_out`), seat the pouches, write `output`.
    pub fn run(
        &self,
        scene: &mut Scene,
        input: &Path,
        output: &Path,
        simplified_out: Option<&Path>,
    ) -> Result<PouchReport> {
        let config = &self.config;
        scene.clear();
        scene.import(input, PART)?;

        let simplify = simplify_object(scene, PART, config.target_faces, simplified_out)?;

        let bb = scene.bounding_box(PART)?;
        let outer_radius = bb.half_width_x();
        let inner_radius = outer_radius * config.inner_ratio;
        let mid = mid_radius(outer_radius, inner_radius);
        let center = bb.center();
        let centers = pouch_centers(mid, center.y, center.z);
        info!(outer = outer_radius, inner = inner_radius, mid, "placing pouches");

        insert_pouches(scene, PART, &config.magnet, &centers, config.axis, config.segments)?;
        let t_junctions_split = if config.seam_tolerance > 0.0 {
            stitch_seams(scene.object_mut(PART)?, config.seam_tolerance)
        } else {
            0
        };
        scene.export(PART, output)?;

        Ok(PouchReport {
            simplify,
            outer_radius,
            inner_radius,
            mid_radius: mid,
            dimensions: PouchDimensions::from_magnet(&config.magnet),
            centers,
            t_junctions_split,
            faces: scene.face_count(PART)?,
        })
    }
}
