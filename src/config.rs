//! Pipeline settings, loadable from a JSON file.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "pouch": { "magnet": { "diameter": 6.0 }, "target_faces": 150000 } }
//! ```

use crate::errors::Result;
use crate::fixtures::MagnetSpec;
use crate::float_types::Real;
use crate::mesh::shapes::{Axis, DEFAULT_SEGMENTS};
use crate::repair::FinalizeParams;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for both pipelines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub cap: CapConfig,
    pub pouch: PouchConfig,
}

impl PipelineConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapConfig {
    /// Cap thickness along Y.
    pub thickness: Real,
    /// Bore radius as a fraction of the part's half-width.
    pub inner_ratio: Real,
    pub segments: usize,
    pub finalize: FinalizeParams,
}

impl Default for CapConfig {
    fn default() -> Self {
        Self {
            thickness: 2.0,
            inner_ratio: 0.215,
            segments: DEFAULT_SEGMENTS,
            finalize: FinalizeParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PouchConfig {
    pub magnet: MagnetSpec,
    /// Face budget above which the part is decimated first.
    pub target_faces: usize,
    /// Inner wall radius as a fraction of the part's half-width.
    pub inner_ratio: Real,
    pub axis: Axis,
    pub segments: usize,
    /// Weld and T-junction tolerance applied to the result before export;
    /// `0` exports the boolean output untouched.
    pub seam_tolerance: Real,
}

impl Default for PouchConfig {
    fn default() -> Self {
        Self {
            magnet: MagnetSpec::default(),
            target_faces: 300_000,
            inner_ratio: 0.3,
            axis: Axis::Y,
            segments: DEFAULT_SEGMENTS,
            seam_tolerance: 1e-5,
        }
    }
}
