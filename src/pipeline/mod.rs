//! The two end-to-end jobs: end caps and magnet pouches.
//!
//! Each job clears the scene, imports the part as [`PART`], derives its
//! fixture dimensions from the part's bounding box, drives the scene
//! through the fixture constructors and exports the result.

pub mod cap;
pub mod pouch;
pub mod simplify;

pub use cap::{CapPipeline, CapReport};
pub use pouch::{PouchPipeline, PouchReport};
pub use simplify::{SimplifyOutcome, decimation_ratio, simplify_object};

use std::path::{Path, PathBuf};

/// Scene name of the imported part.
pub const PART: &str = "micro";

/// `{prefix}-{stem}.obj` in the working directory, e.g. `boolean-part.obj`
/// for `cad/part.stl`.
pub fn prefixed_output(input: &Path, prefix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_string());
    PathBuf::from(format!("{prefix}-{stem}.obj"))
}
