//! Mesh file formats, picked by file extension.

use crate::errors::{Result, ThimbleError};
use crate::mesh::Mesh;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub mod obj;
#[cfg(feature = "stl-io")]
pub mod stl;

/// File formats the host can import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
}

impl MeshFormat {
    /// Format implied by the extension of `path`, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("obj") => Ok(MeshFormat::Obj),
            Some("stl") => Ok(MeshFormat::Stl),
            _ => Err(ThimbleError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Load a mesh from an OBJ or STL file.
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    match MeshFormat::from_path(path)? {
        MeshFormat::Obj => obj::read_obj(BufReader::new(File::open(path)?)),
        #[cfg(feature = "stl-io")]
        MeshFormat::Stl => stl::read_stl(&mut BufReader::new(File::open(path)?)),
        #[cfg(not(feature = "stl-io"))]
        MeshFormat::Stl => Err(ThimbleError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Save a mesh as OBJ or binary STL; `name` becomes the OBJ object name.
pub fn save_mesh(mesh: &Mesh, name: &str, path: &Path) -> Result<()> {
    match MeshFormat::from_path(path)? {
        MeshFormat::Obj => obj::write_obj(mesh, name, BufWriter::new(File::create(path)?)),
        #[cfg(feature = "stl-io")]
        MeshFormat::Stl => stl::write_stl(mesh, &mut BufWriter::new(File::create(path)?)),
        #[cfg(not(feature = "stl-io"))]
        MeshFormat::Stl => {
            let _ = (mesh, name);
            Err(ThimbleError::UnsupportedFormat(path.to_path_buf()))
        },
    }
}
