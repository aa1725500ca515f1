//! The modeling host: a flat set of named mesh objects.
//!
//! Pipelines only ever talk to objects by name. Every mutating operation
//! happens in place on the named object, mirroring a destructive modifier
//! stack that is applied immediately.

use crate::errors::{Result, ThimbleError};
use crate::io;
use crate::measure::BoundingBox;
use crate::mesh::Mesh;
use crate::mesh::shapes::CylinderSpec;
use crate::traits::CSG;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Boolean modifier kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BooleanOp {
    Union,
    Difference,
    Intersection,
}

impl BooleanOp {
    /// Combine `target` with `cutter`.
    pub fn apply(self, target: &Mesh, cutter: &Mesh) -> Mesh {
        match self {
            BooleanOp::Union => target.union(cutter),
            BooleanOp::Difference => target.difference(cutter),
            BooleanOp::Intersection => target.intersection(cutter),
        }
    }
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BooleanOp::Union => "UNION",
            BooleanOp::Difference => "DIFFERENCE",
            BooleanOp::Intersection => "INTERSECT",
        })
    }
}

/// Named objects, iterated in name order.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    objects: BTreeMap<String, Mesh>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every object.
    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Import an OBJ or STL file as object `name`.
    ///
    /// An import that yields no faces leaves the scene unchanged and fails
    /// with [`ThimbleError::EmptyImport`].
    pub fn import(&mut self, path: &Path, name: &str) -> Result<()> {
        let mesh = io::load_mesh(path)?;
        if mesh.is_empty() {
            return Err(ThimbleError::EmptyImport(path.to_path_buf()));
        }
        info!(path = %path.display(), name, faces = mesh.face_count(), "imported");
        self.add(name, mesh);
        Ok(())
    }

    /// Insert or replace object `name`, returning any previous mesh.
    pub fn add(&mut self, name: impl Into<String>, mesh: Mesh) -> Option<Mesh> {
        self.objects.insert(name.into(), mesh)
    }

    /// Tessellate a cylinder primitive into a new object.
    pub fn add_cylinder(&mut self, name: impl Into<String>, spec: &CylinderSpec) {
        let name = name.into();
        debug!(%name, radius = spec.radius, depth = spec.depth, axis = ?spec.axis, "add cylinder");
        self.add(name, spec.build());
    }

    pub fn remove(&mut self, name: &str) -> Option<Mesh> {
        self.objects.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Mesh> {
        self.objects.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        self.objects.get_mut(name)
    }

    /// Like [`Scene::get`], but a missing object is an error.
    pub fn object(&self, name: &str) -> Result<&Mesh> {
        self.get(name)
            .ok_or_else(|| ThimbleError::MissingObject(name.to_string()))
    }

    pub fn object_mut(&mut self, name: &str) -> Result<&mut Mesh> {
        self.get_mut(name)
            .ok_or_else(|| ThimbleError::MissingObject(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Apply a boolean modifier on `target` with `cutter` and bake it in.
    ///
    /// Both objects must exist; nothing changes otherwise. With
    /// `delete_cutter` the cutter object is removed afterwards.
    pub fn apply_boolean(
        &mut self,
        target: &str,
        cutter: &str,
        op: BooleanOp,
        delete_cutter: bool,
    ) -> Result<()> {
        if target == cutter {
            return Err(ThimbleError::InvalidOperation(format!(
                "`{target}` cannot be its own boolean cutter"
            )));
        }
        let result = {
            let target_mesh = self.object(target)?;
            let cutter_mesh = self.object(cutter)?;
            op.apply(target_mesh, cutter_mesh)
        };
        debug!(
            %op,
            target,
            cutter,
            faces = result.face_count(),
            "applied boolean"
        );
        self.add(target, result);
        if delete_cutter {
            self.remove(cutter);
        }
        Ok(())
    }

    /// Write object `name` as OBJ or STL, by the extension of `path`.
    pub fn export(&self, name: &str, path: &Path) -> Result<()> {
        let mesh = self.object(name)?;
        io::save_mesh(mesh, name, path)?;
        info!(path = %path.display(), name, faces = mesh.face_count(), "exported");
        Ok(())
    }

    pub fn face_count(&self, name: &str) -> Result<usize> {
        Ok(self.object(name)?.face_count())
    }

    /// World-space extents of object `name`.
    pub fn bounding_box(&self, name: &str) -> Result<BoundingBox> {
        BoundingBox::of_mesh(self.object(name)?).ok_or_else(|| {
            ThimbleError::InvalidDimensions(format!("object `{name}` has no vertices"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::shapes::Axis;
    use approx::assert_relative_eq;

    #[test]
    fn boolean_with_missing_cutter_leaves_target() {
        let mut scene = Scene::new();
        scene.add("a", Mesh::cuboid(1.0, 1.0, 1.0));
        let err = scene
            .apply_boolean("a", "nope", BooleanOp::Union, true)
            .unwrap_err();
        assert!(matches!(err, ThimbleError::MissingObject(name) if name == "nope"));
        assert_eq!(scene.face_count("a").ok(), Some(6));
    }

    #[test]
    fn difference_deletes_cutter_on_request() {
        let mut scene = Scene::new();
        scene.add("block", Mesh::cuboid(4.0, 4.0, 4.0));
        scene.add_cylinder(
            "drill",
            &CylinderSpec::new(1.0, 10.0, Axis::Z)
                .at(nalgebra::Point3::new(2.0, 2.0, 2.0))
                .with_segments(32),
        );
        scene
            .apply_boolean("block", "drill", BooleanOp::Difference, true)
            .expect("boolean");
        assert!(!scene.contains("drill"));
        let volume = scene.object("block").expect("block").signed_volume();
        assert!(volume < 64.0 - 10.0);
        assert_relative_eq!(volume, 64.0 - crate::float_types::PI * 4.0, max_relative = 0.02);
    }

    #[test]
    fn keeping_the_cutter() {
        let mut scene = Scene::new();
        scene.add("a", Mesh::cuboid(1.0, 1.0, 1.0));
        scene.add("b", Mesh::cuboid(1.0, 1.0, 1.0));
        scene
            .apply_boolean("a", "b", BooleanOp::Intersection, false)
            .expect("boolean");
        assert_eq!(scene.names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn self_boolean_is_rejected() {
        let mut scene = Scene::new();
        scene.add("a", Mesh::cuboid(1.0, 1.0, 1.0));
        assert!(matches!(
            scene.apply_boolean("a", "a", BooleanOp::Union, true),
            Err(ThimbleError::InvalidOperation(_))
        ));
        assert!(scene.contains("a"));
    }

    #[test]
    fn clear_empties_the_scene() {
        let mut scene = Scene::new();
        scene.add("a", Mesh::cuboid(1.0, 1.0, 1.0));
        scene.clear();
        assert!(scene.is_empty());
        assert!(scene.bounding_box("a").is_err());
    }
}
