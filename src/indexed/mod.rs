//! Shared-vertex triangle meshes, the form repair and decimation work on.
//!
//! A [`Mesh`] is a polygon soup that the BSP kernel can split freely. The
//! topology passes need vertices that are *shared* between faces, so they
//! convert into an [`IndexedMesh`] first and back again afterwards.

use crate::float_types::Real;
use crate::mesh::{Mesh, polygon::Polygon};
use hashbrown::HashMap;
use nalgebra::Point3;

pub mod adjacency;

pub use adjacency::MeshAdjacency;

/// An indexed triangle mesh.
///
/// Faces use counter-clockwise winding when viewed from outside.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub positions: Vec<Point3<Real>>,
    /// Triangle faces as indices into `positions`.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub const fn from_parts(positions: Vec<Point3<Real>>, faces: Vec<[u32; 3]>) -> Self {
        Self { positions, faces }
    }

    /// Triangulate `mesh` and share bit-identical positions.
    ///
    /// Near-coincident positions stay distinct; welding them is
    /// [`crate::repair::weld_vertices`]'s job.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut lookup: HashMap<[u64; 3], u32> = HashMap::new();
        let mut positions = Vec::new();
        let mut faces = Vec::with_capacity(mesh.triangle_count());

        let mut index_of = |p: &Point3<Real>| -> u32 {
            let key = [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()];
            *lookup.entry(key).or_insert_with(|| {
                positions.push(*p);
                (positions.len() - 1) as u32
            })
        };

        for tri in mesh.polygons.iter().flat_map(Polygon::triangulate) {
            let face = [index_of(&tri[0].pos), index_of(&tri[1].pos), index_of(&tri[2].pos)];
            if face[0] != face[1] && face[1] != face[2] && face[2] != face[0] {
                faces.push(face);
            }
        }

        Self { positions, faces }
    }

    /// Back to a polygon soup of flat-shaded triangles.
    pub fn to_mesh(&self) -> Mesh {
        let polygons = self
            .faces
            .iter()
            .map(|&[a, b, c]| {
                Polygon::from_points(&[
                    self.positions[a as usize],
                    self.positions[b as usize],
                    self.positions[c as usize],
                ])
            })
            .collect();
        Mesh::from_polygons(polygons)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner positions of face `f`.
    pub fn triangle(&self, f: usize) -> [Point3<Real>; 3] {
        let [a, b, c] = self.faces[f];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Signed enclosed volume; negative for an inside-out mesh.
    pub fn signed_volume(&self) -> Real {
        (0..self.faces.len())
            .map(|f| {
                let [a, b, c] = self.triangle(f);
                a.coords.dot(&b.coords.cross(&c.coords))
            })
            .sum::<Real>()
            / 6.0
    }

    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
    }

    /// Drop vertices no face references and renumber the rest.
    pub fn remove_unreferenced(&mut self) -> usize {
        let mut remap = vec![u32::MAX; self.positions.len()];
        let mut kept = Vec::with_capacity(self.positions.len());
        for face in &mut self.faces {
            for v in face.iter_mut() {
                let old = *v as usize;
                if remap[old] == u32::MAX {
                    remap[old] = kept.len() as u32;
                    kept.push(self.positions[old]);
                }
                *v = remap[old];
            }
        }
        let removed = self.positions.len() - kept.len();
        self.positions = kept;
        removed
    }

    pub fn adjacency(&self) -> MeshAdjacency {
        MeshAdjacency::build(&self.faces)
    }
}
