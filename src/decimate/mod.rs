//! Quadric-error edge-collapse decimation.
//!
//! Every vertex accumulates the planes of its incident triangles. Edges
//! are collapsed cheapest-first into the point that minimises the summed
//! quadric, until the triangle budget is met or no valid collapse is left.
//! A collapse is rejected when it would pinch the surface (more than two
//! shared neighbours) or turn a surrounding triangle over.

use crate::float_types::Real;
use crate::indexed::IndexedMesh;
use crate::indexed::adjacency::normalize_edge;
use hashbrown::{HashMap, HashSet};
use nalgebra::Point3;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::{debug, info};

mod params;
mod quadric;

pub use params::DecimateParams;
pub use quadric::Quadric;

/// Result of [`decimate_mesh`].
#[derive(Debug, Clone)]
pub struct DecimationResult {
    pub mesh: IndexedMesh,
    pub original_triangles: usize,
    pub final_triangles: usize,
    pub collapses_performed: usize,
    pub collapses_rejected: usize,
}

impl DecimationResult {
    pub fn was_decimated(&self) -> bool {
        self.collapses_performed > 0
    }

    fn untouched(mesh: &IndexedMesh) -> Self {
        Self {
            mesh: mesh.clone(),
            original_triangles: mesh.face_count(),
            final_triangles: mesh.face_count(),
            collapses_performed: 0,
            collapses_rejected: 0,
        }
    }
}

impl std::fmt::Display for DecimationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "decimated {} -> {} triangles ({} collapses)",
            self.original_triangles, self.final_triangles, self.collapses_performed
        )
    }
}

/// A queued collapse of `v2` into `v1`, stamped with both vertices' versions
/// so entries made stale by later collapses can be skipped.
#[derive(Debug, Clone)]
struct EdgeCollapse {
    v1: u32,
    v2: u32,
    cost: Real,
    target: Point3<Real>,
    stamp: (u32, u32),
}

impl PartialEq for EdgeCollapse {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost
    }
}

impl Eq for EdgeCollapse {}

impl PartialOrd for EdgeCollapse {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCollapse {
    // reversed: BinaryHeap pops the cheapest first
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

struct Decimator<'p> {
    params: &'p DecimateParams,
    positions: Vec<Point3<Real>>,
    alive: Vec<bool>,
    faces: Vec<Option<[u32; 3]>>,
    vertex_faces: Vec<Vec<usize>>,
    quadrics: Vec<Quadric>,
    version: Vec<u32>,
    boundary: HashSet<u32>,
    heap: BinaryHeap<EdgeCollapse>,
}

/// Decimate `mesh` to the budget in `params`.
pub fn decimate_mesh(mesh: &IndexedMesh, params: &DecimateParams) -> DecimationResult {
    let original_triangles = mesh.face_count();
    let target = params.target_for(original_triangles);
    if original_triangles == 0 || original_triangles <= target {
        return DecimationResult::untouched(mesh);
    }
    info!(original = original_triangles, target, "starting decimation");

    let mut state = Decimator::new(mesh, params);
    let mut active = original_triangles;
    let mut performed = 0;
    let mut rejected = 0;

    while active > target {
        let Some(candidate) = state.heap.pop() else {
            break;
        };
        let (v1, v2) = (candidate.v1, candidate.v2);
        if !state.alive[v1 as usize]
            || !state.alive[v2 as usize]
            || candidate.stamp != (state.version[v1 as usize], state.version[v2 as usize])
        {
            continue;
        }
        if params.max_error.is_some_and(|max| candidate.cost > max)
            || !state.is_collapse_valid(v1, v2, &candidate.target)
        {
            rejected += 1;
            continue;
        }

        active -= state.collapse(v1, v2, candidate.target);
        performed += 1;
    }

    let result = DecimationResult {
        mesh: state.into_mesh(),
        original_triangles,
        final_triangles: active,
        collapses_performed: performed,
        collapses_rejected: rejected,
    };
    info!(
        final_triangles = result.final_triangles,
        collapses = performed,
        rejected,
        "decimation complete"
    );
    result
}

impl<'p> Decimator<'p> {
    fn new(mesh: &IndexedMesh, params: &'p DecimateParams) -> Self {
        let n = mesh.vertex_count();
        let mut vertex_faces = vec![Vec::new(); n];
        let mut quadrics = vec![Quadric::default(); n];
        let mut edge_uses: HashMap<(u32, u32), u32> = HashMap::new();

        for (f, face) in mesh.faces.iter().enumerate() {
            let [a, b, c] = face.map(|i| mesh.positions[i as usize]);
            let plane = Quadric::from_triangle(&a, &b, &c);
            for (k, &v) in face.iter().enumerate() {
                vertex_faces[v as usize].push(f);
                if let Some(q) = &plane {
                    quadrics[v as usize].add(q);
                }
                *edge_uses
                    .entry(normalize_edge(v, face[(k + 1) % 3]))
                    .or_insert(0) += 1;
            }
        }

        let boundary: HashSet<u32> = edge_uses
            .iter()
            .filter(|&(_, &uses)| uses == 1)
            .flat_map(|(&(a, b), _)| [a, b])
            .collect();
        debug!(boundary_vertices = boundary.len(), "built quadrics");

        let mut state = Self {
            params,
            positions: mesh.positions.clone(),
            alive: vec![true; n],
            faces: mesh.faces.iter().copied().map(Some).collect(),
            vertex_faces,
            quadrics,
            version: vec![0; n],
            boundary,
            heap: BinaryHeap::new(),
        };
        let mut edges: Vec<(u32, u32)> = edge_uses.into_keys().collect();
        edges.sort_unstable();
        for (a, b) in edges {
            state.enqueue(a, b);
        }
        state
    }

    fn enqueue(&mut self, v1: u32, v2: u32) {
        if self.params.preserve_boundary
            && (self.boundary.contains(&v1) || self.boundary.contains(&v2))
        {
            return;
        }
        let mut combined = self.quadrics[v1 as usize];
        combined.add(&self.quadrics[v2 as usize]);
        let target = combined.optimal_point().unwrap_or_else(|| {
            nalgebra::center(&self.positions[v1 as usize], &self.positions[v2 as usize])
        });
        self.heap.push(EdgeCollapse {
            v1,
            v2,
            cost: combined.evaluate(&target).max(0.0),
            target,
            stamp: (self.version[v1 as usize], self.version[v2 as usize]),
        });
    }

    fn live_faces(&self, v: u32) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.vertex_faces[v as usize]
            .iter()
            .filter_map(|&f| self.faces[f])
            .filter(move |face| face.contains(&v))
    }

    fn neighbours(&self, v: u32) -> HashSet<u32> {
        self.live_faces(v)
            .flat_map(|face| face.into_iter())
            .filter(|&u| u != v)
            .collect()
    }

    fn is_collapse_valid(&self, v1: u32, v2: u32, target: &Point3<Real>) -> bool {
        let n1 = self.neighbours(v1);
        let n2 = self.neighbours(v2);
        if n1.intersection(&n2).count() > 2 {
            return false;
        }

        // no surviving face may turn over
        for (moving, other) in [(v1, v2), (v2, v1)] {
            for face in self.live_faces(moving) {
                if face.contains(&other) {
                    continue;
                }
                let before = face.map(|i| self.positions[i as usize]);
                let after = face.map(|i| {
                    if i == moving { *target } else { self.positions[i as usize] }
                });
                let nb = (before[1] - before[0]).cross(&(before[2] - before[0]));
                let na = (after[1] - after[0]).cross(&(after[2] - after[0]));
                if nb.dot(&na) <= 0.0 {
                    return false;
                }
            }
        }
        true
    }

    /// Merge `v2` into `v1` at `target`; returns the number of faces removed.
    fn collapse(&mut self, v1: u32, v2: u32, target: Point3<Real>) -> usize {
        self.positions[v1 as usize] = target;
        let q2 = self.quadrics[v2 as usize];
        self.quadrics[v1 as usize].add(&q2);
        self.alive[v2 as usize] = false;

        let mut removed = 0;
        for f in std::mem::take(&mut self.vertex_faces[v2 as usize]) {
            let Some(face) = self.faces[f].as_mut() else {
                continue;
            };
            if !face.contains(&v2) {
                continue;
            }
            if face.contains(&v1) {
                self.faces[f] = None;
                removed += 1;
            } else {
                for idx in face.iter_mut() {
                    if *idx == v2 {
                        *idx = v1;
                    }
                }
                self.vertex_faces[v1 as usize].push(f);
            }
        }
        let faces = &self.faces;
        self.vertex_faces[v1 as usize].retain(|&f| faces[f].is_some());

        self.version[v1 as usize] += 1;
        self.version[v2 as usize] += 1;
        let mut around: Vec<u32> = self.neighbours(v1).into_iter().collect();
        around.sort_unstable();
        for n in around {
            self.enqueue(v1, n);
        }
        removed
    }

    fn into_mesh(self) -> IndexedMesh {
        let mut mesh = IndexedMesh::from_parts(
            self.positions,
            self.faces.into_iter().flatten().collect(),
        );
        mesh.remove_unreferenced();
        mesh
    }
}
