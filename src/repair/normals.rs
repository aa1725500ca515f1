//! Consistent outward winding.

use crate::float_types::Real;
use crate::indexed::IndexedMesh;
use crate::indexed::adjacency::{face_edges, normalize_edge};
use hashbrown::HashMap;
use std::collections::VecDeque;
use tracing::debug;

/// Make every face wind the same way as its neighbours, then orient each
/// closed shell so its enclosed volume is positive.
///
/// Propagation only crosses edges shared by exactly two faces. A shell with
/// any other edge is open and keeps the winding of its seed face, since its
/// signed volume depends on where the origin sits. Returns the number of
/// faces whose winding was reversed.
pub fn make_normals_consistent(mesh: &mut IndexedMesh) -> usize {
    let face_count = mesh.faces.len();
    if face_count == 0 {
        return 0;
    }

    let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for (f, face) in mesh.faces.iter().enumerate() {
        for (a, b) in face_edges(face) {
            edge_faces.entry(normalize_edge(a, b)).or_default().push(f);
        }
    }

    let mut flip = vec![false; face_count];
    let mut component = vec![usize::MAX; face_count];
    let mut components = 0;

    for seed in 0..face_count {
        if component[seed] != usize::MAX {
            continue;
        }
        component[seed] = components;
        let mut queue = VecDeque::from([seed]);

        while let Some(f) = queue.pop_front() {
            let face = oriented(mesh.faces[f], flip[f]);
            for (a, b) in face_edges(&face) {
                let Some(neighbours) = edge_faces.get(&normalize_edge(a, b)) else {
                    continue;
                };
                if neighbours.len() != 2 {
                    continue;
                }
                for &g in neighbours {
                    if g == f || component[g] != usize::MAX {
                        continue;
                    }
                    // a consistent neighbour walks the shared edge as b -> a
                    let same_direction = face_edges(&mesh.faces[g]).contains(&(a, b));
                    flip[g] = same_direction;
                    component[g] = components;
                    queue.push_back(g);
                }
            }
        }
        components += 1;
    }

    // outward: positive volume per closed shell
    let mut closed = vec![true; components];
    let mut volume: Vec<Real> = vec![0.0; components];
    for f in 0..face_count {
        let open_edge = face_edges(&mesh.faces[f]).iter().any(|&(a, b)| {
            edge_faces
                .get(&normalize_edge(a, b))
                .is_none_or(|faces| faces.len() != 2)
        });
        if open_edge {
            closed[component[f]] = false;
        }
        let [a, b, c] = oriented(mesh.faces[f], flip[f]);
        let (a, b, c) = (
            mesh.positions[a as usize],
            mesh.positions[b as usize],
            mesh.positions[c as usize],
        );
        volume[component[f]] += a.coords.dot(&b.coords.cross(&c.coords));
    }
    for f in 0..face_count {
        let shell = component[f];
        if closed[shell] && volume[shell] < 0.0 {
            flip[f] = !flip[f];
        }
    }

    let mut flipped = 0;
    for (face, &reverse) in mesh.faces.iter_mut().zip(&flip) {
        if reverse {
            face.swap(1, 2);
            flipped += 1;
        }
    }
    debug!(flipped, shells = components, "made normals consistent");
    flipped
}

fn oriented(face: [u32; 3], reverse: bool) -> [u32; 3] {
    if reverse { [face[0], face[2], face[1]] } else { face }
}
