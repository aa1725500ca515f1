//! Serial implementation of BSP operations
//!
//! Every walk uses an explicit stack; trees built from scanned meshes are
//! deep enough to overflow the call stack when recursing.

use crate::mesh::bsp::node::Node;
use crate::mesh::bsp::traits::{BalancedSplittingStrategy, BspOps, SplittingPlaneStrategy};
use crate::mesh::polygon::Polygon;

/// Serial implementation of BSP operations
pub struct SerialBspOps<SP: SplittingPlaneStrategy = BalancedSplittingStrategy> {
    splitting_strategy: SP,
}

impl Default for SerialBspOps<BalancedSplittingStrategy> {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialBspOps<BalancedSplittingStrategy> {
    pub fn new() -> Self {
        Self {
            splitting_strategy: BalancedSplittingStrategy::default(),
        }
    }
}

impl<SP: SplittingPlaneStrategy> SerialBspOps<SP> {
    pub const fn with_strategy(strategy: SP) -> Self {
        Self {
            splitting_strategy: strategy,
        }
    }
}

impl<SP: SplittingPlaneStrategy> BspOps for SerialBspOps<SP> {
    fn invert(&self, node: &mut Node) {
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            current.polygons.iter_mut().for_each(Polygon::flip);
            if let Some(ref mut plane) = current.plane {
                plane.flip();
            }

            std::mem::swap(&mut current.front, &mut current.back);

            if let Some(ref mut front) = current.front {
                stack.push(front.as_mut());
            }
            if let Some(ref mut back) = current.back {
                stack.push(back.as_mut());
            }
        }
    }

    fn clip_polygons(&self, node: &Node, polygons: &[Polygon]) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![(node, polygons.to_vec())];

        while let Some((current, polys)) = stack.pop() {
            let Some(plane) = current.plane.as_ref() else {
                result.extend(polys);
                continue;
            };

            let mut front_polys = Vec::with_capacity(polys.len());
            let mut back_polys = Vec::with_capacity(polys.len());

            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                front_polys.extend(coplanar_front);
                front_polys.extend(front_parts);
                back_polys.extend(coplanar_back);
                back_polys.extend(back_parts);
            }

            match &current.front {
                Some(front) if !front_polys.is_empty() => stack.push((&**front, front_polys)),
                Some(_) => {},
                None => result.extend(front_polys),
            }

            // polygons that fall behind a leaf are inside the solid: dropped
            if let Some(back) = &current.back {
                if !back_polys.is_empty() {
                    stack.push((&**back, back_polys));
                }
            }
        }
        result
    }

    fn clip_to(&self, node: &mut Node, other: &Node) {
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            current.polygons = self.clip_polygons(other, &current.polygons);
            if let Some(front) = current.front.as_mut() {
                stack.push(front.as_mut());
            }
            if let Some(back) = current.back.as_mut() {
                stack.push(back.as_mut());
            }
        }
    }

    fn build(&self, node: &mut Node, polygons: &[Polygon]) {
        if polygons.is_empty() {
            return;
        }

        let mut stack = vec![(node, polygons.to_vec())];

        while let Some((current, polys)) = stack.pop() {
            if polys.is_empty() {
                continue;
            }

            let plane = current
                .plane
                .get_or_insert_with(|| self.splitting_strategy.pick_best_splitting_plane(&polys))
                .clone();

            let mut front = Vec::with_capacity(polys.len() / 2);
            let mut back = Vec::with_capacity(polys.len() / 2);

            for polygon in &polys {
                let (coplanar_front, coplanar_back, front_parts, back_parts) =
                    plane.split_polygon(polygon);
                current.polygons.extend(coplanar_front);
                current.polygons.extend(coplanar_back);
                front.extend(front_parts);
                back.extend(back_parts);
            }

            if !front.is_empty() {
                let front_node = current.front.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((front_node.as_mut(), front));
            }
            if !back.is_empty() {
                let back_node = current.back.get_or_insert_with(|| Box::new(Node::new()));
                stack.push((back_node.as_mut(), back));
            }
        }
    }

    fn all_polygons(&self, node: &Node) -> Vec<Polygon> {
        let mut result = Vec::new();
        let mut stack = vec![node];

        while let Some(current) = stack.pop() {
            result.extend_from_slice(&current.polygons);
            stack.extend(
                [&current.front, &current.back]
                    .into_iter()
                    .filter_map(|child| child.as_deref()),
            );
        }
        result
    }
}
