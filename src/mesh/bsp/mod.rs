//! Binary Space Partitioning (BSP) tree implementation
//!
//! The operations live behind [`BspOps`] so the splitting heuristic can be
//! swapped without touching the boolean code in [`crate::mesh`].

pub mod node;
pub mod serial;
pub mod traits;

pub use node::Node;
pub use serial::SerialBspOps;
pub use traits::{BalancedSplittingStrategy, BspOps, SplittingPlaneStrategy};

use crate::mesh::polygon::Polygon;

impl Node {
    /// Creates a new BSP tree from polygons
    pub fn from_polygons(polygons: &[Polygon]) -> Self {
        let mut node = Self::new();
        if !polygons.is_empty() {
            node.build(polygons);
        }
        node
    }

    /// Swap inside and outside of the solid this tree describes
    pub fn invert(&mut self) {
        SerialBspOps::new().invert(self);
    }

    /// Remove all polygons that are inside this BSP tree
    pub fn clip_polygons(&self, polygons: &[Polygon]) -> Vec<Polygon> {
        SerialBspOps::new().clip_polygons(self, polygons)
    }

    /// Remove all polygons in this BSP tree that are inside the other BSP tree
    pub fn clip_to(&mut self, bsp: &Node) {
        SerialBspOps::new().clip_to(self, bsp);
    }

    /// Return all polygons in this BSP tree
    pub fn all_polygons(&self) -> Vec<Polygon> {
        SerialBspOps::new().all_polygons(self)
    }

    /// Build a BSP tree from the given polygons
    pub fn build(&mut self, polygons: &[Polygon]) {
        SerialBspOps::new().build(self, polygons);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn unit_cube_polygons() -> Vec<Polygon> {
        crate::mesh::Mesh::cuboid(1.0, 1.0, 1.0).polygons
    }

    #[test]
    fn build_keeps_every_polygon() {
        let polys = unit_cube_polygons();
        let node = Node::from_polygons(&polys);
        assert_eq!(node.all_polygons().len(), polys.len());
    }

    #[test]
    fn clip_removes_polygons_inside() {
        let cube = Node::from_polygons(&unit_cube_polygons());
        let inside = Polygon::from_points(&[
            Point3::new(0.2, 0.2, 0.5),
            Point3::new(0.8, 0.2, 0.5),
            Point3::new(0.8, 0.8, 0.5),
        ]);
        let outside = Polygon::from_points(&[
            Point3::new(2.2, 0.2, 0.5),
            Point3::new(2.8, 0.2, 0.5),
            Point3::new(2.8, 0.8, 0.5),
        ]);
        let kept = cube.clip_polygons(&[inside, outside.clone()]);
        assert_eq!(kept, vec![outside]);
    }

    #[test]
    fn invert_twice_is_identity() {
        let polys = unit_cube_polygons();
        let mut node = Node::from_polygons(&polys);
        let before = node.all_polygons();
        node.invert();
        node.invert();
        assert_eq!(node.all_polygons(), before);
    }
}
