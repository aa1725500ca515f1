//! Annular end caps, flush with the part's Y extremes.

use crate::errors::{Result, ThimbleError};
use crate::float_types::Real;
use crate::mesh::shapes::{Axis, CylinderSpec, DEFAULT_SEGMENTS};
use crate::scene::{BooleanOp, Scene};
use nalgebra::Point3;
use tracing::info;

pub const CAP_BOTTOM: &str = "cap_bottom";
pub const CAP_TOP: &str = "cap_top";

/// Dimensions of the two caps.
#[derive(Debug, Clone, PartialEq)]
pub struct CapParams {
    pub outer_radius: Real,
    /// Radius of the central bore.
    pub inner_radius: Real,
    pub min_y: Real,
    pub max_y: Real,
    /// Cap thickness along Y.
    pub thickness: Real,
    pub segments: usize,
}

impl CapParams {
    /// Caps for a part spanning `[min_y, max_y]`, 1.0 thick.
    pub const fn new(outer_radius: Real, inner_radius: Real, min_y: Real, max_y: Real) -> Self {
        Self {
            outer_radius,
            inner_radius,
            min_y,
            max_y,
            thickness: 1.0,
            segments: DEFAULT_SEGMENTS,
        }
    }

    pub const fn with_thickness(mut self, thickness: Real) -> Self {
        self.thickness = thickness;
        self
    }

    pub const fn with_segments(mut self, segments: usize) -> Self {
        self.segments = segments;
        self
    }

    /// Y of the bottom cap's centre; its upper face sits on `min_y`.
    pub fn bottom_center(&self) -> Real {
        self.min_y - self.thickness / 2.0
    }

    /// Y of the top cap's centre; its lower face sits on `max_y`.
    pub fn top_center(&self) -> Real {
        self.max_y + self.thickness / 2.0
    }

    /// Check that the caps describe a real annulus.
    pub fn validate(&self) -> Result<()> {
        if !(self.thickness > 0.0) {
            return Err(ThimbleError::InvalidDimensions(format!(
                "cap thickness must be positive, got {}",
                self.thickness
            )));
        }
        if !(0.0 < self.inner_radius && self.inner_radius < self.outer_radius) {
            return Err(ThimbleError::InvalidDimensions(format!(
                "cap bore {} must lie strictly inside radius {}",
                self.inner_radius, self.outer_radius
            )));
        }
        Ok(())
    }

    /// Create cap `name` centred at `center_y` and bore it through.
    ///
    /// The bore cutter is twice as long as the cap so both faces open.
    pub fn build_cap(&self, scene: &mut Scene, name: &str, center_y: Real) -> Result<()> {
        let location = Point3::new(0.0, center_y, 0.0);
        let hole = format!("{name}_hole");
        scene.add_cylinder(
            name,
            &CylinderSpec::new(self.outer_radius, self.thickness, Axis::Y)
                .at(location)
                .with_segments(self.segments),
        );
        scene.add_cylinder(
            hole.as_str(),
            &CylinderSpec::new(self.inner_radius, self.thickness * 2.0, Axis::Y)
                .at(location)
                .with_segments(self.segments),
        );
        scene.apply_boolean(name, &hole, BooleanOp::Difference, true)
    }
}

/// Add both caps and fuse them into `target`.
///
/// Leaves no transient objects behind on success. Dimensions are not
/// validated here; a degenerate bore simply produces a degenerate cap.
pub fn add_caps(scene: &mut Scene, target: &str, params: &CapParams) -> Result<()> {
    scene.object(target)?;
    info!(
        outer = params.outer_radius,
        inner = params.inner_radius,
        bottom = params.bottom_center(),
        top = params.top_center(),
        thickness = params.thickness,
        "adding caps"
    );

    params.build_cap(scene, CAP_BOTTOM, params.bottom_center())?;
    params.build_cap(scene, CAP_TOP, params.top_center())?;

    scene.apply_boolean(target, CAP_BOTTOM, BooleanOp::Union, true)?;
    scene.apply_boolean(target, CAP_TOP, BooleanOp::Union, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn caps_sit_flush_outside_the_extremes() {
        let params = CapParams::new(10.0, 2.0, -5.0, 5.0).with_thickness(2.0);
        assert_relative_eq!(params.bottom_center(), -6.0);
        assert_relative_eq!(params.top_center(), 6.0);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn default_thickness_is_one() {
        let params = CapParams::new(3.0, 1.0, 0.0, 4.0);
        assert_relative_eq!(params.thickness, 1.0);
        assert_relative_eq!(params.bottom_center(), -0.5);
    }

    #[test]
    fn bore_wider_than_cap_is_invalid() {
        let params = CapParams::new(2.0, 3.0, 0.0, 1.0);
        assert!(matches!(params.validate(), Err(ThimbleError::InvalidDimensions(_))));
        let flat = CapParams::new(2.0, 1.0, 0.0, 1.0).with_thickness(0.0);
        assert!(flat.validate().is_err());
    }

    #[test]
    fn built_cap_is_an_annulus() {
        let mut scene = Scene::new();
        let params = CapParams::new(4.0, 1.0, 0.0, 10.0)
            .with_thickness(2.0)
            .with_segments(48);
        params.build_cap(&mut scene, "cap", 3.0).expect("cap");
        assert!(!scene.contains("cap_hole"));

        let cap = scene.object("cap").expect("cap exists");
        let bb = scene.bounding_box("cap").expect("bounds");
        assert_relative_eq!(bb.min_y, 2.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max_y, 4.0, epsilon = 1e-9);
        assert!(!cap.contains_vertex(&Point3::new(0.0, 3.0, 0.0)));
        assert!(cap.contains_vertex(&Point3::new(2.5, 3.0, 0.1)));
    }

    #[test]
    fn missing_target_is_reported_before_building() {
        let mut scene = Scene::new();
        let err = add_caps(&mut scene, "micro", &CapParams::new(2.0, 1.0, 0.0, 1.0)).unwrap_err();
        assert!(matches!(err, ThimbleError::MissingObject(_)));
        assert!(scene.is_empty());
    }
}
