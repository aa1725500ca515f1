use crate::float_types::Real;

/// Parameters for [`decimate_mesh`](super::decimate_mesh).
#[derive(Debug, Clone, PartialEq)]
pub struct DecimateParams {
    /// Stop at this many triangles; overrides `target_ratio` when set.
    pub target_triangles: Option<usize>,
    /// Fraction of the input triangles to keep, in `[0, 1]`.
    pub target_ratio: Real,
    /// Never move vertices on open boundaries.
    pub preserve_boundary: bool,
    /// Reject collapses whose quadric error exceeds this.
    pub max_error: Option<Real>,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            target_triangles: None,
            target_ratio: 0.5,
            preserve_boundary: true,
            max_error: None,
        }
    }
}

impl DecimateParams {
    pub fn with_target_triangles(count: usize) -> Self {
        Self {
            target_triangles: Some(count),
            ..Default::default()
        }
    }

    pub fn with_target_ratio(ratio: Real) -> Self {
        Self {
            target_ratio: ratio.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    pub const fn with_preserve_boundary(mut self, preserve: bool) -> Self {
        self.preserve_boundary = preserve;
        self
    }

    pub const fn with_max_error(mut self, max_error: Real) -> Self {
        self.max_error = Some(max_error);
        self
    }

    /// Triangle budget for an input of `original` triangles.
    pub fn target_for(&self, original: usize) -> usize {
        self.target_triangles
            .unwrap_or_else(|| (original as Real * self.target_ratio).ceil() as usize)
    }
}
