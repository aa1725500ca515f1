//! Parametric fixtures added to an imported part: end caps and magnet pouches.
//!
//! The functions here compute dimensions and drive the [`Scene`](crate::scene::Scene);
//! they never edit mesh buffers themselves.

pub mod caps;
pub mod pouch;

pub use caps::{CapParams, add_caps};
pub use pouch::{
    MagnetSpec, PouchDimensions, PouchPlacement, create_pouch, insert_pouches, mid_radius,
    pouch_centers,
};
