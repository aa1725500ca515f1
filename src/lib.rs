//! Parametric **end caps** and **magnet pouches** for printable meshes, built on
//! a small BSP-tree **Constructive Solid Geometry (CSG)** kernel.
//!
//! A part is imported into a [`Scene`](scene::Scene) of named objects. The
//! [fixtures] compute cap and pouch dimensions from the part's bounding box
//! and combine cylinders with it through scene booleans. The [pipeline]
//! module wires this into the two jobs the `thimble` binary runs, with
//! [decimation](decimate) before and [print cleanup](repair) after.
//!
//! # Features
//! #### Default
//! - [**stl-io**](https://en.wikipedia.org/wiki/STL_(file_format)): `.stl` import/export
//! - **chull-io**: convex hull envelopes for pouch seats
//!
//! #### Optional
//! - **parallel**: use rayon for per-polygon work in the kernel

#![forbid(unsafe_code)]
#![warn(clippy::missing_const_for_fn, clippy::approx_constant, clippy::all)]

pub mod config;
pub mod decimate;
pub mod errors;
pub mod fixtures;
pub mod float_types;
pub mod indexed;
pub mod io;
pub mod measure;
pub mod mesh;
pub mod pipeline;
pub mod repair;
pub mod scene;
pub mod traits;

pub use errors::{Result, ThimbleError};
pub use mesh::Mesh;
pub use scene::{BooleanOp, Scene};
pub use traits::CSG;
