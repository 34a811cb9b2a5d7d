//! # Volume-reslice library
//!
//! This crate provides the oblique reslicing engine of a volumetric
//! medical-image viewer: output-grid derivation, center-pivoted rotation
//! transforms, and a session object that drives a resampling executor
//! through them.

//!
//! Given a loaded 3D scalar volume, a rotation (yaw/pitch/roll in degrees)
//! about the volume's physical center and an optional integer downsampling
//! factor, a [`ResliceSession`] derives a consistent output sampling grid
//! (spacing/origin/extent), composes the matching affine transform and
//! returns the resampled oblique slab. Inputs can be:
//!  - Snapshots: an immutable volume shared read-only across sessions
//!  - Connections: an upstream producer refreshed before every read
//!
//!  Recomputation is always explicit. Setters only mark the session dirty;
//!  [`ResliceSession::recompute`] then reflects the full accumulated state
//!  in one pass, so interactive bursts of slider updates stay cheap and the
//!  apply-on-release-vs-live decision remains with the caller. Volumes are
//!  assumed to be:
//!   - Axis-aligned 3D scalar arrays with spacing/origin/extent metadata
//!   - Never mutated in place (all derived products are new objects)
//!
//!   Contributions are highly welcome!
//!
//! # Roadmap
//!
//!  - Cubic interpolation
//!  - Slab thickness and projection modes (MIP, mean)
//!  - Caching of intermediate grids across sessions
//!
//! # Examples
//!
//! ## Reslicing a volume about its center
//!
//! Build a session over a synthetic volume, rotate it by 30 degrees of yaw,
//! coarsen the grid by a factor of two and fetch the resampled slab.
//!
//! ```
//! # use std::sync::Arc;
//! # use ndarray::Array3;
//! # use volume_reslice::{ImageGeometry, ResliceSession, Volume};
//! let geometry = ImageGeometry::new([1.0, 1.0, 2.0], [0.0, 0.0, 0.0], [0, 15, 0, 15, 0, 7]);
//! let volume = Arc::new(Volume::new(Array3::zeros((8, 16, 16)), geometry));
//!
//! let mut session = ResliceSession::new();
//! session.set_input_volume(volume);
//! session.set_rotation(30.0, 0.0, 0.0);
//! session.set_downsample_factor(2);
//!
//! let slab = session.recompute().expect("reslice with a valid input");
//! assert_eq!(slab.dim(), (4, 8, 8));
//! ```

pub mod enums;
pub mod geometry;
mod interpolator;
pub mod resampler;
pub mod session;
pub mod source;
pub mod transform;
pub mod volume;

pub use enums::{Interpolation, Orientation, ScalarType};
pub use geometry::{GeometryError, ImageGeometry, compute_output_grid};
pub use resampler::{CpuResampler, ResampleExecutor};
pub use session::{ResliceError, ResliceSession};
pub use source::{ResliceInput, SourceError, VolumeSource};
pub use transform::{AffineTransform, RotationState, compose_reslice_transform};
pub use volume::Volume;
