use crate::enums::Interpolation;
use crate::geometry::{GeometryError, ImageGeometry, compute_output_grid};
use crate::resampler::{CpuResampler, ResampleExecutor};
use crate::source::{ResliceInput, SourceError, VolumeSource};
use crate::transform::{AffineTransform, RotationState, compose_reslice_transform};
use crate::volume::Volume;

use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResliceError {
    /// Caller bug: the input (or an explicit override grid) carries
    /// non-positive spacing or an inverted extent. Not recoverable locally.
    #[error("Invalid geometry: {0}")]
    Geometry(#[from] GeometryError),

    /// Recompute was requested with no input set. Recoverable; retry after
    /// providing an input.
    #[error("No input volume available")]
    NoInputAvailable,

    /// A connection-mode producer failed to refresh.
    #[error("Upstream refresh failed: {0}")]
    UpstreamRefreshFailed(#[from] SourceError),
}

struct Computed {
    geometry: ImageGeometry,
    transform: AffineTransform,
    center: [f64; 3],
    output: Arc<Volume>,
}

/// Stateful reslice orchestrator.
///
/// Accumulates the current input, rotation, downsample factor and optional
/// output-grid override, and recomputes the derived grid, transform and
/// resampled volume lazily. Every setter only marks the session dirty;
/// [`ResliceSession::recompute`] does the work exactly once per logical
/// change, so slider-drag bursts of setter calls stay cheap.
pub struct ResliceSession {
    input: Option<ResliceInput>,
    rotation: RotationState,
    downsample: u32,
    override_grid: Option<ImageGeometry>,
    interpolation: Interpolation,
    executor: Box<dyn ResampleExecutor>,
    computed: Option<Computed>,
    dirty: bool,
}

impl ResliceSession {
    /// Session with the built-in CPU resampler.
    pub fn new() -> Self {
        Self::with_executor(Box::new(CpuResampler::new()))
    }

    /// Session resampling through a caller-provided executor.
    pub fn with_executor(executor: Box<dyn ResampleExecutor>) -> Self {
        Self {
            input: None,
            rotation: RotationState::default(),
            downsample: 1,
            override_grid: None,
            interpolation: Interpolation::default(),
            executor,
            computed: None,
            dirty: true,
        }
    }

    /// Replace the input with an immutable volume snapshot.
    pub fn set_input_volume(&mut self, volume: Arc<Volume>) {
        self.input = Some(ResliceInput::Snapshot(volume));
        self.dirty = true;
    }

    /// Replace the input with a live upstream connection.
    pub fn set_input_source(&mut self, source: Box<dyn VolumeSource>) {
        self.input = Some(ResliceInput::Connection(source));
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, yaw: f64, pitch: f64, roll: f64) {
        self.rotation = RotationState::new(yaw, pitch, roll);
        self.dirty = true;
    }

    pub fn reset_rotation(&mut self) {
        self.rotation.reset();
        self.dirty = true;
    }

    /// Set the integer downsampling factor, clamped to at least 1.
    pub fn set_downsample_factor(&mut self, factor: u32) {
        self.downsample = factor.max(1);
        self.dirty = true;
    }

    /// Pin the output grid explicitly, bypassing automatic derivation.
    pub fn set_output_grid_override(
        &mut self,
        spacing: [f64; 3],
        origin: [f64; 3],
        extent: [i64; 6],
    ) {
        self.override_grid = Some(ImageGeometry::new(spacing, origin, extent));
        self.dirty = true;
    }

    /// Back to automatic grid derivation.
    pub fn clear_output_grid_override(&mut self) {
        self.override_grid = None;
        self.dirty = true;
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
        self.dirty = true;
    }

    /// Recompute grid, transform and resampled output from the accumulated
    /// state.
    ///
    /// Idempotent: a clean session returns the cached output without doing
    /// any work. On failure the session stays dirty and the cache keeps the
    /// last valid result, so views can keep showing the previous slab.
    pub fn recompute(&mut self) -> Result<Arc<Volume>, ResliceError> {
        if !self.dirty {
            if let Some(computed) = &self.computed {
                return Ok(Arc::clone(&computed.output));
            }
        }

        let input = self.resolve_input()?;
        input.geometry.validate_spacing()?;

        let geometry =
            compute_output_grid(&input.geometry, self.downsample, self.override_grid.as_ref())?;
        // The pivot comes from the live input geometry, never from a cache.
        let center = input.geometry.physical_center();
        let transform = compose_reslice_transform(center, &self.rotation);

        let output = Arc::new(
            self.executor
                .resample(&input, &transform, &geometry, self.interpolation),
        );
        self.computed = Some(Computed {
            geometry,
            transform,
            center,
            output: Arc::clone(&output),
        });
        self.dirty = false;
        Ok(output)
    }

    /// Resolve the current input to a concrete volume. Connection-mode
    /// inputs are refreshed first, which may block on upstream computation.
    fn resolve_input(&mut self) -> Result<Arc<Volume>, ResliceError> {
        match self.input.as_mut() {
            None => Err(ResliceError::NoInputAvailable),
            Some(ResliceInput::Snapshot(volume)) => Ok(Arc::clone(volume)),
            Some(ResliceInput::Connection(source)) => {
                source.refresh()?;
                source.output().ok_or(ResliceError::NoInputAvailable)
            }
        }
    }

    /// Last computed output grid. May be stale relative to pending setter
    /// calls; callers decide whether that is acceptable.
    pub fn computed_geometry(&self) -> Option<&ImageGeometry> {
        self.computed.as_ref().map(|computed| &computed.geometry)
    }

    /// Last computed transform, possibly stale (see
    /// [`Self::computed_geometry`]).
    pub fn computed_transform(&self) -> Option<&AffineTransform> {
        self.computed.as_ref().map(|computed| &computed.transform)
    }

    /// Physical center used in the last composition.
    pub fn last_center(&self) -> Option<[f64; 3]> {
        self.computed.as_ref().map(|computed| computed.center)
    }

    /// Last resampled output without forcing a recompute.
    pub fn resliced(&self) -> Option<Arc<Volume>> {
        self.computed
            .as_ref()
            .map(|computed| Arc::clone(&computed.output))
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn downsample_factor(&self) -> u32 {
        self.downsample
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn has_input(&self) -> bool {
        self.input.is_some()
    }
}

impl Default for ResliceSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn snapshot() -> Arc<Volume> {
        let geometry = ImageGeometry::new([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [0, 7, 0, 7, 0, 3]);
        Arc::new(Volume::new(Array3::zeros((4, 8, 8)), geometry))
    }

    #[test]
    fn test_recompute_without_input_fails() {
        let mut session = ResliceSession::new();
        assert!(matches!(
            session.recompute(),
            Err(ResliceError::NoInputAvailable)
        ));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_setters_mark_dirty() {
        let mut session = ResliceSession::new();
        session.set_input_volume(snapshot());
        session.recompute().unwrap();
        assert!(!session.is_dirty());

        session.set_rotation(10.0, 0.0, 0.0);
        assert!(session.is_dirty());
        session.recompute().unwrap();
        assert!(!session.is_dirty());

        session.set_downsample_factor(2);
        assert!(session.is_dirty());

        session.clear_output_grid_override();
        assert!(session.is_dirty());
    }

    #[test]
    fn test_downsample_factor_clamped() {
        let mut session = ResliceSession::new();
        session.set_downsample_factor(0);
        assert_eq!(session.downsample_factor(), 1);
        session.set_downsample_factor(5);
        assert_eq!(session.downsample_factor(), 5);
    }

    #[test]
    fn test_getters_are_stale_tolerant() {
        let mut session = ResliceSession::new();
        assert!(session.computed_geometry().is_none());
        assert!(session.computed_transform().is_none());
        assert!(session.last_center().is_none());

        session.set_input_volume(snapshot());
        session.recompute().unwrap();
        let geometry = *session.computed_geometry().unwrap();

        // Pending setter calls do not touch the cache until recompute.
        session.set_downsample_factor(4);
        assert_eq!(session.computed_geometry(), Some(&geometry));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_accumulated_state_applied_atomically() {
        let mut session = ResliceSession::new();
        session.set_input_volume(snapshot());
        session.set_rotation(90.0, 0.0, 0.0);
        session.set_downsample_factor(2);
        let output = session.recompute().unwrap();

        // Latest values of both setters, never an intermediate state.
        assert_eq!(output.geometry.spacing, [2.0, 2.0, 2.0]);
        assert_eq!(session.last_center(), Some([3.5, 3.5, 1.5]));
        let transform = session.computed_transform().unwrap();
        let mapped = transform.transform_point([4.5, 3.5, 1.5]);
        assert!((mapped[0] - 3.5).abs() < 1e-9);
        assert!((mapped[1] - 2.5).abs() < 1e-9);
    }
}
