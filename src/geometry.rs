use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Non-positive spacing {value} on axis {axis}")]
    NonPositiveSpacing { axis: usize, value: f64 },

    #[error("Inverted extent [{min}, {max}] on axis {axis}")]
    InvertedExtent { axis: usize, min: i64, max: i64 },
}

/// Sampling grid of a volume in physical space.
///
/// `origin` is the physical coordinate of voxel index (0, 0, 0); a voxel at
/// absolute index `n` sits at `origin + n * spacing` on each axis. `extent`
/// holds inclusive index bounds as `[x0, x1, y0, y1, z0, z1]`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct ImageGeometry {
    pub spacing: [f64; 3],
    pub origin: [f64; 3],
    pub extent: [i64; 6],
}

impl ImageGeometry {
    pub fn new(spacing: [f64; 3], origin: [f64; 3], extent: [i64; 6]) -> Self {
        Self {
            spacing,
            origin,
            extent,
        }
    }

    /// Voxel count along an axis, clamped to at least 1.
    ///
    /// Inverted extents show up transiently (image not loaded yet, extent
    /// still `[0, -1]`) and must not propagate as zero-size grids.
    pub fn count(&self, axis: usize) -> i64 {
        (self.extent[2 * axis + 1] - self.extent[2 * axis] + 1).max(1)
    }

    /// Voxel counts per axis (x, y, z).
    pub fn counts(&self) -> [i64; 3] {
        [self.count(0), self.count(1), self.count(2)]
    }

    /// Physical center of the grid.
    pub fn physical_center(&self) -> [f64; 3] {
        let mut center = [0.0; 3];
        for axis in 0..3 {
            let min = self.extent[2 * axis] as f64;
            let max = self.extent[2 * axis + 1] as f64;
            center[axis] = self.origin[axis] + 0.5 * (min + max) * self.spacing[axis];
        }
        center
    }

    /// Physical coordinates of the first and last voxel per axis.
    pub fn physical_bounds(&self) -> ([f64; 3], [f64; 3]) {
        let mut lower = [0.0; 3];
        let mut upper = [0.0; 3];
        for axis in 0..3 {
            lower[axis] = self.origin[axis] + self.extent[2 * axis] as f64 * self.spacing[axis];
            upper[axis] = self.origin[axis] + self.extent[2 * axis + 1] as f64 * self.spacing[axis];
        }
        (lower, upper)
    }

    /// Physical position of a continuous absolute voxel index.
    pub fn index_to_physical(&self, index: [f64; 3]) -> [f64; 3] {
        [
            self.origin[0] + index[0] * self.spacing[0],
            self.origin[1] + index[1] * self.spacing[1],
            self.origin[2] + index[2] * self.spacing[2],
        ]
    }

    /// Continuous absolute voxel index of a physical position.
    ///
    /// Requires positive spacing; validate with [`Self::validate_spacing`]
    /// before mapping points on untrusted geometry.
    pub fn physical_to_index(&self, point: [f64; 3]) -> [f64; 3] {
        [
            (point[0] - self.origin[0]) / self.spacing[0],
            (point[1] - self.origin[1]) / self.spacing[1],
            (point[2] - self.origin[2]) / self.spacing[2],
        ]
    }

    pub fn validate_spacing(&self) -> Result<(), GeometryError> {
        for (axis, &value) in self.spacing.iter().enumerate() {
            if value <= 0.0 {
                return Err(GeometryError::NonPositiveSpacing { axis, value });
            }
        }
        Ok(())
    }

    /// Full validation: positive spacing and non-inverted extent.
    pub fn validate(&self) -> Result<(), GeometryError> {
        self.validate_spacing()?;
        for axis in 0..3 {
            let min = self.extent[2 * axis];
            let max = self.extent[2 * axis + 1];
            if max < min {
                return Err(GeometryError::InvertedExtent { axis, min, max });
            }
        }
        Ok(())
    }
}

/// Derive the output sampling grid for a reslice operation.
///
/// With an explicit `override_grid` the caller's grid is returned verbatim
/// after a sanity check. Otherwise the output spacing is the input spacing
/// coarsened by `downsample`, the voxel count is rounded up so the output
/// span never clips the input span, and the origin is placed so that input
/// and output share the same physical center.
pub fn compute_output_grid(
    input: &ImageGeometry,
    downsample: u32,
    override_grid: Option<&ImageGeometry>,
) -> Result<ImageGeometry, GeometryError> {
    if let Some(grid) = override_grid {
        grid.validate()?;
        return Ok(*grid);
    }

    input.validate_spacing()?;
    let factor = i64::from(downsample.max(1));
    let center = input.physical_center();

    let mut spacing = [0.0; 3];
    let mut origin = [0.0; 3];
    let mut extent = [0i64; 6];
    for axis in 0..3 {
        let in_count = input.count(axis);
        let out_spacing = input.spacing[axis] * factor as f64;
        let out_count = ((in_count + factor - 1) / factor).max(1);

        spacing[axis] = out_spacing;
        origin[axis] = center[axis] - 0.5 * (out_count - 1) as f64 * out_spacing;
        extent[2 * axis + 1] = out_count - 1;
    }

    Ok(ImageGeometry {
        spacing,
        origin,
        extent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_downsample_scenario() {
        let input = ImageGeometry::new([1.0, 1.0, 2.0], [0.0, 0.0, 0.0], [0, 63, 0, 63, 0, 31]);
        let output = compute_output_grid(&input, 2, None).unwrap();

        assert_eq!(output.spacing, [2.0, 2.0, 4.0]);
        assert_eq!(output.extent, [0, 31, 0, 31, 0, 15]);
        assert_eq!(output.origin, [0.5, 0.5, 1.0]);

        let center = output.physical_center();
        assert!((center[0] - 31.5).abs() < EPSILON);
        assert!((center[1] - 31.5).abs() < EPSILON);
        assert!((center[2] - 31.0).abs() < EPSILON);
    }

    #[test]
    fn test_centering_invariant() {
        let inputs = [
            ImageGeometry::new([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [0, 99, 0, 49, 0, 9]),
            ImageGeometry::new([0.5, 0.7, 3.0], [-12.0, 4.5, 100.0], [10, 72, -5, 31, 0, 0]),
            ImageGeometry::new([2.0, 2.0, 2.0], [1.0, 2.0, 3.0], [0, 0, 0, 6, 3, 17]),
        ];

        for input in &inputs {
            let in_center = input.physical_center();
            for factor in 1..6 {
                let output = compute_output_grid(input, factor, None).unwrap();
                let out_center = output.physical_center();
                for axis in 0..3 {
                    assert!(
                        (in_center[axis] - out_center[axis]).abs() < EPSILON,
                        "center drifted on axis {axis} with factor {factor}: {in_center:?} vs {out_center:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_coverage_invariant() {
        let input = ImageGeometry::new([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [0, 64, 0, 30, 0, 6]);
        for factor in 1..8 {
            let output = compute_output_grid(&input, factor, None).unwrap();
            for axis in 0..3 {
                assert!(
                    output.count(axis) * i64::from(factor) >= input.count(axis),
                    "output clips input on axis {axis} with factor {factor}"
                );
            }
        }
    }

    #[test]
    fn test_degenerate_extent_clamps_to_one() {
        // Transient [0, -1] extent before an image is loaded.
        let input = ImageGeometry::new([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [0, -1, 0, -1, 0, -1]);
        let output = compute_output_grid(&input, 4, None).unwrap();
        assert_eq!(output.counts(), [1, 1, 1]);
    }

    #[test]
    fn test_non_positive_spacing_rejected() {
        let input = ImageGeometry::new([1.0, 0.0, 1.0], [0.0, 0.0, 0.0], [0, 9, 0, 9, 0, 9]);
        let result = compute_output_grid(&input, 1, None);
        assert!(matches!(
            result,
            Err(GeometryError::NonPositiveSpacing { axis: 1, .. })
        ));
    }

    #[test]
    fn test_override_bypasses_derivation() {
        let input = ImageGeometry::new([1.0, 1.0, 2.0], [0.0, 0.0, 0.0], [0, 63, 0, 63, 0, 31]);
        let explicit = ImageGeometry::new([0.25, 0.25, 0.25], [5.0, 6.0, 7.0], [0, 9, 0, 9, 0, 9]);

        // The override wins regardless of input geometry or factor.
        for factor in [1, 2, 7] {
            let output = compute_output_grid(&input, factor, Some(&explicit)).unwrap();
            assert_eq!(output, explicit);
        }

        // Clearing the override restores automatic derivation.
        let baseline = compute_output_grid(&input, 2, None).unwrap();
        let restored = compute_output_grid(&input, 2, None).unwrap();
        assert_eq!(baseline, restored);
    }

    #[test]
    fn test_override_is_sanity_checked() {
        let input = ImageGeometry::new([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [0, 9, 0, 9, 0, 9]);
        let bad = ImageGeometry::new([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [0, 9, 9, 0, 0, 9]);
        let result = compute_output_grid(&input, 1, Some(&bad));
        assert!(matches!(
            result,
            Err(GeometryError::InvertedExtent { axis: 1, .. })
        ));
    }

    #[test]
    fn test_index_physical_round_trip() {
        let geometry = ImageGeometry::new([0.5, 2.0, 1.5], [-3.0, 10.0, 0.0], [0, 9, 0, 9, 0, 9]);
        let index = [4.0, 7.5, 2.25];
        let point = geometry.index_to_physical(index);
        let back = geometry.physical_to_index(point);
        for axis in 0..3 {
            assert!((index[axis] - back[axis]).abs() < EPSILON);
        }
    }
}
