use crate::enums::Interpolation;
use crate::geometry::ImageGeometry;
use crate::interpolator::Interpolator;
use crate::transform::AffineTransform;
use crate::volume::Volume;

use ndarray::{Array3, Axis};
use rayon::prelude::*;

/// Samples this close to the input boundary are clamped instead of being
/// dropped to background, so grid-aligned reslices keep their edge voxels.
const BORDER_TOLERANCE: f64 = 1e-6;

/// Resampling executor: produces a new volume on the requested grid by
/// sampling `input` through `transform`.
///
/// The transform maps output-grid physical points to input sampling points.
/// Implementations must never mutate the input; callers are responsible for
/// passing a validated grid (positive spacing).
pub trait ResampleExecutor {
    fn resample(
        &self,
        input: &Volume,
        transform: &AffineTransform,
        grid: &ImageGeometry,
        interpolation: Interpolation,
    ) -> Volume;
}

/// CPU inverse-mapping resampler.
///
/// Walks the output grid slice by slice in parallel; each output voxel is
/// mapped through the transform into the input volume and sampled there.
/// Voxels falling outside the input field of view receive `background`.
pub struct CpuResampler {
    pub background: f32,
}

impl CpuResampler {
    pub fn new() -> Self {
        Self { background: 0.0 }
    }

    pub fn with_background(background: f32) -> Self {
        Self { background }
    }
}

impl Default for CpuResampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResampleExecutor for CpuResampler {
    fn resample(
        &self,
        input: &Volume,
        transform: &AffineTransform,
        grid: &ImageGeometry,
        interpolation: Interpolation,
    ) -> Volume {
        let counts = grid.counts();
        let (nx, ny, nz) = (counts[0] as usize, counts[1] as usize, counts[2] as usize);
        let in_geometry = input.geometry;
        let (depth, height, width) = input.data.dim();
        let background = self.background;

        let mut output = Array3::<f32>::zeros((nz, ny, nx));
        output
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(k, mut plane)| {
                let iz = (grid.extent[4] + k as i64) as f64;
                for j in 0..ny {
                    let iy = (grid.extent[2] + j as i64) as f64;
                    for i in 0..nx {
                        let ix = (grid.extent[0] + i as i64) as f64;

                        let out_point = grid.index_to_physical([ix, iy, iz]);
                        let src_point = transform.transform_point(out_point);
                        let src_index = in_geometry.physical_to_index(src_point);

                        // Continuous array coordinates relative to the
                        // input extent minimum.
                        let x = src_index[0] - in_geometry.extent[0] as f64;
                        let y = src_index[1] - in_geometry.extent[2] as f64;
                        let z = src_index[2] - in_geometry.extent[4] as f64;

                        plane[[j, i]] = if x < -BORDER_TOLERANCE
                            || y < -BORDER_TOLERANCE
                            || z < -BORDER_TOLERANCE
                            || x > (width - 1) as f64 + BORDER_TOLERANCE
                            || y > (height - 1) as f64 + BORDER_TOLERANCE
                            || z > (depth - 1) as f64 + BORDER_TOLERANCE
                        {
                            background
                        } else {
                            let x = x.clamp(0.0, (width - 1) as f64);
                            let y = y.clamp(0.0, (height - 1) as f64);
                            let z = z.clamp(0.0, (depth - 1) as f64);
                            match interpolation {
                                Interpolation::Nearest => {
                                    Interpolator::nearest(&input.data, z, y, x)
                                }
                                Interpolation::Trilinear => {
                                    Interpolator::trilinear(&input.data, z, y, x)
                                }
                            }
                        };
                    }
                }
            });

        Volume::new(output, *grid).with_scalar_type(input.scalar_type)
    }
}
