use ndarray::Array3;

pub(crate) struct Interpolator;

impl Interpolator {
    /// Nearest-neighbor sample at a continuous (z, y, x) array index.
    ///
    /// Coordinates must be within `[0, dim - 1]` per axis.
    #[inline]
    pub(crate) fn nearest(data: &Array3<f32>, z: f64, y: f64, x: f64) -> f32 {
        let (depth, height, width) = data.dim();
        let k = (z.round() as usize).min(depth - 1);
        let j = (y.round() as usize).min(height - 1);
        let i = (x.round() as usize).min(width - 1);
        data[[k, j, i]]
    }

    /// Trilinear sample at a continuous (z, y, x) array index.
    ///
    /// Coordinates must be within `[0, dim - 1]` per axis; the +1 neighbors
    /// are clamped at the upper boundary.
    #[inline]
    pub(crate) fn trilinear(data: &Array3<f32>, z: f64, y: f64, x: f64) -> f32 {
        let (depth, height, width) = data.dim();

        let z0 = z.floor() as usize;
        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let z1 = (z0 + 1).min(depth - 1);
        let y1 = (y0 + 1).min(height - 1);
        let x1 = (x0 + 1).min(width - 1);

        let dz = (z - z0 as f64) as f32;
        let dy = (y - y0 as f64) as f32;
        let dx = (x - x0 as f64) as f32;
        let one_minus_dx = 1.0 - dx;
        let one_minus_dy = 1.0 - dy;
        let one_minus_dz = 1.0 - dz;

        let v000 = data[[z0, y0, x0]];
        let v001 = data[[z0, y0, x1]];
        let v010 = data[[z0, y1, x0]];
        let v011 = data[[z0, y1, x1]];
        let v100 = data[[z1, y0, x0]];
        let v101 = data[[z1, y0, x1]];
        let v110 = data[[z1, y1, x0]];
        let v111 = data[[z1, y1, x1]];

        let v00 = v000.mul_add(one_minus_dx, v001 * dx);
        let v01 = v010.mul_add(one_minus_dx, v011 * dx);
        let v10 = v100.mul_add(one_minus_dx, v101 * dx);
        let v11 = v110.mul_add(one_minus_dx, v111 * dx);

        let v0 = v00.mul_add(one_minus_dy, v01 * dy);
        let v1 = v10.mul_add(one_minus_dy, v11 * dy);

        v0.mul_add(one_minus_dz, v1 * dz)
    }
}
