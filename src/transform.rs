use nalgebra::{Matrix4, Point3, Rotation3, Translation3, Vector3};

/// User-facing reslice rotation in degrees.
///
/// Yaw turns about the physical Z axis, pitch about X, roll about Y. Angles
/// are not normalized; 370 and 10 degrees compose to the same transform.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl RotationState {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self { yaw, pitch, roll }
    }

    /// Back to the unrotated state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Homogeneous 4x4 transform mapping output-grid physical points to input
/// sampling points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    matrix: Matrix4<f64>,
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    pub fn transform_point(&self, point: [f64; 3]) -> [f64; 3] {
        let mapped = self
            .matrix
            .transform_point(&Point3::new(point[0], point[1], point[2]));
        [mapped.x, mapped.y, mapped.z]
    }

    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(Self::from_matrix)
    }
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Compose the reslice transform for a rotation about `center`.
///
/// The factor order is fixed: `T(+c) * Rz(yaw) * Rx(pitch) * Ry(roll) *
/// T(-c)`, rightmost applied first. Reordering changes the slab whenever two
/// or more angles are non-zero, so callers on both ends of the pipeline
/// depend on this exact sequence.
///
/// Positive angles turn the sampling frame clockwise when viewed from the
/// tip of the rotation axis: a yaw of +90 about `(10, 10, 10)` sends the
/// point `(20, 10, 10)` to `(10, 0, 10)`.
///
/// `center` must be the physical center of the live input geometry at
/// composition time; callers without an input have no valid center and must
/// not compose.
pub fn compose_reslice_transform(center: [f64; 3], rotation: &RotationState) -> AffineTransform {
    let c = Vector3::new(center[0], center[1], center[2]);

    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), -rotation.yaw.to_radians());
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), -rotation.pitch.to_radians());
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), -rotation.roll.to_radians());

    let matrix = Translation3::from(c).to_homogeneous()
        * rz.to_homogeneous()
        * rx.to_homogeneous()
        * ry.to_homogeneous()
        * Translation3::from(-c).to_homogeneous();

    AffineTransform::from_matrix(matrix)
}
