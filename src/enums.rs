#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Axial,
    Coronal,
    Sagittal,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    Nearest,
    #[default]
    Trilinear,
    // TODO:
    // Cubic,
}

/// Scalar type of the voxel data as reported by the reading subsystem.
///
/// Voxels are held as `f32` internally; this records what the source
/// delivered so consumers can pick a sensible display mapping.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    UInt8,
    Int16,
    UInt16,
    #[default]
    Float32,
}
