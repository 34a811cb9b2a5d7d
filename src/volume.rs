use crate::enums::{Orientation, ScalarType};
use crate::geometry::ImageGeometry;

use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::s;

/// A 3D scalar image: voxel data plus its sampling geometry.
///
/// Data is stored in (depth, height, width) order, i.e. `data[[k, j, i]]`
/// is the voxel at grid offset (z=k, y=j, x=i) from the extent minimum.
/// Volumes are shared read-only between sessions; all derived products are
/// new objects.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Volume {
    pub data: Array3<f32>,
    pub geometry: ImageGeometry,
    pub scalar_type: ScalarType,
}

impl Volume {
    pub fn new(data: Array3<f32>, geometry: ImageGeometry) -> Self {
        Self {
            data,
            geometry,
            scalar_type: ScalarType::default(),
        }
    }

    pub fn with_scalar_type(mut self, scalar_type: ScalarType) -> Self {
        self.scalar_type = scalar_type;
        self
    }

    /// Get the dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn geometry(&self) -> &ImageGeometry {
        &self.geometry
    }

    /// Physical center of the volume, the pivot for reslice rotations.
    pub fn physical_center(&self) -> [f64; 3] {
        self.geometry.physical_center()
    }

    /// Voxel value at an absolute grid index, if inside the extent.
    pub fn value_at(&self, index: [i64; 3]) -> Option<f32> {
        let extent = &self.geometry.extent;
        let i = index[0] - extent[0];
        let j = index[1] - extent[2];
        let k = index[2] - extent[4];
        if i < 0 || j < 0 || k < 0 {
            return None;
        }
        self.data.get([k as usize, j as usize, i as usize]).copied()
    }

    pub fn slice_at(&self, index: usize, orientation: Orientation) -> Option<ArrayView2<'_, f32>> {
        if !self.is_valid_index(index, orientation) {
            return None;
        }
        let slice = match orientation {
            Orientation::Axial => self.data.slice(s![index, .., ..]),
            Orientation::Coronal => self.data.slice(s![.., index, ..]),
            Orientation::Sagittal => self.data.slice(s![.., .., index]),
        };
        Some(slice)
    }

    fn is_valid_index(&self, index: usize, orientation: Orientation) -> bool {
        let dim = self.data.dim();
        let max_index = match orientation {
            Orientation::Axial => dim.0,
            Orientation::Coronal => dim.1,
            Orientation::Sagittal => dim.2,
        };
        index < max_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_volume() -> Volume {
        let geometry = ImageGeometry::new([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [0, 3, 0, 2, 0, 1]);
        let data = Array3::from_shape_fn((2, 3, 4), |(k, j, i)| (k * 100 + j * 10 + i) as f32);
        Volume::new(data, geometry)
    }

    #[test]
    fn test_value_at_absolute_index() {
        let volume = test_volume();
        assert_eq!(volume.value_at([2, 1, 1]), Some(112.0));
        assert_eq!(volume.value_at([4, 0, 0]), None);
        assert_eq!(volume.value_at([-1, 0, 0]), None);
    }

    #[test]
    fn test_value_at_with_offset_extent() {
        let geometry = ImageGeometry::new([1.0, 1.0, 1.0], [0.0, 0.0, 0.0], [5, 8, 5, 7, 5, 6]);
        let data = Array3::from_shape_fn((2, 3, 4), |(k, j, i)| (k * 100 + j * 10 + i) as f32);
        let volume = Volume::new(data, geometry);
        assert_eq!(volume.value_at([5, 5, 5]), Some(0.0));
        assert_eq!(volume.value_at([7, 6, 6]), Some(112.0));
        assert_eq!(volume.value_at([4, 5, 5]), None);
    }

    #[test]
    fn test_slice_at_bounds() {
        let volume = test_volume();
        assert!(volume.slice_at(1, Orientation::Axial).is_some());
        assert!(volume.slice_at(2, Orientation::Axial).is_none());
        assert!(volume.slice_at(3, Orientation::Sagittal).is_some());
        assert!(volume.slice_at(4, Orientation::Sagittal).is_none());
    }

    #[test]
    fn test_slice_at_orientation_shapes() {
        let volume = test_volume();
        assert_eq!(volume.slice_at(0, Orientation::Axial).unwrap().dim(), (3, 4));
        assert_eq!(volume.slice_at(0, Orientation::Coronal).unwrap().dim(), (2, 4));
        assert_eq!(volume.slice_at(0, Orientation::Sagittal).unwrap().dim(), (2, 3));
    }
}
