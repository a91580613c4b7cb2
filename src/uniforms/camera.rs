//! Camera (eye) transforms

use std::mem::offset_of;
use std::ops::{Index, IndexMut};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use static_assertions::const_assert_eq;

use super::{FieldLayout, UniformLayout, WgslType};
use crate::registry::{BufferIndex, Slot, Viewport};

/// Projection and view transform of one viewport.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CameraUniform {
    /// Eye space to clip space, including the device camera intrinsics.
    pub projection_matrix: [[f32; 4]; 4],
    /// World space to eye space.
    pub view_matrix: [[f32; 4]; 4],
}

const_assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
const_assert_eq!(std::mem::align_of::<CameraUniform>(), 16);

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, Mat4::IDENTITY)
    }
}

impl CameraUniform {
    pub fn new(projection: Mat4, view: Mat4) -> Self {
        Self {
            projection_matrix: projection.to_cols_array_2d(),
            view_matrix: view.to_cols_array_2d(),
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.projection_matrix)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.view_matrix)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// World-space eye position.
    pub fn eye_position(&self) -> Vec3 {
        self.view().inverse().w_axis.truncate()
    }
}

impl UniformLayout for CameraUniform {
    const NAME: &'static str = "CameraUniform";
    const SLOT: BufferIndex = BufferIndex::SharedUniforms;

    fn fields() -> &'static [FieldLayout] {
        const FIELDS: &[FieldLayout] = &[
            FieldLayout::new(
                "projection_matrix",
                WgslType::Mat4x4F32,
                offset_of!(CameraUniform, projection_matrix),
            ),
            FieldLayout::new(
                "view_matrix",
                WgslType::Mat4x4F32,
                offset_of!(CameraUniform, view_matrix),
            ),
        ];
        FIELDS
    }
}

/// One camera per eye. A mono render uses the same camera for both.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StereoCameras {
    cameras: [CameraUniform; Viewport::COUNT as usize],
}

impl StereoCameras {
    pub fn new(left: CameraUniform, right: CameraUniform) -> Self {
        Self {
            cameras: [left, right],
        }
    }

    pub fn mono(camera: CameraUniform) -> Self {
        Self::new(camera, camera)
    }

    /// Cameras paired with their viewport, in viewport order.
    pub fn iter(&self) -> impl Iterator<Item = (Viewport, &CameraUniform)> {
        Viewport::ALL.iter().copied().zip(self.cameras.iter())
    }
}

impl Index<Viewport> for StereoCameras {
    type Output = CameraUniform;

    fn index(&self, viewport: Viewport) -> &Self::Output {
        &self.cameras[viewport.index() as usize]
    }
}

impl IndexMut<Viewport> for StereoCameras {
    fn index_mut(&mut self, viewport: Viewport) -> &mut Self::Output {
        &mut self.cameras[viewport.index() as usize]
    }
}
