//! Point-cloud rendering seam.
//!
//! The lifecycle manager talks to the scene graph only through
//! [`PointCloudRenderer`]: it adds one point cloud per slice, swaps vertex
//! buffers in place on filter changes, adjusts point size and visibility,
//! and removes clouds when a dataset is replaced. Picking is the
//! renderer's job and comes back as a [`PickHit`].

mod headless;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::Serialize;

pub use headless::{HeadlessCloud, HeadlessRenderer};

/// Opaque handle to a renderer-side point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PrimitiveId(pub u32);

/// Interleaved per-point vertex, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable, Serialize)]
pub struct PointVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Linear RGB color, channels in `[0, 1]`.
    pub color: [f32; 3],
}

/// Presentation state of a point cloud.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointStyle {
    /// Uniform point size.
    pub size: f32,
    /// Whether the cloud is drawn at all.
    pub visible: bool,
}

/// A ray hit on a point cloud.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    /// Cloud that was hit.
    pub primitive: PrimitiveId,
    /// Index of the hit point within the cloud's vertex buffer.
    pub index: usize,
    /// Distance from the ray origin to the hit point's projection on the ray.
    pub distance: f32,
}

/// The scene-graph operations the lifecycle manager needs.
pub trait PointCloudRenderer {
    /// Create a point cloud and return its handle.
    fn add_point_cloud(
        &mut self,
        label: &str,
        vertices: &[PointVertex],
        style: PointStyle,
    ) -> PrimitiveId;

    /// Replace the vertex buffer of an existing cloud in place.
    fn replace_vertices(&mut self, id: PrimitiveId, vertices: &[PointVertex]);

    /// Update point size and visibility.
    fn set_style(&mut self, id: PrimitiveId, style: PointStyle);

    /// Remove a cloud and free its buffers.
    fn remove_point_cloud(&mut self, id: PrimitiveId);

    /// Extent of the displayed data, for framing and backdrop sizing.
    fn set_scene_bounds(&mut self, _min: Vec3, _max: Vec3) {}
}
