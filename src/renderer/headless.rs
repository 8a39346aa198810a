use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::Serialize;

use super::{PickHit, PointCloudRenderer, PointStyle, PointVertex, PrimitiveId};

/// One point cloud held by [`HeadlessRenderer`].
#[derive(Debug, Clone, Serialize)]
pub struct HeadlessCloud {
    /// Label given at creation.
    pub label: String,
    /// Current vertex buffer.
    pub vertices: Vec<PointVertex>,
    /// Current presentation state.
    pub style: PointStyle,
    /// How many times the buffer was replaced in place.
    pub uploads: u32,
}

/// In-memory renderer for batch runs and tests.
///
/// Keeps every cloud's buffers on the CPU and answers ray picks the way a
/// scene graph's point raycaster does: the nearest visible point whose
/// perpendicular distance to the ray is within a threshold.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    clouds: FxHashMap<PrimitiveId, HeadlessCloud>,
    next_id: u32,
    bounds: Option<(Vec3, Vec3)>,
    removed: u32,
}

impl HeadlessRenderer {
    /// Empty renderer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live clouds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    /// Whether no clouds are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    /// Cloud by handle.
    #[must_use]
    pub fn cloud(&self, id: PrimitiveId) -> Option<&HeadlessCloud> {
        self.clouds.get(&id)
    }

    /// Live clouds sorted by handle.
    #[must_use]
    pub fn clouds(&self) -> Vec<(PrimitiveId, &HeadlessCloud)> {
        let mut list: Vec<_> = self.clouds.iter().map(|(id, c)| (*id, c)).collect();
        list.sort_by_key(|(id, _)| *id);
        list
    }

    /// Total clouds removed so far.
    #[must_use]
    pub fn removed_count(&self) -> u32 {
        self.removed
    }

    /// Last bounds hint.
    #[must_use]
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.bounds
    }

    /// Nearest visible point within `threshold` of the ray.
    #[must_use]
    pub fn pick(
        &self,
        origin: Vec3,
        direction: Vec3,
        threshold: f32,
    ) -> Option<PickHit> {
        let dir = direction.try_normalize()?;
        let mut best: Option<PickHit> = None;
        for (id, cloud) in &self.clouds {
            if !cloud.style.visible {
                continue;
            }
            for (index, vertex) in cloud.vertices.iter().enumerate() {
                let to_point = Vec3::from(vertex.position) - origin;
                let along = to_point.dot(dir);
                if along < 0.0 {
                    continue;
                }
                let off_ray = (to_point - dir * along).length();
                if off_ray > threshold {
                    continue;
                }
                let closer = best.map_or(true, |b| {
                    along < b.distance || (along == b.distance && *id < b.primitive)
                });
                if closer {
                    best = Some(PickHit {
                        primitive: *id,
                        index,
                        distance: along,
                    });
                }
            }
        }
        best
    }

    /// Serialize all live clouds as JSON.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        let clouds: Vec<_> = self.clouds().into_iter().map(|(_, c)| c).collect();
        serde_json::to_string_pretty(&clouds)
    }
}

impl PointCloudRenderer for HeadlessRenderer {
    fn add_point_cloud(
        &mut self,
        label: &str,
        vertices: &[PointVertex],
        style: PointStyle,
    ) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        let _ = self.clouds.insert(
            id,
            HeadlessCloud {
                label: label.to_owned(),
                vertices: vertices.to_vec(),
                style,
                uploads: 0,
            },
        );
        id
    }

    fn replace_vertices(&mut self, id: PrimitiveId, vertices: &[PointVertex]) {
        if let Some(cloud) = self.clouds.get_mut(&id) {
            cloud.vertices.clear();
            cloud.vertices.extend_from_slice(vertices);
            cloud.uploads += 1;
        } else {
            log::warn!("replace_vertices on unknown primitive {id:?}");
        }
    }

    fn set_style(&mut self, id: PrimitiveId, style: PointStyle) {
        if let Some(cloud) = self.clouds.get_mut(&id) {
            cloud.style = style;
        }
    }

    fn remove_point_cloud(&mut self, id: PrimitiveId) {
        if self.clouds.remove(&id).is_some() {
            self.removed += 1;
        }
    }

    fn set_scene_bounds(&mut self, min: Vec3, max: Vec3) {
        self.bounds = Some((min, max));
    }
}
