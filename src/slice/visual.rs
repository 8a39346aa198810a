use glam::Vec3;

use super::{PointMetadata, SliceEmphasis, SliceStyle};
use crate::dataset::SliceMatrix;
use crate::options::FilterParameters;
use crate::renderer::PointVertex;

/// Filtered point cloud of one slice plus its cached source matrix.
///
/// `positions`, `colors` and `metadata` always have the same length and
/// share indices, so a pick index resolves directly to its matrix cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceVisual {
    slice_index: usize,
    source: SliceMatrix,
    positions: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    metadata: Vec<PointMetadata>,
    emphasis: SliceEmphasis,
}

impl SliceVisual {
    /// Build the visual for `slice_index` from its full matrix.
    #[must_use]
    pub fn build(
        source: SliceMatrix,
        slice_index: usize,
        filter: &FilterParameters,
        style: &SliceStyle,
    ) -> Self {
        let mut visual = Self {
            slice_index,
            source,
            positions: Vec::new(),
            colors: Vec::new(),
            metadata: Vec::new(),
            emphasis: SliceEmphasis::Full,
        };
        visual.rebuild(filter, style);
        visual
    }

    /// Re-run filtering and coloring against the cached matrix, reusing the
    /// existing buffer allocations.
    pub fn rebuild(&mut self, filter: &FilterParameters, style: &SliceStyle) {
        self.positions.clear();
        self.colors.clear();
        self.metadata.clear();
        self.emphasis = SliceEmphasis::for_slice(filter, self.slice_index);

        for (i, row) in self.source.rows().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                if filter.is_dropped(value) {
                    continue;
                }
                self.positions
                    .push(style.layout.position(self.slice_index, i, j));
                self.colors.push(style.ramp.color_normalized(value));
                self.metadata.push(PointMetadata {
                    residue_i: i,
                    residue_j: j,
                    value,
                });
            }
        }
    }

    /// Slice this visual was built for.
    #[must_use]
    pub fn slice_index(&self) -> usize {
        self.slice_index
    }

    /// Cached full matrix.
    #[must_use]
    pub fn source_matrix(&self) -> &SliceMatrix {
        &self.source
    }

    /// Point positions.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Point colors, channels in `[0, 1]`.
    #[must_use]
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Per-point source cells.
    #[must_use]
    pub fn metadata(&self) -> &[PointMetadata] {
        &self.metadata
    }

    /// Source cell of point `index`.
    #[must_use]
    pub fn point(&self, index: usize) -> Option<&PointMetadata> {
        self.metadata.get(index)
    }

    /// Number of points that survived the filter.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether every cell was filtered out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Emphasis computed by the last build.
    #[must_use]
    pub fn emphasis(&self) -> SliceEmphasis {
        self.emphasis
    }

    /// Interleave positions and colors into `out` for upload.
    pub fn write_vertices(&self, out: &mut Vec<PointVertex>) {
        out.clear();
        out.extend(self.positions.iter().zip(&self.colors).map(
            |(position, color)| PointVertex {
                position: position.to_array(),
                color: *color,
            },
        ));
    }

    /// Interleaved vertex buffer.
    #[must_use]
    pub fn vertices(&self) -> Vec<PointVertex> {
        let mut out = Vec::with_capacity(self.len());
        self.write_vertices(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::dataset::DccmDataset;

    fn fixture_matrix() -> SliceMatrix {
        DccmDataset::new(
            1,
            3,
            vec!["ALA".to_owned(), "GLY".to_owned(), "LYS".to_owned()],
            vec![1.0, 0.0, -1.0, 0.5, 0.2, 1.0],
        )
        .unwrap()
        .slice_matrix(0)
    }

    fn filter(negative: f32, positive: f32) -> FilterParameters {
        FilterParameters::default().with_thresholds(negative, positive)
    }

    #[test]
    fn three_atom_fixture_keeps_strong_cells() {
        let visual = SliceVisual::build(
            fixture_matrix(),
            0,
            &filter(0.3, 0.3),
            &SliceStyle::default(),
        );
        // (0,1)/(1,0) = 0.0 and (1,2)/(2,1) = 0.2 fall in the dead zone
        let cells: Vec<_> = visual
            .metadata()
            .iter()
            .map(|m| (m.residue_i, m.residue_j))
            .collect();
        assert_eq!(cells, [(0, 0), (0, 2), (1, 1), (2, 0), (2, 2)]);
    }

    #[test]
    fn three_atom_fixture_without_diagonal_strength() {
        // With the diagonal at 0.5 excluded too, four cells remain.
        let visual = SliceVisual::build(
            fixture_matrix(),
            0,
            &filter(0.3, 0.6),
            &SliceStyle::default(),
        );
        assert_eq!(visual.len(), 4);
        assert!(visual.metadata().iter().all(|m| m.value.abs() == 1.0));
    }

    #[test]
    fn buffers_share_indices_with_matrix() {
        let ds = DccmDataset::synthetic(1, 12, &mut StdRng::seed_from_u64(3));
        let visual = SliceVisual::build(
            ds.slice_matrix(0),
            0,
            &filter(0.25, 0.4),
            &SliceStyle::default(),
        );
        assert_eq!(visual.positions().len(), visual.colors().len());
        assert_eq!(visual.positions().len(), visual.metadata().len());
        let style = SliceStyle::default();
        for (k, m) in visual.metadata().iter().enumerate() {
            assert_eq!(
                m.value,
                visual.source_matrix().get(m.residue_i, m.residue_j)
            );
            assert_eq!(
                visual.positions()[k],
                style.layout.position(0, m.residue_i, m.residue_j)
            );
            assert_eq!(visual.colors()[k], style.ramp.color_normalized(m.value));
        }
    }

    #[test]
    fn raising_a_threshold_never_adds_points() {
        let ds = DccmDataset::synthetic(1, 20, &mut StdRng::seed_from_u64(11));
        let style = SliceStyle::default();
        let matrix = ds.slice_matrix(0);
        let mut visual = SliceVisual::build(matrix, 0, &filter(0.0, 0.0), &style);
        for fixed in [0.0, 0.3, 0.7] {
            let mut last_pos = usize::MAX;
            let mut last_neg = usize::MAX;
            for step in 0..=20 {
                let t = step as f32 * 0.05;
                visual.rebuild(&filter(fixed, t), &style);
                assert!(visual.len() <= last_pos);
                last_pos = visual.len();
                visual.rebuild(&filter(t, fixed), &style);
                assert!(visual.len() <= last_neg);
                last_neg = visual.len();
            }
        }
    }

    #[test]
    fn rebuild_is_idempotent() {
        let ds = DccmDataset::synthetic(2, 9, &mut StdRng::seed_from_u64(5));
        let style = SliceStyle::default();
        let f = filter(0.35, 0.15).with_selection(Some(0));
        let a = SliceVisual::build(ds.slice_matrix(1), 1, &f, &style);
        let mut b = SliceVisual::build(ds.slice_matrix(1), 1, &filter(0.9, 0.9), &style);
        b.rebuild(&f, &style);
        assert_eq!(a, b);
        let bits = |v: &SliceVisual| -> Vec<u32> {
            v.vertices()
                .iter()
                .flat_map(|p| p.position.into_iter().chain(p.color))
                .map(f32::to_bits)
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a.emphasis(), SliceEmphasis::Dimmed);
    }

    #[test]
    fn slices_land_on_their_own_plane() {
        let ds = DccmDataset::synthetic(3, 4, &mut StdRng::seed_from_u64(9));
        let style = SliceStyle::default();
        let f = filter(0.0, 0.0);
        let z: Vec<f32> = (0..3)
            .map(|s| SliceVisual::build(ds.slice_matrix(s), s, &f, &style).positions()[0].z)
            .collect();
        assert!(z[0] > z[1] && z[1] > z[2]);
    }

    #[test]
    fn vertices_interleave() {
        let visual = SliceVisual::build(
            fixture_matrix(),
            0,
            &filter(0.3, 0.3),
            &SliceStyle::default(),
        );
        let verts = visual.vertices();
        assert_eq!(verts.len(), visual.len());
        assert_eq!(verts[1].position, visual.positions()[1].to_array());
        assert_eq!(verts[1].color, [0.0, 0.0, 1.0]);
        assert_eq!(bytemuck::cast_slice::<_, u8>(&verts).len(), verts.len() * 24);
    }
}
