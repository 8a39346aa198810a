use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Layout", inline)]
#[serde(default)]
/// Spatial arrangement of the slice point grids.
pub struct LayoutOptions {
    /// Position of point `(0, 0)` of slice 0.
    #[schemars(skip)]
    pub origin: [f32; 3],
    /// Distance between neighbouring residues on the grid.
    #[schemars(title = "Grid Step", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub step: f32,
    /// Distance between consecutive slices along the stacking axis.
    #[schemars(title = "Slice Spacing", range(min = 0.01, max = 2.0), extend("step" = 0.01))]
    pub slice_spacing: f32,
    /// Point size of emphasized slices.
    #[schemars(title = "Point Size", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub point_size: f32,
    /// Point size of de-emphasized slices.
    #[schemars(title = "Dimmed Point Size", range(min = 0.001, max = 1.0), extend("step" = 0.001))]
    pub dimmed_point_size: f32,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            origin: [1.0, 0.05, -1.0],
            step: 0.09,
            slice_spacing: 0.1,
            point_size: 0.16,
            dimmed_point_size: 0.022,
        }
    }
}

impl LayoutOptions {
    /// World position of matrix cell `(i, j)` in slice `slice`.
    ///
    /// Residue `i` runs along X, residue `j` along Y, and slices stack
    /// toward -Z.
    #[must_use]
    pub fn position(&self, slice: usize, i: usize, j: usize) -> Vec3 {
        Vec3::from(self.origin)
            + Vec3::new(
                i as f32 * self.step,
                j as f32 * self.step,
                -(slice as f32) * self.slice_spacing,
            )
    }

    /// Axis-aligned bounds `(min, max)` enclosing every possible point of a
    /// dataset with the given dimensions.
    #[must_use]
    pub fn bounds(&self, num_slices: usize, num_atoms: usize) -> (Vec3, Vec3) {
        let last_atom = num_atoms.saturating_sub(1);
        let last_slice = num_slices.saturating_sub(1);
        let near = self.position(0, 0, 0);
        let far = self.position(last_slice, last_atom, last_atom);
        (near.min(far), near.max(far))
    }
}
