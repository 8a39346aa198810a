//! Hover inspection of rendered points.

use std::fmt;

use glam::Vec2;

/// Screen-space offset of the tooltip from the cursor, in pixels.
pub const TOOLTIP_OFFSET: Vec2 = Vec2::new(12.0, 12.0);

/// Tooltip content for the point under the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverInfo {
    /// Slice the point belongs to.
    pub slice_index: usize,
    /// Correlation value of the point.
    pub value: f32,
    /// Row residue index.
    pub residue_i: usize,
    /// Column residue index.
    pub residue_j: usize,
    /// Name of the row residue.
    pub residue_i_name: String,
    /// Name of the column residue.
    pub residue_j_name: String,
    /// Where to draw the tooltip, in screen pixels.
    pub screen_position: Vec2,
}

impl HoverInfo {
    /// Tooltip anchor for a cursor at `cursor`.
    #[must_use]
    pub fn anchor(cursor: Vec2) -> Vec2 {
        cursor + TOOLTIP_OFFSET
    }
}

impl fmt::Display for HoverInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Slice {}", self.slice_index)?;
        writeln!(f, "Correlation: {:.4}", self.value)?;
        write!(
            f,
            "{}{} / {}{}",
            self.residue_i_name,
            self.residue_i + 1,
            self.residue_j_name,
            self.residue_j + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tooltip_text() {
        let info = HoverInfo {
            slice_index: 2,
            value: -0.123_456,
            residue_i: 0,
            residue_j: 9,
            residue_i_name: "ALA".to_owned(),
            residue_j_name: "GLY".to_owned(),
            screen_position: HoverInfo::anchor(Vec2::new(100.0, 50.0)),
        };
        assert_eq!(info.to_string(), "Slice 2\nCorrelation: -0.1235\nALA1 / GLY10");
        assert_eq!(info.screen_position, Vec2::new(112.0, 62.0));
    }
}
