//! In-memory DCCM dataset and symmetric-matrix addressing.
//!
//! Each slice is a symmetric `num_atoms x num_atoms` correlation matrix of
//! which only the upper triangle (diagonal included) is stored, row-major
//! with the row index ascending. Slices are concatenated.

use rand::Rng;

use crate::format::{payload_len, triangular_size, FormatError};

/// Three-letter residue codes used for synthetic datasets.
const SYNTHETIC_RESIDUES: [&str; 20] = [
    "ALA", "ARG", "ASN", "ASP", "CYS", "GLN", "GLU", "GLY", "HIS", "ILE",
    "LEU", "LYS", "MET", "PHE", "PRO", "SER", "THR", "TRP", "TYR", "VAL",
];

/// A decoded, validated DCCM file.
#[derive(Debug, Clone, PartialEq)]
pub struct DccmDataset {
    num_slices: usize,
    num_atoms: usize,
    residue_names: Vec<String>,
    raw_data: Vec<f32>,
}

impl DccmDataset {
    /// Build a dataset, checking the name count and the packed length
    /// `num_slices * n(n+1)/2`.
    ///
    /// # Errors
    ///
    /// [`FormatError::NameCount`] or [`FormatError::PayloadSize`] when the
    /// parts disagree with the dimensions.
    pub fn new(
        num_slices: usize,
        num_atoms: usize,
        residue_names: Vec<String>,
        raw_data: Vec<f32>,
    ) -> Result<Self, FormatError> {
        if residue_names.len() != num_atoms {
            return Err(FormatError::NameCount {
                expected: num_atoms,
                actual: residue_names.len(),
            });
        }
        let expected = payload_len(num_slices, num_atoms).ok_or(
            FormatError::DimensionsOverflow {
                num_slices: num_slices as u32,
                num_atoms: num_atoms as u32,
            },
        )?;
        if raw_data.len() != expected {
            return Err(FormatError::PayloadSize {
                expected_bytes: expected * size_of::<f32>(),
                actual_bytes: raw_data.len() * size_of::<f32>(),
            });
        }
        Ok(Self {
            num_slices,
            num_atoms,
            residue_names,
            raw_data,
        })
    }

    /// Random symmetric dataset with a unit diagonal.
    ///
    /// Off-diagonal values are uniform in `[-1, 1)`.
    pub fn synthetic(
        num_slices: usize,
        num_atoms: usize,
        rng: &mut impl Rng,
    ) -> Self {
        let residue_names = (0..num_atoms)
            .map(|i| SYNTHETIC_RESIDUES[i % SYNTHETIC_RESIDUES.len()].to_owned())
            .collect();
        let mut raw_data =
            Vec::with_capacity(num_slices * triangular_size(num_atoms));
        for _ in 0..num_slices {
            for i in 0..num_atoms {
                raw_data.push(1.0);
                for _ in i + 1..num_atoms {
                    raw_data.push(rng.random_range(-1.0..1.0));
                }
            }
        }
        Self {
            num_slices,
            num_atoms,
            residue_names,
            raw_data,
        }
    }

    /// Number of time slices.
    #[must_use]
    pub fn num_slices(&self) -> usize {
        self.num_slices
    }

    /// Matrix dimension of every slice.
    #[must_use]
    pub fn num_atoms(&self) -> usize {
        self.num_atoms
    }

    /// Residue labels in file order.
    #[must_use]
    pub fn residue_names(&self) -> &[String] {
        &self.residue_names
    }

    /// Label of residue `i`, if in range.
    #[must_use]
    pub fn residue_name(&self, i: usize) -> Option<&str> {
        self.residue_names.get(i).map(String::as_str)
    }

    /// Packed values for all slices.
    #[must_use]
    pub fn raw_data(&self) -> &[f32] {
        &self.raw_data
    }

    /// Stored values per slice.
    #[must_use]
    pub fn values_per_slice(&self) -> usize {
        triangular_size(self.num_atoms)
    }

    /// Offset of `(i, j)` in slice `slice` within [`raw_data`](Self::raw_data).
    ///
    /// The pair is unordered: `(i, j)` and `(j, i)` share one slot.
    #[must_use]
    pub fn index_of(&self, slice: usize, i: usize, j: usize) -> usize {
        let (i, j) = if i > j { (j, i) } else { (i, j) };
        // n*i - i*(i-1)/2, rearranged to stay in range at i = 0
        let row_start = i * (2 * self.num_atoms - i + 1) / 2;
        slice * self.values_per_slice() + row_start + (j - i)
    }

    /// Correlation between residues `i` and `j` in slice `slice`.
    ///
    /// Indices must be within the dataset dimensions; see
    /// [`try_value`](Self::try_value) for a checked lookup.
    #[must_use]
    pub fn value(&self, slice: usize, i: usize, j: usize) -> f32 {
        self.raw_data[self.index_of(slice, i, j)]
    }

    /// Checked variant of [`value`](Self::value).
    #[must_use]
    pub fn try_value(&self, slice: usize, i: usize, j: usize) -> Option<f32> {
        if slice >= self.num_slices || i >= self.num_atoms || j >= self.num_atoms
        {
            return None;
        }
        self.raw_data.get(self.index_of(slice, i, j)).copied()
    }

    /// Reconstruct the full square matrix of one slice.
    ///
    /// Every off-diagonal value is read once and mirrored, so the result is
    /// exactly symmetric.
    #[must_use]
    pub fn slice_matrix(&self, slice: usize) -> SliceMatrix {
        let n = self.num_atoms;
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in i..n {
                let v = self.value(slice, i, j);
                values[i * n + j] = v;
                values[j * n + i] = v;
            }
        }
        SliceMatrix { dim: n, values }
    }
}

/// Dense row-major square matrix of one slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceMatrix {
    dim: usize,
    values: Vec<f32>,
}

impl SliceMatrix {
    /// Build a `dim x dim` matrix from a function of `(i, j)`.
    pub fn from_fn(dim: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut values = Vec::with_capacity(dim * dim);
        for i in 0..dim {
            for j in 0..dim {
                values.push(f(i, j));
            }
        }
        Self { dim, values }
    }

    /// Matrix dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Value at row `i`, column `j`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.dim + j]
    }

    /// Row `i` as a slice.
    #[must_use]
    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterate rows in order.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        self.values.chunks_exact(self.dim.max(1))
    }
}
