//! Packed DCCM binary wire format.
//!
//! Layout (all integers little-endian):
//!
//! | Offset          | Size                    | Meaning                         |
//! |-----------------|-------------------------|---------------------------------|
//! | 0               | 4                       | `num_slices` (u32)              |
//! | 4               | 4                       | `num_atoms` (u32)               |
//! | 8               | 4                       | data type tag (u32, 1 = f32)    |
//! | 12              | `num_atoms * 4`         | residue names, NUL-padded slots |
//! | 12 + names      | `slices * n(n+1)/2 * 4` | upper-triangular f32 values     |
//!
//! Each slice stores the upper triangle of its matrix, diagonal included,
//! row by row with the row index ascending. Slices are concatenated.

mod reader;
mod writer;

use std::fmt;

pub use reader::decode;
pub use writer::{encode, write_to};

/// Size of the fixed header in bytes.
pub const HEADER_LEN: usize = 12;

/// Width of one residue name slot in bytes.
pub const NAME_SLOT_WIDTH: usize = 4;

/// Element type of the correlation payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 32-bit IEEE-754 float, little-endian.
    Float32,
}

impl DataType {
    /// Resolve a header tag. Unknown tags yield `None`.
    #[must_use]
    pub fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            1 => Some(Self::Float32),
            _ => None,
        }
    }

    /// Header tag written for this type.
    #[must_use]
    pub fn tag(self) -> u32 {
        match self {
            Self::Float32 => 1,
        }
    }
}

/// Structural problems in a DCCM payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The header names a payload type this reader does not decode.
    UnsupportedDataType(u32),
    /// The buffer ends before the header or the name table is complete.
    Truncated {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes available.
        actual: usize,
    },
    /// The float payload does not match the header-declared dimensions.
    PayloadSize {
        /// Payload bytes implied by `num_slices` and `num_atoms`.
        expected_bytes: usize,
        /// Payload bytes present after the name table.
        actual_bytes: usize,
    },
    /// Header dimensions overflow the addressable size.
    DimensionsOverflow {
        /// Declared slice count.
        num_slices: u32,
        /// Declared atom count.
        num_atoms: u32,
    },
    /// The residue name list length disagrees with `num_atoms`.
    NameCount {
        /// Declared atom count.
        expected: usize,
        /// Names supplied.
        actual: usize,
    },
    /// A residue name does not fit in its fixed-width slot.
    NameTooLong {
        /// Position of the offending name.
        index: usize,
        /// The offending name.
        name: String,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedDataType(tag) => {
                write!(f, "unsupported data type tag: {tag}")
            }
            Self::Truncated { expected, actual } => write!(
                f,
                "file truncated: need at least {expected} bytes, got {actual}"
            ),
            Self::PayloadSize {
                expected_bytes,
                actual_bytes,
            } => write!(
                f,
                "payload size mismatch: header implies {expected_bytes} \
                 bytes, found {actual_bytes}"
            ),
            Self::DimensionsOverflow {
                num_slices,
                num_atoms,
            } => write!(
                f,
                "dimensions too large: {num_slices} slices x {num_atoms} atoms"
            ),
            Self::NameCount { expected, actual } => write!(
                f,
                "expected {expected} residue names, got {actual}"
            ),
            Self::NameTooLong { index, name } => write!(
                f,
                "residue name {index} ({name:?}) exceeds \
                 {NAME_SLOT_WIDTH} bytes"
            ),
        }
    }
}

impl std::error::Error for FormatError {}

/// Number of stored values per slice: `n * (n + 1) / 2`.
#[must_use]
pub const fn triangular_size(n: usize) -> usize {
    n * (n + 1) / 2
}

/// Checked variant of `num_slices * triangular_size(num_atoms)`.
pub(crate) fn payload_len(num_slices: usize, num_atoms: usize) -> Option<usize> {
    num_atoms
        .checked_add(1)
        .and_then(|n1| n1.checked_mul(num_atoms))
        .map(|twice| twice / 2)
        .and_then(|tri| tri.checked_mul(num_slices))
}
