use super::{payload_len, DataType, FormatError, HEADER_LEN, NAME_SLOT_WIDTH};
use crate::dataset::DccmDataset;

/// Decode a complete in-memory DCCM file.
///
/// Nothing is returned unless the header, the name table and the payload
/// are all consistent.
///
/// # Errors
///
/// Returns [`FormatError`] for an unknown type tag, a truncated header or
/// name table, or a payload whose size disagrees with the header.
pub fn decode(bytes: &[u8]) -> Result<DccmDataset, FormatError> {
    if bytes.len() < HEADER_LEN {
        return Err(FormatError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }

    let num_slices = read_u32(bytes, 0);
    let num_atoms = read_u32(bytes, 4);
    let tag = read_u32(bytes, 8);

    let Some(DataType::Float32) = DataType::from_tag(tag) else {
        return Err(FormatError::UnsupportedDataType(tag));
    };

    let overflow = FormatError::DimensionsOverflow {
        num_slices,
        num_atoms,
    };
    let atoms = num_atoms as usize;
    let names_end = atoms
        .checked_mul(NAME_SLOT_WIDTH)
        .and_then(|len| len.checked_add(HEADER_LEN))
        .ok_or_else(|| overflow.clone())?;
    if bytes.len() < names_end {
        return Err(FormatError::Truncated {
            expected: names_end,
            actual: bytes.len(),
        });
    }

    let residue_names = bytes[HEADER_LEN..names_end]
        .chunks_exact(NAME_SLOT_WIDTH)
        .map(decode_name)
        .collect();

    let expected_values =
        payload_len(num_slices as usize, atoms).ok_or_else(|| overflow.clone())?;
    let expected_bytes = expected_values
        .checked_mul(size_of::<f32>())
        .ok_or(overflow)?;
    let payload = &bytes[names_end..];
    if payload.len() != expected_bytes {
        return Err(FormatError::PayloadSize {
            expected_bytes,
            actual_bytes: payload.len(),
        });
    }

    DccmDataset::new(
        num_slices as usize,
        atoms,
        residue_names,
        decode_f32_payload(payload),
    )
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Decode one fixed-width name slot, dropping NUL padding and whitespace.
fn decode_name(slot: &[u8]) -> String {
    String::from_utf8_lossy(slot)
        .trim_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_owned()
}

#[cfg(target_endian = "little")]
fn decode_f32_payload(payload: &[u8]) -> Vec<f32> {
    // Payload offsets are 4-byte multiples but the buffer base need not be
    // aligned, so collect rather than cast in place.
    bytemuck::allocation::pod_collect_to_vec(payload)
}

#[cfg(target_endian = "big")]
fn decode_f32_payload(payload: &[u8]) -> Vec<f32> {
    payload
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hand-assembled file, independent of the writer.
    fn raw_file(
        num_slices: u32,
        num_atoms: u32,
        tag: u32,
        names: &[&[u8; 4]],
        values: &[f32],
    ) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&num_slices.to_le_bytes());
        out.extend_from_slice(&num_atoms.to_le_bytes());
        out.extend_from_slice(&tag.to_le_bytes());
        for name in names {
            out.extend_from_slice(&name[..]);
        }
        for v in values {
            out.extend_from_slice(&v.to_le_bytes());
        }
        out
    }

    #[test]
    fn decodes_three_atom_fixture() {
        let bytes = raw_file(
            1,
            3,
            1,
            &[b"ALA\0", b"GLY\0", b"LYS\0"],
            &[1.0, 0.0, -1.0, 0.5, 0.2, 1.0],
        );
        let ds = decode(&bytes).unwrap();
        assert_eq!(ds.num_slices(), 1);
        assert_eq!(ds.num_atoms(), 3);
        assert_eq!(ds.residue_names(), ["ALA", "GLY", "LYS"]);
        assert_eq!(ds.raw_data(), [1.0, 0.0, -1.0, 0.5, 0.2, 1.0]);
    }

    #[test]
    fn decodes_from_unaligned_buffer() {
        let bytes = raw_file(1, 1, 1, &[b"CYS\0"], &[0.75]);
        let mut shifted = vec![0u8];
        shifted.extend_from_slice(&bytes);
        let ds = decode(&shifted[1..]).unwrap();
        assert_eq!(ds.raw_data(), [0.75]);
    }

    #[test]
    fn full_width_names_survive() {
        let bytes = raw_file(1, 2, 1, &[b"HISD", b"\0\0\0\0"], &[1.0, 0.1, 1.0]);
        let ds = decode(&bytes).unwrap();
        assert_eq!(ds.residue_names(), ["HISD", ""]);
    }

    #[test]
    fn rejects_unknown_type_tag() {
        let bytes = raw_file(1, 1, 2, &[b"ALA\0"], &[1.0]);
        assert_eq!(decode(&bytes), Err(FormatError::UnsupportedDataType(2)));
    }

    #[test]
    fn rejects_short_payload() {
        let bytes = raw_file(2, 2, 1, &[b"ALA\0", b"GLY\0"], &[1.0, 0.3, 1.0]);
        assert_eq!(
            decode(&bytes),
            Err(FormatError::PayloadSize {
                expected_bytes: 24,
                actual_bytes: 12,
            })
        );
    }

    #[test]
    fn rejects_trailing_bytes() {
        let mut bytes = raw_file(1, 1, 1, &[b"ALA\0"], &[1.0]);
        bytes.push(0);
        assert!(matches!(
            decode(&bytes),
            Err(FormatError::PayloadSize { .. })
        ));
    }

    #[test]
    fn rejects_truncated_header_and_names() {
        assert_eq!(
            decode(&[0, 0, 0]),
            Err(FormatError::Truncated {
                expected: HEADER_LEN,
                actual: 3,
            })
        );
        let bytes = raw_file(1, 4, 1, &[b"ALA\0"], &[]);
        assert!(matches!(decode(&bytes), Err(FormatError::Truncated { .. })));
    }
}
