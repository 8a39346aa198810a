use std::io::Write;

use super::{DataType, FormatError, HEADER_LEN, NAME_SLOT_WIDTH};
use crate::dataset::DccmDataset;

/// Encode a dataset into the packed wire format.
///
/// Names longer than a slot are rejected rather than truncated.
///
/// # Errors
///
/// [`FormatError::NameTooLong`] for a name wider than its slot.
pub fn encode(dataset: &DccmDataset) -> Result<Vec<u8>, FormatError> {
    let names = encode_names(dataset.residue_names())?;
    let mut out = Vec::with_capacity(
        HEADER_LEN + names.len() + dataset.raw_data().len() * size_of::<f32>(),
    );
    out.extend_from_slice(&(dataset.num_slices() as u32).to_le_bytes());
    out.extend_from_slice(&(dataset.num_atoms() as u32).to_le_bytes());
    out.extend_from_slice(&DataType::Float32.tag().to_le_bytes());
    out.extend_from_slice(&names);
    for value in dataset.raw_data() {
        out.extend_from_slice(&value.to_le_bytes());
    }
    Ok(out)
}

/// Encode a dataset and write it to `writer`.
///
/// # Errors
///
/// Encoding errors as in [`encode`], plus any I/O error from `writer`.
pub fn write_to(
    dataset: &DccmDataset,
    mut writer: impl Write,
) -> Result<(), crate::DccmError> {
    let bytes = encode(dataset)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

fn encode_names(names: &[String]) -> Result<Vec<u8>, FormatError> {
    let mut table = Vec::with_capacity(names.len() * NAME_SLOT_WIDTH);
    for (index, name) in names.iter().enumerate() {
        let bytes = name.as_bytes();
        if bytes.len() > NAME_SLOT_WIDTH {
            return Err(FormatError::NameTooLong {
                index,
                name: name.clone(),
            });
        }
        table.extend_from_slice(bytes);
        table.resize(table.len() + NAME_SLOT_WIDTH - bytes.len(), 0);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::decode;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn layout_matches_wire_format() {
        let ds = DccmDataset::new(
            1,
            2,
            names(&["GLY", "HISD"]),
            vec![1.0, -0.5, 1.0],
        )
        .unwrap();
        let bytes = encode(&ds).unwrap();
        assert_eq!(bytes.len(), HEADER_LEN + 2 * NAME_SLOT_WIDTH + 3 * 4);
        assert_eq!(&bytes[0..4], &1u32.to_le_bytes());
        assert_eq!(&bytes[4..8], &2u32.to_le_bytes());
        assert_eq!(&bytes[8..12], &1u32.to_le_bytes());
        assert_eq!(&bytes[12..16], b"GLY\0");
        assert_eq!(&bytes[16..20], b"HISD");
        assert_eq!(&bytes[24..28], &(-0.5f32).to_le_bytes());
    }

    #[test]
    fn reader_accepts_writer_output() {
        let ds = DccmDataset::new(
            2,
            2,
            names(&["ALA", "SER"]),
            vec![1.0, 0.25, 1.0, 1.0, -0.75, 1.0],
        )
        .unwrap();
        let decoded = decode(&encode(&ds).unwrap()).unwrap();
        assert_eq!(decoded, ds);
    }

    #[test]
    fn long_names_are_rejected() {
        let ds = DccmDataset::new(1, 1, names(&["ALAX1"]), vec![1.0]).unwrap();
        assert_eq!(
            encode(&ds),
            Err(FormatError::NameTooLong {
                index: 0,
                name: "ALAX1".to_owned(),
            })
        );
    }

    #[test]
    fn write_to_streams_bytes() {
        let ds = DccmDataset::new(1, 1, names(&["MET"]), vec![1.0]).unwrap();
        let mut sink = Vec::new();
        write_to(&ds, &mut sink).unwrap();
        assert_eq!(sink, encode(&ds).unwrap());
    }
}
