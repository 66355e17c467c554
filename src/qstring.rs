use std::io::{Read, Seek};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::constants::QSTRING_NULL_LENGTH;
use crate::error::{Result, RhsError};

/// Reads a Qt-style QString.
///
/// A `u32` byte count precedes the UTF-16 code units. `0xFFFFFFFF` marks a
/// null string, returned as empty. `stream_len` is the total length of the
/// stream and bounds the declared length.
pub(crate) fn read_qstring<R: Read + Seek>(reader: &mut R, stream_len: u64) -> Result<String> {
    let length = reader.read_u32::<LittleEndian>()?;
    if length == QSTRING_NULL_LENGTH {
        return Ok(String::new());
    }

    let remaining = stream_len.saturating_sub(reader.stream_position()?);
    if u64::from(length) > remaining + 1 || length % 2 != 0 {
        return Err(RhsError::CorruptString {
            declared: length,
            remaining,
        });
    }

    let mut units = vec![0u16; length as usize / 2];
    reader.read_u16_into::<LittleEndian>(&mut units)?;

    Ok(char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}
