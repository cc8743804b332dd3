//! Variable-byte integer encoding utilities.
//!
//! Each encoded number is a sequence of 7-bit groups, most significant group
//! first. The final byte of a number carries the high terminator bit, so
//! concatenated numbers decode in a single pass without explicit length
//! information. Zero encodes to the single terminator byte `0x80`.

use byteorder::ReadBytesExt;
use std::io::{Read, Write};

use crate::error::{CaselexError, Result};

/// Maximum encoded length of a u64 (ten 7-bit groups).
const MAX_VARINT_LEN: usize = 10;

/// Encode a u64 value using variable-byte encoding.
pub fn vb_encode(value: u64) -> Vec<u8> {
    let mut bytes = Vec::new();
    vb_encode_into(value, &mut bytes);
    bytes
}

/// Encode a u64 value, appending the bytes to an existing buffer.
pub fn vb_encode_into(value: u64, buf: &mut Vec<u8>) {
    if value == 0 {
        buf.push(0x80);
        return;
    }

    let start = buf.len();
    let mut val = value;
    while val > 0 {
        buf.push((val & 0x7F) as u8);
        val >>= 7;
    }

    // The first byte pushed holds the least significant group; it becomes
    // the terminator once the groups are reversed into big-endian order.
    buf[start] |= 0x80;
    buf[start..].reverse();
}

/// Decode a concatenated stream of variable-byte encoded numbers.
///
/// Returns an error if the stream ends inside a number (no terminator byte)
/// or a single number overflows a u64.
pub fn vb_decode(bytes: &[u8]) -> Result<Vec<u64>> {
    let mut values = Vec::new();
    let mut acc = 0u64;
    let mut group_count = 0usize;

    for &byte in bytes {
        group_count += 1;
        if group_count > MAX_VARINT_LEN {
            return Err(CaselexError::corrupt("varint overflow"));
        }
        acc = (acc << 7) | (byte & 0x7F) as u64;
        if byte & 0x80 != 0 {
            values.push(acc);
            acc = 0;
            group_count = 0;
        }
    }

    if group_count != 0 {
        return Err(CaselexError::corrupt("truncated varint stream"));
    }

    Ok(values)
}

/// Write a single variable-byte encoded value to a writer.
///
/// Returns the number of bytes written.
pub fn write_vb<W: Write>(writer: &mut W, value: u64) -> Result<usize> {
    let bytes = vb_encode(value);
    writer.write_all(&bytes)?;
    Ok(bytes.len())
}

/// Read a single variable-byte encoded value from a reader.
pub fn read_vb<R: Read>(reader: &mut R) -> Result<u64> {
    let mut acc = 0u64;

    for _ in 0..MAX_VARINT_LEN {
        let byte = reader.read_u8()?;
        acc = (acc << 7) | (byte & 0x7F) as u64;
        if byte & 0x80 != 0 {
            return Ok(acc);
        }
    }

    Err(CaselexError::corrupt("varint overflow"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_zero_is_single_terminator_byte() {
        assert_eq!(vb_encode(0), vec![0x80]);
        assert_eq!(vb_decode(&[0x80]).unwrap(), vec![0]);
    }

    #[test]
    fn test_round_trip() {
        let test_values = [0, 1, 127, 128, 255, 256, 16383, 16384, 2097151, u64::MAX];

        for &value in &test_values {
            let encoded = vb_encode(value);
            assert_eq!(vb_decode(&encoded).unwrap(), vec![value]);
        }
    }

    #[test]
    fn test_concatenated_stream() {
        let values = [5u64, 0, 300, 128, 1_000_000];
        let mut bytes = Vec::new();
        for &v in &values {
            vb_encode_into(v, &mut bytes);
        }

        assert_eq!(vb_decode(&bytes).unwrap(), values.to_vec());
    }

    #[test]
    fn test_encoding_efficiency() {
        assert_eq!(vb_encode(0).len(), 1);
        assert_eq!(vb_encode(127).len(), 1);
        assert_eq!(vb_encode(128).len(), 2);
        assert_eq!(vb_encode(16383).len(), 2);
        assert_eq!(vb_encode(16384).len(), 3);
        assert!(vb_encode(u64::MAX).len() <= 10);
    }

    #[test]
    fn test_truncated_stream() {
        // Two 7-bit groups, neither carrying the terminator bit.
        assert!(vb_decode(&[0x01, 0x01]).is_err());
    }

    #[test]
    fn test_write_read() {
        let mut buffer = Vec::new();
        let written = write_vb(&mut buffer, 98765).unwrap();
        assert_eq!(written, buffer.len());

        let mut cursor = Cursor::new(buffer);
        assert_eq!(read_vb(&mut cursor).unwrap(), 98765);
    }

    #[test]
    fn test_read_stops_at_terminator() {
        let mut bytes = vb_encode(300);
        bytes.extend(vb_encode(7));

        let mut cursor = Cursor::new(bytes);
        assert_eq!(read_vb(&mut cursor).unwrap(), 300);
        assert_eq!(read_vb(&mut cursor).unwrap(), 7);
    }
}
