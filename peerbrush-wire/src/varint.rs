//! Base-128 little-endian varints.

use crate::WireError;

/// Encode `value` as a varint.
///
/// Seven bits per byte, least significant group first. Every byte except
/// the last has its high bit set. Zero encodes as a single `0x00`.
pub fn encode_varint(value: u64) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(value));
    write_varint(&mut out, value);
    out
}

/// Append the varint encoding of `value` to `out`.
pub(crate) fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    while value > 0x7f {
        out.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Number of bytes [`encode_varint`] produces for `value`.
pub fn encoded_len(value: u64) -> usize {
    let bits = (64 - value.leading_zeros()).max(1) as usize;
    bits.div_ceil(7)
}

/// Decode a varint from the front of `data`.
///
/// Returns `(value, bytes_consumed)`.
pub fn decode_varint(data: &[u8]) -> Result<(u64, usize), WireError> {
    if data.is_empty() {
        return Err(WireError::Empty);
    }

    let mut value: u64 = 0;
    for (i, &byte) in data.iter().enumerate() {
        let shift = 7 * i as u32;
        let group = u64::from(byte & 0x7f);
        // The tenth byte may only carry the single remaining bit.
        if shift >= 64 || (shift == 63 && group > 1) {
            return Err(WireError::Overflow);
        }
        value |= group << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(WireError::Truncated)
}
