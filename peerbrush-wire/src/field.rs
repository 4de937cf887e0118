//! Tagged fields and the buffer they are written into.

use crate::varint::write_varint;

/// Wire kind carried in the low three bits of a field key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireKind {
    /// The value is a varint.
    Varint = 0,
    /// The value is a varint length followed by that many bytes.
    LengthDelimited = 2,
}

impl WireKind {
    /// Numeric discriminator as it appears on the wire.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Appends tagged fields to a single buffer.
///
/// ```
/// use peerbrush_wire::FieldWriter;
///
/// let bytes = FieldWriter::new().varint(1, 150).into_bytes();
/// assert_eq!(bytes, vec![0x08, 0x96, 0x01]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct FieldWriter {
    buf: Vec<u8>,
}

impl FieldWriter {
    /// Start an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(&mut self, field_number: u32, kind: WireKind) {
        write_varint(
            &mut self.buf,
            (u64::from(field_number) << 3) | u64::from(kind.as_u8()),
        );
    }

    /// Append a varint field.
    #[must_use]
    pub fn varint(mut self, field_number: u32, value: u64) -> Self {
        self.key(field_number, WireKind::Varint);
        write_varint(&mut self.buf, value);
        self
    }

    /// Append a length-delimited field.
    #[must_use]
    pub fn bytes(mut self, field_number: u32, payload: &[u8]) -> Self {
        self.key(field_number, WireKind::LengthDelimited);
        write_varint(&mut self.buf, payload.len() as u64);
        self.buf.extend_from_slice(payload);
        self
    }

    /// Append a UTF-8 string as a length-delimited field.
    #[must_use]
    pub fn string(self, field_number: u32, text: &str) -> Self {
        self.bytes(field_number, text.as_bytes())
    }

    /// Append an already-encoded message as a length-delimited field.
    #[must_use]
    pub fn nested(self, field_number: u32, inner: FieldWriter) -> Self {
        self.bytes(field_number, &inner.buf)
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Finish and take the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Encode one field.
///
/// For [`WireKind::Varint`], `payload` must already be a varint (as
/// produced by [`crate::encode_varint`]) and is written after the key as
/// is. For [`WireKind::LengthDelimited`], `payload` is prefixed with its
/// varint length.
pub fn encode_field(field_number: u32, kind: WireKind, payload: &[u8]) -> Vec<u8> {
    let mut w = FieldWriter::new();
    w.key(field_number, kind);
    if kind == WireKind::LengthDelimited {
        write_varint(&mut w.buf, payload.len() as u64);
    }
    w.buf.extend_from_slice(payload);
    w.into_bytes()
}

/// Encode a varint field.
pub fn encode_varint_field(field_number: u32, value: u64) -> Vec<u8> {
    FieldWriter::new().varint(field_number, value).into_bytes()
}

/// Encode a length-delimited bytes field.
pub fn encode_bytes_field(field_number: u32, payload: &[u8]) -> Vec<u8> {
    FieldWriter::new().bytes(field_number, payload).into_bytes()
}

/// Encode a string field as its UTF-8 bytes.
pub fn encode_string_field(field_number: u32, text: &str) -> Vec<u8> {
    FieldWriter::new().string(field_number, text).into_bytes()
}
