#![deny(missing_docs)]
//! Tagged binary field encoder for interaction packets.
//!
//! Fields are laid out protobuf-style: a varint key holding
//! `(field_number << 3) | wire_kind`, then either a varint value or a
//! varint length followed by raw bytes. Only the two wire kinds the
//! interaction packet needs are supported.
//!
//! Everything here is pure. Encoding cannot fail; decoding exists to
//! inspect encoded output and reports malformed input as [`WireError`].

mod field;
mod packet;
mod varint;

pub use field::{
    FieldWriter, WireKind, encode_bytes_field, encode_field, encode_string_field,
    encode_varint_field,
};
pub use packet::{
    INTERACTION_OPCODE, INTERACTION_PACKET_CMD, INTERACTION_VERSION, PLATFORM_TAG,
    build_interaction_packet, interaction_packet_bytes,
};
pub use varint::{decode_varint, encode_varint, encoded_len};

use thiserror::Error;

/// Errors from decoding wire data.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// No bytes to decode.
    #[error("empty input")]
    Empty,

    /// Input ended while the continuation bit was still set.
    #[error("truncated varint")]
    Truncated,

    /// The value does not fit in 64 bits.
    #[error("varint overflows u64")]
    Overflow,
}
