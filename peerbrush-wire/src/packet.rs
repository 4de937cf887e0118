//! The friend-add interaction packet.

use crate::field::FieldWriter;

/// Runtime command the packet is sent under.
pub const INTERACTION_PACKET_CMD: &str = "OidbSvcTrpcTcp.0x9078_1";

/// Field 1: service opcode (`0x9078`).
pub const INTERACTION_OPCODE: u64 = 36984;

/// Field 2: sub-command / version marker.
pub const INTERACTION_VERSION: u64 = 1;

/// Field 6: client platform string.
pub const PLATFORM_TAG: &str = "android 9.0.90";

/// Raw bytes of the interaction packet addressed to `peer_id`.
///
/// Field order is fixed: opcode, version, nested `{1: peer_id}`, platform.
/// Receivers compare byte-for-byte, so do not reorder.
pub fn interaction_packet_bytes(peer_id: u64) -> Vec<u8> {
    let target = FieldWriter::new().varint(1, peer_id);
    FieldWriter::new()
        .varint(1, INTERACTION_OPCODE)
        .varint(2, INTERACTION_VERSION)
        .nested(4, target)
        .string(6, PLATFORM_TAG)
        .into_bytes()
}

/// The interaction packet for `peer_id` as lowercase hex.
pub fn build_interaction_packet(peer_id: u64) -> String {
    hex::encode(interaction_packet_bytes(peer_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{encode_bytes_field, encode_string_field, encode_varint_field};

    #[test]
    fn matches_free_function_composition() {
        let mut expected = Vec::new();
        expected.extend(encode_varint_field(1, 36984));
        expected.extend(encode_varint_field(2, 1));
        expected.extend(encode_bytes_field(4, &encode_varint_field(1, 4242)));
        expected.extend(encode_string_field(6, "android 9.0.90"));
        assert_eq!(interaction_packet_bytes(4242), expected);
    }

    #[test]
    fn hex_is_lowercase() {
        let hex = build_interaction_packet(u64::MAX);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
