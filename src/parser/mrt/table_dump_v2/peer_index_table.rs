use crate::error::ParserError;
use crate::models::{Afi, Peer, PeerIndexTable, PeerType};
use crate::parser::ReadUtils;
use bytes::Bytes;
use std::net::Ipv4Addr;

/// Parses a byte slice into a [PeerIndexTable].
///
/// RFC: https://www.rfc-editor.org/rfc/rfc6396#section-4.3.1
pub fn parse_peer_index_table(data: &mut Bytes) -> Result<PeerIndexTable, ParserError> {
    let collector_bgp_id = Ipv4Addr::from(data.read_u32()?);
    let view_name_length = data.read_u16()?;
    let view_name = String::from_utf8(data.read_n_bytes(view_name_length as usize)?)
        .map_err(|e| ParserError::ParseError(format!("invalid view name: {e}")))?;

    let peer_count = data.read_u16()?;
    let mut peers = Vec::with_capacity(peer_count as usize);
    for _index in 0..peer_count {
        let peer_type = PeerType::from_bits_retain(data.read_u8()?);
        let afi = match peer_type.contains(PeerType::ADDRESS_FAMILY_IPV6) {
            true => Afi::Ipv6,
            false => Afi::Ipv4,
        };

        let peer_bgp_id = Ipv4Addr::from(data.read_u32()?);
        let peer_address = data.read_address(&afi)?;
        let peer_asn = match peer_type.contains(PeerType::AS_SIZE_32BIT) {
            true => data.read_u32()?,
            false => data.read_u16()? as u32,
        };
        peers.push(Peer {
            peer_type,
            peer_bgp_id,
            peer_address,
            peer_asn,
        })
    }

    Ok(PeerIndexTable {
        collector_bgp_id,
        view_name,
        peers,
    })
}
