//! BGP path attribute encoding.
//!
//! Every attribute is written as a TLV with a one-byte flags field, a one-byte type code and a
//! one-byte length. The length is written as zero first and patched once the content is in the
//! buffer. Flags are always zero.
use crate::encoder::ByteSink;
use crate::error::MrtGenError;
use crate::models::*;
use ipnet::IpNet;
use std::io::Write;
use std::net::IpAddr;

/// Encodes the path attributes of `entry` in the order ORIGIN, AS_PATH, NEXT_HOP, LOCAL_PREF,
/// MP_REACH_NLRI.
///
/// - NEXT_HOP is written for IPv4 next hops only.
/// - LOCAL_PREF is written when the route carries a non-zero local preference.
/// - MP_REACH_NLRI is written for every prefix that is not IPv4 unicast.
///
/// A next hop of another address family than the prefix is rejected before anything is written.
pub fn encode_attributes<W: Write>(
    entry: &RouteEntry,
    sink: &mut ByteSink<W>,
) -> Result<(), MrtGenError> {
    check_families(entry)?;

    encode_origin(entry.origin, sink)?;
    encode_as_path(entry, sink)?;

    if let IpAddr::V4(_) = entry.next_hop {
        encode_next_hop(&entry.next_hop, sink)?;
    }

    if let Some(local_pref) = entry.local_preference.filter(|v| *v != 0) {
        encode_local_pref(local_pref, sink)?;
    }

    if entry.needs_mp_reach() {
        encode_mp_reach_nlri(entry, sink)?;
    }

    Ok(())
}

/// Writes one attribute TLV, with `content` producing the value bytes.
fn encode_attribute<W, F>(
    attr_type: AttrType,
    sink: &mut ByteSink<W>,
    content: F,
) -> Result<(), MrtGenError>
where
    W: Write,
    F: FnOnce(&mut ByteSink<W>) -> Result<(), MrtGenError>,
{
    sink.push_u8(AttrFlags::empty().bits())?;
    sink.push_u8(attr_type.into())?;
    let length_offset = sink.position();
    sink.push_u8(0)?;

    let content_start = sink.position();
    content(sink)?;
    let length = sink.position() - content_start;
    if length > u8::MAX as usize {
        return Err(MrtGenError::AttributeTooLong {
            attr_type: attr_type.into(),
            length,
        });
    }
    sink.backpatch(length_offset, 1, length as u64)
}

pub fn encode_origin<W: Write>(origin: Origin, sink: &mut ByteSink<W>) -> Result<(), MrtGenError> {
    encode_attribute(AttrType::ORIGIN, sink, |sink| sink.push_u8(origin.into()))
}

/// A single AS_SEQUENCE segment with four-byte AS numbers, written even when empty.
pub fn encode_as_path<W: Write>(
    entry: &RouteEntry,
    sink: &mut ByteSink<W>,
) -> Result<(), MrtGenError> {
    encode_attribute(AttrType::AS_PATH, sink, |sink| {
        sink.push_u8(AsPathSegmentType::AsSequence.into())?;
        let count_offset = sink.position();
        sink.push_u8(0)?;
        let mut count = 0u64;
        for asn in entry.as_path_segment() {
            sink.push_u32(asn)?;
            count += 1;
        }
        sink.backpatch(count_offset, 1, count)
    })
}

pub fn encode_next_hop<W: Write>(
    next_hop: &IpAddr,
    sink: &mut ByteSink<W>,
) -> Result<(), MrtGenError> {
    encode_attribute(AttrType::NEXT_HOP, sink, |sink| push_address(next_hop, sink))
}

pub fn encode_local_pref<W: Write>(
    local_pref: u32,
    sink: &mut ByteSink<W>,
) -> Result<(), MrtGenError> {
    encode_attribute(AttrType::LOCAL_PREFERENCE, sink, |sink| {
        sink.push_u32(local_pref)
    })
}

/// MP_REACH_NLRI for the route's own prefix.
///
/// ```text
/// +---------------------------------------------------------+
/// | Address Family Identifier (2 octets)                    |
/// +---------------------------------------------------------+
/// | Subsequent Address Family Identifier (1 octet)          |
/// +---------------------------------------------------------+
/// | Length of Next Hop Network Address (1 octet)            |
/// +---------------------------------------------------------+
/// | Network Address of Next Hop (variable)                  |
/// +---------------------------------------------------------+
/// | Reserved (1 octet)                                      |
/// +---------------------------------------------------------+
/// | Network Layer Reachability Information (variable)       |
/// +---------------------------------------------------------+
/// ```
///
/// The next hop is only carried for IPv4 and IPv6 unicast; other AFI/SAFI pairs get a zero
/// next-hop length.
pub fn encode_mp_reach_nlri<W: Write>(
    entry: &RouteEntry,
    sink: &mut ByteSink<W>,
) -> Result<(), MrtGenError> {
    let afi = check_families(entry)?;

    encode_attribute(AttrType::MP_REACHABLE_NLRI, sink, |sink| {
        sink.push_u16(afi.into())?;
        sink.push_u8(entry.prefix_safi.into())?;
        match entry.prefix_safi {
            Safi::Unicast => {
                sink.push_u8(afi.address_len() as u8)?;
                push_address(&entry.next_hop, sink)?;
            }
            _ => sink.push_u8(0)?,
        }
        // reserved
        sink.push_u8(0)?;
        encode_nlri_prefix(&entry.prefix, sink)
    })
}

/// Returns the address family shared by prefix and next hop.
fn check_families(entry: &RouteEntry) -> Result<Afi, MrtGenError> {
    let prefix = entry.prefix_afi();
    let next_hop = entry.next_hop_afi();
    if prefix != next_hop {
        return Err(MrtGenError::AddressFamilyMismatch { prefix, next_hop });
    }
    Ok(prefix)
}

/// Packed NLRI: prefix length in bits followed by the minimal number of prefix bytes.
pub fn encode_nlri_prefix<W: Write>(
    prefix: &IpNet,
    sink: &mut ByteSink<W>,
) -> Result<(), MrtGenError> {
    let prefix_len = prefix.prefix_len();
    let byte_len = (prefix_len as usize).div_ceil(8);
    sink.push_u8(prefix_len)?;
    match prefix.addr() {
        IpAddr::V4(addr) => sink.push_bytes(&addr.octets()[..byte_len]),
        IpAddr::V6(addr) => sink.push_bytes(&addr.octets()[..byte_len]),
    }
}

/// Full-width address bytes.
pub fn push_address<W: Write>(addr: &IpAddr, sink: &mut ByteSink<W>) -> Result<(), MrtGenError> {
    match addr {
        IpAddr::V4(addr) => sink.push_bytes(&addr.octets()),
        IpAddr::V6(addr) => sink.push_bytes(&addr.octets()),
    }
}
