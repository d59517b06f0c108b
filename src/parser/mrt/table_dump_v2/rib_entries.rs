use crate::error::ParserError;
use crate::models::{Afi, RibEntries, RibEntry, Safi, TableDumpV2Type};
use crate::parser::bgp::parse_attributes;
use crate::parser::ReadUtils;
use bytes::Bytes;
use log::warn;

fn extract_afi_safi_from_rib_type(rib_type: &TableDumpV2Type) -> Result<(Afi, Safi), ParserError> {
    let (afi, safi) = match rib_type {
        TableDumpV2Type::RibIpv4Unicast => (Afi::Ipv4, Safi::Unicast),
        TableDumpV2Type::RibIpv4Multicast => (Afi::Ipv4, Safi::Multicast),
        TableDumpV2Type::RibIpv6Unicast => (Afi::Ipv6, Safi::Unicast),
        TableDumpV2Type::RibIpv6Multicast => (Afi::Ipv6, Safi::Multicast),
        _ => {
            return Err(ParserError::ParseError(format!(
                "wrong RIB type for parsing: {:?}",
                rib_type
            )))
        }
    };
    Ok((afi, safi))
}

/// RIB AFI/SAFI-specific entries and RIB_GENERIC entries.
///
/// RIB_GENERIC carries AFI and SAFI between the sequence number and the prefix; the other
/// subtypes imply them.
///
/// https://tools.ietf.org/html/rfc6396#section-4.3
pub fn parse_rib_entries(
    data: &mut Bytes,
    rib_type: TableDumpV2Type,
) -> Result<RibEntries, ParserError> {
    let sequence_number = data.read_u32()?;
    let (afi, safi) = match rib_type {
        TableDumpV2Type::RibGeneric => (data.read_afi()?, data.read_safi()?),
        _ => extract_afi_safi_from_rib_type(&rib_type)?,
    };

    let prefix = data.read_nlri_prefix(&afi)?;

    let entry_count = data.read_u16()?;
    let mut rib_entries = Vec::with_capacity(entry_count as usize);
    for _i in 0..entry_count {
        rib_entries.push(parse_rib_entry(data)?);
    }

    if !data.is_empty() {
        warn!("{} bytes left after RIB entries", data.len());
        return Err(ParserError::ParseError(format!(
            "{} trailing bytes after RIB entries",
            data.len()
        )));
    }

    Ok(RibEntries {
        rib_type,
        sequence_number,
        afi,
        safi,
        prefix,
        rib_entries,
    })
}

/// RIB entry: one prefix per entry
///
/// https://datatracker.ietf.org/doc/html/rfc6396#section-4.3.4
pub fn parse_rib_entry(input: &mut Bytes) -> Result<RibEntry, ParserError> {
    let peer_index = input.read_u16()?;
    let originated_time = input.read_u32()?;
    let attribute_length = input.read_u16()? as usize;

    input.has_n_remaining(attribute_length)?;
    let attr_data_slice = input.split_to(attribute_length);
    let attributes = parse_attributes(attr_data_slice)?;

    Ok(RibEntry {
        peer_index,
        originated_time,
        attributes,
    })
}
