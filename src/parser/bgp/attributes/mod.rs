mod attr_01_origin;
mod attr_02_as_path;
mod attr_03_next_hop;
mod attr_05_local_pref;
mod attr_14_nlri;

use bytes::{Buf, Bytes};
use log::debug;

use crate::error::ParserError;
use crate::models::*;
use crate::parser::bgp::attributes::attr_01_origin::parse_origin;
use crate::parser::bgp::attributes::attr_02_as_path::parse_as_path;
use crate::parser::bgp::attributes::attr_03_next_hop::parse_next_hop;
use crate::parser::bgp::attributes::attr_05_local_pref::parse_local_pref;
use crate::parser::bgp::attributes::attr_14_nlri::parse_mp_reach_nlri;
use crate::parser::ReadUtils;

/// Parse BGP attributes given the attribute block of a RIB entry.
///
/// The `data` contains the entirety of the attributes bytes, so every byte must belong to an
/// attribute whose length field covers it exactly. Attribute types without a dedicated parser
/// are kept as raw bytes.
pub fn parse_attributes(mut data: Bytes) -> Result<Vec<Attribute>, ParserError> {
    let mut attributes: Vec<Attribute> = Vec::with_capacity(5);

    while data.remaining() > 0 {
        let flag = AttrFlags::from_bits_retain(data.read_u8()?);
        let attr_type = data.read_u8()?;
        let attr_length = match flag.contains(AttrFlags::EXTENDED) {
            false => data.read_u8()? as usize,
            true => data.read_u16()? as usize,
        };

        debug!(
            "reading attribute: type -- {:?}, length -- {}",
            &attr_type, attr_length
        );

        // we know data has enough bytes to read, so we can split the bytes into a new Bytes object
        data.has_n_remaining(attr_length)?;
        let attr_data = data.split_to(attr_length);

        let value = match AttrType::try_from(attr_type) {
            Ok(AttrType::ORIGIN) => parse_origin(attr_data),
            Ok(AttrType::AS_PATH) => parse_as_path(attr_data),
            Ok(AttrType::NEXT_HOP) => parse_next_hop(attr_data),
            Ok(AttrType::LOCAL_PREFERENCE) => parse_local_pref(attr_data),
            Ok(AttrType::MP_REACHABLE_NLRI) => parse_mp_reach_nlri(attr_data),
            _ => Ok(AttributeValue::Unknown(attr_data.to_vec())),
        }?;

        attributes.push(Attribute {
            attr_type,
            value,
            flag,
        });
    }

    Ok(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;
    use std::str::FromStr;

    #[test]
    fn test_parse_attributes() {
        let data = Bytes::from_static(&[
            0, 1, 1, 0, // ORIGIN
            0, 2, 6, 2, 1, 0, 1, 0x86, 0xa0, // AS_PATH
            0, 3, 4, 172, 16, 0, 0, // NEXT_HOP
            0, 5, 4, 0, 0, 0, 100, // LOCAL_PREF
        ]);
        let attributes = parse_attributes(data).unwrap();
        assert_eq!(attributes.len(), 4);
        assert_eq!(attributes[0].value, AttributeValue::Origin(Origin::IGP));
        assert_eq!(attributes[1].value, AttributeValue::AsPath(vec![100000]));
        assert_eq!(
            attributes[2].value,
            AttributeValue::NextHop(IpAddr::from_str("172.16.0.0").unwrap())
        );
        assert_eq!(attributes[3].value, AttributeValue::LocalPreference(100));
        assert!(attributes.iter().all(|a| a.flag.is_empty()));
        assert_eq!(attributes[3].attr_type(), Some(AttrType::LOCAL_PREFERENCE));
    }

    #[test]
    fn test_parse_unknown_attribute() {
        let data = Bytes::from_static(&[0xc0, 99, 2, 0xab, 0xcd]);
        let attributes = parse_attributes(data).unwrap();
        assert_eq!(attributes[0].attr_type, 99);
        assert_eq!(attributes[0].attr_type(), None);
        assert_eq!(attributes[0].value, AttributeValue::Unknown(vec![0xab, 0xcd]));
        assert_eq!(attributes[0].flag, AttrFlags::OPTIONAL | AttrFlags::TRANSITIVE);
    }

    #[test]
    fn test_parse_extended_length() {
        let data = Bytes::from_static(&[0x10, 1, 0, 1, 2]);
        let attributes = parse_attributes(data).unwrap();
        assert_eq!(attributes[0].value, AttributeValue::Origin(Origin::INCOMPLETE));
    }

    #[test]
    fn test_length_mismatch() {
        // length byte claims 2 bytes of ORIGIN content
        assert!(parse_attributes(Bytes::from_static(&[0, 1, 2, 0, 0])).is_err());
        // length byte runs past the block
        assert!(parse_attributes(Bytes::from_static(&[0, 1, 4, 0])).is_err());
        // trailing half attribute header
        assert!(parse_attributes(Bytes::from_static(&[0, 1, 1, 0, 0])).is_err());
    }
}
