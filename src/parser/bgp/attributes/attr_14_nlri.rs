use crate::error::ParserError;
use crate::models::*;
use crate::parser::bgp::attributes::attr_03_next_hop::parse_mp_next_hop;
use crate::parser::{parse_nlri_list, ReadUtils};
use bytes::Bytes;
use log::warn;

///
/// <https://datatracker.ietf.org/doc/html/rfc4760#section-3>
/// The attribute is encoded as shown below:
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
///
/// Unlike RFC6396 section 4.3.4, which allows a RIB dump to abbreviate this attribute to the
/// next hop alone, the full form is expected here.
pub fn parse_mp_reach_nlri(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    let afi = input.read_afi()?;
    let safi = input.read_safi()?;

    let next_hop_length = input.read_u8()? as usize;
    input.has_n_remaining(next_hop_length)?;
    let next_hop = parse_mp_next_hop(input.split_to(next_hop_length))?;
    if let Some(next_hop) = next_hop {
        if Afi::from(next_hop) != afi {
            return Err(ParserError::ParseError(format!(
                "MP_REACH_NLRI next hop {next_hop} does not match AFI {afi:?}"
            )));
        }
    }

    // reserved
    if input.read_u8()? != 0 {
        warn!("NLRI reserved byte not 0");
    }
    let prefixes = parse_nlri_list(input, &afi)?;

    Ok(AttributeValue::MpReachNlri(Nlri {
        afi,
        safi,
        next_hop,
        prefixes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipnet::IpNet;
    use std::net::IpAddr;
    use std::str::FromStr;

    #[test]
    fn test_parse_ipv6_unicast() {
        let mut data = vec![0, 2, 1, 16];
        data.extend_from_slice(&[0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        data.extend_from_slice(&[0, 32, 0x20, 0x01, 0x0d, 0xb8]);

        let nlri = match parse_mp_reach_nlri(Bytes::from(data)).unwrap() {
            AttributeValue::MpReachNlri(nlri) => nlri,
            other => panic!("unexpected attribute {:?}", other),
        };
        assert!(nlri.is_ipv6());
        assert_eq!(nlri.safi, Safi::Unicast);
        assert_eq!(nlri.next_hop, Some(IpAddr::from_str("2001:db8::1").unwrap()));
        assert_eq!(nlri.prefixes, vec![IpNet::from_str("2001:db8::/32").unwrap()]);
    }

    #[test]
    fn test_parse_without_next_hop() {
        let data = Bytes::from_static(&[0, 1, 4, 0, 0, 24, 10, 0, 0]);
        let nlri = match parse_mp_reach_nlri(data).unwrap() {
            AttributeValue::MpReachNlri(nlri) => nlri,
            other => panic!("unexpected attribute {:?}", other),
        };
        assert!(nlri.is_ipv4());
        assert_eq!(nlri.safi, Safi::LabelUnicast);
        assert_eq!(nlri.next_hop, None);
        assert_eq!(nlri.prefixes, vec![IpNet::from_str("10.0.0.0/24").unwrap()]);
    }

    #[test]
    fn test_parse_errors() {
        // IPv4 next hop under AFI 2
        let data = Bytes::from_static(&[0, 2, 1, 4, 10, 0, 0, 1, 0]);
        assert!(parse_mp_reach_nlri(data).is_err());
        // next hop runs past the end
        let data = Bytes::from_static(&[0, 1, 1, 4, 10, 0]);
        assert!(parse_mp_reach_nlri(data).is_err());
        // trailing partial prefix
        let data = Bytes::from_static(&[0, 1, 1, 0, 0, 24, 10]);
        assert!(parse_mp_reach_nlri(data).is_err());
    }
}
