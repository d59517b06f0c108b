use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;
use bytes::Bytes;
use std::net::IpAddr;

pub fn parse_next_hop(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    input.expect_remaining_eq(4, "NEXT_HOP")?;
    Ok(input.read_address(&Afi::Ipv4).map(AttributeValue::NextHop)?)
}

/// Next hop of an MP_REACH_NLRI attribute, identified by its length.
pub fn parse_mp_next_hop(mut input: Bytes) -> Result<Option<IpAddr>, ParserError> {
    let output = match input.len() {
        0 => None,
        4 => Some(input.read_address(&Afi::Ipv4)?),
        16 => Some(input.read_address(&Afi::Ipv6)?),
        v => {
            return Err(ParserError::ParseError(format!(
                "Invalid next hop length found: {v}"
            )));
        }
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_next_hop() {
        assert_eq!(
            parse_next_hop(Bytes::from_static(&[172, 16, 0, 1])).unwrap(),
            AttributeValue::NextHop(IpAddr::from_str("172.16.0.1").unwrap())
        );
        assert!(parse_next_hop(Bytes::from_static(&[172, 16, 0])).is_err());
    }

    #[test]
    fn test_parse_mp_next_hop() {
        assert_eq!(parse_mp_next_hop(Bytes::new()).unwrap(), None);
        assert_eq!(
            parse_mp_next_hop(Bytes::from_static(&[10, 0, 0, 1])).unwrap(),
            Some(IpAddr::from_str("10.0.0.1").unwrap())
        );
        let v6 = IpAddr::from_str("2001:db8::1").unwrap();
        let bytes = match v6 {
            IpAddr::V6(addr) => Bytes::copy_from_slice(&addr.octets()),
            IpAddr::V4(_) => unreachable!(),
        };
        assert_eq!(parse_mp_next_hop(bytes).unwrap(), Some(v6));
        assert!(parse_mp_next_hop(Bytes::from_static(&[0; 5])).is_err());
    }
}
