use crate::models::*;
use ipnet::IpNet;
use std::net::IpAddr;

/// Decoded content of an MP_REACH_NLRI attribute.
///
/// The next hop is `None` when the encoded next-hop length is zero, which is what the encoder
/// produces for AFI/SAFI pairs it has no next-hop encoding for.
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Nlri {
    pub afi: Afi,
    pub safi: Safi,
    pub next_hop: Option<IpAddr>,
    pub prefixes: Vec<IpNet>,
}

impl Nlri {
    pub fn is_ipv4(&self) -> bool {
        self.afi == Afi::Ipv4
    }

    pub fn is_ipv6(&self) -> bool {
        self.afi == Afi::Ipv6
    }
}
