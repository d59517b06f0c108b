//! Generated routes and the configuration they are generated from.
use crate::error::MrtGenError;
use crate::models::*;
use chrono::Utc;
use ipnet::IpNet;
use itertools::Itertools;
use smallvec::{smallvec, SmallVec};
use std::fmt::{Display, Formatter};
use std::net::{IpAddr, Ipv4Addr};

/// Upper bound on the MPLS label stack of a route.
pub const MAX_LABELS: usize = 4;

/// One synthesized route.
///
/// Prefix and next hop carry their address family in the [IpNet]/[IpAddr] variant, so the
/// width of the encoded address bytes always matches the family.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteEntry {
    pub sequence: u32,
    /// AS numbers of the path. A zero entry terminates the path.
    pub as_path: SmallVec<[u32; MAX_AS_PATH_LEN]>,
    pub origin: Origin,
    pub prefix: IpNet,
    pub prefix_safi: Safi,
    pub next_hop: IpAddr,
    pub next_hop_safi: Safi,
    pub labels: SmallVec<[u32; MAX_LABELS]>,
    pub local_preference: Option<u32>,
}

impl RouteEntry {
    pub fn prefix_afi(&self) -> Afi {
        Afi::from(self.prefix.addr())
    }

    pub fn next_hop_afi(&self) -> Afi {
        Afi::from(self.next_hop)
    }

    /// AS numbers up to the first zero entry, at most [MAX_AS_PATH_LEN] of them.
    pub fn as_path_segment(&self) -> impl Iterator<Item = u32> + '_ {
        self.as_path
            .iter()
            .copied()
            .take_while(|asn| *asn != 0)
            .take(MAX_AS_PATH_LEN)
    }

    /// Whether the prefix has to be carried in MP_REACH_NLRI rather than plain NLRI.
    pub fn needs_mp_reach(&self) -> bool {
        !matches!((self.prefix_afi(), self.prefix_safi), (Afi::Ipv4, Safi::Unicast))
    }
}

impl Default for RouteEntry {
    fn default() -> Self {
        RouteEntry {
            sequence: 0,
            as_path: smallvec![100_000],
            origin: Origin::IGP,
            prefix: IpNet::from(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0))),
            prefix_safi: Safi::Unicast,
            next_hop: IpAddr::V4(Ipv4Addr::new(172, 16, 0, 0)),
            next_hop_safi: Safi::Unicast,
            labels: smallvec![100_000],
            local_preference: None,
        }
    }
}

impl Display for RouteEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "seq {} prefix {} nexthop {} as-path [{}] origin {}",
            self.sequence,
            self.prefix,
            self.next_hop,
            self.as_path_segment().join(" "),
            self.origin
        )?;
        if let Some(local_pref) = self.local_preference {
            write!(f, " local-pref {}", local_pref)?;
        }
        Ok(())
    }
}

/// Input of the RIB generator.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationConfig {
    /// Template every generated route is derived from.
    pub base: RouteEntry,
    /// Number of routes to generate.
    pub prefix_count: u32,
    /// Number of distinct next hops handed out before wrapping back to the base next hop.
    /// Zero disables wrapping.
    pub nexthop_pool_size: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        GenerationConfig {
            base: RouteEntry::default(),
            prefix_count: 10,
            nexthop_pool_size: 2000,
        }
    }
}

impl GenerationConfig {
    /// Checks the template before anything is generated or written.
    pub fn validate(&self) -> Result<(), MrtGenError> {
        let prefix = self.base.prefix_afi();
        let next_hop = self.base.next_hop_afi();
        if prefix != next_hop {
            return Err(MrtGenError::AddressFamilyMismatch { prefix, next_hop });
        }
        if self.base.as_path.len() > MAX_AS_PATH_LEN {
            return Err(MrtGenError::InvalidConfig(format!(
                "AS path holds {} AS numbers, at most {} are supported",
                self.base.as_path.len(),
                MAX_AS_PATH_LEN
            )));
        }
        if self.base.labels.len() > MAX_LABELS {
            return Err(MrtGenError::InvalidConfig(format!(
                "label stack holds {} labels, at most {} are supported",
                self.base.labels.len(),
                MAX_LABELS
            )));
        }
        Ok(())
    }
}

/// The single peer all generated routes are attributed to (peer index 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerDescriptor {
    pub bgp_id: Ipv4Addr,
    pub address: IpAddr,
    pub as_number: u32,
    pub collector_bgp_id: Ipv4Addr,
    /// Unix epoch seconds, used for record headers and originated times.
    pub timestamp: u32,
}

impl PeerDescriptor {
    /// Creates a peer stamped with the current time.
    ///
    /// The BGP identifier is taken from an IPv4 peer address and left at `0.0.0.0` for IPv6
    /// peers.
    pub fn new(address: IpAddr, as_number: u32) -> Self {
        let bgp_id = match address {
            IpAddr::V4(ip) => ip,
            IpAddr::V6(_ip) => Ipv4Addr::from(0),
        };
        PeerDescriptor {
            bgp_id,
            address,
            as_number,
            collector_bgp_id: bgp_id,
            timestamp: unix_timestamp(Utc::now().timestamp()),
        }
    }

    pub fn afi(&self) -> Afi {
        Afi::from(self.address)
    }
}

/// Clamps epoch seconds to the 32-bit MRT timestamp field.
fn unix_timestamp(secs: i64) -> u32 {
    u32::try_from(secs.max(0)).unwrap_or(u32::MAX)
}

impl Default for PeerDescriptor {
    fn default() -> Self {
        PeerDescriptor::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, 1)), 4_200_000_000)
    }
}
