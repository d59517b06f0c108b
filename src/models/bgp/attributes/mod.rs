//! BGP attribute structs
mod nlri;
mod origin;

use bitflags::bitflags;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::net::IpAddr;

pub use nlri::*;
pub use origin::*;

bitflags! {
    /// Attribute Flags octet.
    ///
    /// The high-order bit is the Optional bit, followed by the Transitive, Partial and Extended
    /// Length bits. The generator always writes an empty flag set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct AttrFlags: u8 {
        const OPTIONAL = 0b10000000;
        const TRANSITIVE = 0b01000000;
        const PARTIAL = 0b00100000;
        const EXTENDED = 0b00010000;
    }
}

/// Attribute types produced by the generator.
///
/// The full list lives at IANA:
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-2>
#[allow(non_camel_case_types)]
#[derive(Debug, TryFromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AttrType {
    ORIGIN = 1,
    AS_PATH = 2,
    NEXT_HOP = 3,
    MULTI_EXIT_DISCRIMINATOR = 4,
    LOCAL_PREFERENCE = 5,
    ATOMIC_AGGREGATE = 6,
    AGGREGATOR = 7,
    COMMUNITIES = 8,
    /// <https://tools.ietf.org/html/rfc4760>
    MP_REACHABLE_NLRI = 14,
    MP_UNREACHABLE_NLRI = 15,
    EXTENDED_COMMUNITIES = 16,
    LARGE_COMMUNITIES = 32,
}

/// AS_PATH segment types.
///
/// <https://datatracker.ietf.org/doc/html/rfc4271#section-4.3>
#[derive(Debug, TryFromPrimitive, IntoPrimitive, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum AsPathSegmentType {
    AsSet = 1,
    AsSequence = 2,
}

/// Upper bound on AS numbers carried by a generated AS_PATH.
pub const MAX_AS_PATH_LEN: usize = 8;

/// BGP Attribute struct with attribute value and flag
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub attr_type: u8,
    pub value: AttributeValue,
    pub flag: AttrFlags,
}

/// The `AttributeValue` enum represents different kinds of Attribute values.
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    Origin(Origin),
    /// AS numbers of a single AS_SEQUENCE segment.
    AsPath(Vec<u32>),
    NextHop(IpAddr),
    LocalPreference(u32),
    MpReachNlri(Nlri),
    Unknown(Vec<u8>),
}

impl Attribute {
    pub fn attr_type(&self) -> Option<AttrType> {
        AttrType::try_from(self.attr_type).ok()
    }
}
