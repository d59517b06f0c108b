//! Fixed-width big-endian address codec.
//!
//! Addresses are treated as unsigned integers so the generator can step through the address
//! space. Storing a value wider than the target truncates it to the low-order bytes, which makes
//! every increment wrap modulo the address width.
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

/// Interprets `bytes` as a big-endian unsigned integer, most significant byte first.
///
/// Inputs of up to 16 bytes are loaded without loss.
#[inline]
pub fn load_addr(bytes: &[u8]) -> u128 {
    bytes
        .iter()
        .fold(0u128, |acc, byte| (acc << 8) | *byte as u128)
}

/// Writes the low `out.len()` bytes of `value` into `out`, most significant byte first.
#[inline]
pub fn store_addr(mut value: u128, out: &mut [u8]) {
    for byte in out.iter_mut().rev() {
        *byte = (value & 0xff) as u8;
        value >>= 8;
    }
}

/// Copies `src` into `dst` through the integer representation.
///
/// When the widths differ, the low-order bytes of `src` end up in `dst`.
#[inline]
pub fn copy_addr(dst: &mut [u8], src: &[u8]) {
    store_addr(load_addr(src), dst)
}

/// Integer arithmetic on IP addresses.
pub trait AddressArith: Sized {
    /// The address as a big-endian integer.
    fn to_u128(&self) -> u128;

    /// Adds `step` to the address, wrapping around at the end of the address space.
    fn wrapping_add_u128(&self, step: u128) -> Self;
}

impl AddressArith for IpAddr {
    fn to_u128(&self) -> u128 {
        match self {
            IpAddr::V4(addr) => load_addr(&addr.octets()),
            IpAddr::V6(addr) => load_addr(&addr.octets()),
        }
    }

    fn wrapping_add_u128(&self, step: u128) -> Self {
        let value = self.to_u128().wrapping_add(step);
        match self {
            IpAddr::V4(_) => {
                let mut octets = [0u8; 4];
                store_addr(value, &mut octets);
                IpAddr::V4(Ipv4Addr::from(octets))
            }
            IpAddr::V6(_) => {
                let mut octets = [0u8; 16];
                store_addr(value, &mut octets);
                IpAddr::V6(Ipv6Addr::from(octets))
            }
        }
    }
}
