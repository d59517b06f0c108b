/*!
Provides IO utility functions for read bytes of different length and converting to corresponding structs.
*/
use crate::error::ParserError;
use crate::error::ParserError::IoNotEnoughBytes;
use crate::models::*;
use bytes::{Buf, Bytes};
use ipnet::IpNet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

impl ReadUtils for Bytes {}
impl ReadUtils for &[u8] {}

// Allow reading IPs from Reads
pub trait ReadUtils: Buf {
    #[inline]
    fn has_n_remaining(&self, n: usize) -> Result<(), ParserError> {
        if self.remaining() < n {
            Err(IoNotEnoughBytes())
        } else {
            Ok(())
        }
    }

    /// Checks that exactly `n` bytes are left, as required for fixed-size attribute content.
    #[inline]
    fn expect_remaining_eq(&self, n: usize, target: &'static str) -> Result<(), ParserError> {
        match self.remaining() {
            x if x == n => Ok(()),
            x => Err(ParserError::ParseError(format!(
                "{target} expects {n} bytes, {x} found"
            ))),
        }
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8, ParserError> {
        self.has_n_remaining(1)?;
        Ok(self.get_u8())
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16, ParserError> {
        self.has_n_remaining(2)?;
        Ok(self.get_u16())
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, ParserError> {
        self.has_n_remaining(4)?;
        Ok(self.get_u32())
    }

    fn read_n_bytes(&mut self, n: usize) -> Result<Vec<u8>, ParserError> {
        self.has_n_remaining(n)?;
        let mut buffer = vec![0; n];
        self.copy_to_slice(&mut buffer);
        Ok(buffer)
    }

    fn read_address(&mut self, afi: &Afi) -> Result<IpAddr, ParserError> {
        match afi {
            Afi::Ipv4 => self.read_ipv4_address().map(IpAddr::V4),
            Afi::Ipv6 => self.read_ipv6_address().map(IpAddr::V6),
        }
    }

    fn read_ipv4_address(&mut self) -> Result<Ipv4Addr, ParserError> {
        let addr = self.read_u32()?;
        Ok(Ipv4Addr::from(addr))
    }

    fn read_ipv6_address(&mut self) -> Result<Ipv6Addr, ParserError> {
        self.has_n_remaining(16)?;
        let buf = self.get_u128();
        Ok(Ipv6Addr::from(buf))
    }

    fn read_afi(&mut self) -> Result<Afi, ParserError> {
        Afi::try_from(self.read_u16()?).map_err(ParserError::from)
    }

    fn read_safi(&mut self) -> Result<Safi, ParserError> {
        Safi::try_from(self.read_u8()?).map_err(ParserError::from)
    }

    /// Read a packed NLRI prefix.
    ///
    /// The length in bits is 1 byte, followed by the minimal number of bytes holding that many
    /// bits of the address.
    fn read_nlri_prefix(&mut self, afi: &Afi) -> Result<IpNet, ParserError> {
        // Length in bits
        let bit_len = self.read_u8()?;
        if bit_len > afi.address_bits() {
            return Err(ParserError::ParseError(format!(
                "Invalid network prefix length {} for {:?}",
                bit_len, afi
            )));
        }

        // Convert to bytes
        let byte_len = (bit_len as usize).div_ceil(8);
        self.has_n_remaining(byte_len)?;
        let addr = match afi {
            Afi::Ipv4 => {
                let mut buff = [0; 4];
                self.copy_to_slice(&mut buff[..byte_len]);
                IpAddr::V4(Ipv4Addr::from(buff))
            }
            Afi::Ipv6 => {
                let mut buff = [0; 16];
                self.copy_to_slice(&mut buff[..byte_len]);
                IpAddr::V6(Ipv6Addr::from(buff))
            }
        };

        IpNet::new(addr, bit_len).map_err(|_| {
            ParserError::ParseError(format!("Invalid network prefix length: {}", bit_len))
        })
    }
}

/// Parse a list of packed NLRI prefixes filling the whole input.
pub fn parse_nlri_list(mut input: Bytes, afi: &Afi) -> Result<Vec<IpNet>, ParserError> {
    let mut prefixes = vec![];
    while input.remaining() > 0 {
        prefixes.push(input.read_nlri_prefix(afi)?);
    }
    Ok(prefixes)
}
