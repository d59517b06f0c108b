//! Common network-related structs.

mod address;
mod afi;

pub use address::*;
pub use afi::*;
