//! Route generation.
//!
//! A [RibGenerator] expands a single template route into `prefix_count` routes by stepping the
//! prefix through the address space one prefix-length block at a time, and cycling the next hop
//! through a pool of consecutive addresses.
mod rib;

pub use rib::*;
