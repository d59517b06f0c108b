//! BGP path attribute structs.

pub mod attributes;

pub use attributes::*;
