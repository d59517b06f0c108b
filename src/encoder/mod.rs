//! MRT encoder module
//!
//! Encoding is streamed: fields go straight into a bounded [ByteSink], length fields are patched
//! in place once their content is known, and completed records are flushed to the output as the
//! sink fills up.
mod attributes;
mod byte_sink;
mod rib_encoder;

pub use attributes::*;
pub use byte_sink::*;
pub use rib_encoder::*;
