/*!
error module defines the error types used in mrtgen.
*/
use crate::models::Afi;
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};
use std::io;
use thiserror::Error;

/// Errors raised while generating routes or encoding them to MRT.
///
/// Write-side conditions that can be retried (would-block, transient OS errors) and a closed
/// downstream peer are not errors; they are reported through
/// [FlushOutcome](crate::encoder::FlushOutcome).
#[derive(Debug, Error)]
pub enum MrtGenError {
    /// The write buffer cannot take a field even after flushing.
    ///
    /// ## Occurs during:
    ///  - Encoding of an MRT record; the record being encoded is dropped
    #[error("write buffer overflow: {needed} bytes needed, {available} available")]
    BufferOverflow { needed: usize, available: usize },
    /// A big-endian field must be between one and eight bytes wide.
    #[error("invalid field width {0}, must be 1..=8")]
    InvalidFieldWidth(usize),
    /// A backpatch targets bytes that already left the buffer.
    #[error("backpatch at offset {offset} is outside the buffered window")]
    InvalidBackpatch { offset: usize },
    /// A single attribute does not fit a one-byte length field.
    #[error("attribute type {attr_type} content of {length} bytes exceeds 255 bytes")]
    AttributeTooLong { attr_type: u8, length: usize },
    /// Prefix and next hop belong to different address families.
    ///
    /// ## Occurs during:
    ///  - Validation of the generation template
    ///  - Encoding of MP_REACH_NLRI
    #[error("prefix family {prefix:?} does not match next-hop family {next_hop:?}")]
    AddressFamilyMismatch { prefix: Afi, next_hop: Afi },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Bytes were still pending after the final flush retries.
    #[error("{pending} bytes could not be flushed")]
    FlushIncomplete { pending: usize },
    /// Opening or writing the output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Errors raised while reading MRT records back.
#[derive(Debug, Error)]
pub enum ParserError {
    /// This error represents a [num_enum::TryFromPrimitiveError] error for any of a number of
    /// different types.
    ///
    /// ## Occurs during:
    ///  - Parsing of an MRT message header or body
    #[error("unrecognized value {value} for {type_name}")]
    UnrecognizedEnumVariant { type_name: &'static str, value: u64 },
    /// A general IO error triggered by the internal reader.
    ///
    /// ## Occurs during:
    ///  - Reading of an MRT record header
    ///  - Buffering of an MRT record body before parsing
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error("not enough bytes to read")]
    IoNotEnoughBytes(),
    /// Clean end of input between two records.
    #[error("end of file")]
    EofExpected,
    #[error("unsupported MRT type {mrt_type} subtype {subtype}")]
    UnsupportedMrtType { mrt_type: u16, subtype: u16 },
    #[error("{0}")]
    ParseError(String),
}

impl<T> From<TryFromPrimitiveError<T>> for ParserError
where
    T: TryFromPrimitive,
    T::Primitive: Into<u64>,
{
    #[inline]
    fn from(value: TryFromPrimitiveError<T>) -> Self {
        ParserError::UnrecognizedEnumVariant {
            type_name: T::NAME,
            value: value.number.into(),
        }
    }
}
