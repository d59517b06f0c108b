use super::mrt_header::parse_common_header;
use super::table_dump_v2::parse_table_dump_v2_message;
use crate::error::ParserError;
use crate::models::*;
use bytes::{Bytes, BytesMut};
use std::io::{ErrorKind, Read};

/// Reads one complete MRT record from `input`.
///
/// Returns [ParserError::EofExpected] when the input ends cleanly before a new header.
pub fn parse_mrt_record(input: &mut impl Read) -> Result<MrtRecord, ParserError> {
    // parse common header
    let common_header = match parse_common_header(input) {
        Ok(v) => v,
        Err(ParserError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(ParserError::EofExpected)
        }
        Err(e) => return Err(e),
    };

    // read the whole message bytes to buffer
    let mut buffer = BytesMut::zeroed(common_header.length as usize);
    input
        .take(common_header.length as u64)
        .read_exact(&mut buffer)?;

    let message = parse_mrt_body(
        common_header.entry_type,
        common_header.entry_subtype,
        buffer.freeze(),
    )?;

    Ok(MrtRecord {
        common_header,
        message,
    })
}

/// Parse MRT message body with given entry type and subtype.
///
/// The message body is the `length` bytes following the common header, and must be consumed
/// completely by the message parser.
pub fn parse_mrt_body(
    entry_type: EntryType,
    entry_subtype: u16,
    data: Bytes,
) -> Result<TableDumpV2Message, ParserError> {
    match entry_type {
        EntryType::TABLE_DUMP_V2 => parse_table_dump_v2_message(entry_subtype, data),
        v => Err(ParserError::UnsupportedMrtType {
            mrt_type: v.into(),
            subtype: entry_subtype,
        }),
    }
}
