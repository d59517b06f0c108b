mod peer_index_table;
mod rib_entries;

use crate::error::ParserError;
use crate::models::{TableDumpV2Message, TableDumpV2Type};
use bytes::Bytes;

pub use peer_index_table::parse_peer_index_table;
pub use rib_entries::{parse_rib_entries, parse_rib_entry};

/// Parse TABLE_DUMP V2 format MRT message.
///
/// RFC: https://www.rfc-editor.org/rfc/rfc6396#section-4.3
///
/// Subtypes include
/// 1. PEER_INDEX_TABLE
/// 2. RIB_IPV4_UNICAST
/// 3. RIB_IPV4_MULTICAST
/// 4. RIB_IPV6_UNICAST
/// 5. RIB_IPV6_MULTICAST
/// 6. RIB_GENERIC
pub fn parse_table_dump_v2_message(
    sub_type: u16,
    mut input: Bytes,
) -> Result<TableDumpV2Message, ParserError> {
    let v2_type: TableDumpV2Type = TableDumpV2Type::try_from(sub_type)?;

    let msg: TableDumpV2Message = match v2_type {
        TableDumpV2Type::PeerIndexTable => {
            let table = parse_peer_index_table(&mut input)?;
            if !input.is_empty() {
                return Err(ParserError::ParseError(format!(
                    "{} trailing bytes after peer index table",
                    input.len()
                )));
            }
            TableDumpV2Message::PeerIndexTable(table)
        }
        TableDumpV2Type::RibIpv4Unicast
        | TableDumpV2Type::RibIpv4Multicast
        | TableDumpV2Type::RibIpv6Unicast
        | TableDumpV2Type::RibIpv6Multicast
        | TableDumpV2Type::RibGeneric => {
            TableDumpV2Message::Rib(parse_rib_entries(&mut input, v2_type)?)
        }
    };

    Ok(msg)
}
