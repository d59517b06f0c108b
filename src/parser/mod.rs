/*!
Reader for the TABLE_DUMP_V2 dumps produced by the encoder.

The parser covers the record types and path attributes the generator emits, and is strict about
length fields: every record body and every attribute must be consumed exactly by its content.
*/
pub mod utils;
pub mod bgp;
pub mod iters;
pub mod mrt;

pub use self::utils::*;
pub use bgp::parse_attributes;
pub use iters::RecordIterator;
pub use mrt::{
    parse_common_header, parse_mrt_body, parse_mrt_record, parse_peer_index_table,
    parse_rib_entries, parse_rib_entry, parse_table_dump_v2_message,
};
