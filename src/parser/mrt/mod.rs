pub mod mrt_header;
pub mod mrt_record;
pub mod table_dump_v2;

pub use mrt_header::parse_common_header;
pub use mrt_record::{parse_mrt_body, parse_mrt_record};
pub use table_dump_v2::*;
