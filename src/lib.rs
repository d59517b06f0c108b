/*!
`mrtgen` synthesizes BGP routing tables and writes them as MRT TABLE_DUMP_V2 files, for use as
input to route replay and load testing tools.

A single template route is expanded into an ordered sequence of routes by stepping its prefix
through the address space and cycling its next hop through a pool of addresses. The routes are
then written as one PEER_INDEX_TABLE record followed by one RIB record per route.

# Example

```no_run
use mrtgen::encoder::{write_rib, ByteSink};
use mrtgen::generator::generate_rib;
use mrtgen::logging::LogContext;
use mrtgen::models::{GenerationConfig, PeerDescriptor};

let log_ctx = LogContext::default();
let config = GenerationConfig::default();
config.validate().unwrap();

let routes = generate_rib(&config, log_ctx);
let file = std::fs::File::create("gen.mrt").unwrap();
let mut sink = ByteSink::new(file, log_ctx);
let count = write_rib(routes, &PeerDescriptor::default(), &mut sink).unwrap();
println!("wrote {} routes", count);
```

Generated files can be read back with [RecordIterator]:

```no_run
use mrtgen::RecordIterator;

for record in RecordIterator::from_path("gen.mrt").unwrap() {
    println!("{:?}", record.unwrap());
}
```

## Supported RFCs

- [RFC 4271](https://datatracker.ietf.org/doc/html/rfc4271): A Border Gateway Protocol 4 (BGP-4)
- [RFC 4760](https://datatracker.ietf.org/doc/html/rfc4760): Multiprotocol Extensions for BGP-4
- [RFC 6396](https://datatracker.ietf.org/doc/html/rfc6396): Multi-Threaded Routing Toolkit (MRT) Routing Information Export Format
- [RFC 6793](https://datatracker.ietf.org/doc/html/rfc6793): BGP Support for Four-Octet Autonomous System (AS) Number Space
*/

pub mod encoder;
pub mod error;
pub mod generator;
pub mod logging;
pub mod models;
pub mod parser;

pub use encoder::{write_rib, ByteSink, FlushOutcome};
pub use error::{MrtGenError, ParserError};
pub use generator::{generate_rib, RibGenerator};
pub use logging::{LogCategory, LogContext};
pub use models::*;
pub use parser::iters::RecordIterator;
