/*!
Structs shared by the generator, the MRT encoder and the verification decoder.
*/
mod bgp;
mod mrt;
mod network;
mod rib;

pub use bgp::*;
pub use mrt::*;
pub use network::*;
pub use rib::*;
