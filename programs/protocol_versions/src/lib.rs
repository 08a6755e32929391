//! Registry of the protocol versions node operators are required or
//! recommended to run, stored at fixed slots so nodes can read them directly.

pub mod constants;
pub mod protocol_version;
pub mod registry;
pub mod solidity;

pub use constants::*;
pub use protocol_version::*;
pub use registry::*;
