//! Allow-list of addresses permitted to deploy contracts, administered by a
//! single owner until it is disabled for good.

pub mod solidity;
pub mod whitelist;

pub use whitelist::*;
