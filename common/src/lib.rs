pub mod chain;
pub mod metadata;
pub mod predeploys;

use alloy_primitives::U256;

pub use alloy_primitives::{Address, B256};
pub use chain::*;
pub use metadata::*;
pub use predeploys::Predeploys;

/// 32-byte tag naming a domain. Opaque: only ever compared.
pub type ChainId = B256;

/// Destination tag that routes a message through the messenger's single-domain path.
pub const SINGLE_DOMAIN_CHAIN_ID: ChainId = B256::repeat_byte(0xff);

/// Builds the `bytes32` tag for a numeric EVM chain id.
pub fn chain_id(id: u64) -> ChainId {
    B256::from(U256::from(id))
}
