//! Standard bridge for moving ETH and mintable tokens between domains
//! through a trusted cross-domain messenger.

pub mod constants;
pub mod domain;
pub mod instructions;
pub mod messenger;
pub mod solidity;
pub mod state;

#[cfg(test)]
mod test_utils;

pub use constants::*;
pub use domain::*;
pub use instructions::*;
pub use messenger::*;
pub use state::*;
