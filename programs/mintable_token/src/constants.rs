use alloy_sol_types::SolCall;
use anchor_lang::prelude::*;

use crate::solidity::{IERC165, ILegacyMintableERC20, IOptimismMintableERC20};

#[constant]
pub const VERSION: &str = "1.3.0";

#[constant]
pub const FACTORY_VERSION: &str = "1.9.0";

/// ERC-165 id of the introspection interface itself.
pub const ERC165_INTERFACE_ID: [u8; 4] = IERC165::supportsInterfaceCall::SELECTOR;

/// `l1Token ^ mint ^ burn`
pub const LEGACY_MINTABLE_ERC20_INTERFACE_ID: [u8; 4] = xor_selectors(&[
    ILegacyMintableERC20::l1TokenCall::SELECTOR,
    ILegacyMintableERC20::mintCall::SELECTOR,
    ILegacyMintableERC20::burnCall::SELECTOR,
]);

/// `remoteToken ^ bridge ^ mint ^ burn`
pub const OPTIMISM_MINTABLE_ERC20_INTERFACE_ID: [u8; 4] = xor_selectors(&[
    IOptimismMintableERC20::remoteTokenCall::SELECTOR,
    IOptimismMintableERC20::bridgeCall::SELECTOR,
    IOptimismMintableERC20::mintCall::SELECTOR,
    IOptimismMintableERC20::burnCall::SELECTOR,
]);

const fn xor_selectors(selectors: &[[u8; 4]]) -> [u8; 4] {
    let mut id = [0u8; 4];
    let mut i = 0;
    while i < selectors.len() {
        let mut j = 0;
        while j < 4 {
            id[j] ^= selectors[i][j];
            j += 1;
        }
        i += 1;
    }
    id
}
