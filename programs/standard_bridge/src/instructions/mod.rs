use alloy_primitives::{Address, Bytes};
use anchor_lang::prelude::*;
use common::{CallContext, Chain, ChainId, SINGLE_DOMAIN_CHAIN_ID};
use mintable_token::{
    constants::{LEGACY_MINTABLE_ERC20_INTERFACE_ID, OPTIMISM_MINTABLE_ERC20_INTERFACE_ID},
    MintableToken,
};

use crate::{CrossDomainMessenger, StandardBridgeError};

pub mod bridge_erc20;
pub mod bridge_eth;
pub mod finalize_bridge_erc20;
pub mod finalize_bridge_eth;

pub use bridge_erc20::*;
pub use bridge_eth::*;
pub use finalize_bridge_erc20::*;
pub use finalize_bridge_eth::*;

/// Rejects callers with deployed code. A contract calling from its constructor
/// still has no code and passes.
pub(crate) fn only_eoa(chain: &Chain, ctx: &CallContext) -> Result<()> {
    require!(
        !chain.is_contract(&ctx.sender),
        StandardBridgeError::OnlyEoa
    );
    Ok(())
}

/// Whether the bridge may mint and burn `token`.
fn is_mintable(token: &MintableToken) -> bool {
    token.supports_interface(OPTIMISM_MINTABLE_ERC20_INTERFACE_ID)
        || token.supports_interface(LEGACY_MINTABLE_ERC20_INTERFACE_ID)
}

/// Checks that `token` is mintable and bound to `remote_token` on the peer domain.
fn check_token_pair(token: &MintableToken, remote_token: &Address) -> Result<()> {
    require!(is_mintable(token), StandardBridgeError::UnrecognizedToken);
    require!(
        token.remote_token() == *remote_token,
        StandardBridgeError::WrongRemoteToken
    );
    Ok(())
}

/// Hands a finalize call for the peer bridge to the messenger. The all-ones chain tag
/// routes through the single-domain path.
fn send_to_other_bridge<M: CrossDomainMessenger>(
    messenger: &mut M,
    ctx: &CallContext,
    target_chain: ChainId,
    other_bridge: Address,
    message: Bytes,
    min_gas_limit: u32,
) -> Result<()> {
    if target_chain == SINGLE_DOMAIN_CHAIN_ID {
        messenger.send_message(ctx, other_bridge, message, min_gas_limit)
    } else {
        messenger.send_message_to_chain(ctx, target_chain, other_bridge, message, min_gas_limit)
    }
}
