use alloy_primitives::{Address, Bytes, U256};
use anchor_lang::prelude::*;
use common::CallContext;
use mintable_token::MintableToken;

use super::check_token_pair;
use crate::{
    solidity::IStandardBridge::ERC20BridgeFinalized, BridgeEvent, CrossDomainMessenger,
    StandardBridge,
};

/// Accounts touched when a mintable token arrives from the peer domain.
pub struct FinalizeBridgeErc20<'a, M: CrossDomainMessenger> {
    pub bridge: &'a mut StandardBridge,
    pub messenger: &'a M,
    /// The local token to mint.
    pub token: &'a mut MintableToken,
}

/// Finalizes a token bridge initiated by the peer bridge by minting the
/// local token to `to`.
///
/// The local token must be bound to `remote_token`; otherwise a peer could
/// mint any local token by naming it.
pub fn finalize_bridge_erc20_handler<M: CrossDomainMessenger>(
    ctx: &CallContext,
    accounts: FinalizeBridgeErc20<'_, M>,
    remote_token: Address,
    from: Address,
    to: Address,
    amount: U256,
    extra_data: Bytes,
) -> Result<()> {
    ctx.require_non_payable()?;

    let FinalizeBridgeErc20 {
        bridge,
        messenger,
        token,
    } = accounts;

    let source_chain = bridge.only_other_bridge(ctx, messenger)?;
    check_token_pair(token, &remote_token)?;

    token.mint(&CallContext::new(bridge.address()), to, amount)?;

    let local_token = token.address();
    bridge.emit(BridgeEvent::Erc20BridgeFinalized(ERC20BridgeFinalized {
        sourceChain: source_chain,
        localToken: local_token,
        from,
        remoteToken: remote_token,
        to,
        amount,
        extraData: extra_data,
    }));

    msg!(
        "Finalized bridge of {} of token {} to {}",
        amount,
        local_token,
        to
    );

    Ok(())
}
