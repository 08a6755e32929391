use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use anchor_lang::prelude::*;
use common::{CallContext, Chain, ChainId};
use mintable_token::MintableToken;

use super::{check_token_pair, only_eoa, send_to_other_bridge};
use crate::{
    solidity::IStandardBridge::{finalizeBridgeERC20Call, ERC20BridgeInitiated},
    BridgeEvent, CrossDomainMessenger, StandardBridge,
};

/// Accounts touched when a mintable token leaves this domain.
pub struct BridgeErc20<'a, M: CrossDomainMessenger> {
    pub bridge: &'a mut StandardBridge,
    pub messenger: &'a mut M,
    pub chain: &'a Chain,
    /// The local token being bridged.
    pub token: &'a mut MintableToken,
}

/// Burns `amount` of the local token from the caller and sends it to the
/// caller's own address on the target chain.
pub fn bridge_erc20_handler<M: CrossDomainMessenger>(
    ctx: &CallContext,
    accounts: BridgeErc20<'_, M>,
    target_chain: ChainId,
    remote_token: Address,
    amount: U256,
    min_gas_limit: u32,
    extra_data: Bytes,
) -> Result<()> {
    bridge_erc20_to_handler(
        ctx,
        accounts,
        target_chain,
        remote_token,
        ctx.sender,
        amount,
        min_gas_limit,
        extra_data,
    )
}

/// Burns `amount` of the local token from the caller and asks the peer bridge
/// to mint the paired `remote_token` to `to`.
///
/// # Arguments
/// * `ctx`           - Caller; must not attach value
/// * `accounts`      - Bridge, messenger, chain and the local token
/// * `target_chain`  - Destination chain tag; all ones selects the single-domain path
/// * `remote_token`  - Token on the destination the local token is paired with
/// * `to`            - Recipient on the destination
/// * `amount`        - Amount to burn here and mint there
/// * `min_gas_limit` - Minimum gas for the finalize call on the destination
/// * `extra_data`    - Opaque data forwarded to the destination and emitted in events
#[allow(clippy::too_many_arguments)]
pub fn bridge_erc20_to_handler<M: CrossDomainMessenger>(
    ctx: &CallContext,
    accounts: BridgeErc20<'_, M>,
    target_chain: ChainId,
    remote_token: Address,
    to: Address,
    amount: U256,
    min_gas_limit: u32,
    extra_data: Bytes,
) -> Result<()> {
    ctx.require_non_payable()?;
    only_eoa(accounts.chain, ctx)?;

    let BridgeErc20 {
        bridge,
        messenger,
        token,
        ..
    } = accounts;

    bridge.check_recipient(&to)?;
    check_token_pair(token, &remote_token)?;

    let from = ctx.sender;
    let local_token = token.address();

    token.burn(&CallContext::new(bridge.address()), from, amount)?;

    // Token roles swap: this side's local token is the peer's remote token.
    let message = finalizeBridgeERC20Call {
        _localToken: remote_token,
        _remoteToken: local_token,
        _from: from,
        _to: to,
        _amount: amount,
        _extraData: extra_data.clone(),
    }
    .abi_encode();

    bridge.emit(BridgeEvent::Erc20BridgeInitiated(ERC20BridgeInitiated {
        destinationChain: target_chain,
        localToken: local_token,
        from,
        remoteToken: remote_token,
        to,
        amount,
        extraData: extra_data,
    }));

    send_to_other_bridge(
        messenger,
        &CallContext::new(bridge.address()),
        target_chain,
        bridge.other_bridge(),
        message.into(),
        min_gas_limit,
    )?;

    msg!(
        "Bridging {} of token {} from {} to {}",
        amount,
        local_token,
        from,
        to
    );

    Ok(())
}
