use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use anchor_lang::prelude::*;
use common::{CallContext, Chain, ChainId, SINGLE_DOMAIN_CHAIN_ID};

use super::{only_eoa, send_to_other_bridge};
use crate::{
    solidity::IStandardBridge::{finalizeBridgeETHCall, ETHBridgeInitiated},
    BridgeEvent, CrossDomainMessenger, StandardBridge, RECEIVE_DEFAULT_GAS_LIMIT,
};

/// Accounts touched when ETH leaves this domain.
///
/// The value attached to the call must already be held by the bridge.
pub struct BridgeEth<'a, M: CrossDomainMessenger> {
    pub bridge: &'a mut StandardBridge,
    pub messenger: &'a mut M,
    pub chain: &'a mut Chain,
}

/// Sends the attached ETH to the caller's own address on the target chain.
///
/// # Arguments
/// * `ctx`           - Caller and attached value
/// * `accounts`      - Bridge, messenger and chain state
/// * `target_chain`  - Destination chain tag; all ones selects the single-domain path
/// * `min_gas_limit` - Minimum gas for the finalize call on the destination
/// * `extra_data`    - Opaque data forwarded to the destination and emitted in events
pub fn bridge_eth_handler<M: CrossDomainMessenger>(
    ctx: &CallContext,
    accounts: BridgeEth<'_, M>,
    target_chain: ChainId,
    min_gas_limit: u32,
    extra_data: Bytes,
) -> Result<()> {
    bridge_eth_to_handler(
        ctx,
        accounts,
        target_chain,
        ctx.sender,
        min_gas_limit,
        extra_data,
    )
}

/// Sends the attached ETH to `to` on the target chain.
pub fn bridge_eth_to_handler<M: CrossDomainMessenger>(
    ctx: &CallContext,
    accounts: BridgeEth<'_, M>,
    target_chain: ChainId,
    to: Address,
    min_gas_limit: u32,
    extra_data: Bytes,
) -> Result<()> {
    only_eoa(accounts.chain, ctx)?;
    accounts.bridge.check_recipient(&to)?;

    bridge_eth_internal(
        accounts,
        target_chain,
        ctx.sender,
        to,
        ctx.value,
        min_gas_limit,
        extra_data,
    )
}

/// ETH sent to the bridge without a call is bridged to the sender over the
/// single-domain path.
pub fn receive_handler<M: CrossDomainMessenger>(
    ctx: &CallContext,
    accounts: BridgeEth<'_, M>,
) -> Result<()> {
    bridge_eth_handler(
        ctx,
        accounts,
        SINGLE_DOMAIN_CHAIN_ID,
        RECEIVE_DEFAULT_GAS_LIMIT,
        Bytes::new(),
    )
}

fn bridge_eth_internal<M: CrossDomainMessenger>(
    accounts: BridgeEth<'_, M>,
    target_chain: ChainId,
    from: Address,
    to: Address,
    amount: U256,
    min_gas_limit: u32,
    extra_data: Bytes,
) -> Result<()> {
    let BridgeEth {
        bridge,
        messenger,
        chain,
    } = accounts;

    // Escrow the value with the messenger until the peer finalizes.
    chain.transfer(bridge.address(), messenger.address(), amount)?;

    let message = finalizeBridgeETHCall {
        _from: from,
        _to: to,
        _amount: amount,
        _extraData: extra_data.clone(),
    }
    .abi_encode();

    bridge.emit(BridgeEvent::EthBridgeInitiated(ETHBridgeInitiated {
        destinationChain: target_chain,
        from,
        to,
        amount,
        extraData: extra_data,
    }));

    send_to_other_bridge(
        messenger,
        &CallContext::new(bridge.address()).with_value(amount),
        target_chain,
        bridge.other_bridge(),
        message.into(),
        min_gas_limit,
    )?;

    msg!("Bridging {} wei from {} to {}", amount, from, to);

    Ok(())
}
