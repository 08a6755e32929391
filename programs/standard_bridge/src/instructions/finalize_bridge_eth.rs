use alloy_primitives::{Address, Bytes, U256};
use anchor_lang::prelude::*;
use common::{CallContext, Chain};

use crate::{
    solidity::IStandardBridge::ETHBridgeFinalized, BridgeEvent, CrossDomainMessenger,
    StandardBridge, StandardBridgeError,
};

/// Accounts touched when ETH arrives from the peer domain.
///
/// The value attached to the call must already be held by the bridge.
pub struct FinalizeBridgeEth<'a, M: CrossDomainMessenger> {
    pub bridge: &'a mut StandardBridge,
    pub messenger: &'a M,
    pub chain: &'a mut Chain,
}

/// Finalizes an ETH bridge initiated by the peer bridge and forwards the
/// value to `to`.
///
/// A zero amount moves nothing and therefore succeeds even when `to` is a
/// contract that rejects value.
///
/// # Arguments
/// * `ctx`        - Must be the messenger, relaying a message from the peer bridge
/// * `accounts`   - Bridge, messenger and chain state
/// * `from`       - Sender on the source domain
/// * `to`         - Recipient on this domain
/// * `amount`     - Amount the peer asserts was bridged; must equal the attached value
/// * `extra_data` - Opaque data from the source domain
pub fn finalize_bridge_eth_handler<M: CrossDomainMessenger>(
    ctx: &CallContext,
    accounts: FinalizeBridgeEth<'_, M>,
    from: Address,
    to: Address,
    amount: U256,
    extra_data: Bytes,
) -> Result<()> {
    let FinalizeBridgeEth {
        bridge,
        messenger,
        chain,
    } = accounts;

    let source_chain = bridge.only_other_bridge(ctx, messenger)?;
    require!(ctx.value == amount, StandardBridgeError::AmountMismatch);
    bridge.check_recipient(&to)?;

    bridge.emit(BridgeEvent::EthBridgeFinalized(ETHBridgeFinalized {
        sourceChain: source_chain,
        from,
        to,
        amount,
        extraData: extra_data,
    }));

    chain
        .transfer(bridge.address(), to, amount)
        .map_err(|_| StandardBridgeError::EthTransferFailed)?;

    msg!("Finalized bridge of {} wei to {}", amount, to);

    Ok(())
}
