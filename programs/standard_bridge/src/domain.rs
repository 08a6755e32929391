use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolInterface;
use anchor_lang::prelude::*;
use common::{CallContext, Chain, ChainError, ChainId, Code, Predeploys, TokenMetadata};
use mintable_token::{MintableToken, MintableTokenFactory};

use crate::{
    bridge_erc20_to_handler, bridge_eth_to_handler, finalize_bridge_erc20_handler,
    finalize_bridge_eth_handler, instructions::only_eoa, receive_handler,
    solidity::IStandardBridge::IStandardBridgeCalls, BridgeConfig, BridgeErc20, BridgeEth,
    CrossDomainMessage, CrossDomainMessenger, Delivery, FinalizeBridgeErc20, FinalizeBridgeEth,
    L2CrossDomainMessenger, MessengerError, StandardBridge, StandardBridgeError,
};

/// Result of delivering an inbound message. Both carry the message hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Relayed(B256),
    /// The target call failed; the message can be replayed.
    Failed(B256),
}

impl RelayOutcome {
    pub fn hash(&self) -> B256 {
        match self {
            RelayOutcome::Relayed(hash) | RelayOutcome::Failed(hash) => *hash,
        }
    }
}

/// One domain: its native ledger plus the bridge, messenger, token factory
/// and every mintable token deployed on it.
///
/// Every state-changing entry point is a transaction: it either applies in
/// full or leaves the domain exactly as it was.
#[derive(Debug, Clone)]
pub struct Domain {
    chain: Chain,
    bridge: StandardBridge,
    messenger: L2CrossDomainMessenger,
    factory: MintableTokenFactory,
    tokens: BTreeMap<Address, MintableToken>,
}

impl Domain {
    /// Creates a domain with the bridge, messenger and factory at their predeploy addresses.
    pub fn new(chain_id: ChainId, config: BridgeConfig) -> Result<Self> {
        let bridge = StandardBridge::predeploy(&config);
        let messenger = L2CrossDomainMessenger::new(
            bridge.messenger(),
            chain_id,
            config.remote_chain_id,
        );
        let factory =
            MintableTokenFactory::new(Predeploys::OPTIMISM_MINTABLE_ERC20_FACTORY, bridge.address());

        let predeploy = Code::with_size(Predeploys::CODE_SIZE);
        let mut chain = Chain::new(chain_id);
        chain.deploy(bridge.address(), predeploy.payable())?;
        chain.deploy(messenger.address(), predeploy.payable())?;
        chain.deploy(factory.address(), predeploy)?;

        msg!(
            "Domain {} bridging to {} on {}",
            chain_id,
            config.other_bridge,
            config.remote_chain_id
        );

        Ok(Self {
            chain,
            bridge,
            messenger,
            factory,
            tokens: BTreeMap::new(),
        })
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain.chain_id()
    }

    pub fn chain(&self) -> &Chain {
        &self.chain
    }

    /// Direct access to native balances and code, for genesis setup.
    pub fn chain_mut(&mut self) -> &mut Chain {
        &mut self.chain
    }

    pub fn bridge(&self) -> &StandardBridge {
        &self.bridge
    }

    pub fn messenger(&self) -> &L2CrossDomainMessenger {
        &self.messenger
    }

    pub fn factory(&self) -> &MintableTokenFactory {
        &self.factory
    }

    pub fn token(&self, address: &Address) -> Option<&MintableToken> {
        self.tokens.get(address)
    }

    pub fn balance(&self, address: &Address) -> U256 {
        self.chain.balance(address)
    }

    /// Hands every queued outbound message to the transport.
    pub fn take_outbox(&mut self) -> Vec<CrossDomainMessage> {
        self.messenger.take_outbox()
    }

    /// Runs `f` against the domain and discards all of its effects if it fails.
    pub fn transact<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }

    /// Places an already constructed token on this domain, e.g. at genesis.
    pub fn register_token(&mut self, token: MintableToken) -> Result<()> {
        self.chain
            .deploy(token.address(), Code::with_size(Predeploys::CODE_SIZE))?;
        self.tokens.insert(token.address(), token);
        Ok(())
    }

    /// Deploys a mintable token bound to this domain's bridge through the factory.
    pub fn deploy_mintable_token(
        &mut self,
        ctx: &CallContext,
        metadata: TokenMetadata,
    ) -> Result<Address> {
        self.transact(|domain| {
            let token = domain.factory.create_mintable_token(ctx, metadata)?;
            let address = token.address();
            domain.register_token(token)?;
            Ok(address)
        })
    }

    /// Runs a call against a deployed token. Token entry points are not payable.
    pub fn call_token<T>(
        &mut self,
        ctx: &CallContext,
        token: Address,
        f: impl FnOnce(&mut MintableToken, &CallContext) -> Result<T>,
    ) -> Result<T> {
        self.transact(|domain| {
            ctx.require_non_payable()?;
            let token = domain.tokens.get_mut(&token).ok_or(ChainError::NoCode)?;
            f(token, ctx)
        })
    }

    /// ETH sent to the bridge without calldata.
    pub fn receive(&mut self, ctx: &CallContext) -> Result<()> {
        self.transact(|domain| {
            domain.pay(ctx, domain.bridge.address())?;
            receive_handler(ctx, domain.bridge_eth_accounts())
        })
    }

    pub fn bridge_eth(
        &mut self,
        ctx: &CallContext,
        target_chain: ChainId,
        min_gas_limit: u32,
        extra_data: Bytes,
    ) -> Result<()> {
        self.bridge_eth_to(ctx, target_chain, ctx.sender, min_gas_limit, extra_data)
    }

    pub fn bridge_eth_to(
        &mut self,
        ctx: &CallContext,
        target_chain: ChainId,
        to: Address,
        min_gas_limit: u32,
        extra_data: Bytes,
    ) -> Result<()> {
        self.transact(|domain| {
            domain.pay(ctx, domain.bridge.address())?;
            bridge_eth_to_handler(
                ctx,
                domain.bridge_eth_accounts(),
                target_chain,
                to,
                min_gas_limit,
                extra_data,
            )
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bridge_erc20(
        &mut self,
        ctx: &CallContext,
        target_chain: ChainId,
        local_token: Address,
        remote_token: Address,
        amount: U256,
        min_gas_limit: u32,
        extra_data: Bytes,
    ) -> Result<()> {
        self.bridge_erc20_to(
            ctx,
            target_chain,
            local_token,
            remote_token,
            ctx.sender,
            amount,
            min_gas_limit,
            extra_data,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn bridge_erc20_to(
        &mut self,
        ctx: &CallContext,
        target_chain: ChainId,
        local_token: Address,
        remote_token: Address,
        to: Address,
        amount: U256,
        min_gas_limit: u32,
        extra_data: Bytes,
    ) -> Result<()> {
        self.transact(|domain| {
            let Some(token) = domain.tokens.get_mut(&local_token) else {
                ctx.require_non_payable()?;
                only_eoa(&domain.chain, ctx)?;
                domain.bridge.check_recipient(&to)?;
                return err!(StandardBridgeError::UnrecognizedToken);
            };

            bridge_erc20_to_handler(
                ctx,
                BridgeErc20 {
                    bridge: &mut domain.bridge,
                    messenger: &mut domain.messenger,
                    chain: &domain.chain,
                    token,
                },
                target_chain,
                remote_token,
                to,
                amount,
                min_gas_limit,
                extra_data,
            )
        })
    }

    /// Calls the bridge's ETH finalize entry point directly. Only succeeds
    /// while the messenger is relaying a message from the peer bridge.
    pub fn finalize_bridge_eth(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: U256,
        extra_data: Bytes,
    ) -> Result<()> {
        self.transact(|domain| {
            domain.pay(ctx, domain.bridge.address())?;
            domain.finalize_eth_internal(ctx, from, to, amount, extra_data)
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn finalize_bridge_erc20(
        &mut self,
        ctx: &CallContext,
        local_token: Address,
        remote_token: Address,
        from: Address,
        to: Address,
        amount: U256,
        extra_data: Bytes,
    ) -> Result<()> {
        self.transact(|domain| {
            domain.finalize_erc20_internal(
                ctx,
                local_token,
                remote_token,
                from,
                to,
                amount,
                extra_data,
            )
        })
    }

    /// Sends an arbitrary message through this domain's messenger. The
    /// attached value is escrowed with the messenger.
    pub fn send_message(
        &mut self,
        ctx: &CallContext,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()> {
        self.transact(|domain| {
            domain.pay(ctx, domain.messenger.address())?;
            domain
                .messenger
                .send_message(ctx, target, message, min_gas_limit)
        })
    }

    pub fn send_message_to_chain(
        &mut self,
        ctx: &CallContext,
        destination: ChainId,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()> {
        self.transact(|domain| {
            domain.pay(ctx, domain.messenger.address())?;
            domain
                .messenger
                .send_message_to_chain(ctx, destination, target, message, min_gas_limit)
        })
    }

    /// Delivers a message sent from `source`, or replays one whose earlier
    /// delivery failed.
    ///
    /// The first delivery credits the value escrowed on the source domain to
    /// the messenger. If the target call fails, its effects are discarded, the
    /// value stays with the messenger and the message is recorded as failed;
    /// the relay itself still succeeds. Invalid messages (wrong destination,
    /// blocked target, already relayed) are rejected without any effect.
    ///
    /// # Arguments
    /// * `source`  - Domain the message was sent from
    /// * `message` - The message taken from the source domain's outbox
    pub fn relay_message(
        &mut self,
        source: ChainId,
        message: &CrossDomainMessage,
    ) -> Result<RelayOutcome> {
        self.transact(|domain| {
            let delivery = domain.messenger.check_relay(source, message)?;
            if delivery == Delivery::First {
                let messenger = domain.messenger.address();
                domain.chain.credit(messenger, message.value)?;
            }

            let checkpoint = domain.clone();

            domain.messenger.enter_relay(message.sender, source);
            let result = domain.call_target(message);
            domain.messenger.exit_relay();

            match result {
                Ok(()) => Ok(RelayOutcome::Relayed(
                    domain.messenger.record_relay(source, message, true),
                )),
                Err(err) => {
                    msg!("Message target call failed: {}", err);
                    *domain = checkpoint;
                    Ok(RelayOutcome::Failed(
                        domain.messenger.record_relay(source, message, false),
                    ))
                }
            }
        })
    }

    /// Executes the call a relayed message carries, as the messenger.
    fn call_target(&mut self, message: &CrossDomainMessage) -> Result<()> {
        let ctx = CallContext::new(self.messenger.address()).with_value(message.value);
        self.pay(&ctx, message.target)?;

        if message.target == self.bridge.address() {
            let call = IStandardBridgeCalls::abi_decode(&message.message, true)
                .map_err(|_| MessengerError::UnknownFunction)?;

            match call {
                IStandardBridgeCalls::finalizeBridgeETH(call) => self.finalize_eth_internal(
                    &ctx,
                    call._from,
                    call._to,
                    call._amount,
                    call._extraData,
                ),
                IStandardBridgeCalls::finalizeBridgeERC20(call) => self.finalize_erc20_internal(
                    &ctx,
                    call._localToken,
                    call._remoteToken,
                    call._from,
                    call._to,
                    call._amount,
                    call._extraData,
                ),
            }
        } else if self.chain.is_contract(&message.target) {
            err!(MessengerError::UnsupportedTarget)
        } else {
            // Plain value transfer to an externally-owned account.
            Ok(())
        }
    }

    fn finalize_eth_internal(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: U256,
        extra_data: Bytes,
    ) -> Result<()> {
        finalize_bridge_eth_handler(
            ctx,
            FinalizeBridgeEth {
                bridge: &mut self.bridge,
                messenger: &self.messenger,
                chain: &mut self.chain,
            },
            from,
            to,
            amount,
            extra_data,
        )
    }

    #[allow(clippy::too_many_arguments)]
    fn finalize_erc20_internal(
        &mut self,
        ctx: &CallContext,
        local_token: Address,
        remote_token: Address,
        from: Address,
        to: Address,
        amount: U256,
        extra_data: Bytes,
    ) -> Result<()> {
        let Some(token) = self.tokens.get_mut(&local_token) else {
            ctx.require_non_payable()?;
            self.bridge.only_other_bridge(ctx, &self.messenger)?;
            return err!(StandardBridgeError::UnrecognizedToken);
        };

        finalize_bridge_erc20_handler(
            ctx,
            FinalizeBridgeErc20 {
                bridge: &mut self.bridge,
                messenger: &self.messenger,
                token,
            },
            remote_token,
            from,
            to,
            amount,
            extra_data,
        )
    }

    fn bridge_eth_accounts(&mut self) -> BridgeEth<'_, L2CrossDomainMessenger> {
        BridgeEth {
            bridge: &mut self.bridge,
            messenger: &mut self.messenger,
            chain: &mut self.chain,
        }
    }

    /// Moves the value attached to `ctx` from the caller to the callee.
    fn pay(&mut self, ctx: &CallContext, callee: Address) -> Result<()> {
        self.chain.transfer(ctx.sender, callee, ctx.value)
    }
}
