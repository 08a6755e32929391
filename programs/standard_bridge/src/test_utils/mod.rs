use alloy_primitives::{Address, Bytes, U256};
use anchor_lang::prelude::*;
use common::{CallContext, Chain, ChainId, Code, Predeploys, TokenMetadata};
use mintable_token::MintableToken;

use crate::{BridgeConfig, CrossDomainMessenger, MessengerError, StandardBridge};

pub const LOCAL_CHAIN: ChainId = ChainId::with_last_byte(0x85);
pub const SOURCE_CHAIN: ChainId = ChainId::with_last_byte(0x86);
pub const OTHER_BRIDGE_ADDRESS: Address = Address::repeat_byte(0x0b);
pub const USER: Address = Address::repeat_byte(0xa1);
pub const RECIPIENT: Address = Address::repeat_byte(0xb0);
pub const LOCAL_TOKEN: Address = Address::repeat_byte(0x70);
pub const REMOTE_TOKEN: Address = Address::repeat_byte(0x42);

/// A message handed to [`MockMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCall {
    /// `None` for the single-domain path.
    pub destination: Option<ChainId>,
    pub sender: Address,
    pub target: Address,
    pub value: U256,
    pub message: Bytes,
    pub min_gas_limit: u32,
}

/// Records sends and reports whatever cross-domain sender the test sets.
#[derive(Debug, Clone)]
pub struct MockMessenger {
    address: Address,
    sender: Option<Address>,
    source: Option<ChainId>,
    /// Makes every send fail, as a messenger out of nonces would.
    pub reject_sends: bool,
    pub sent: Vec<SentCall>,
}

impl MockMessenger {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            sender: None,
            source: None,
            reject_sends: false,
            sent: Vec::new(),
        }
    }

    pub fn relay_from(&mut self, sender: Address, source: ChainId) {
        self.sender = Some(sender);
        self.source = Some(source);
    }
}

impl CrossDomainMessenger for MockMessenger {
    fn address(&self) -> Address {
        self.address
    }

    fn cross_domain_sender(&self) -> Option<Address> {
        self.sender
    }

    fn cross_domain_source(&self) -> Option<ChainId> {
        self.source
    }

    fn send_message(
        &mut self,
        ctx: &CallContext,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()> {
        require!(!self.reject_sends, MessengerError::NonceOverflow);
        self.sent.push(SentCall {
            destination: None,
            sender: ctx.sender,
            target,
            value: ctx.value,
            message,
            min_gas_limit,
        });
        Ok(())
    }

    fn send_message_to_chain(
        &mut self,
        ctx: &CallContext,
        destination: ChainId,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()> {
        require!(!self.reject_sends, MessengerError::NonceOverflow);
        self.sent.push(SentCall {
            destination: Some(destination),
            sender: ctx.sender,
            target,
            value: ctx.value,
            message,
            min_gas_limit,
        });
        Ok(())
    }
}

/// Bridge, mock messenger, chain and a bridge-bound token, wired for handler tests.
pub struct Fixture {
    pub bridge: StandardBridge,
    pub messenger: MockMessenger,
    pub chain: Chain,
    pub token: MintableToken,
}

impl Fixture {
    pub fn new() -> Self {
        let bridge = StandardBridge::predeploy(&BridgeConfig {
            other_bridge: OTHER_BRIDGE_ADDRESS,
            remote_chain_id: SOURCE_CHAIN,
        });
        let messenger = MockMessenger::new(bridge.messenger());

        let mut chain = Chain::new(LOCAL_CHAIN);
        for predeploy in [bridge.address(), bridge.messenger()] {
            chain
                .deploy(predeploy, Code::with_size(Predeploys::CODE_SIZE).payable())
                .unwrap();
        }
        chain
            .deploy(LOCAL_TOKEN, Code::with_size(Predeploys::CODE_SIZE))
            .unwrap();

        let token = MintableToken::new(
            LOCAL_TOKEN,
            bridge.address(),
            TokenMetadata::new(REMOTE_TOKEN, "Bridged Token", "BT"),
        );

        Self {
            bridge,
            messenger,
            chain,
            token,
        }
    }

    pub fn bridge_ctx(&self) -> CallContext {
        CallContext::new(self.bridge.address())
    }

    pub fn messenger_ctx(&self) -> CallContext {
        CallContext::new(self.messenger.address())
    }

    /// Mints `amount` local tokens to `to` as the bridge would on a deposit.
    pub fn mint(&mut self, to: Address, amount: u64) {
        let ctx = self.bridge_ctx();
        self.token.mint(&ctx, to, U256::from(amount)).unwrap();
    }
}

