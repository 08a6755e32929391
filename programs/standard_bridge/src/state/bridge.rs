use alloy_primitives::{Address, Log};
use alloy_sol_types::SolEvent;
use anchor_lang::prelude::*;
use common::{CallContext, ChainId, Predeploys};

use crate::{
    solidity::IStandardBridge::{
        ERC20BridgeFinalized, ERC20BridgeInitiated, ETHBridgeFinalized, ETHBridgeInitiated,
    },
    CrossDomainMessenger, OTHER_BRIDGE, REMOTE_CHAIN_ID, VERSION,
};

/// Deployment parameters of a bridge instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Address of the counterpart bridge on the peer domain.
    pub other_bridge: Address,
    /// Domain reached by messages sent without an explicit chain tag.
    pub remote_chain_id: ChainId,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            other_bridge: OTHER_BRIDGE,
            remote_chain_id: REMOTE_CHAIN_ID,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    EthBridgeInitiated(ETHBridgeInitiated),
    EthBridgeFinalized(ETHBridgeFinalized),
    Erc20BridgeInitiated(ERC20BridgeInitiated),
    Erc20BridgeFinalized(ERC20BridgeFinalized),
}

impl BridgeEvent {
    pub fn to_log(&self, address: Address) -> Log {
        let data = match self {
            BridgeEvent::EthBridgeInitiated(event) => event.encode_log_data(),
            BridgeEvent::EthBridgeFinalized(event) => event.encode_log_data(),
            BridgeEvent::Erc20BridgeInitiated(event) => event.encode_log_data(),
            BridgeEvent::Erc20BridgeFinalized(event) => event.encode_log_data(),
        };
        Log { address, data }
    }
}

/// Bridge state. Apart from its event log the bridge keeps no per-request
/// state; in-flight value lives with the messenger.
#[derive(Debug, Clone)]
pub struct StandardBridge {
    address: Address,
    messenger: Address,
    other_bridge: Address,
    events: Vec<BridgeEvent>,
}

impl StandardBridge {
    pub fn new(address: Address, messenger: Address, other_bridge: Address) -> Self {
        Self {
            address,
            messenger,
            other_bridge,
            events: Vec::new(),
        }
    }

    /// The bridge as deployed at its predeploy address next to the messenger predeploy.
    pub fn predeploy(config: &BridgeConfig) -> Self {
        Self::new(
            Predeploys::L2_STANDARD_BRIDGE,
            Predeploys::L2_CROSS_DOMAIN_MESSENGER,
            config.other_bridge,
        )
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn messenger(&self) -> Address {
        self.messenger
    }

    pub fn other_bridge(&self) -> Address {
        self.other_bridge
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn events(&self) -> &[BridgeEvent] {
        &self.events
    }

    pub fn logs(&self) -> Vec<Log> {
        self.events
            .iter()
            .map(|event| event.to_log(self.address))
            .collect()
    }

    pub(crate) fn emit(&mut self, event: BridgeEvent) {
        self.events.push(event);
    }

    /// Rejects recipients that would loop value back into the bridge system.
    pub(crate) fn check_recipient(&self, to: &Address) -> Result<()> {
        require!(*to != self.address, StandardBridgeError::CannotSendToSelf);
        require!(
            *to != self.messenger,
            StandardBridgeError::CannotSendToMessenger
        );
        Ok(())
    }

    /// Authenticates a finalize call and returns the domain it came from.
    ///
    /// The immediate caller must be the messenger and the messenger must report
    /// the peer bridge as the sender of the message being relayed.
    pub(crate) fn only_other_bridge<M: CrossDomainMessenger>(
        &self,
        ctx: &CallContext,
        messenger: &M,
    ) -> Result<ChainId> {
        require!(
            ctx.sender == self.messenger && messenger.address() == self.messenger,
            StandardBridgeError::OnlyOtherBridge
        );
        require!(
            messenger.cross_domain_sender() == Some(self.other_bridge),
            StandardBridgeError::OnlyOtherBridge
        );
        let source = messenger
            .cross_domain_source()
            .ok_or(StandardBridgeError::OnlyOtherBridge)?;
        Ok(source)
    }
}

#[error_code]
pub enum StandardBridgeError {
    #[msg("StandardBridge: function can only be called from an EOA")]
    OnlyEoa = 6300,
    #[msg("StandardBridge: cannot send to self")]
    CannotSendToSelf,
    #[msg("StandardBridge: cannot send to messenger")]
    CannotSendToMessenger,
    #[msg("StandardBridge: function can only be called from the other bridge")]
    OnlyOtherBridge,
    #[msg("StandardBridge: amount sent does not match amount required")]
    AmountMismatch,
    #[msg("StandardBridge: local token is not an Optimism Mintable ERC20")]
    UnrecognizedToken,
    #[msg("StandardBridge: wrong remote token for Optimism Mintable ERC20 local token")]
    WrongRemoteToken,
    #[msg("StandardBridge: ETH transfer failed")]
    EthTransferFailed,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    use crate::test_utils::{MockMessenger, OTHER_BRIDGE_ADDRESS, SOURCE_CHAIN};

    fn bridge() -> StandardBridge {
        StandardBridge::predeploy(&BridgeConfig {
            other_bridge: OTHER_BRIDGE_ADDRESS,
            remote_chain_id: SOURCE_CHAIN,
        })
    }

    #[test]
    fn test_only_other_bridge() {
        let bridge = bridge();
        let mut messenger = MockMessenger::new(bridge.messenger());
        let from_messenger = CallContext::new(bridge.messenger());

        assert_eq!(
            bridge
                .only_other_bridge(&from_messenger, &messenger)
                .unwrap_err(),
            Error::from(StandardBridgeError::OnlyOtherBridge)
        );

        messenger.relay_from(Address::repeat_byte(0xee), SOURCE_CHAIN);
        assert_eq!(
            bridge
                .only_other_bridge(&from_messenger, &messenger)
                .unwrap_err(),
            Error::from(StandardBridgeError::OnlyOtherBridge)
        );

        messenger.relay_from(OTHER_BRIDGE_ADDRESS, SOURCE_CHAIN);
        assert_eq!(
            bridge.only_other_bridge(&from_messenger, &messenger).unwrap(),
            SOURCE_CHAIN
        );

        let from_user = CallContext::new(Address::repeat_byte(0xa1));
        assert_eq!(
            bridge.only_other_bridge(&from_user, &messenger).unwrap_err(),
            Error::from(StandardBridgeError::OnlyOtherBridge)
        );
    }

    #[test]
    fn test_check_recipient() {
        let bridge = bridge();

        assert_eq!(
            bridge.check_recipient(&bridge.address()).unwrap_err(),
            Error::from(StandardBridgeError::CannotSendToSelf)
        );
        assert_eq!(
            bridge.check_recipient(&bridge.messenger()).unwrap_err(),
            Error::from(StandardBridgeError::CannotSendToMessenger)
        );
        assert!(bridge.check_recipient(&Address::repeat_byte(0xa1)).is_ok());
    }

    #[test]
    fn test_default_config_targets_compiled_network() {
        let config = BridgeConfig::default();
        assert_eq!(config.other_bridge, OTHER_BRIDGE);
        assert_eq!(config.remote_chain_id, REMOTE_CHAIN_ID);
        assert_eq!(bridge().version(), "1.1.0");
    }
}
