use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use anchor_lang::prelude::*;
use common::{CallContext, ChainId};

use crate::solidity::ICrossDomainMessenger::relayMessageCall;

pub mod l2_cross_domain_messenger;

pub use l2_cross_domain_messenger::*;

/// Capability the bridge consumes to authenticate inbound calls and to hand
/// outbound calls to the peer domain.
pub trait CrossDomainMessenger {
    fn address(&self) -> Address;

    /// Sender on the peer domain of the message currently being relayed.
    /// `None` outside of a relay.
    fn cross_domain_sender(&self) -> Option<Address>;

    /// Domain the message currently being relayed originated from.
    fn cross_domain_source(&self) -> Option<ChainId>;

    /// Sends a message to `target` on the default peer domain.
    ///
    /// `ctx.value` must already be held by the messenger.
    fn send_message(
        &mut self,
        ctx: &CallContext,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()>;

    /// Sends a message to `target` on the domain tagged `destination`.
    fn send_message_to_chain(
        &mut self,
        ctx: &CallContext,
        destination: ChainId,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()>;
}

/// An outbound message as it leaves the sending domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossDomainMessage {
    /// Versioned nonce: `MESSAGE_VERSION << 240 | nonce`.
    pub nonce: U256,
    pub destination: ChainId,
    pub sender: Address,
    pub target: Address,
    pub value: U256,
    pub min_gas_limit: u32,
    /// Gas the transport must provide so the relay can always be recorded.
    pub base_gas: u64,
    pub message: Bytes,
}

impl CrossDomainMessage {
    /// Calldata of the `relayMessage` call that delivers this message.
    pub fn relay_calldata(&self, source: ChainId) -> Vec<u8> {
        relayMessageCall {
            _nonce: self.nonce,
            _source: source,
            _sender: self.sender,
            _target: self.target,
            _value: self.value,
            _minGasLimit: U256::from(self.min_gas_limit),
            _message: self.message.clone(),
        }
        .abi_encode()
    }

    /// Unique identifier of the message; commits to value and min gas limit.
    pub fn hash(&self, source: ChainId) -> B256 {
        keccak256(self.relay_calldata(source))
    }
}

/// Adds a version number into the first two bytes of a message nonce.
pub fn encode_versioned_nonce(nonce: u64, version: u16) -> U256 {
    (U256::from(version) << 240) | U256::from(nonce)
}

/// Inverse of [`encode_versioned_nonce`].
pub fn decode_versioned_nonce(nonce: U256) -> (u64, u16) {
    let version = (nonce >> 240usize).to::<u16>();
    let low = nonce & ((U256::from(1) << 240usize) - U256::from(1));
    (low.saturating_to::<u64>(), version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_nonce() {
        let nonce = encode_versioned_nonce(7, 1);

        assert_eq!(nonce.to_be_bytes::<32>()[0..2], [0, 1]);
        assert_eq!(nonce.to_be_bytes::<32>()[31], 7);
        assert_eq!(decode_versioned_nonce(nonce), (7, 1));
    }

    #[test]
    fn test_hash_commits_to_source_and_value() {
        let message = CrossDomainMessage {
            nonce: encode_versioned_nonce(0, 1),
            destination: common::chain_id(902),
            sender: Address::repeat_byte(0x10),
            target: Address::repeat_byte(0x20),
            value: U256::from(5),
            min_gas_limit: 100_000,
            base_gas: 0,
            message: Bytes::from_static(b"payload"),
        };

        let calldata = message.relay_calldata(common::chain_id(901));
        assert_eq!(calldata[..4], relayMessageCall::SELECTOR);

        let decoded = relayMessageCall::abi_decode(&calldata, true).unwrap();
        assert_eq!(decoded._value, U256::from(5));
        assert_eq!(decoded._message, message.message);

        let hash = message.hash(common::chain_id(901));
        assert_ne!(hash, message.hash(common::chain_id(903)));

        let mut richer = message.clone();
        richer.value = U256::from(6);
        assert_ne!(hash, richer.hash(common::chain_id(901)));
    }
}
