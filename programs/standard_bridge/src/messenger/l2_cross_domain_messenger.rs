use std::{cmp::max, collections::BTreeSet};

use alloy_primitives::{Address, Bytes, Log, B256, U256};
use alloy_sol_types::SolEvent;
use anchor_lang::prelude::*;
use common::{CallContext, ChainId, Predeploys};

use super::{
    decode_versioned_nonce, encode_versioned_nonce, CrossDomainMessage, CrossDomainMessenger,
};
use crate::{
    solidity::ICrossDomainMessenger::{FailedRelayedMessage, RelayedMessage, SentMessage},
    ENCODING_OVERHEAD, FLOOR_CALLDATA_OVERHEAD, MESSAGE_VERSION, MESSENGER_VERSION,
    MIN_GAS_CALLDATA_OVERHEAD, MIN_GAS_DYNAMIC_OVERHEAD_DENOMINATOR,
    MIN_GAS_DYNAMIC_OVERHEAD_NUMERATOR, RELAY_CALL_OVERHEAD, RELAY_CONSTANT_OVERHEAD,
    RELAY_GAS_CHECK_BUFFER, RELAY_RESERVED_GAS, TX_BASE_GAS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessengerEvent {
    SentMessage(SentMessage),
    RelayedMessage(RelayedMessage),
    FailedRelayedMessage(FailedRelayedMessage),
}

impl MessengerEvent {
    pub fn to_log(&self, address: Address) -> Log {
        let data = match self {
            MessengerEvent::SentMessage(event) => event.encode_log_data(),
            MessengerEvent::RelayedMessage(event) => event.encode_log_data(),
            MessengerEvent::FailedRelayedMessage(event) => event.encode_log_data(),
        };
        Log { address, data }
    }
}

/// Whether an inbound message is delivered for the first time or replayed
/// after a failed delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    First,
    Replay,
}

/// Messenger of one domain. Outbound messages are queued in an outbox for
/// the transport to carry; inbound messages are tracked by hash so that each
/// is executed successfully at most once.
#[derive(Debug, Clone)]
pub struct L2CrossDomainMessenger {
    address: Address,
    chain_id: ChainId,
    remote_chain_id: ChainId,
    msg_nonce: u64,
    xdomain_sender: Option<Address>,
    xdomain_source: Option<ChainId>,
    successful_messages: BTreeSet<B256>,
    failed_messages: BTreeSet<B256>,
    outbox: Vec<CrossDomainMessage>,
    events: Vec<MessengerEvent>,
}

impl L2CrossDomainMessenger {
    pub fn new(address: Address, chain_id: ChainId, remote_chain_id: ChainId) -> Self {
        Self {
            address,
            chain_id,
            remote_chain_id,
            msg_nonce: 0,
            xdomain_sender: None,
            xdomain_source: None,
            successful_messages: BTreeSet::new(),
            failed_messages: BTreeSet::new(),
            outbox: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn version(&self) -> &'static str {
        MESSENGER_VERSION
    }

    pub fn remote_chain_id(&self) -> ChainId {
        self.remote_chain_id
    }

    /// Versioned nonce the next outbound message will carry.
    pub fn message_nonce(&self) -> U256 {
        encode_versioned_nonce(self.msg_nonce, MESSAGE_VERSION)
    }

    pub fn successful_message(&self, hash: &B256) -> bool {
        self.successful_messages.contains(hash)
    }

    pub fn failed_message(&self, hash: &B256) -> bool {
        self.failed_messages.contains(hash)
    }

    pub fn outbox(&self) -> &[CrossDomainMessage] {
        &self.outbox
    }

    /// Hands every queued outbound message to the transport.
    pub fn take_outbox(&mut self) -> Vec<CrossDomainMessage> {
        std::mem::take(&mut self.outbox)
    }

    pub fn events(&self) -> &[MessengerEvent] {
        &self.events
    }

    pub fn logs(&self) -> Vec<Log> {
        self.events
            .iter()
            .map(|event| event.to_log(self.address))
            .collect()
    }

    /// Checks that `message` may be relayed here and reports whether this is
    /// its first delivery. Nothing is written.
    ///
    /// # Arguments
    /// * `source`  - Domain the message was sent from
    /// * `message` - The message as queued by the sending messenger
    pub fn check_relay(&self, source: ChainId, message: &CrossDomainMessage) -> Result<Delivery> {
        let (_, version) = decode_versioned_nonce(message.nonce);
        require!(
            version <= MESSAGE_VERSION,
            MessengerError::UnsupportedVersion
        );
        require!(
            message.destination == self.chain_id,
            MessengerError::WrongDestination
        );
        require!(
            !self.is_unsafe_target(&message.target),
            MessengerError::BlockedTarget
        );

        // We use the v1 message hash as the unique identifier for the message because it commits
        // to the value and minimum gas limit of the message.
        let hash = message.hash(source);
        require!(
            !self.successful_messages.contains(&hash),
            MessengerError::MessageHasAlreadyBeenRelayed
        );

        if self.failed_messages.contains(&hash) {
            Ok(Delivery::Replay)
        } else {
            Ok(Delivery::First)
        }
    }

    /// Exposes the peer sender and source for the duration of the target call.
    pub fn enter_relay(&mut self, sender: Address, source: ChainId) {
        self.xdomain_sender = Some(sender);
        self.xdomain_source = Some(source);
    }

    pub fn exit_relay(&mut self) {
        self.xdomain_sender = None;
        self.xdomain_source = None;
    }

    /// Records the outcome of a relay attempt and returns the message hash.
    pub fn record_relay(
        &mut self,
        source: ChainId,
        message: &CrossDomainMessage,
        success: bool,
    ) -> B256 {
        let hash = message.hash(source);

        if success {
            self.failed_messages.remove(&hash);
            self.successful_messages.insert(hash);
            self.events
                .push(MessengerEvent::RelayedMessage(RelayedMessage {
                    messageNonce: message.nonce,
                    source,
                    msgHash: hash,
                }));
            msg!(
                "Relayed message {} (nonce {})",
                hash,
                decode_versioned_nonce(message.nonce).0
            );
        } else {
            self.failed_messages.insert(hash);
            self.events
                .push(MessengerEvent::FailedRelayedMessage(FailedRelayedMessage {
                    messageNonce: message.nonce,
                    source,
                    msgHash: hash,
                }));
            msg!("Failed to relay message {}", hash);
        }

        hash
    }

    fn is_unsafe_target(&self, target: &Address) -> bool {
        *target == self.address || *target == Predeploys::L2_TO_L1_MESSAGE_PASSER
    }

    fn enqueue(
        &mut self,
        ctx: &CallContext,
        destination: ChainId,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()> {
        let next_nonce = self
            .msg_nonce
            .checked_add(1)
            .ok_or(MessengerError::NonceOverflow)?;

        let message_nonce = self.message_nonce();
        let base_gas = base_gas(message.len() as u64, min_gas_limit);

        self.events.push(MessengerEvent::SentMessage(SentMessage {
            messageNonce: message_nonce,
            destination,
            target,
            sender: ctx.sender,
            message: message.clone(),
            gasLimit: U256::from(min_gas_limit),
            value: ctx.value,
        }));

        self.outbox.push(CrossDomainMessage {
            nonce: message_nonce,
            destination,
            sender: ctx.sender,
            target,
            value: ctx.value,
            min_gas_limit,
            base_gas,
            message,
        });

        self.msg_nonce = next_nonce;

        msg!(
            "Sent message {} to {} with base gas {}",
            message_nonce,
            target,
            base_gas
        );

        Ok(())
    }
}

impl CrossDomainMessenger for L2CrossDomainMessenger {
    fn address(&self) -> Address {
        self.address
    }

    fn cross_domain_sender(&self) -> Option<Address> {
        self.xdomain_sender
    }

    fn cross_domain_source(&self) -> Option<ChainId> {
        self.xdomain_source
    }

    fn send_message(
        &mut self,
        ctx: &CallContext,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()> {
        self.enqueue(ctx, self.remote_chain_id, target, message, min_gas_limit)
    }

    fn send_message_to_chain(
        &mut self,
        ctx: &CallContext,
        destination: ChainId,
        target: Address,
        message: Bytes,
        min_gas_limit: u32,
    ) -> Result<()> {
        self.enqueue(ctx, destination, target, message, min_gas_limit)
    }
}

/// Computes the amount of gas required to guarantee that a given message will be
/// received on the peer domain without running out of gas.
///
/// Guaranteeing that a message will not run out of gas is important because this ensures
/// that a message can always be replayed if it fails to execute completely.
///
/// # Arguments
/// * `message_len`   - Length of the message data to compute the required gas for
/// * `min_gas_limit` - Minimum desired gas limit when message goes to target on remote chain
pub fn base_gas(message_len: u64, min_gas_limit: u32) -> u64 {
    let execution_gas = RELAY_CONSTANT_OVERHEAD // Constant costs for relayMessage
        // Covers dynamic parts of the CALL opcode
        + RELAY_CALL_OVERHEAD
        // Ensures execution of relayMessage completes after call
        + RELAY_RESERVED_GAS
        // Buffer between hasMinGas check and the CALL
        + RELAY_GAS_CHECK_BUFFER
        // Minimum gas limit, multiplied by 64/63 to account for EIP-150.
        + ((min_gas_limit as u64 * MIN_GAS_DYNAMIC_OVERHEAD_NUMERATOR)
            / MIN_GAS_DYNAMIC_OVERHEAD_DENOMINATOR);

    // Only the message data is known here, so the rest of the relayMessage encoding is
    // covered by a conservative constant.
    let total_message_size = message_len + ENCODING_OVERHEAD;

    // After EIP-7623 the cost of a transaction is floored by its calldata size.
    TX_BASE_GAS
        + max(
            execution_gas + (total_message_size * MIN_GAS_CALLDATA_OVERHEAD),
            total_message_size * FLOOR_CALLDATA_OVERHEAD,
        )
}

#[error_code]
pub enum MessengerError {
    #[msg("CrossDomainMessenger: message destination is not this chain")]
    WrongDestination = 6400,
    #[msg("CrossDomainMessenger: cannot send message to blocked system address")]
    BlockedTarget,
    #[msg("CrossDomainMessenger: message has already been relayed")]
    MessageHasAlreadyBeenRelayed,
    #[msg("CrossDomainMessenger: message nonce overflow")]
    NonceOverflow,
    #[msg("CrossDomainMessenger: calldata does not match any function of the target")]
    UnknownFunction,
    #[msg("CrossDomainMessenger: target cannot be called with a message")]
    UnsupportedTarget,
    #[msg("CrossDomainMessenger: only version 0 or 1 messages are supported at this time")]
    UnsupportedVersion,
}
