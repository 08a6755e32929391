use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Address, Log, B256};
use alloy_sol_types::{sol_data, SolEvent, SolType};
use anchor_lang::prelude::*;
use common::{CallContext, TokenMetadata};

use crate::{
    constants::FACTORY_VERSION,
    solidity::MintableERC20Factory::{OptimismMintableERC20Created, StandardL2TokenCreated},
    MintableToken,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FactoryEvent {
    StandardL2TokenCreated(StandardL2TokenCreated),
    OptimismMintableERC20Created(OptimismMintableERC20Created),
}

impl FactoryEvent {
    pub fn to_log(&self, address: Address) -> Log {
        let data = match self {
            FactoryEvent::StandardL2TokenCreated(event) => event.encode_log_data(),
            FactoryEvent::OptimismMintableERC20Created(event) => event.encode_log_data(),
        };
        Log { address, data }
    }
}

/// Deploys mintable tokens bound to a single bridge at deterministic addresses.
#[derive(Debug, Clone)]
pub struct MintableTokenFactory {
    address: Address,
    bridge: Address,
    /// local token => remote token
    deployments: BTreeMap<Address, Address>,
    events: Vec<FactoryEvent>,
}

impl MintableTokenFactory {
    pub fn new(address: Address, bridge: Address) -> Self {
        Self {
            address,
            bridge,
            deployments: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn bridge(&self) -> Address {
        self.bridge
    }

    pub fn version(&self) -> &'static str {
        FACTORY_VERSION
    }

    /// Remote token of a token this factory deployed, if any.
    pub fn deployment(&self, local_token: &Address) -> Option<Address> {
        self.deployments.get(local_token).copied()
    }

    pub fn events(&self) -> &[FactoryEvent] {
        &self.events
    }

    pub fn logs(&self) -> Vec<Log> {
        self.events
            .iter()
            .map(|event| event.to_log(self.address))
            .collect()
    }

    /// CREATE2 address of the token for `metadata`. The salt commits to the
    /// metadata and the init code hash to the constructor arguments, so the
    /// same metadata always lands on the same address.
    pub fn compute_address(&self, metadata: &TokenMetadata) -> Address {
        self.address
            .create2(metadata.hash(), self.init_code_hash(metadata))
    }

    /// Creates a token bound to this factory's bridge.
    ///
    /// # Arguments
    /// * `ctx`      - Call context; `ctx.sender` is recorded as the deployer
    /// * `metadata` - Remote token address, name, symbol and decimals of the new token
    pub fn create_mintable_token(
        &mut self,
        ctx: &CallContext,
        metadata: TokenMetadata,
    ) -> Result<MintableToken> {
        ctx.require_non_payable()?;
        require!(
            metadata.remote_token != Address::ZERO,
            FactoryError::MissingRemoteToken
        );

        let local_token = self.compute_address(&metadata);
        require!(
            !self.deployments.contains_key(&local_token),
            FactoryError::AlreadyDeployed
        );

        let remote_token = metadata.remote_token;
        self.deployments.insert(local_token, remote_token);

        // Legacy event first for indexers that predate the richer one.
        self.events
            .push(FactoryEvent::StandardL2TokenCreated(StandardL2TokenCreated {
                remoteToken: remote_token,
                localToken: local_token,
            }));
        self.events.push(FactoryEvent::OptimismMintableERC20Created(
            OptimismMintableERC20Created {
                localToken: local_token,
                remoteToken: remote_token,
                deployer: ctx.sender,
            },
        ));

        msg!(
            "Created mintable token {} for remote token {}",
            local_token,
            remote_token
        );

        Ok(MintableToken::new(local_token, self.bridge, metadata))
    }

    fn init_code_hash(&self, metadata: &TokenMetadata) -> B256 {
        keccak256(
            <(
                sol_data::Address,
                sol_data::Address,
                sol_data::String,
                sol_data::String,
                sol_data::Uint<8>,
            ) as SolType>::abi_encode_params(&(
                self.bridge,
                metadata.remote_token,
                metadata.name.clone(),
                metadata.symbol.clone(),
                metadata.decimals,
            )),
        )
    }
}

#[error_code]
pub enum FactoryError {
    #[msg("OptimismMintableERC20Factory: must provide remote token address")]
    MissingRemoteToken = 6200,
    #[msg("OptimismMintableERC20Factory: token already deployed")]
    AlreadyDeployed,
}
