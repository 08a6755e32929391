use std::collections::BTreeSet;

use alloy_primitives::{Address, Log};
use alloy_sol_types::SolEvent;
use anchor_lang::prelude::*;
use common::CallContext;

use crate::solidity::DeployerWhitelist::{OwnerChanged, WhitelistDisabled, WhitelistStatusChanged};

#[constant]
pub const VERSION: &str = "1.1.0";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WhitelistEvent {
    OwnerChanged(OwnerChanged),
    WhitelistStatusChanged(WhitelistStatusChanged),
    WhitelistDisabled(WhitelistDisabled),
}

impl WhitelistEvent {
    pub fn to_log(&self, address: Address) -> Log {
        let data = match self {
            WhitelistEvent::OwnerChanged(event) => event.encode_log_data(),
            WhitelistEvent::WhitelistStatusChanged(event) => event.encode_log_data(),
            WhitelistEvent::WhitelistDisabled(event) => event.encode_log_data(),
        };
        Log { address, data }
    }
}

/// Tracks which addresses may deploy contracts.
///
/// A zero owner means the whitelist is disabled and anyone may deploy. Once
/// disabled it can never be enabled again.
#[derive(Debug, Clone)]
pub struct DeployerWhitelist {
    address: Address,
    owner: Address,
    whitelist: BTreeSet<Address>,
    events: Vec<WhitelistEvent>,
}

impl DeployerWhitelist {
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            owner,
            whitelist: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn whitelist(&self, deployer: &Address) -> bool {
        self.whitelist.contains(deployer)
    }

    pub fn is_disabled(&self) -> bool {
        self.owner.is_zero()
    }

    /// Whether `deployer` may deploy contracts.
    pub fn is_deployer_allowed(&self, deployer: &Address) -> bool {
        self.is_disabled() || self.whitelist(deployer)
    }

    pub fn events(&self) -> &[WhitelistEvent] {
        &self.events
    }

    pub fn logs(&self) -> Vec<Log> {
        self.events
            .iter()
            .map(|event| event.to_log(self.address))
            .collect()
    }

    /// Adds or removes an address from the whitelist.
    pub fn set_whitelisted_deployer(
        &mut self,
        ctx: &CallContext,
        deployer: Address,
        whitelisted: bool,
    ) -> Result<()> {
        self.only_owner(ctx)?;

        if whitelisted {
            self.whitelist.insert(deployer);
        } else {
            self.whitelist.remove(&deployer);
        }

        self.events
            .push(WhitelistEvent::WhitelistStatusChanged(WhitelistStatusChanged {
                deployer,
                whitelisted,
            }));
        Ok(())
    }

    /// Hands administration to `new_owner`. Use
    /// [`Self::enable_arbitrary_contract_deployment`] to disable the whitelist instead.
    pub fn set_owner(&mut self, ctx: &CallContext, new_owner: Address) -> Result<()> {
        self.only_owner(ctx)?;
        require!(!new_owner.is_zero(), DeployerWhitelistError::ZeroOwner);

        let old_owner = std::mem::replace(&mut self.owner, new_owner);
        self.events.push(WhitelistEvent::OwnerChanged(OwnerChanged {
            oldOwner: old_owner,
            newOwner: new_owner,
        }));

        msg!("Deployer whitelist owner changed from {} to {}", old_owner, new_owner);

        Ok(())
    }

    /// Permanently opens deployment to everyone.
    pub fn enable_arbitrary_contract_deployment(&mut self, ctx: &CallContext) -> Result<()> {
        self.only_owner(ctx)?;

        let old_owner = std::mem::take(&mut self.owner);
        self.events
            .push(WhitelistEvent::WhitelistDisabled(WhitelistDisabled {
                oldOwner: old_owner,
            }));

        msg!("Deployer whitelist disabled by {}", old_owner);

        Ok(())
    }

    /// The zero address never administers a disabled whitelist.
    fn only_owner(&self, ctx: &CallContext) -> Result<()> {
        require!(
            !self.is_disabled() && ctx.sender == self.owner,
            DeployerWhitelistError::OnlyOwner
        );
        Ok(())
    }
}

#[error_code]
pub enum DeployerWhitelistError {
    #[msg("DeployerWhitelist: function can only be called by the owner of this contract")]
    OnlyOwner = 6500,
    #[msg("DeployerWhitelist: can only be disabled via enableArbitraryContractDeployment")]
    ZeroOwner,
}
