use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, Log, B256, U256};
use alloy_sol_types::{SolEvent, SolValue};
use anchor_lang::prelude::*;
use common::CallContext;

use crate::{
    constants::{CONFIG_UPDATE_VERSION, RECOMMENDED_SLOT, REQUIRED_SLOT, VERSION},
    solidity::ProtocolVersions::{ConfigUpdate, Initialized, OwnershipTransferred},
    ProtocolVersion,
};

/// Kind of value a `ConfigUpdate` event carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum UpdateType {
    RequiredProtocolVersion = 0,
    RecommendedProtocolVersion = 1,
}

impl UpdateType {
    fn slot(self) -> B256 {
        match self {
            UpdateType::RequiredProtocolVersion => REQUIRED_SLOT,
            UpdateType::RecommendedProtocolVersion => RECOMMENDED_SLOT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolVersionsEvent {
    ConfigUpdate(ConfigUpdate),
    Initialized(Initialized),
    OwnershipTransferred(OwnershipTransferred),
}

impl ProtocolVersionsEvent {
    pub fn to_log(&self, address: Address) -> Log {
        let data = match self {
            ProtocolVersionsEvent::ConfigUpdate(event) => event.encode_log_data(),
            ProtocolVersionsEvent::Initialized(event) => event.encode_log_data(),
            ProtocolVersionsEvent::OwnershipTransferred(event) => event.encode_log_data(),
        };
        Log { address, data }
    }
}

/// Owner-managed record of the required and recommended protocol versions.
///
/// Both versions live in raw storage words at hash-derived slots so that a
/// node can read them with a plain storage proof.
#[derive(Debug, Clone)]
pub struct ProtocolVersions {
    address: Address,
    owner: Address,
    initialized: bool,
    storage: BTreeMap<B256, B256>,
    events: Vec<ProtocolVersionsEvent>,
}

impl ProtocolVersions {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            owner: Address::ZERO,
            initialized: false,
            storage: BTreeMap::new(),
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

    pub fn required(&self) -> ProtocolVersion {
        ProtocolVersion::from(self.storage_at(&REQUIRED_SLOT))
    }

    pub fn recommended(&self) -> ProtocolVersion {
        ProtocolVersion::from(self.storage_at(&RECOMMENDED_SLOT))
    }

    /// Raw storage word at `slot`; unset slots read as zero.
    pub fn storage_at(&self, slot: &B256) -> B256 {
        self.storage.get(slot).copied().unwrap_or_default()
    }

    pub fn events(&self) -> &[ProtocolVersionsEvent] {
        &self.events
    }

    pub fn logs(&self) -> Vec<Log> {
        self.events
            .iter()
            .map(|event| event.to_log(self.address))
            .collect()
    }

    /// One-time setup. The caller becomes the owner for the duration of the
    /// call and immediately hands ownership to `owner`.
    ///
    /// # Arguments
    /// * `ctx`         - Any caller; only the first call succeeds
    /// * `owner`       - Account allowed to update the versions
    /// * `required`    - Initial required protocol version
    /// * `recommended` - Initial recommended protocol version
    pub fn initialize(
        &mut self,
        ctx: &CallContext,
        owner: Address,
        required: ProtocolVersion,
        recommended: ProtocolVersion,
    ) -> Result<()> {
        require!(
            !self.initialized,
            ProtocolVersionsError::AlreadyInitialized
        );
        require!(!owner.is_zero(), ProtocolVersionsError::ZeroOwner);

        self.initialized = true;
        self.set_owner(ctx.sender);
        self.set_owner(owner);
        self.set(UpdateType::RequiredProtocolVersion, required);
        self.set(UpdateType::RecommendedProtocolVersion, recommended);
        self.events
            .push(ProtocolVersionsEvent::Initialized(Initialized { version: 1 }));

        msg!(
            "Protocol versions initialized: required {}, recommended {}",
            required,
            recommended
        );

        Ok(())
    }

    pub fn set_required(&mut self, ctx: &CallContext, required: ProtocolVersion) -> Result<()> {
        self.only_owner(ctx)?;
        self.set(UpdateType::RequiredProtocolVersion, required);
        msg!("Required protocol version set to {}", required);
        Ok(())
    }

    pub fn set_recommended(
        &mut self,
        ctx: &CallContext,
        recommended: ProtocolVersion,
    ) -> Result<()> {
        self.only_owner(ctx)?;
        self.set(UpdateType::RecommendedProtocolVersion, recommended);
        msg!("Recommended protocol version set to {}", recommended);
        Ok(())
    }

    pub fn transfer_ownership(&mut self, ctx: &CallContext, new_owner: Address) -> Result<()> {
        self.only_owner(ctx)?;
        require!(!new_owner.is_zero(), ProtocolVersionsError::ZeroOwner);
        self.set_owner(new_owner);
        Ok(())
    }

    /// Leaves the registry without an owner. The versions are frozen afterwards.
    pub fn renounce_ownership(&mut self, ctx: &CallContext) -> Result<()> {
        self.only_owner(ctx)?;
        self.set_owner(Address::ZERO);
        Ok(())
    }

    fn only_owner(&self, ctx: &CallContext) -> Result<()> {
        require!(
            !self.owner.is_zero() && ctx.sender == self.owner,
            ProtocolVersionsError::CallerNotOwner
        );
        Ok(())
    }

    fn set_owner(&mut self, new_owner: Address) {
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        self.events
            .push(ProtocolVersionsEvent::OwnershipTransferred(
                OwnershipTransferred {
                    previousOwner: previous_owner,
                    newOwner: new_owner,
                },
            ));
        msg!("Ownership transferred from {} to {}", previous_owner, new_owner);
    }

    fn set(&mut self, update_type: UpdateType, version: ProtocolVersion) {
        self.storage.insert(update_type.slot(), version.as_word());
        self.events
            .push(ProtocolVersionsEvent::ConfigUpdate(ConfigUpdate {
                version: U256::from(CONFIG_UPDATE_VERSION),
                updateType: update_type as u8,
                data: Bytes::from(version.to_u256().abi_encode()),
            }));
    }
}

#[error_code]
pub enum ProtocolVersionsError {
    #[msg("Ownable: caller is not the owner")]
    CallerNotOwner = 6600,
    #[msg("Ownable: new owner is the zero address")]
    ZeroOwner,
    #[msg("Initializable: contract is already initialized")]
    AlreadyInitialized,
}
