use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use anchor_lang::prelude::*;

use crate::ChainId;

/// Identity and attached native value of the current call frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Immediate caller (`msg.sender`).
    pub sender: Address,
    /// Native value attached to the call (`msg.value`).
    pub value: U256,
}

impl CallContext {
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            value: U256::ZERO,
        }
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    /// Rejects value sent to an entry point that is not payable.
    pub fn require_non_payable(&self) -> Result<()> {
        require!(self.value.is_zero(), ChainError::NonPayable);
        Ok(())
    }
}

/// Runtime code registered at an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Code {
    pub size: usize,
    /// Whether a plain value transfer to this contract succeeds.
    pub payable: bool,
}

impl Code {
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            payable: false,
        }
    }

    pub fn payable(mut self) -> Self {
        self.payable = true;
        self
    }
}

/// Native balances and deployed code of one domain.
#[derive(Debug, Clone)]
pub struct Chain {
    chain_id: ChainId,
    balances: BTreeMap<Address, U256>,
    code: BTreeMap<Address, Code>,
}

impl Chain {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            balances: BTreeMap::new(),
            code: BTreeMap::new(),
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn deploy(&mut self, address: Address, code: Code) -> Result<()> {
        require!(
            !self.code.contains_key(&address),
            ChainError::AddressCollision
        );
        self.code.insert(address, code);
        Ok(())
    }

    /// Size of the runtime code at `address`; zero for externally-owned accounts.
    pub fn code_size(&self, address: &Address) -> usize {
        self.code.get(address).map_or(0, |code| code.size)
    }

    pub fn is_contract(&self, address: &Address) -> bool {
        self.code_size(address) > 0
    }

    pub fn set_payable(&mut self, address: &Address, payable: bool) -> Result<()> {
        let code = self.code.get_mut(address).ok_or(ChainError::NoCode)?;
        code.payable = payable;
        Ok(())
    }

    pub fn balance(&self, address: &Address) -> U256 {
        self.balances.get(address).copied().unwrap_or_default()
    }

    /// Credits value that enters the domain from outside (genesis funding or
    /// a cross-domain delivery).
    pub fn credit(&mut self, address: Address, amount: U256) -> Result<()> {
        let balance = self
            .balance(&address)
            .checked_add(amount)
            .ok_or(ChainError::BalanceOverflow)?;
        self.set_balance(address, balance);
        Ok(())
    }

    /// Moves native value between two accounts as a plain call would.
    /// Moving zero value is a no-op, also into a contract that rejects value.
    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<()> {
        if amount.is_zero() {
            return Ok(());
        }

        let remaining = self
            .balance(&from)
            .checked_sub(amount)
            .ok_or(ChainError::InsufficientBalance)?;

        if let Some(code) = self.code.get(&to) {
            require!(code.payable, ChainError::ValueRejected);
        }

        if from == to {
            return Ok(());
        }

        let credited = self
            .balance(&to)
            .checked_add(amount)
            .ok_or(ChainError::BalanceOverflow)?;

        self.set_balance(from, remaining);
        self.set_balance(to, credited);
        Ok(())
    }

    fn set_balance(&mut self, address: Address, balance: U256) {
        if balance.is_zero() {
            self.balances.remove(&address);
        } else {
            self.balances.insert(address, balance);
        }
    }
}

#[error_code]
pub enum ChainError {
    #[msg("Insufficient native balance")]
    InsufficientBalance = 6000,
    #[msg("Native balance overflow")]
    BalanceOverflow,
    #[msg("Recipient rejected the value transfer")]
    ValueRejected,
    #[msg("Function is not payable")]
    NonPayable,
    #[msg("Contract already deployed at address")]
    AddressCollision,
    #[msg("No contract deployed at address")]
    NoCode,
}
