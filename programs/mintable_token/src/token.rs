use std::collections::BTreeMap;

use alloy_primitives::{Address, Log, U256};
use alloy_sol_types::SolEvent;
use anchor_lang::prelude::*;
use common::{CallContext, Predeploys, TokenMetadata};

use crate::{
    constants::{
        ERC165_INTERFACE_ID, LEGACY_MINTABLE_ERC20_INTERFACE_ID,
        OPTIMISM_MINTABLE_ERC20_INTERFACE_ID, VERSION,
    },
    solidity::MintableERC20::{Approval, Burn, Mint, Transfer},
};

/// Events recorded by a [`MintableToken`], in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    Transfer(Transfer),
    Approval(Approval),
    Mint(Mint),
    Burn(Burn),
}

impl TokenEvent {
    /// ABI-encodes the event as it would appear in a receipt emitted by `address`.
    pub fn to_log(&self, address: Address) -> Log {
        let data = match self {
            TokenEvent::Transfer(event) => event.encode_log_data(),
            TokenEvent::Approval(event) => event.encode_log_data(),
            TokenEvent::Mint(event) => event.encode_log_data(),
            TokenEvent::Burn(event) => event.encode_log_data(),
        };
        Log { address, data }
    }
}

/// Fungible ledger whose supply is controlled exclusively by one bridge.
///
/// Every operation validates before it writes, so a failed call leaves the
/// ledger and its event log untouched.
#[derive(Debug, Clone)]
pub struct MintableToken {
    address: Address,
    bridge: Address,
    metadata: TokenMetadata,
    total_supply: U256,
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<(Address, Address), U256>,
    events: Vec<TokenEvent>,
}

impl MintableToken {
    pub fn new(address: Address, bridge: Address, metadata: TokenMetadata) -> Self {
        Self {
            address,
            bridge,
            metadata,
            total_supply: U256::ZERO,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Interop flavour: the minter is always the standard bridge predeploy.
    pub fn interop(address: Address, metadata: TokenMetadata) -> Self {
        Self::new(address, Predeploys::L2_STANDARD_BRIDGE, metadata)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn bridge(&self) -> Address {
        self.bridge
    }

    pub fn remote_token(&self) -> Address {
        self.metadata.remote_token
    }

    /// Legacy getter for [`Self::remote_token`].
    pub fn l1_token(&self) -> Address {
        self.remote_token()
    }

    /// Legacy getter for [`Self::bridge`].
    pub fn l2_bridge(&self) -> Address {
        self.bridge()
    }

    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn symbol(&self) -> &str {
        &self.metadata.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.metadata.decimals
    }

    pub fn version(&self) -> &'static str {
        VERSION
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn supports_interface(&self, interface_id: [u8; 4]) -> bool {
        interface_id == ERC165_INTERFACE_ID
            || interface_id == LEGACY_MINTABLE_ERC20_INTERFACE_ID
            || interface_id == OPTIMISM_MINTABLE_ERC20_INTERFACE_ID
    }

    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    pub fn logs(&self) -> Vec<Log> {
        self.events
            .iter()
            .map(|event| event.to_log(self.address))
            .collect()
    }

    pub fn transfer(&mut self, ctx: &CallContext, to: Address, amount: U256) -> Result<bool> {
        let balances = self.compute_transfer(ctx.sender, to, amount)?;
        self.commit_transfer(ctx.sender, to, amount, balances);
        Ok(true)
    }

    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<bool> {
        let current = self.allowance(&from, &ctx.sender);
        let remaining = if current == U256::MAX {
            None
        } else {
            Some(
                current
                    .checked_sub(amount)
                    .ok_or(TokenError::InsufficientAllowance)?,
            )
        };

        let balances = self.compute_transfer(from, to, amount)?;

        if let Some(remaining) = remaining {
            self.write_allowance(from, ctx.sender, remaining);
        }
        self.commit_transfer(from, to, amount, balances);
        Ok(true)
    }

    pub fn approve(&mut self, ctx: &CallContext, spender: Address, amount: U256) -> Result<bool> {
        self.check_approval(ctx.sender, spender)?;
        self.write_allowance(ctx.sender, spender, amount);
        Ok(true)
    }

    /// Fails instead of saturating when the result would exceed `U256::MAX`.
    pub fn increase_allowance(
        &mut self,
        ctx: &CallContext,
        spender: Address,
        added_value: U256,
    ) -> Result<bool> {
        self.check_approval(ctx.sender, spender)?;
        let allowance = self
            .allowance(&ctx.sender, &spender)
            .checked_add(added_value)
            .ok_or(TokenError::AllowanceOverflow)?;
        self.write_allowance(ctx.sender, spender, allowance);
        Ok(true)
    }

    pub fn decrease_allowance(
        &mut self,
        ctx: &CallContext,
        spender: Address,
        subtracted_value: U256,
    ) -> Result<bool> {
        self.check_approval(ctx.sender, spender)?;
        let allowance = self
            .allowance(&ctx.sender, &spender)
            .checked_sub(subtracted_value)
            .ok_or(TokenError::DecreasedAllowanceBelowZero)?;
        self.write_allowance(ctx.sender, spender, allowance);
        Ok(true)
    }

    /// Allows the bridge to mint tokens.
    pub fn mint(&mut self, ctx: &CallContext, to: Address, amount: U256) -> Result<()> {
        self.only_bridge(ctx)?;
        require!(to != Address::ZERO, TokenError::MintToZeroAddress);

        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::SupplyOverflow)?;
        let balance = self
            .balance_of(&to)
            .checked_add(amount)
            .ok_or(TokenError::BalanceOverflow)?;

        self.total_supply = total_supply;
        self.set_balance(to, balance);

        self.events.push(TokenEvent::Transfer(Transfer {
            from: Address::ZERO,
            to,
            value: amount,
        }));
        self.events.push(TokenEvent::Mint(Mint {
            account: to,
            amount,
        }));

        Ok(())
    }

    /// Allows the bridge to burn tokens.
    pub fn burn(&mut self, ctx: &CallContext, from: Address, amount: U256) -> Result<()> {
        self.only_bridge(ctx)?;
        require!(from != Address::ZERO, TokenError::BurnFromZeroAddress);

        let balance = self
            .balance_of(&from)
            .checked_sub(amount)
            .ok_or(TokenError::BurnExceedsBalance)?;
        let total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(TokenError::BurnExceedsBalance)?;

        self.set_balance(from, balance);
        self.total_supply = total_supply;

        self.events.push(TokenEvent::Transfer(Transfer {
            from,
            to: Address::ZERO,
            value: amount,
        }));
        self.events.push(TokenEvent::Burn(Burn {
            account: from,
            amount,
        }));

        Ok(())
    }

    fn only_bridge(&self, ctx: &CallContext) -> Result<()> {
        require!(ctx.sender == self.bridge, TokenError::OnlyBridge);
        Ok(())
    }

    fn check_approval(&self, owner: Address, spender: Address) -> Result<()> {
        require!(owner != Address::ZERO, TokenError::ApproveFromZeroAddress);
        require!(spender != Address::ZERO, TokenError::ApproveToZeroAddress);
        Ok(())
    }

    /// Returns the post-transfer balances of `(from, to)` without writing them.
    fn compute_transfer(&self, from: Address, to: Address, amount: U256) -> Result<(U256, U256)> {
        require!(from != Address::ZERO, TokenError::TransferFromZeroAddress);
        require!(to != Address::ZERO, TokenError::TransferToZeroAddress);

        let from_balance = self
            .balance_of(&from)
            .checked_sub(amount)
            .ok_or(TokenError::TransferExceedsBalance)?;

        // A self-transfer credits the already debited balance.
        let to_balance = if from == to {
            from_balance
        } else {
            self.balance_of(&to)
        }
        .checked_add(amount)
        .ok_or(TokenError::BalanceOverflow)?;

        Ok((from_balance, to_balance))
    }

    fn commit_transfer(
        &mut self,
        from: Address,
        to: Address,
        amount: U256,
        (from_balance, to_balance): (U256, U256),
    ) {
        self.set_balance(from, from_balance);
        self.set_balance(to, to_balance);
        self.events.push(TokenEvent::Transfer(Transfer {
            from,
            to,
            value: amount,
        }));
    }

    fn write_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
        self.events.push(TokenEvent::Approval(Approval {
            owner,
            spender,
            value: amount,
        }));
    }

    fn set_balance(&mut self, account: Address, balance: U256) {
        if balance.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }
}

#[error_code]
pub enum TokenError {
    #[msg("OptimismMintableERC20: only bridge can mint and burn")]
    OnlyBridge = 6100,
    #[msg("ERC20: transfer from the zero address")]
    TransferFromZeroAddress,
    #[msg("ERC20: transfer to the zero address")]
    TransferToZeroAddress,
    #[msg("ERC20: transfer amount exceeds balance")]
    TransferExceedsBalance,
    #[msg("ERC20: insufficient allowance")]
    InsufficientAllowance,
    #[msg("ERC20: approve from the zero address")]
    ApproveFromZeroAddress,
    #[msg("ERC20: approve to the zero address")]
    ApproveToZeroAddress,
    #[msg("ERC20: decreased allowance below zero")]
    DecreasedAllowanceBelowZero,
    #[msg("ERC20: allowance overflow")]
    AllowanceOverflow,
    #[msg("ERC20: mint to the zero address")]
    MintToZeroAddress,
    #[msg("ERC20: burn from the zero address")]
    BurnFromZeroAddress,
    #[msg("ERC20: burn amount exceeds balance")]
    BurnExceedsBalance,
    #[msg("ERC20: total supply overflow")]
    SupplyOverflow,
    #[msg("ERC20: balance overflow")]
    BalanceOverflow,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::error::Error;

    const TOKEN: Address = Address::repeat_byte(0x70);
    const BRIDGE: Address = Address::repeat_byte(0xb1);
    const REMOTE_TOKEN: Address = Address::repeat_byte(0x42);
    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);
    const SPENDER: Address = Address::repeat_byte(0x5e);

    fn token() -> MintableToken {
        MintableToken::new(
            TOKEN,
            BRIDGE,
            TokenMetadata::new(REMOTE_TOKEN, "Bridged Token", "BT"),
        )
    }

    fn bridge() -> CallContext {
        CallContext::new(BRIDGE)
    }

    fn funded(account: Address, amount: u64) -> MintableToken {
        let mut token = token();
        token.mint(&bridge(), account, U256::from(amount)).unwrap();
        token
    }

    #[test]
    fn test_mint_by_bridge() {
        let mut token = token();

        token.mint(&bridge(), ALICE, U256::from(100)).unwrap();

        assert_eq!(token.balance_of(&ALICE), U256::from(100));
        assert_eq!(token.total_supply(), U256::from(100));
        assert_eq!(
            token.events(),
            &[
                TokenEvent::Transfer(Transfer {
                    from: Address::ZERO,
                    to: ALICE,
                    value: U256::from(100),
                }),
                TokenEvent::Mint(Mint {
                    account: ALICE,
                    amount: U256::from(100),
                }),
            ]
        );
    }

    #[test]
    fn test_mint_by_non_bridge_fails_without_side_effects() {
        let mut token = funded(ALICE, 100);
        let events_before = token.events().len();

        let result = token.mint(&CallContext::new(BOB), ALICE, U256::from(1));

        assert_eq!(result.unwrap_err(), Error::from(TokenError::OnlyBridge));
        assert_eq!(token.balance_of(&ALICE), U256::from(100));
        assert_eq!(token.total_supply(), U256::from(100));
        assert_eq!(token.events().len(), events_before);
    }

    #[test]
    fn test_mint_to_zero_address_fails() {
        let mut token = token();
        let result = token.mint(&bridge(), Address::ZERO, U256::from(1));
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::MintToZeroAddress)
        );
        assert!(token.events().is_empty());
    }

    #[test]
    fn test_mint_overflowing_supply_fails() {
        let mut token = token();
        token.mint(&bridge(), ALICE, U256::MAX).unwrap();

        let result = token.mint(&bridge(), BOB, U256::from(1));

        assert_eq!(result.unwrap_err(), Error::from(TokenError::SupplyOverflow));
        assert_eq!(token.total_supply(), U256::MAX);
        assert_eq!(token.balance_of(&BOB), U256::ZERO);
    }

    #[test]
    fn test_burn_by_bridge() {
        let mut token = funded(ALICE, 100);

        token.burn(&bridge(), ALICE, U256::from(30)).unwrap();

        assert_eq!(token.balance_of(&ALICE), U256::from(70));
        assert_eq!(token.total_supply(), U256::from(70));
        assert_eq!(
            &token.events()[2..],
            &[
                TokenEvent::Transfer(Transfer {
                    from: ALICE,
                    to: Address::ZERO,
                    value: U256::from(30),
                }),
                TokenEvent::Burn(Burn {
                    account: ALICE,
                    amount: U256::from(30),
                }),
            ]
        );
    }

    #[test]
    fn test_burn_failures() {
        let mut token = funded(ALICE, 10);

        let result = token.burn(&CallContext::new(ALICE), ALICE, U256::from(1));
        assert_eq!(result.unwrap_err(), Error::from(TokenError::OnlyBridge));

        let result = token.burn(&bridge(), ALICE, U256::from(11));
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::BurnExceedsBalance)
        );

        let result = token.burn(&bridge(), Address::ZERO, U256::ZERO);
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::BurnFromZeroAddress)
        );

        assert_eq!(token.balance_of(&ALICE), U256::from(10));
        assert_eq!(token.total_supply(), U256::from(10));
        assert_eq!(token.events().len(), 2);
    }

    #[test]
    fn test_transfer() {
        let mut token = funded(ALICE, 100);

        let ok = token
            .transfer(&CallContext::new(ALICE), BOB, U256::from(25))
            .unwrap();

        assert!(ok);
        assert_eq!(token.balance_of(&ALICE), U256::from(75));
        assert_eq!(token.balance_of(&BOB), U256::from(25));
        assert_eq!(token.total_supply(), U256::from(100));
        assert_eq!(
            token.events().last(),
            Some(&TokenEvent::Transfer(Transfer {
                from: ALICE,
                to: BOB,
                value: U256::from(25),
            }))
        );
    }

    #[test]
    fn test_transfer_rejections() {
        let mut token = funded(ALICE, 10);

        let result = token.transfer(&CallContext::new(ALICE), BOB, U256::from(11));
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::TransferExceedsBalance)
        );

        let result = token.transfer(&CallContext::new(ALICE), Address::ZERO, U256::from(1));
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::TransferToZeroAddress)
        );

        let result = token.transfer(&CallContext::new(Address::ZERO), BOB, U256::ZERO);
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::TransferFromZeroAddress)
        );

        assert_eq!(token.balance_of(&ALICE), U256::from(10));
        assert_eq!(token.balance_of(&BOB), U256::ZERO);
        assert_eq!(token.events().len(), 2);
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let mut token = funded(ALICE, 10);

        token
            .transfer(&CallContext::new(ALICE), ALICE, U256::from(4))
            .unwrap();

        assert_eq!(token.balance_of(&ALICE), U256::from(10));
        assert_eq!(token.total_supply(), U256::from(10));
    }

    #[test]
    fn test_zero_amount_transfer_still_emits() {
        let mut token = token();

        token
            .transfer(&CallContext::new(ALICE), BOB, U256::ZERO)
            .unwrap();
        token.mint(&bridge(), BOB, U256::ZERO).unwrap();

        assert_eq!(token.total_supply(), U256::ZERO);
        assert_eq!(token.events().len(), 3);
    }

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let mut token = funded(ALICE, 100);
        token
            .approve(&CallContext::new(ALICE), SPENDER, U256::from(50))
            .unwrap();

        token
            .transfer_from(&CallContext::new(SPENDER), ALICE, BOB, U256::from(20))
            .unwrap();

        assert_eq!(token.allowance(&ALICE, &SPENDER), U256::from(30));
        assert_eq!(token.balance_of(&BOB), U256::from(20));

        let tail = &token.events()[token.events().len() - 2..];
        assert_eq!(
            tail,
            &[
                TokenEvent::Approval(Approval {
                    owner: ALICE,
                    spender: SPENDER,
                    value: U256::from(30),
                }),
                TokenEvent::Transfer(Transfer {
                    from: ALICE,
                    to: BOB,
                    value: U256::from(20),
                }),
            ]
        );
    }

    #[test]
    fn test_transfer_from_insufficient_allowance() {
        let mut token = funded(ALICE, 100);
        token
            .approve(&CallContext::new(ALICE), SPENDER, U256::from(5))
            .unwrap();

        let result =
            token.transfer_from(&CallContext::new(SPENDER), ALICE, BOB, U256::from(6));

        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::InsufficientAllowance)
        );
        assert_eq!(token.allowance(&ALICE, &SPENDER), U256::from(5));
        assert_eq!(token.balance_of(&ALICE), U256::from(100));
    }

    #[test]
    fn test_transfer_from_insufficient_balance_keeps_allowance() {
        let mut token = funded(ALICE, 3);
        token
            .approve(&CallContext::new(ALICE), SPENDER, U256::from(10))
            .unwrap();

        let result =
            token.transfer_from(&CallContext::new(SPENDER), ALICE, BOB, U256::from(4));

        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::TransferExceedsBalance)
        );
        assert_eq!(token.allowance(&ALICE, &SPENDER), U256::from(10));
    }

    #[test]
    fn test_unlimited_allowance_is_not_decremented() {
        let mut token = funded(ALICE, 100);
        token
            .approve(&CallContext::new(ALICE), SPENDER, U256::MAX)
            .unwrap();

        for _ in 0..2 {
            token
                .transfer_from(&CallContext::new(SPENDER), ALICE, BOB, U256::from(1))
                .unwrap();
            assert_eq!(token.allowance(&ALICE, &SPENDER), U256::MAX);
        }

        assert_eq!(token.balance_of(&BOB), U256::from(2));
    }

    #[test]
    fn test_allowance_adjustments() {
        let mut token = token();
        let alice = CallContext::new(ALICE);

        token
            .increase_allowance(&alice, SPENDER, U256::from(10))
            .unwrap();
        token
            .decrease_allowance(&alice, SPENDER, U256::from(4))
            .unwrap();
        assert_eq!(token.allowance(&ALICE, &SPENDER), U256::from(6));

        let result = token.decrease_allowance(&alice, SPENDER, U256::from(7));
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::DecreasedAllowanceBelowZero)
        );

        token.approve(&alice, SPENDER, U256::MAX).unwrap();
        let result = token.increase_allowance(&alice, SPENDER, U256::from(1));
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::AllowanceOverflow)
        );
        assert_eq!(token.allowance(&ALICE, &SPENDER), U256::MAX);

        let result = token.approve(&alice, Address::ZERO, U256::from(1));
        assert_eq!(
            result.unwrap_err(),
            Error::from(TokenError::ApproveToZeroAddress)
        );
    }

    #[test]
    fn test_supports_interface() {
        let token = token();

        assert!(token.supports_interface(ERC165_INTERFACE_ID));
        assert!(token.supports_interface(OPTIMISM_MINTABLE_ERC20_INTERFACE_ID));
        assert!(token.supports_interface(LEGACY_MINTABLE_ERC20_INTERFACE_ID));
        assert!(!token.supports_interface([0xff; 4]));
    }

    #[test]
    fn test_metadata_getters() {
        let token = token();

        assert_eq!(token.remote_token(), REMOTE_TOKEN);
        assert_eq!(token.l1_token(), REMOTE_TOKEN);
        assert_eq!(token.bridge(), BRIDGE);
        assert_eq!(token.l2_bridge(), BRIDGE);
        assert_eq!(token.name(), "Bridged Token");
        assert_eq!(token.symbol(), "BT");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.version(), VERSION);
    }

    #[test]
    fn test_interop_token_is_minted_by_standard_bridge() {
        let mut token = MintableToken::interop(
            TOKEN,
            TokenMetadata::new(REMOTE_TOKEN, "Interop Token", "IT").with_decimals(6),
        );
        assert_eq!(token.bridge(), Predeploys::L2_STANDARD_BRIDGE);
        assert_eq!(token.decimals(), 6);

        let result = token.mint(&bridge(), ALICE, U256::from(1));
        assert_eq!(result.unwrap_err(), Error::from(TokenError::OnlyBridge));

        token
            .mint(
                &CallContext::new(Predeploys::L2_STANDARD_BRIDGE),
                ALICE,
                U256::from(1),
            )
            .unwrap();
        assert_eq!(token.balance_of(&ALICE), U256::from(1));
    }

    #[test]
    fn test_logs_carry_indexed_topics() {
        let token = funded(ALICE, 7);
        let logs = token.logs();

        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|log| log.address == TOKEN));

        let transfer = &logs[0];
        assert_eq!(transfer.topics()[0], Transfer::SIGNATURE_HASH);
        assert_eq!(transfer.topics()[2], ALICE.into_word());

        let decoded = Mint::decode_log_data(&logs[1].data, true).unwrap();
        assert_eq!(decoded.account, ALICE);
        assert_eq!(decoded.amount, U256::from(7));
    }
}
