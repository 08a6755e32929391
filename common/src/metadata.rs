use alloy_primitives::{keccak256, Address, B256};
use alloy_sol_types::{sol_data, SolType};

pub const DEFAULT_DECIMALS: u8 = 18;

/// Immutable description of a bridged token: its display metadata and the
/// counterpart it represents on the peer domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub remote_token: Address,
}

impl TokenMetadata {
    pub fn new(remote_token: Address, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals: DEFAULT_DECIMALS,
            remote_token,
        }
    }

    pub fn with_decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    /// Equivalent to keccak256(abi.encode(remoteToken, name, symbol, decimals)).
    pub fn hash(&self) -> B256 {
        keccak256(
            <(
                sol_data::Address,
                sol_data::String,
                sol_data::String,
                sol_data::Uint<8>,
            ) as SolType>::abi_encode_params(&(
                self.remote_token,
                self.name.clone(),
                self.symbol.clone(),
                self.decimals,
            )),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_commits_to_every_field() {
        let remote = Address::repeat_byte(0x42);
        let base = TokenMetadata::new(remote, "Wrapped Ether", "WETH");

        assert_eq!(base.decimals, DEFAULT_DECIMALS);
        assert_eq!(base.hash(), base.clone().hash());
        assert_ne!(base.hash(), base.clone().with_decimals(6).hash());
        assert_ne!(
            base.hash(),
            TokenMetadata::new(remote, "Wrapped Ether", "WETH2").hash()
        );
        assert_ne!(
            base.hash(),
            TokenMetadata::new(Address::repeat_byte(0x43), "Wrapped Ether", "WETH").hash()
        );
    }
}
