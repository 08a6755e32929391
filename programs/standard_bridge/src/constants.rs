use anchor_lang::prelude::*;

mod private {
    use alloy_primitives::{address, b256, Address};
    use common::ChainId;

    #[cfg(feature = "devnet")]
    pub mod config {
        use super::*;

        // L1StandardBridge on Sepolia
        pub const OTHER_BRIDGE: Address = address!("FBb0621E0B23b5478B630BD55a5f21f67730B0F1");
        // Sepolia (11155111)
        pub const REMOTE_CHAIN_ID: ChainId =
            b256!("0000000000000000000000000000000000000000000000000000000000aa36a7");
    }

    #[cfg(feature = "mainnet")]
    pub mod config {
        use super::*;

        // L1StandardBridge on Ethereum
        pub const OTHER_BRIDGE: Address = address!("99C9fc46f92E8a1c0deC1b1747d010903E884bE1");
        pub const REMOTE_CHAIN_ID: ChainId =
            b256!("0000000000000000000000000000000000000000000000000000000000000001");
    }

    #[cfg(not(any(feature = "devnet", feature = "mainnet")))]
    pub mod config {
        use super::*;

        // Local interop devnet: every domain runs the bridge at the same predeploy address.
        pub const OTHER_BRIDGE: Address = address!("4200000000000000000000000000000000000010");
        // 901
        pub const REMOTE_CHAIN_ID: ChainId =
            b256!("0000000000000000000000000000000000000000000000000000000000000385");
    }
}

pub use private::config::*;

#[constant]
pub const VERSION: &str = "1.1.0";

#[constant]
pub const MESSENGER_VERSION: &str = "2.1.0";

#[constant]
/// @notice Current message version identifier.
pub const MESSAGE_VERSION: u16 = 1;

#[constant]
/// @notice Minimum gas limit used for ETH sent straight to the bridge without a call.
pub const RECEIVE_DEFAULT_GAS_LIMIT: u32 = 200_000;

#[constant]
/// @notice Constant overhead added to the base gas for a message.
pub const RELAY_CONSTANT_OVERHEAD: u64 = 200_000;

#[constant]
/// @notice Gas reserved for performing the external call in `relayMessage`.
pub const RELAY_CALL_OVERHEAD: u64 = 40_000;

#[constant]
/// @notice Gas reserved for finalizing the execution of `relayMessage` after the safe call.
pub const RELAY_RESERVED_GAS: u64 = 40_000;

#[constant]
/// @notice Gas reserved for the execution between the `hasMinGas` check and the external
///         call in `relayMessage`.
pub const RELAY_GAS_CHECK_BUFFER: u64 = 5_000;

#[constant]
/// @notice Numerator for dynamic overhead added to the base gas for a message.
pub const MIN_GAS_DYNAMIC_OVERHEAD_NUMERATOR: u64 = 64;

#[constant]
/// @notice Denominator for dynamic overhead added to the base gas for a message.
pub const MIN_GAS_DYNAMIC_OVERHEAD_DENOMINATOR: u64 = 63;

#[constant]
/// @notice Overhead added to the internal message data when the full call to relayMessage is
///         ABI encoded. 260 is an upper bound, actual overhead can be as low as 228 bytes for
///         an empty message.
pub const ENCODING_OVERHEAD: u64 = 260;

#[constant]
/// @notice Base gas required for any transaction in the EVM.
pub const TX_BASE_GAS: u64 = 21_000;

#[constant]
/// @notice Extra gas added to base gas for each byte of calldata in a message.
pub const MIN_GAS_CALLDATA_OVERHEAD: u64 = 16;

#[constant]
/// @notice Floor overhead per byte of non-zero calldata in a message. Calldata floor was
///         introduced in EIP-7623.
pub const FLOOR_CALLDATA_OVERHEAD: u64 = 40;
