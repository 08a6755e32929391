//! Addresses of the OP-stack predeploys this workspace instantiates.
//! See <https://specs.optimism.io/protocol/predeploys.html>.

use alloy_primitives::{address, Address};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Predeploys;

impl Predeploys {
    /// Legacy allow-list of addresses permitted to deploy contracts.
    pub const DEPLOYER_WHITELIST: Address = address!("4200000000000000000000000000000000000002");

    /// Messenger that authenticates cross-domain calls on this domain.
    pub const L2_CROSS_DOMAIN_MESSENGER: Address =
        address!("4200000000000000000000000000000000000007");

    /// Standard bridge; the only authorized minter of interop mintable tokens.
    pub const L2_STANDARD_BRIDGE: Address = address!("4200000000000000000000000000000000000010");

    /// Factory that deploys mintable tokens bound to the standard bridge.
    pub const OPTIMISM_MINTABLE_ERC20_FACTORY: Address =
        address!("4200000000000000000000000000000000000012");

    /// Message passer of the legacy withdrawal path; never a valid relay target.
    pub const L2_TO_L1_MESSAGE_PASSER: Address =
        address!("4200000000000000000000000000000000000016");

    /// Nominal runtime code size registered for in-process predeploys.
    pub const CODE_SIZE: usize = 1_024;
}
