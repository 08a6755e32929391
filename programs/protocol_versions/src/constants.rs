use alloy_primitives::{b256, B256};
use anchor_lang::prelude::*;

#[constant]
pub const VERSION: &str = "1.0.0";

/// Version of the `ConfigUpdate` event payload.
#[constant]
pub const CONFIG_UPDATE_VERSION: u64 = 0;

/// `keccak256("protocolversion.required") - 1`
pub const REQUIRED_SLOT: B256 =
    b256!("4aaefe95bd84fd3f32700cf3b7566bc944b73138e41958b5785826df2aecace0");

/// `keccak256("protocolversion.recommended") - 1`
pub const RECOMMENDED_SLOT: B256 =
    b256!("e314dfc40f0025322aacc0ba8ef420b62fb3b702cf01e0cdf3d829117ac2ff1a");
