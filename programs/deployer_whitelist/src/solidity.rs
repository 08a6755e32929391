use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    contract DeployerWhitelist {
        /// @notice Emitted when the owner of this contract changes.
        event OwnerChanged(address oldOwner, address newOwner);

        /// @notice Emitted when a deployer is added to or removed from the whitelist.
        event WhitelistStatusChanged(address deployer, bool whitelisted);

        /// @notice Emitted when the whitelist is disabled.
        event WhitelistDisabled(address oldOwner);
    }
}
