use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    contract ProtocolVersions {
        /// @notice Emitted when configuration is updated.
        event ConfigUpdate(uint256 indexed version, uint8 indexed updateType, bytes data);

        event Initialized(uint8 version);

        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    }
}
