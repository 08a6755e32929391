use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    contract MintableERC20 {
        event Transfer(address indexed from, address indexed to, uint256 value);

        event Approval(address indexed owner, address indexed spender, uint256 value);

        /// @notice Emitted whenever tokens are minted for an account.
        event Mint(address indexed account, uint256 amount);

        /// @notice Emitted whenever tokens are burned from an account.
        event Burn(address indexed account, uint256 amount);
    }

    #[derive(Debug, PartialEq, Eq)]
    contract MintableERC20Factory {
        /// @notice Emitted whenever a token is created. Kept for backwards compatibility with
        ///         legacy indexers.
        event StandardL2TokenCreated(address indexed remoteToken, address indexed localToken);

        /// @notice Emitted whenever a token is created.
        event OptimismMintableERC20Created(
            address indexed localToken,
            address indexed remoteToken,
            address deployer
        );
    }

    interface IERC165 {
        function supportsInterface(bytes4 interfaceId) external view returns (bool);
    }

    /// @notice Pre-Bedrock mintable token surface, still recognized by the bridge.
    interface ILegacyMintableERC20 {
        function l1Token() external view returns (address);
        function mint(address _to, uint256 _amount) external;
        function burn(address _from, uint256 _amount) external;
    }

    /// @notice Surface the bridge relies on to mint and burn a bridged token.
    interface IOptimismMintableERC20 {
        function remoteToken() external view returns (address);
        function bridge() external returns (address);
        function mint(address _to, uint256 _amount) external;
        function burn(address _from, uint256 _amount) external;
    }
}
