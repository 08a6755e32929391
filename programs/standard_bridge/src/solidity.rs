use alloy_sol_types::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IStandardBridge {
        /// @notice Emitted when an ETH bridge is initiated to another chain.
        event ETHBridgeInitiated(
            bytes32 indexed destinationChain,
            address indexed from,
            address indexed to,
            uint256 amount,
            bytes extraData
        );

        /// @notice Emitted when an ETH bridge is finalized on this chain.
        event ETHBridgeFinalized(
            bytes32 indexed sourceChain,
            address indexed from,
            address indexed to,
            uint256 amount,
            bytes extraData
        );

        /// @notice Emitted when an ERC20 bridge is initiated to another chain.
        event ERC20BridgeInitiated(
            bytes32 indexed destinationChain,
            address indexed localToken,
            address indexed from,
            address remoteToken,
            address to,
            uint256 amount,
            bytes extraData
        );

        /// @notice Emitted when an ERC20 bridge is finalized on this chain.
        event ERC20BridgeFinalized(
            bytes32 indexed sourceChain,
            address indexed localToken,
            address indexed from,
            address remoteToken,
            address to,
            uint256 amount,
            bytes extraData
        );

        function finalizeBridgeETH(
            address _from,
            address _to,
            uint256 _amount,
            bytes calldata _extraData
        ) external payable;

        function finalizeBridgeERC20(
            address _localToken,
            address _remoteToken,
            address _from,
            address _to,
            uint256 _amount,
            bytes calldata _extraData
        ) external;
    }

    #[derive(Debug, PartialEq, Eq)]
    interface ICrossDomainMessenger {
        event SentMessage(
            uint256 indexed messageNonce,
            bytes32 indexed destination,
            address indexed target,
            address sender,
            bytes message,
            uint256 gasLimit,
            uint256 value
        );

        event RelayedMessage(uint256 indexed messageNonce, bytes32 indexed source, bytes32 indexed msgHash);

        event FailedRelayedMessage(uint256 indexed messageNonce, bytes32 indexed source, bytes32 indexed msgHash);

        function relayMessage(
            uint256 _nonce,
            bytes32 _source,
            address _sender,
            address _target,
            uint256 _value,
            uint256 _minGasLimit,
            bytes calldata _message
        ) external payable;
    }
}
