use alloy_primitives::U256;

/// Approval amount treated as unbounded. Granted to operators for fungible tokens and reported for
/// native items and operators approved for all tokens of a contract.
pub const MAX_INT: U256 = U256::MAX;

/// Environment variable holding the JSON-RPC endpoint used when none is passed explicitly.
pub const RPC_URL_ENV: &str = "ETH_RPC_URL";
