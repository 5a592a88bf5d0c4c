use std::{env, sync::Arc};

use alloy::{
    providers::{ProviderBuilder, RootProvider},
    transports::BoxTransport,
};
use alloy_primitives::{Address, Bytes};
use dotenv::dotenv;

use crate::approvals::{errors::ApprovalError, evm::constants::RPC_URL_ENV};

/// Safely converts a `Bytes` object to an `Address` object.
///
/// Checks the length of the `Bytes` before attempting to convert, and returns an `ApprovalError`
/// if not 20 bytes long.
pub fn bytes_to_address(address: &Bytes) -> Result<Address, ApprovalError> {
    if address.len() == 20 {
        Ok(Address::from_slice(address))
    } else {
        Err(ApprovalError::InvalidInput(format!("Invalid address: {:?}", address)))
    }
}

/// Connects to the JSON-RPC endpoint at `rpc_url`, falling back to the `ETH_RPC_URL` environment
/// variable (a `.env` file is loaded first).
pub async fn get_client(
    rpc_url: Option<String>,
) -> Result<Arc<RootProvider<BoxTransport>>, ApprovalError> {
    dotenv().ok();
    let rpc_url = match rpc_url {
        Some(url) => url,
        None => env::var(RPC_URL_ENV).map_err(|_| {
            ApprovalError::FatalError(format!("Missing {} in environment", RPC_URL_ENV))
        })?,
    };
    let client = ProviderBuilder::new()
        .on_builtin(&rpc_url)
        .await?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;

    #[test]
    fn test_bytes_to_address() {
        let bytes = Bytes::from_str("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").unwrap();
        let address = bytes_to_address(&bytes).unwrap();
        assert_eq!(
            address,
            Address::from_str("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").unwrap()
        );
    }

    #[rstest]
    #[case::empty("0x")]
    #[case::too_short("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb")]
    #[case::too_long("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb4800")]
    fn test_bytes_to_address_invalid(#[case] input: &str) {
        let bytes = Bytes::from_str(input).unwrap();
        let result = bytes_to_address(&bytes);
        assert!(matches!(result, Err(ApprovalError::InvalidInput(_))));
    }
}
