use alloy::{
    providers::{Provider, RootProvider},
    rpc::types::TransactionRequest,
    transports::BoxTransport,
};
use alloy_primitives::{Address, Bytes, TxHash};

use crate::approvals::errors::ApprovalError;

/// The network capabilities approvals need: read-only contract calls, the account nonce, and
/// handing a transaction to the node for submission.
///
/// Batching several reads into one round trip (multicall) is left to the implementation.
#[allow(async_fn_in_trait)]
pub trait ChainClient {
    /// Executes a read-only call (`eth_call`) and returns the raw return data.
    async fn call_contract(&self, tx: &TransactionRequest) -> Result<Bytes, ApprovalError>;

    /// Returns the number of transactions sent from `address`, i.e. its next nonce.
    async fn transaction_count(&self, address: Address) -> Result<u64, ApprovalError>;

    /// Submits a transaction for the node to sign with the account in its `from` field
    /// (`eth_sendTransaction`).
    async fn submit_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ApprovalError>;
}

impl ChainClient for RootProvider<BoxTransport> {
    async fn call_contract(&self, tx: &TransactionRequest) -> Result<Bytes, ApprovalError> {
        Ok(Provider::call(self, tx).await?)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ApprovalError> {
        Ok(Provider::get_transaction_count(self, address).await?)
    }

    async fn submit_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ApprovalError> {
        let pending_tx = Provider::send_transaction(self, tx).await?;
        Ok(*pending_tx.tx_hash())
    }
}

/// Adapts any alloy provider, such as a filler-wrapped or batching one, to `ChainClient`.
pub struct ProviderClient<P>(pub P);

impl<P: Provider<BoxTransport>> ChainClient for ProviderClient<P> {
    async fn call_contract(&self, tx: &TransactionRequest) -> Result<Bytes, ApprovalError> {
        Ok(self.0.call(tx).await?)
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ApprovalError> {
        Ok(self
            .0
            .get_transaction_count(address)
            .await?)
    }

    async fn submit_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ApprovalError> {
        let pending_tx = self.0.send_transaction(tx).await?;
        Ok(*pending_tx.tx_hash())
    }
}

/// An identity able to send transactions.
#[allow(async_fn_in_trait)]
pub trait TransactionSigner {
    fn address(&self) -> Address;

    /// Sends `tx` and returns its hash. Does not wait for the transaction to be mined.
    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ApprovalError>;
}

impl<T: TransactionSigner + ?Sized> TransactionSigner for &T {
    fn address(&self) -> Address {
        (**self).address()
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ApprovalError> {
        (**self).send_transaction(tx).await
    }
}

/// Sends transactions as `address` through a client whose node manages that account.
pub struct ProviderSigner<'a, C: ?Sized> {
    address: Address,
    client: &'a C,
}

impl<'a, C: ChainClient + ?Sized> ProviderSigner<'a, C> {
    pub fn new(address: Address, client: &'a C) -> Self {
        Self { address, client }
    }
}

impl<C: ChainClient + ?Sized> TransactionSigner for ProviderSigner<'_, C> {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, mut tx: TransactionRequest) -> Result<TxHash, ApprovalError> {
        tx.from = Some(self.address);
        self.client
            .submit_transaction(tx)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use alloy::{providers::ProviderBuilder, rpc::types::TransactionInput};
    use alloy_primitives::TxKind;

    use super::*;
    use crate::approvals::evm::{
        constants::RPC_URL_ENV, testing::MockChainClient, utils::get_client,
    };

    fn assert_chain_client<C: ChainClient>() {}

    #[test]
    fn test_provider_client_wraps_alloy_providers() {
        assert_chain_client::<ProviderClient<RootProvider<BoxTransport>>>();
        assert_chain_client::<ProviderClient<std::sync::Arc<RootProvider<BoxTransport>>>>();
    }

    #[tokio::test]
    async fn test_provider_signer_sets_from() {
        let client = MockChainClient::default();
        let sender = Address::from_str("0x2c6a3cd97c6283b95ac8c5a4459ebb0d5fd404f4").unwrap();
        let signer = ProviderSigner::new(sender, &client);
        let tx = TransactionRequest {
            to: Some(TxKind::from(Address::ZERO)),
            input: TransactionInput { input: Some(Bytes::from(vec![1, 2, 3])), data: None },
            ..Default::default()
        };

        signer.send_transaction(tx).await.unwrap();

        let submitted = client.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].from, Some(sender));
        assert_eq!(signer.address(), sender);
    }

    /// Requires a node, run with the `fork-tests` feature and `ETH_RPC_URL` pointing to a mainnet
    /// endpoint or fork.
    #[tokio::test]
    #[cfg_attr(not(feature = "fork-tests"), ignore)]
    async fn test_transaction_count() {
        let client = get_client(None).await.unwrap();
        // Vitalik's account has sent transactions for years.
        let account = Address::from_str("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap();

        let count = client
            .transaction_count(account)
            .await
            .unwrap();
        assert!(count > 0);
    }

    #[tokio::test]
    #[cfg_attr(not(feature = "fork-tests"), ignore)]
    async fn test_provider_client_transaction_count() {
        dotenv::dotenv().ok();
        let rpc_url = std::env::var(RPC_URL_ENV).unwrap();
        let provider = ProviderBuilder::new()
            .on_builtin(&rpc_url)
            .await
            .unwrap();
        let client = ProviderClient(provider);
        let account = Address::from_str("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").unwrap();

        let count = client
            .transaction_count(account)
            .await
            .unwrap();
        assert!(count > 0);
    }
}
