use alloy::rpc::types::TransactionRequest;
use alloy_primitives::{Bytes, TxHash};

use crate::approvals::{
    errors::ApprovalError,
    evm::{client::TransactionSigner, contracts::ApprovalCall},
};

/// A prepared contract call bound to the signer that will send it.
///
/// Nothing reaches the network until `transact` is called.
pub struct TransactionMethods<S> {
    call: ApprovalCall,
    request: TransactionRequest,
    signer: S,
}

impl<S: TransactionSigner> TransactionMethods<S> {
    pub fn new(call: ApprovalCall, request: TransactionRequest, signer: S) -> Self {
        Self { call, request, signer }
    }

    /// The contract method and arguments this transaction invokes.
    pub fn call(&self) -> &ApprovalCall {
        &self.call
    }

    pub fn calldata(&self) -> Option<&Bytes> {
        self.request.input.input()
    }

    /// Returns the request that `transact` would send.
    pub fn build_transaction(&self) -> TransactionRequest {
        self.request.clone()
    }

    pub async fn transact(&self) -> Result<TxHash, ApprovalError> {
        self.signer
            .send_transaction(self.build_transaction())
            .await
    }
}

impl<S> std::fmt::Debug for TransactionMethods<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionMethods")
            .field("call", &self.call)
            .field("request", &self.request)
            .finish_non_exhaustive()
    }
}
