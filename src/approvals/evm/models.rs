use alloy::rpc::types::TransactionRequest;
use alloy_primitives::Bytes;
use num_bigint::BigUint;

use crate::approvals::{
    evm::transaction::TransactionMethods,
    models::{InsufficientApproval, ItemType},
};

/// An approval step the owner has to execute before fulfilling an order.
#[derive(Debug)]
pub struct ApprovalAction<S> {
    pub token: Bytes,
    pub operator: Bytes,
    pub item_type: ItemType,
    pub identifier_or_criteria: BigUint,
    /// Grants the approval when executed.
    pub transaction_methods: TransactionMethods<S>,
}

impl<S> ApprovalAction<S> {
    pub(crate) fn new(
        approval: &InsufficientApproval,
        transaction_methods: TransactionMethods<S>,
    ) -> Self {
        Self {
            token: approval.token.clone(),
            operator: approval.operator.clone(),
            item_type: approval.item_type,
            identifier_or_criteria: approval
                .identifier_or_criteria
                .clone(),
            transaction_methods,
        }
    }
}

/// An `ApprovalAction` that also carries the raw request, for callers that sign and send
/// transactions through their own infrastructure.
#[derive(Debug)]
pub struct ApprovalActionCustom<S> {
    pub action: ApprovalAction<S>,
    /// `from`, `to`, `input` and `nonce` filled in, everything else left to the caller.
    pub transaction_request: TransactionRequest,
}
