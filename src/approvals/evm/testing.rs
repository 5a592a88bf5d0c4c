//! In-memory stand-ins for a node and a signer.

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    },
};

use alloy::{
    rpc::types::TransactionRequest,
    transports::{TransportError, TransportErrorKind},
};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::{SolCall, SolValue};

use crate::approvals::{
    errors::ApprovalError,
    evm::{
        client::{ChainClient, TransactionSigner},
        contracts::{IERC20, IERC721},
    },
};

/// Answers `allowance` and `isApprovedForAll` calls from configured state. Unknown allowances are
/// zero and unknown operators are not approved.
#[derive(Default)]
pub struct MockChainClient {
    allowances: HashMap<(Address, Address, Address), U256>,
    approvals_for_all: HashSet<(Address, Address, Address)>,
    nonces: HashMap<Address, u64>,
    fail_calls: bool,
    fail_nonce: bool,
    calls: AtomicUsize,
    nonce_queries: AtomicUsize,
    submitted: Mutex<Vec<TransactionRequest>>,
}

impl MockChainClient {
    pub fn with_allowance(
        mut self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Self {
        self.allowances
            .insert((token, owner, spender), amount);
        self
    }

    pub fn with_approval_for_all(
        mut self,
        token: Address,
        owner: Address,
        operator: Address,
    ) -> Self {
        self.approvals_for_all
            .insert((token, owner, operator));
        self
    }

    pub fn with_nonce(mut self, address: Address, nonce: u64) -> Self {
        self.nonces.insert(address, nonce);
        self
    }

    pub fn failing_calls(mut self) -> Self {
        self.fail_calls = true;
        self
    }

    pub fn failing_nonce(mut self) -> Self {
        self.fail_nonce = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn nonce_queries(&self) -> usize {
        self.nonce_queries.load(Ordering::SeqCst)
    }

    pub fn submitted(&self) -> Vec<TransactionRequest> {
        self.submitted.lock().unwrap().clone()
    }
}

fn transport_error(message: &'static str) -> ApprovalError {
    let err: TransportError = TransportErrorKind::custom_str(message);
    err.into()
}

impl ChainClient for MockChainClient {
    async fn call_contract(&self, tx: &TransactionRequest) -> Result<Bytes, ApprovalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_calls {
            return Err(transport_error("eth_call failed"));
        }
        let token = tx
            .to
            .and_then(|kind| kind.to().copied())
            .expect("call without target");
        let data = tx.input.input().expect("call without input");

        if data.starts_with(&IERC20::allowanceCall::SELECTOR) {
            let call = IERC20::allowanceCall::abi_decode(data, true)?;
            let allowance = self
                .allowances
                .get(&(token, call.owner, call.spender))
                .copied()
                .unwrap_or_default();
            Ok(allowance.abi_encode().into())
        } else if data.starts_with(&IERC721::isApprovedForAllCall::SELECTOR) {
            let call = IERC721::isApprovedForAllCall::abi_decode(data, true)?;
            let approved = self
                .approvals_for_all
                .contains(&(token, call.owner, call.operator));
            Ok(approved.abi_encode().into())
        } else {
            Err(transport_error("execution reverted"))
        }
    }

    async fn transaction_count(&self, address: Address) -> Result<u64, ApprovalError> {
        self.nonce_queries
            .fetch_add(1, Ordering::SeqCst);
        if self.fail_nonce {
            return Err(transport_error("eth_getTransactionCount failed"));
        }
        Ok(self
            .nonces
            .get(&address)
            .copied()
            .unwrap_or_default())
    }

    async fn submit_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ApprovalError> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(tx);
        Ok(TxHash::with_last_byte(submitted.len() as u8))
    }
}

/// Records every transaction it is asked to send.
#[derive(Debug)]
pub struct RecordingSigner {
    address: Address,
    sent: Mutex<Vec<TransactionRequest>>,
}

impl RecordingSigner {
    pub fn new(address: Address) -> Self {
        Self { address, sent: Mutex::new(Vec::new()) }
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.sent.lock().unwrap().clone()
    }
}

impl TransactionSigner for RecordingSigner {
    fn address(&self) -> Address {
        self.address
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> Result<TxHash, ApprovalError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(tx);
        Ok(TxHash::with_last_byte(sent.len() as u8))
    }
}
