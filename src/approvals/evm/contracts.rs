use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy_primitives::{Address, Bytes, TxKind, U256};
use alloy_sol_types::{sol, SolCall};

use crate::approvals::{
    errors::ApprovalError,
    evm::{
        client::{ChainClient, TransactionSigner},
        transaction::TransactionMethods,
    },
};

sol! {
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
    }

    interface IERC721 {
        function isApprovedForAll(address owner, address operator) external view returns (bool);
        function setApprovalForAll(address operator, bool approved) external;
    }

    interface IERC1155 {
        function isApprovedForAll(address account, address operator) external view returns (bool);
        function setApprovalForAll(address operator, bool approved) external;
    }
}

/// A state-changing call that grants approval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApprovalCall {
    Approve { spender: Address, amount: U256 },
    SetApprovalForAll { operator: Address, approved: bool },
}

impl ApprovalCall {
    pub fn method(&self) -> &'static str {
        match self {
            ApprovalCall::Approve { .. } => "approve",
            ApprovalCall::SetApprovalForAll { .. } => "setApprovalForAll",
        }
    }
}

/// A read-only call reporting existing approval.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ApprovalQuery {
    Allowance { owner: Address, spender: Address },
    IsApprovedForAll { owner: Address, operator: Address },
}

impl ApprovalQuery {
    pub fn method(&self) -> &'static str {
        match self {
            ApprovalQuery::Allowance { .. } => "allowance",
            ApprovalQuery::IsApprovedForAll { .. } => "isApprovedForAll",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResult {
    Allowance(U256),
    ApprovedForAll(bool),
}

/// ABI of a token standard, restricted to the approval methods.
///
/// Asking an interface for a method it does not expose fails with
/// `ApprovalError::UnsupportedMethod`.
pub trait TokenInterface: Send + Sync {
    fn name(&self) -> &'static str;

    fn encode_call(&self, call: &ApprovalCall) -> Result<Bytes, ApprovalError>;

    fn decode_call(&self, data: &[u8]) -> Result<ApprovalCall, ApprovalError>;

    fn encode_query(&self, query: &ApprovalQuery) -> Result<Bytes, ApprovalError>;

    fn decode_query(
        &self,
        query: &ApprovalQuery,
        output: &[u8],
    ) -> Result<QueryResult, ApprovalError>;

    fn unsupported(&self, method: &'static str) -> ApprovalError {
        ApprovalError::UnsupportedMethod { interface: self.name(), method }
    }
}

/// Fungible tokens: bounded allowances.
pub struct Erc20Interface;

impl TokenInterface for Erc20Interface {
    fn name(&self) -> &'static str {
        "ERC20"
    }

    fn encode_call(&self, call: &ApprovalCall) -> Result<Bytes, ApprovalError> {
        match call {
            ApprovalCall::Approve { spender, amount } => {
                Ok(IERC20::approveCall { spender: *spender, value: *amount }
                    .abi_encode()
                    .into())
            }
            other => Err(self.unsupported(other.method())),
        }
    }

    fn decode_call(&self, data: &[u8]) -> Result<ApprovalCall, ApprovalError> {
        let call = IERC20::approveCall::abi_decode(data, true)?;
        Ok(ApprovalCall::Approve { spender: call.spender, amount: call.value })
    }

    fn encode_query(&self, query: &ApprovalQuery) -> Result<Bytes, ApprovalError> {
        match query {
            ApprovalQuery::Allowance { owner, spender } => {
                Ok(IERC20::allowanceCall { owner: *owner, spender: *spender }
                    .abi_encode()
                    .into())
            }
            other => Err(self.unsupported(other.method())),
        }
    }

    fn decode_query(
        &self,
        query: &ApprovalQuery,
        output: &[u8],
    ) -> Result<QueryResult, ApprovalError> {
        match query {
            ApprovalQuery::Allowance { .. } => {
                let allowance = IERC20::allowanceCall::abi_decode_returns(output, true)?;
                Ok(QueryResult::Allowance(allowance._0))
            }
            other => Err(self.unsupported(other.method())),
        }
    }
}

// ERC721 and ERC1155 expose the same operator approval methods, only the bindings differ.
macro_rules! operator_approval_interface {
    ($interface:ident, $binding:ident, $name:literal) => {
        pub struct $interface;

        impl TokenInterface for $interface {
            fn name(&self) -> &'static str {
                $name
            }

            fn encode_call(&self, call: &ApprovalCall) -> Result<Bytes, ApprovalError> {
                match call {
                    ApprovalCall::SetApprovalForAll { operator, approved } => {
                        Ok($binding::setApprovalForAllCall {
                            operator: *operator,
                            approved: *approved,
                        }
                        .abi_encode()
                        .into())
                    }
                    other => Err(self.unsupported(other.method())),
                }
            }

            fn decode_call(&self, data: &[u8]) -> Result<ApprovalCall, ApprovalError> {
                let call = $binding::setApprovalForAllCall::abi_decode(data, true)?;
                Ok(ApprovalCall::SetApprovalForAll {
                    operator: call.operator,
                    approved: call.approved,
                })
            }

            fn encode_query(&self, query: &ApprovalQuery) -> Result<Bytes, ApprovalError> {
                match query {
                    ApprovalQuery::IsApprovedForAll { owner, operator } => {
                        Ok($binding::isApprovedForAllCall::new((*owner, *operator))
                            .abi_encode()
                            .into())
                    }
                    other => Err(self.unsupported(other.method())),
                }
            }

            fn decode_query(
                &self,
                query: &ApprovalQuery,
                output: &[u8],
            ) -> Result<QueryResult, ApprovalError> {
                match query {
                    ApprovalQuery::IsApprovedForAll { .. } => {
                        let approved =
                            $binding::isApprovedForAllCall::abi_decode_returns(output, true)?;
                        Ok(QueryResult::ApprovedForAll(approved._0))
                    }
                    other => Err(self.unsupported(other.method())),
                }
            }
        }
    };
}

operator_approval_interface!(Erc721Interface, IERC721, "ERC721");
operator_approval_interface!(Erc1155Interface, IERC1155, "ERC1155");

/// A token contract deployed at `address`, spoken to through `interface`.
pub struct TokenContract<'a> {
    address: Address,
    interface: &'a dyn TokenInterface,
}

impl<'a> TokenContract<'a> {
    pub fn new(address: Address, interface: &'a dyn TokenInterface) -> Self {
        Self { address, interface }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn interface(&self) -> &'a dyn TokenInterface {
        self.interface
    }

    /// Encodes `call` against this contract's interface.
    pub fn encode(&self, call: &ApprovalCall) -> Result<Bytes, ApprovalError> {
        self.interface.encode_call(call)
    }

    /// Runs `query` as an `eth_call` against this contract.
    pub async fn read<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        query: &ApprovalQuery,
    ) -> Result<QueryResult, ApprovalError> {
        let data = self.interface.encode_query(query)?;
        let tx = TransactionRequest {
            to: Some(TxKind::from(self.address)),
            input: TransactionInput { input: Some(data), data: None },
            ..Default::default()
        };
        let output = client.call_contract(&tx).await?;
        self.interface
            .decode_query(query, &output)
    }

    pub async fn allowance<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ApprovalError> {
        match self
            .read(client, &ApprovalQuery::Allowance { owner, spender })
            .await?
        {
            QueryResult::Allowance(amount) => Ok(amount),
            other => Err(ApprovalError::FatalError(format!(
                "Unexpected result for allowance: {:?}",
                other
            ))),
        }
    }

    pub async fn is_approved_for_all<C: ChainClient + ?Sized>(
        &self,
        client: &C,
        owner: Address,
        operator: Address,
    ) -> Result<bool, ApprovalError> {
        match self
            .read(client, &ApprovalQuery::IsApprovedForAll { owner, operator })
            .await?
        {
            QueryResult::ApprovedForAll(approved) => Ok(approved),
            other => Err(ApprovalError::FatalError(format!(
                "Unexpected result for isApprovedForAll: {:?}",
                other
            ))),
        }
    }

    /// Prepares `call` for `signer` without sending it. The request's `from` is the signer's
    /// address.
    pub fn transaction<S: TransactionSigner>(
        &self,
        call: ApprovalCall,
        signer: S,
    ) -> Result<TransactionMethods<S>, ApprovalError> {
        let data = self.encode(&call)?;
        let request = TransactionRequest {
            from: Some(signer.address()),
            to: Some(TxKind::from(self.address)),
            input: TransactionInput { input: Some(data), data: None },
            ..Default::default()
        };
        Ok(TransactionMethods::new(call, request, signer))
    }
}
