use std::collections::HashSet;

use alloy::rpc::types::{TransactionInput, TransactionRequest};
use alloy_primitives::{Address, Bytes, TxKind, U256};
use futures::future::try_join_all;
use log::{debug, warn};

use crate::approvals::{
    errors::ApprovalError,
    evm::{
        client::{ChainClient, ProviderSigner, TransactionSigner},
        constants::MAX_INT,
        contracts::{
            ApprovalCall, Erc1155Interface, Erc20Interface, Erc721Interface, TokenContract,
            TokenInterface,
        },
        models::{ApprovalAction, ApprovalActionCustom},
        utils::bytes_to_address,
    },
    models::{InsufficientApproval, Item, TokenStandard},
};

/// Returns how much of `item` the `operator` may currently move on behalf of `owner`.
///
/// Native items need no approval and always report `MAX_INT`. Operator approvals are
/// all-or-nothing, so ERC721 and ERC1155 items report either `MAX_INT` or zero. ERC20 items report
/// the allowance as is.
pub async fn approved_item_amount<C: ChainClient + ?Sized>(
    owner: &Bytes,
    item: &Item,
    operator: &Bytes,
    client: &C,
) -> Result<U256, ApprovalError> {
    match item.item_type.token_standard() {
        TokenStandard::Native => Ok(MAX_INT),
        TokenStandard::NonFungible | TokenStandard::SemiFungible => {
            // isApprovedForAll has the same signature in both standards.
            let contract = TokenContract::new(bytes_to_address(&item.token)?, &Erc721Interface);
            let approved = contract
                .is_approved_for_all(client, bytes_to_address(owner)?, bytes_to_address(operator)?)
                .await?;
            Ok(if approved { MAX_INT } else { U256::ZERO })
        }
        TokenStandard::Fungible => {
            let contract = TokenContract::new(bytes_to_address(&item.token)?, &Erc20Interface);
            contract
                .allowance(client, bytes_to_address(owner)?, bytes_to_address(operator)?)
                .await
        }
    }
}

/// Runs `approved_item_amount` for every item concurrently. Fails as a whole if any read fails.
pub async fn approved_item_amounts<C: ChainClient + ?Sized>(
    owner: &Bytes,
    items: &[Item],
    operator: &Bytes,
    client: &C,
) -> Result<Vec<U256>, ApprovalError> {
    try_join_all(
        items
            .iter()
            .map(|item| approved_item_amount(owner, item, operator, client)),
    )
    .await
}

/// Keeps the last record of every run of records sharing a token.
///
/// `approvals` must be grouped by token. A token reappearing after a different one is not merged
/// with its earlier run and yields a second record.
pub fn filter_last_per_token(approvals: &[InsufficientApproval]) -> Vec<&InsufficientApproval> {
    let kept: Vec<&InsufficientApproval> = approvals
        .iter()
        .enumerate()
        .filter(|(index, approval)| match approvals.get(index + 1) {
            Some(next) => next.token != approval.token,
            None => true,
        })
        .map(|(_, approval)| approval)
        .collect();

    let mut seen = HashSet::new();
    for approval in &kept {
        if !seen.insert(&approval.token) {
            warn!(
                "Approvals for token {} are not grouped, it will be approved more than once",
                approval.token
            );
        }
    }
    kept
}

/// Picks the contract binding and call that grant approval for `approval`. Anything that is not
/// an ERC721 or ERC1155 token is approved as a fungible token.
fn approval_contract(
    approval: &InsufficientApproval,
) -> Result<(TokenContract<'static>, ApprovalCall), ApprovalError> {
    let standard = approval.item_type.token_standard();
    let interface: &'static dyn TokenInterface = match standard {
        TokenStandard::NonFungible => &Erc721Interface,
        TokenStandard::SemiFungible => &Erc1155Interface,
        TokenStandard::Native | TokenStandard::Fungible => &Erc20Interface,
    };
    let operator = bytes_to_address(&approval.operator)?;
    let call = match standard {
        TokenStandard::NonFungible | TokenStandard::SemiFungible => {
            ApprovalCall::SetApprovalForAll { operator, approved: true }
        }
        TokenStandard::Native | TokenStandard::Fungible => {
            ApprovalCall::Approve { spender: operator, amount: MAX_INT }
        }
    };
    let contract = TokenContract::new(bytes_to_address(&approval.token)?, interface);
    Ok((contract, call))
}

/// Builds one approval action per token, each sent by `signer` when executed.
///
/// ERC721 and ERC1155 tokens get `setApprovalForAll(operator, true)`, ERC20 tokens get
/// `approve(operator, MAX_INT)`, as does any other record. Nothing is sent.
pub fn get_approval_actions<'s, S: TransactionSigner>(
    insufficient_approvals: &[InsufficientApproval],
    signer: &'s S,
) -> Result<Vec<ApprovalAction<&'s S>>, ApprovalError> {
    let mut actions = Vec::new();
    for approval in filter_last_per_token(insufficient_approvals) {
        let (contract, call) = approval_contract(approval)?;
        let transaction_methods = contract.transaction(call, signer)?;
        actions.push(ApprovalAction::new(approval, transaction_methods));
    }
    Ok(actions)
}

/// Like `get_approval_actions`, for a sender known only by address.
///
/// Each action also carries a raw request with the encoded call and the sender's current nonce.
/// All actions share that nonce since none of them has been sent yet. The transaction handles
/// submit through `client`, relying on the node to manage `signer_address`.
pub async fn get_approval_actions_custom<'c, C: ChainClient + ?Sized>(
    insufficient_approvals: &[InsufficientApproval],
    signer_address: &Bytes,
    client: &'c C,
) -> Result<Vec<ApprovalActionCustom<ProviderSigner<'c, C>>>, ApprovalError> {
    let approvals = filter_last_per_token(insufficient_approvals);
    if approvals.is_empty() {
        return Ok(Vec::new());
    }
    let from = bytes_to_address(signer_address)?;

    try_join_all(
        approvals
            .into_iter()
            .map(|approval| build_custom_action(approval, from, client)),
    )
    .await
}

async fn build_custom_action<'c, C: ChainClient + ?Sized>(
    approval: &InsufficientApproval,
    from: Address,
    client: &'c C,
) -> Result<ApprovalActionCustom<ProviderSigner<'c, C>>, ApprovalError> {
    let (contract, call) = approval_contract(approval)?;
    let data = contract.encode(&call)?;
    let transaction_methods = contract.transaction(call, ProviderSigner::new(from, client))?;
    let nonce = client.transaction_count(from).await?;
    debug!(
        "Prepared {} approval for token {} with nonce {}",
        contract.interface().name(),
        contract.address(),
        nonce
    );

    let transaction_request = TransactionRequest {
        from: Some(from),
        to: Some(TxKind::from(contract.address())),
        input: TransactionInput { input: Some(data), data: None },
        nonce: Some(nonce),
        ..Default::default()
    };
    Ok(ApprovalActionCustom {
        action: ApprovalAction::new(approval, transaction_methods),
        transaction_request,
    })
}
