use std::{
    io::{self, Read},
    str::FromStr,
};

use alloy::signers::local::PrivateKeySigner;
use alloy_primitives::{Bytes, B256};
use log::info;
use order_approvals::approvals::{
    errors::ApprovalError,
    evm::{
        approvals_manager::{approved_item_amount, get_approval_actions_custom},
        utils::get_client,
    },
    models::{InsufficientApproval, Item},
};
use serde_json::Value;

mod lib {
    pub mod cli;
}

use lib::cli::{Cli, Command, Parser, SenderArgs};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    // Read from stdin until EOF
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| format!("Failed to read from stdin: {}", e))?;

    if buffer.trim().is_empty() {
        eprintln!("Error: No input provided");
        std::process::exit(1);
    }

    let output = match cli.command {
        Command::Actions(args) => {
            let signer = sender_address(&args.sender)?;
            build_actions(&buffer, &signer, cli.rpc_url).await?
        }
        Command::ApprovedAmount(args) => {
            let owner = parse_address(&args.owner)?;
            let operator = parse_address(&args.operator)?;
            approved_amount(&buffer, &owner, &operator, cli.rpc_url).await?
        }
    };

    println!(
        "{}",
        serde_json::to_string(&output).map_err(|e| format!("Failed to serialize output: {}", e))?
    );

    Ok(())
}

fn parse_address(address: &str) -> Result<Bytes, ApprovalError> {
    Bytes::from_str(address)
        .map_err(|_| ApprovalError::InvalidInput(format!("Invalid address: {}", address)))
}

fn sender_address(sender: &SenderArgs) -> Result<Bytes, ApprovalError> {
    match (&sender.signer, &sender.private_key) {
        (Some(address), _) => parse_address(address),
        (None, Some(private_key)) => {
            let pk = B256::from_str(private_key).map_err(|_| {
                ApprovalError::FatalError("Failed to convert private key to B256".to_string())
            })?;
            let signer = PrivateKeySigner::from_bytes(&pk).map_err(|_| {
                ApprovalError::FatalError("Failed to create signer from private key".to_string())
            })?;
            Ok(Bytes::copy_from_slice(signer.address().as_slice()))
        }
        (None, None) => {
            Err(ApprovalError::InvalidInput("Either a signer or a private key is required".into()))
        }
    }
}

async fn build_actions(
    input: &str,
    signer: &Bytes,
    rpc_url: Option<String>,
) -> Result<Value, ApprovalError> {
    let approvals: Vec<InsufficientApproval> = serde_json::from_str(input)?;
    let client = get_client(rpc_url).await?;

    let actions = get_approval_actions_custom(&approvals, signer, client.as_ref()).await?;
    info!("Built {} approval actions for {} records", actions.len(), approvals.len());

    let actions: Vec<Value> = actions
        .iter()
        .map(|custom| {
            let action = &custom.action;
            let request = &custom.transaction_request;
            let data = request
                .input
                .input()
                .cloned()
                .unwrap_or_default();
            serde_json::json!({
                "token": action.token,
                "operator": action.operator,
                "item_type": action.item_type,
                "identifier_or_criteria": action.identifier_or_criteria.to_string(),
                "method": action.transaction_methods.call().method(),
                "transaction": {
                    "from": request.from,
                    "to": request.to.and_then(|kind| kind.to().copied()),
                    "data": format!("0x{}", hex::encode(data)),
                    "nonce": request.nonce,
                },
            })
        })
        .collect();
    Ok(Value::Array(actions))
}

async fn approved_amount(
    input: &str,
    owner: &Bytes,
    operator: &Bytes,
    rpc_url: Option<String>,
) -> Result<Value, ApprovalError> {
    let item: Item = serde_json::from_str(input)?;
    let client = get_client(rpc_url).await?;

    let amount = approved_item_amount(owner, &item, operator, client.as_ref()).await?;
    Ok(serde_json::json!({ "approved_amount": amount.to_string() }))
}
