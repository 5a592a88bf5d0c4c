pub use clap::Parser;
use clap::{Args, Subcommand};

#[derive(Parser)]
/// Check token approvals and build the transactions that grant them
///
/// Reads JSON from stdin and writes JSON to stdout. Set RUST_LOG=debug for details.
pub struct Cli {
    /// JSON-RPC endpoint. Falls back to the ETH_RPC_URL environment variable
    #[arg(long)]
    pub rpc_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build approval transactions for a list of insufficient approvals
    ///
    /// Reads a JSON array from stdin, grouped by token:
    /// ```json
    /// [{
    ///     "token": "0x...",
    ///     "operator": "0x...",
    ///     "item_type": 1,
    ///     "identifier_or_criteria": "0"
    /// }]
    /// ```
    Actions(ActionsArgs),
    /// Report the amount of an item the operator may currently transfer for the owner
    ///
    /// Reads a JSON object from stdin:
    /// ```json
    /// {"item_type": 2, "token": "0x...", "identifier_or_criteria": "1"}
    /// ```
    ApprovedAmount(ApprovedAmountArgs),
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct SenderArgs {
    /// Address that will send the approval transactions
    #[arg(long)]
    pub signer: Option<String>,

    /// Private key of the sender. Only used to derive its address
    #[arg(long)]
    pub private_key: Option<String>,
}

#[derive(Args)]
pub struct ActionsArgs {
    #[command(flatten)]
    pub sender: SenderArgs,
}

#[derive(Args)]
pub struct ApprovedAmountArgs {
    /// Owner of the item
    #[arg(long)]
    pub owner: String,

    /// Operator that would transfer the item
    #[arg(long)]
    pub operator: String,
}
