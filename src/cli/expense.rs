//! Expense CLI commands

use clap::Subcommand;

use crate::display::transaction::{format_receipt, format_transaction_list};
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::{CategoryId, GroupId};
use crate::services::ExpenseRequest;

use super::{find_account, parse_money};

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense, optionally split across a group
    Add {
        /// Paying account (ID or email)
        payer: String,
        /// Amount (e.g., "25.50")
        amount: String,
        /// What the money was spent on
        #[arg(short, long)]
        description: String,
        /// Spending category
        #[arg(short, long, default_value = "general")]
        category: String,
        /// Split evenly across this group's members
        #[arg(short, long)]
        group: Option<String>,
    },
    /// List expenses an account took part in
    List {
        /// Account ID or email
        account: String,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Finish allocations interrupted by a crash or partial failure
    Recover,
}

/// Handle an expense command
pub async fn handle_expense_command(
    ledger: &Ledger,
    cmd: ExpenseCommands,
    symbol: &str,
) -> LedgerResult<()> {
    match cmd {
        ExpenseCommands::Add {
            payer,
            amount,
            description,
            category,
            group,
        } => {
            let payer = find_account(ledger, &payer).await?;
            let amount = parse_money(&amount)?;
            let group_id = group
                .map(|g| {
                    g.parse::<GroupId>()
                        .map_err(|_| LedgerError::Validation(format!("Invalid group ID: '{}'", g)))
                })
                .transpose()?;

            let receipt = ledger
                .record_expense(ExpenseRequest {
                    payer: payer.id,
                    description,
                    amount,
                    category_id: CategoryId::new(category),
                    group_id,
                })
                .await?;
            print!("{}", format_receipt(&receipt, symbol));
        }

        ExpenseCommands::List { account, limit } => {
            let account = find_account(ledger, &account).await?;
            let mut transactions = ledger.expenses().list_transactions(account.id).await?;
            transactions.truncate(limit);
            print!("{}", format_transaction_list(&transactions, account.id, symbol));
        }

        ExpenseCommands::Recover => {
            let report = ledger.expenses().recover_incomplete().await?;
            println!("Completed {} allocation(s)", report.completed.len());
            for (intent, failed) in &report.still_failing {
                println!(
                    "  {} still failing for {} participant(s)",
                    intent,
                    failed.len()
                );
            }
        }
    }

    Ok(())
}
