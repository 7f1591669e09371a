//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::display::account::{format_account_details, format_account_list};
use crate::error::LedgerResult;
use crate::ledger::Ledger;

use super::{find_account, parse_money};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Register a new account
    Register {
        /// Display name
        name: String,
        /// Contact email (must be unique)
        email: String,
        /// Monthly allowance (e.g., "500.00" or "500")
        #[arg(short, long)]
        allowance: String,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Account ID or email
        account: String,
    },
}

/// Handle an account command
///
/// Amounts are printed with `symbol`
pub async fn handle_account_command(
    ledger: &Ledger,
    cmd: AccountCommands,
    symbol: &str,
) -> LedgerResult<()> {
    let service = ledger.accounts();

    match cmd {
        AccountCommands::Register {
            name,
            email,
            allowance,
        } => {
            let allowance = parse_money(&allowance)?;
            let account = service.register(&name, &email, allowance).await?;

            println!("Registered account: {}", account.name);
            println!("  Email:      {}", account.email);
            println!("  Allowance:  {}", account.monthly_allowance.format_with_symbol(symbol));
            println!("  ID:         {}", account.id);
        }

        AccountCommands::List => {
            let accounts = service.list().await?;
            print!("{}", format_account_list(&accounts, symbol));
        }

        AccountCommands::Show { account } => {
            let found = find_account(ledger, &account).await?;
            let summary = service.summary(found.id).await?;
            print!("{}", format_account_details(&summary, symbol));
        }
    }

    Ok(())
}
