//! Group CLI commands

use clap::Subcommand;

use crate::display::account::format_group_details;
use crate::error::{LedgerError, LedgerResult};
use crate::ledger::Ledger;
use crate::models::GroupId;

use super::find_account;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a group of accounts that split expenses
    Create {
        /// Group name
        name: String,
        /// Creating account (ID or email); always a member
        #[arg(short, long)]
        creator: String,
        /// Other members (ID or email), repeatable
        #[arg(short, long = "member")]
        members: Vec<String>,
    },
    /// Show a group and its members
    Show {
        /// Group ID
        group: String,
    },
}

/// Handle a group command
pub async fn handle_group_command(ledger: &Ledger, cmd: GroupCommands) -> LedgerResult<()> {
    match cmd {
        GroupCommands::Create {
            name,
            creator,
            members,
        } => {
            let creator = find_account(ledger, &creator).await?;
            let mut member_ids = Vec::with_capacity(members.len());
            for member in &members {
                member_ids.push(find_account(ledger, member).await?.id);
            }

            let group = ledger.groups().create(&name, creator.id, member_ids).await?;
            println!("Created group: {}", group.name);
            println!("  Members:  {}", group.members.len());
            println!("  ID:       {}", group.id);
        }

        GroupCommands::Show { group } => {
            let id: GroupId = group
                .parse()
                .map_err(|_| LedgerError::Validation(format!("Invalid group ID: '{}'", group)))?;
            let group = ledger.groups().get(id).await?;

            let mut members = Vec::with_capacity(group.members.len());
            for member in &group.members {
                if let Some(account) = ledger.stores().accounts.get(*member).await? {
                    members.push(account);
                }
            }
            print!("{}", format_group_details(&group, &members));
        }
    }

    Ok(())
}
