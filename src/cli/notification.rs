//! Notification CLI commands

use clap::Subcommand;

use crate::display::notification::format_notification_list;
use crate::error::LedgerResult;
use crate::ledger::Ledger;
use crate::models::NotificationId;

use super::find_account;

/// Notification subcommands
#[derive(Subcommand)]
pub enum NotificationCommands {
    /// List an account's notifications
    List {
        /// Account ID or email
        account: String,
        /// Only show unread notifications
        #[arg(short, long)]
        unread: bool,
    },
    /// Mark one notification as read
    Read {
        /// Account ID or email
        account: String,
        /// Notification ID
        notification: String,
    },
    /// Mark every notification as read
    ReadAll {
        /// Account ID or email
        account: String,
    },
}

/// Handle a notification command
pub async fn handle_notification_command(
    ledger: &Ledger,
    cmd: NotificationCommands,
) -> LedgerResult<()> {
    match cmd {
        NotificationCommands::List { account, unread } => {
            let account = find_account(ledger, &account).await?;
            let notifications = if unread {
                ledger.notifications().unread(account.id).await?
            } else {
                ledger.list_notifications(account.id).await?
            };
            print!("{}", format_notification_list(&notifications));
        }

        NotificationCommands::Read {
            account,
            notification,
        } => {
            let account = find_account(ledger, &account).await?;
            let id = NotificationId::from(notification.as_str());
            ledger.mark_notification_read(account.id, &id).await?;
            println!("Marked {} as read", id);
        }

        NotificationCommands::ReadAll { account } => {
            let account = find_account(ledger, &account).await?;
            let changed = ledger.notifications().mark_all_read(account.id).await?;
            println!("Marked {} notification(s) as read", changed);
        }
    }

    Ok(())
}
