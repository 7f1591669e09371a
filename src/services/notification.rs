//! Notification service
//!
//! Reads and acknowledges the alerts stored on an account. A notification
//! only ever moves from unread to read.

use crate::error::{LedgerError, LedgerResult};
use crate::ledger::{Change, Ledger};
use crate::models::{Account, AccountId, Notification, NotificationId};

use super::reset::ResetScheduler;

pub struct NotificationService<'a> {
    ledger: &'a Ledger,
}

impl<'a> NotificationService<'a> {
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// All notifications on the account, oldest first
    ///
    /// The account is brought into the current month first, which never
    /// touches its notifications.
    pub async fn list(&self, account: AccountId) -> LedgerResult<Vec<Notification>> {
        let account = self.ensure_current(account).await?;
        Ok(account.notifications)
    }

    /// Unread notifications only
    pub async fn unread(&self, account: AccountId) -> LedgerResult<Vec<Notification>> {
        let mut notifications = self.list(account).await?;
        notifications.retain(|n| !n.read);
        Ok(notifications)
    }

    /// Mark one notification as read
    ///
    /// Marking a notification that is already read succeeds without writing.
    pub async fn mark_read(&self, account: AccountId, id: &NotificationId) -> LedgerResult<()> {
        self.ensure_current(account).await?;
        self.ledger
            .modify_account(account, |acc| match acc.mark_notification_read(id) {
                Some(true) => Ok(Change::Write(())),
                Some(false) => Ok(Change::Skip(())),
                None => Err(LedgerError::notification_not_found(id)),
            })
            .await?;

        tracing::debug!(account = %account, notification = %id, "Marked notification read");
        Ok(())
    }

    /// Mark every unread notification as read, returning how many changed
    pub async fn mark_all_read(&self, account: AccountId) -> LedgerResult<usize> {
        self.ensure_current(account).await?;
        let (_, changed) = self
            .ledger
            .modify_account(account, |acc| match acc.mark_all_read() {
                0 => Ok(Change::Skip(0)),
                n => Ok(Change::Write(n)),
            })
            .await?;
        Ok(changed)
    }

    async fn ensure_current(&self, account: AccountId) -> LedgerResult<Account> {
        ResetScheduler::new(self.ledger)
            .ensure_current(account, self.ledger.now())
            .await
    }
}
