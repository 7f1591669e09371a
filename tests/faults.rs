use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use splitwallet::config::{LedgerPaths, Settings, ThresholdSettings};
use splitwallet::ledger::{Ledger, LedgerStores};
use splitwallet::models::{Account, AccountId, Alert, CategoryId, GroupId, Money};
use splitwallet::services::ExpenseRequest;
use splitwallet::storage::{AccountRepository, AccountStore, IntentStore, Storage, TransactionStore};
use splitwallet::threshold::{LocalThresholdEvaluator, ThresholdEvaluator, ThresholdInput};
use splitwallet::{ErrorKind, LedgerError, LedgerResult};

/// Account store whose writes to one account fail while `broken` is set
struct FlakyAccount {
    inner: Arc<AccountRepository>,
    target: std::sync::Mutex<Option<AccountId>>,
    broken: AtomicBool,
}

impl FlakyAccount {
    fn new(inner: Arc<AccountRepository>) -> Self {
        Self {
            inner,
            target: std::sync::Mutex::new(None),
            broken: AtomicBool::new(false),
        }
    }

    fn break_writes_to(&self, id: AccountId) {
        *self.target.lock().unwrap() = Some(id);
        self.broken.store(true, Ordering::SeqCst);
    }

    fn heal(&self) {
        self.broken.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl AccountStore for FlakyAccount {
    async fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        self.inner.get(id).await
    }

    async fn insert(&self, account: Account) -> LedgerResult<()> {
        self.inner.insert(account).await
    }

    async fn replace(&self, account: Account, expected_version: u64) -> LedgerResult<Account> {
        let target = *self.target.lock().unwrap();
        if self.broken.load(Ordering::SeqCst) && target == Some(account.id) {
            return Err(LedgerError::Storage("disk unavailable".into()));
        }
        self.inner.replace(account, expected_version).await
    }

    async fn list_ids(&self) -> LedgerResult<Vec<AccountId>> {
        self.inner.list_ids().await
    }

    async fn find_by_email(&self, email: &str) -> LedgerResult<Option<Account>> {
        self.inner.find_by_email(email).await
    }
}

/// Evaluator that never answers
struct Hangs;

#[async_trait]
impl ThresholdEvaluator for Hangs {
    async fn evaluate(&self, _input: ThresholdInput) -> LedgerResult<Option<Alert>> {
        std::future::pending().await
    }
}

fn open_storage() -> (TempDir, Storage) {
    let temp_dir = TempDir::new().unwrap();
    let storage =
        Storage::open(LedgerPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
    (temp_dir, storage)
}

fn fast_settings() -> Settings {
    Settings {
        threshold: ThresholdSettings {
            endpoint: None,
            timeout_ms: 50,
            max_attempts: 2,
            backoff_ms: 10,
        },
        ..Settings::default()
    }
}

fn expense(payer: AccountId, amount: f64, group_id: Option<GroupId>) -> ExpenseRequest {
    ExpenseRequest {
        payer,
        description: "Groceries".into(),
        amount: Money::new(amount),
        category_id: CategoryId::new("food"),
        group_id,
    }
}

#[tokio::test]
async fn failed_participant_is_reported_and_recovered() {
    let (_temp_dir, storage) = open_storage();
    let flaky = Arc::new(FlakyAccount::new(storage.accounts.clone()));
    let mut stores = LedgerStores::from(&storage);
    stores.accounts = flaky.clone();
    let ledger = Ledger::new(
        stores,
        Arc::new(LocalThresholdEvaluator::default()),
        &fast_settings(),
    );

    let a = ledger.accounts().register("A", "a@example.com", Money::new(300.0)).await.unwrap();
    let b = ledger.accounts().register("B", "b@example.com", Money::new(300.0)).await.unwrap();
    let c = ledger.accounts().register("C", "c@example.com", Money::new(300.0)).await.unwrap();
    let group = ledger.groups().create("Trip", a.id, vec![b.id, c.id]).await.unwrap();

    flaky.break_writes_to(b.id);
    let err = ledger
        .record_expense(expense(a.id, 90.0, Some(group.id)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PartialAllocationFailure);
    let LedgerError::PartialAllocationFailure {
        transaction_id,
        failed,
    } = err
    else {
        unreachable!();
    };
    assert_eq!(failed, vec![b.id]);

    // The others were debited and the transaction still exists
    let remaining = |id: AccountId| {
        let accounts = storage.accounts.clone();
        async move { accounts.get(id).await.unwrap().unwrap().remaining }
    };
    assert_eq!(remaining(a.id).await, Money::new(270.0));
    assert_eq!(remaining(b.id).await, Money::new(300.0));
    assert_eq!(remaining(c.id).await, Money::new(270.0));
    assert!(storage.transactions.get(transaction_id).await.unwrap().is_some());

    let pending = storage.intents.list_incomplete().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].failed, vec![b.id]);

    // Still broken: recovery reports it and changes nothing
    let report = ledger.expenses().recover_incomplete().await.unwrap();
    assert!(report.completed.is_empty());
    assert_eq!(report.still_failing.len(), 1);

    flaky.heal();
    let report = ledger.expenses().recover_incomplete().await.unwrap();
    assert_eq!(report.completed, vec![pending[0].id]);
    assert!(report.still_failing.is_empty());

    // Only the missing debit was applied
    assert_eq!(remaining(a.id).await, Money::new(270.0));
    assert_eq!(remaining(b.id).await, Money::new(270.0));
    assert_eq!(remaining(c.id).await, Money::new(270.0));
    assert!(storage.intents.list_incomplete().await.unwrap().is_empty());
    assert_eq!(storage.transactions.count().unwrap(), 1);
}

#[tokio::test]
async fn unresponsive_evaluator_fails_without_touching_balances() {
    let (_temp_dir, storage) = open_storage();
    let ledger = Ledger::new(LedgerStores::from(&storage), Arc::new(Hangs), &fast_settings());

    let alice = ledger
        .accounts()
        .register("Alice", "alice@example.com", Money::new(100.0))
        .await
        .unwrap();

    let started = std::time::Instant::now();
    let err = ledger
        .record_expense(expense(alice.id, 10.0, None))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ThresholdServiceUnavailable);
    assert!(err.is_retryable());
    assert!(started.elapsed() < Duration::from_secs(5));

    let account = storage.accounts.get(alice.id).await.unwrap().unwrap();
    assert_eq!(account.remaining, Money::new(100.0));
    assert!(account.notifications.is_empty());
    assert_eq!(storage.transactions.count().unwrap(), 0);
    assert!(storage.intents.list_incomplete().await.unwrap().is_empty());
}

#[tokio::test]
async fn reset_sweep_skips_failing_accounts() {
    let (_temp_dir, storage) = open_storage();
    let flaky = Arc::new(FlakyAccount::new(storage.accounts.clone()));
    let mut stores = LedgerStores::from(&storage);
    stores.accounts = flaky.clone();

    let march = chrono::DateTime::parse_from_rfc3339("2026-03-15T10:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    let april = chrono::DateTime::parse_from_rfc3339("2026-04-01T00:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);

    let ledger = Ledger::new(
        stores,
        Arc::new(LocalThresholdEvaluator::default()),
        &fast_settings(),
    )
    .with_clock(move || march);

    let a = ledger.accounts().register("A", "a@example.com", Money::new(100.0)).await.unwrap();
    let b = ledger.accounts().register("B", "b@example.com", Money::new(100.0)).await.unwrap();
    ledger.record_expense(expense(a.id, 40.0, None)).await.unwrap();
    ledger.record_expense(expense(b.id, 40.0, None)).await.unwrap();

    flaky.break_writes_to(b.id);
    let report = ledger.run_monthly_reset(april).await.unwrap();

    assert_eq!(report.reset_count, 1);
    assert_eq!(report.failures, vec![b.id]);
    assert_eq!(
        storage.accounts.get(a.id).await.unwrap().unwrap().remaining,
        Money::new(100.0)
    );
    assert_eq!(
        storage.accounts.get(b.id).await.unwrap().unwrap().remaining,
        Money::new(60.0)
    );
}
