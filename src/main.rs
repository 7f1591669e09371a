use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use splitwallet::cli::{
    handle_account_command, handle_expense_command, handle_group_command,
    handle_notification_command, handle_reset_command, open_ledger,
};
use splitwallet::config::{LedgerPaths, Settings};
use splitwallet::storage::Storage;

#[derive(Parser)]
#[command(
    name = "splitwallet",
    author = "Kaylee Beyene",
    version,
    about = "Shared-expense budgeting with monthly allowances",
    long_about = "SplitWallet tracks a monthly allowance per person, splits shared \
                  expenses evenly across a group, warns when a budget is nearly or \
                  fully spent, and restores every balance at the start of each month."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize SplitWallet with default settings
    Init,

    /// Show configuration
    Config,

    /// Account management commands
    #[command(subcommand)]
    Account(splitwallet::cli::AccountCommands),

    /// Group management commands
    #[command(subcommand)]
    Group(splitwallet::cli::GroupCommands),

    /// Expense commands
    #[command(subcommand, alias = "exp")]
    Expense(splitwallet::cli::ExpenseCommands),

    /// Notification commands
    #[command(subcommand, alias = "notif")]
    Notification(splitwallet::cli::NotificationCommands),

    /// Monthly reset commands
    #[command(subcommand)]
    Reset(splitwallet::cli::ResetCommands),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("splitwallet=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::open(paths.clone())?;
    let ledger = open_ledger(&storage, &settings);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing SplitWallet at: {}", paths.base_dir().display());
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Run 'splitwallet account register <name> <email> --allowance <amount>' to add an account.");
        }
        Some(Commands::Config) => {
            println!("SplitWallet Configuration");
            println!("=========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:        {}", settings.currency_symbol);
            println!("  Near-limit alert at:    {}%", settings.near_limit_percent);
            println!(
                "  Threshold evaluator:    {}",
                settings.threshold.endpoint.as_deref().unwrap_or("in-process")
            );
            println!("  Threshold timeout:      {} ms", settings.threshold.timeout_ms);
            println!("  Threshold attempts:     {}", settings.threshold.max_attempts);
            println!("  Conflict retries:       {}", settings.max_conflict_retries);
            println!("  Allocation concurrency: {}", settings.allocation_concurrency);
            println!("  Reset interval:         {} s", settings.reset_interval_secs);
        }
        Some(Commands::Account(cmd)) => {
            handle_account_command(&ledger, cmd, &settings.currency_symbol).await?;
        }
        Some(Commands::Group(cmd)) => {
            handle_group_command(&ledger, cmd).await?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&ledger, cmd, &settings.currency_symbol).await?;
        }
        Some(Commands::Notification(cmd)) => {
            handle_notification_command(&ledger, cmd).await?;
        }
        Some(Commands::Reset(cmd)) => {
            handle_reset_command(&ledger, cmd, settings.reset_interval()).await?;
        }
        None => {
            println!("SplitWallet - shared-expense budgeting");
            println!();
            println!("Run 'splitwallet --help' for usage information.");
        }
    }

    Ok(())
}
