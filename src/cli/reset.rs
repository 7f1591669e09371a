//! Monthly reset CLI commands

use std::time::Duration;

use clap::Subcommand;

use crate::display::transaction::format_reset_report;
use crate::error::LedgerResult;
use crate::ledger::Ledger;

/// Reset subcommands
#[derive(Subcommand)]
pub enum ResetCommands {
    /// Run one reset sweep now
    Run,
    /// Keep sweeping on the configured interval until interrupted
    Daemon {
        /// Override the sweep interval in seconds
        #[arg(short, long)]
        interval: Option<u64>,
    },
}

/// Handle a reset command
pub async fn handle_reset_command(
    ledger: &Ledger,
    cmd: ResetCommands,
    default_interval: Duration,
) -> LedgerResult<()> {
    match cmd {
        ResetCommands::Run => {
            let report = ledger.run_monthly_reset(ledger.now()).await?;
            print!("{}", format_reset_report(&report));
        }

        ResetCommands::Daemon { interval } => {
            let period = interval
                .map(|secs| Duration::from_secs(secs.max(1)))
                .unwrap_or(default_interval);
            tracing::info!(interval_secs = period.as_secs(), "Starting reset scheduler");

            let scheduler = ledger.resets();
            tokio::select! {
                _ = scheduler.run_forever(period) => {}
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Reset scheduler stopped");
                }
            }
        }
    }

    Ok(())
}
