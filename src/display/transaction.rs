//! Transaction display formatting
//!
//! Formats expense history, receipts and reset reports.

use crate::models::{AccountId, Transaction};
use crate::services::{ExpenseReceipt, ResetReport};

/// Format transactions as a table, from the point of view of `account`
pub fn format_transaction_list(
    transactions: &[Transaction],
    account: AccountId,
    symbol: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let desc_width = transactions
        .iter()
        .map(|t| t.description.len())
        .max()
        .unwrap_or(11)
        .clamp(11, 40);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<10}  {:<desc_width$}  {:<12}  {:>12}  {:>12}  {}\n",
        "Date", "Description", "Category", "Amount", "Your share", "Split",
    ));
    output.push_str(&format!(
        "{:-<10}  {:-<desc_width$}  {:-<12}  {:->12}  {:->12}  {:-<6}\n",
        "", "", "", "", "", "",
    ));

    for txn in transactions {
        let occurrences = txn.participants.iter().filter(|p| **p == account).count();
        let description: String = txn.description.chars().take(desc_width).collect();

        output.push_str(&format!(
            "{:<10}  {:<desc_width$}  {:<12}  {:>12}  {:>12}  {}\n",
            txn.created_at.format("%Y-%m-%d").to_string(),
            description,
            txn.category_id.as_str(),
            txn.amount.format_with_symbol(symbol),
            txn.share.times(occurrences).format_with_symbol(symbol),
            if txn.group_id.is_some() {
                format!("1/{}", txn.participants.len())
            } else {
                String::new()
            },
        ));
    }

    output
}

/// Format the result of recording an expense
pub fn format_receipt(receipt: &ExpenseReceipt, symbol: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!("Recorded expense {}\n", receipt.transaction_id));
    if receipt.participants > 1 {
        output.push_str(&format!(
            "  Split:      {} ways, {} each\n",
            receipt.participants,
            receipt.share.format_with_symbol(symbol)
        ));
    }
    output.push_str(&format!(
        "  Remaining:  {}\n",
        receipt.remaining_balance.format_with_symbol(symbol)
    ));
    if let Some(alert) = &receipt.alert {
        output.push_str(&format!("  Alert:      [{}] {}\n", alert.kind, alert.message));
    }
    output
}

/// Format a monthly reset report
pub fn format_reset_report(report: &ResetReport) -> String {
    let mut output = format!("Reset {} account(s)\n", report.reset_count);
    if !report.failures.is_empty() {
        output.push_str(&format!("Failed to reset {} account(s):\n", report.failures.len()));
        for id in &report.failures {
            output.push_str(&format!("  - {}\n", id));
        }
    }
    output
}
