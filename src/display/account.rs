//! Account display formatting
//!
//! Formats accounts and groups for terminal output in table and detail views.

use crate::models::{Account, Group, Money};
use crate::services::AccountSummary;

/// Format a list of accounts as a table, amounts prefixed with `symbol`
pub fn format_account_list(accounts: &[Account], symbol: &str) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let name_width = accounts
        .iter()
        .map(|a| a.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let email_width = accounts
        .iter()
        .map(|a| a.email.len())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<email_width$}  {:>12}  {:>12}  {}\n",
        "Name",
        "Email",
        "Allowance",
        "Remaining",
        "Status",
    ));

    output.push_str(&format!(
        "{:-<name_width$}  {:-<email_width$}  {:->12}  {:->12}  {:-<10}\n",
        "", "", "", "", "",
    ));

    for account in accounts {
        let unread = account.unread_count();
        let status = if account.remaining.value() <= 0.0 {
            "Over budget".to_string()
        } else if unread > 0 {
            format!("{} unread", unread)
        } else {
            String::new()
        };

        output.push_str(&format!(
            "{:<name_width$}  {:<email_width$}  {:>12}  {:>12}  {}\n",
            account.name,
            account.email,
            account.monthly_allowance.format_with_symbol(symbol),
            account.remaining.format_with_symbol(symbol),
            status,
        ));
    }

    let total_remaining: Money = accounts.iter().map(|a| a.remaining).sum();
    output.push_str(&format!(
        "{:-<name_width$}  {:-<email_width$}  {:->12}  {:->12}  {:-<10}\n",
        "", "", "", "", "",
    ));
    output.push_str(&format!(
        "{:<name_width$}  {:<email_width$}  {:>12}  {:>12}\n",
        "TOTAL",
        "",
        "",
        total_remaining.format_with_symbol(symbol),
    ));

    output
}

/// Format a single account's details
pub fn format_account_details(summary: &AccountSummary, symbol: &str) -> String {
    let account = &summary.account;

    let mut output = String::new();
    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:             {}\n", account.id));
    output.push_str(&format!("  Email:          {}\n", account.email));
    output.push_str(&format!(
        "  Allowance:      {}\n",
        account.monthly_allowance.format_with_symbol(symbol)
    ));
    output.push_str(&format!(
        "  Remaining:      {}\n",
        account.remaining.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  Spent:          {:.1}%\n", summary.percent_spent));
    output.push_str(&format!(
        "  Budget month:   {}\n",
        account.budget_month()
    ));
    output.push_str(&format!(
        "  Notifications:  {} ({} unread)\n",
        account.notifications.len(),
        summary.unread
    ));
    if !account.groups.is_empty() {
        output.push_str(&format!("  Groups:         {}\n", account.groups.len()));
    }
    output.push_str(&format!(
        "  Created:        {}\n",
        account.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

/// Format a group with its member accounts
///
/// `members` holds the resolved accounts in the group's member order; IDs
/// that no longer resolve are shown as-is.
pub fn format_group_details(group: &Group, members: &[Account]) -> String {
    let mut output = String::new();
    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:       {}\n", group.id));
    output.push_str(&format!("  Members:  {}\n", group.members.len()));

    for member in &group.members {
        match members.iter().find(|a| a.id == *member) {
            Some(account) => output.push_str(&format!(
                "    - {} <{}>{}\n",
                account.name,
                account.email,
                if *member == group.created_by {
                    " (creator)"
                } else {
                    ""
                }
            )),
            None => output.push_str(&format!("    - {}\n", member)),
        }
    }

    output
}
