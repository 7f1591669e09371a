//! Notification display formatting

use crate::models::Notification;

/// Format notifications as a table, oldest first
pub fn format_notification_list(notifications: &[Notification]) -> String {
    if notifications.is_empty() {
        return "No notifications.".to_string();
    }

    let id_width = notifications
        .iter()
        .map(|n| n.id.as_str().len())
        .max()
        .unwrap_or(2)
        .max(2);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$}  {:<16}  {:<11}  {:<6}  {}\n",
        "ID", "Created", "Kind", "Read", "Message",
    ));
    output.push_str(&format!(
        "{:-<id_width$}  {:-<16}  {:-<11}  {:-<6}  {:-<20}\n",
        "", "", "", "", "",
    ));

    for notification in notifications {
        output.push_str(&format!(
            "{:<id_width$}  {:<16}  {:<11}  {:<6}  {}\n",
            notification.id.as_str(),
            notification.created_at.format("%Y-%m-%d %H:%M").to_string(),
            notification.kind.to_string(),
            if notification.read { "yes" } else { "" },
            notification.message,
        ));
    }

    output
}
