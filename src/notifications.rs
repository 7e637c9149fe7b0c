use std::fmt::Write;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::sessions;

/// A dashboard notification. Notifications without an event date are
/// announcements rather than reminders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(default)]
    pub recipient_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub event_date: Option<DateTime<Utc>>,
}

/// Orders like the dashboard query: undated first, then by event date
/// ascending. Ties keep their incoming order.
pub fn sort_for_display(notifications: &mut [Notification]) {
    notifications.sort_by_key(|notification| notification.event_date);
}

pub fn for_recipient(notifications: Vec<Notification>, recipient: Option<Uuid>) -> Vec<Notification> {
    match recipient {
        Some(id) => notifications
            .into_iter()
            .filter(|notification| notification.recipient_id.map_or(true, |to| to == id))
            .collect(),
        None => notifications,
    }
}

pub fn read_json(path: &Path) -> anyhow::Result<Vec<Notification>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let notifications: Vec<Notification> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of notifications", path.display()))?;

    info!(count = notifications.len(), path = %path.display(), "read notifications from json");
    Ok(notifications)
}

pub fn render(notifications: &[Notification]) -> String {
    let mut output = String::new();

    if notifications.is_empty() {
        let _ = writeln!(output, "No notifications");
        return output;
    }

    for notification in notifications {
        let _ = writeln!(
            output,
            "- {} ({})",
            notification.title,
            sessions::format_date(notification.created_at.date_naive())
        );
        if !notification.description.is_empty() {
            let _ = writeln!(output, "  {}", notification.description);
        }
        if let Some(event) = notification.event_date {
            let _ = writeln!(output, "  Event: {}", sessions::format_date(event.date_naive()));
        }
    }

    output
}
