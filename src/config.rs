use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_UPCOMING_LIMIT: usize = 3;
pub const DEFAULT_AT_RISK_WINDOW_DAYS: i64 = 30;
pub const MAX_AT_RISK_WINDOW_DAYS: i64 = 3650;
pub const DEFAULT_FEEDBACK_LIMIT: usize = 5;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// How a (mentor, mentee) pair is identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PairKeying {
    /// Stable profile ids.
    #[default]
    Identity,
    /// Rendered display names. Two people sharing a name collapse into one pair.
    DisplayName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpcomingOrder {
    /// First sessions on or after today, in the order they were supplied.
    #[default]
    Input,
    /// Soonest sessions first.
    Soonest,
}

/// Source of the per-mentor `last_active` and `status` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recency {
    /// Every mentor reads "today" / active.
    #[default]
    Fixed,
    /// Derived from each mentor's latest session on or before the reference date.
    Computed,
}

/// Pending and unmatched counts have no backing field yet; they are
/// supplied here until meetings carry a matching status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairStatusPlaceholders {
    pub pending: usize,
    pub unmatched: usize,
}

impl Default for PairStatusPlaceholders {
    fn default() -> Self {
        Self {
            pending: 3,
            unmatched: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    pub pair_keying: PairKeying,
    pub upcoming_order: UpcomingOrder,
    pub upcoming_limit: usize,
    pub at_risk_window_days: i64,
    pub recency: Recency,
    pub feedback_limit: usize,
    pub placeholders: PairStatusPlaceholders,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            pair_keying: PairKeying::default(),
            upcoming_order: UpcomingOrder::default(),
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
            at_risk_window_days: DEFAULT_AT_RISK_WINDOW_DAYS,
            recency: Recency::default(),
            feedback_limit: DEFAULT_FEEDBACK_LIMIT,
            placeholders: PairStatusPlaceholders::default(),
        }
    }
}

pub fn database_url() -> anyhow::Result<String> {
    std::env::var("DATABASE_URL")
        .context("DATABASE_URL must be set to a production Postgres instance")
}
