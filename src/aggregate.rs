use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use tracing::debug;

use crate::config::{AggregationConfig, PairStatusPlaceholders, Recency, UpcomingOrder};
use crate::models::{
    AggregatedMetrics, FeedbackEntry, MeetingRecord, MentorEngagement, MentorStatus,
    MonthlySessionStats, PairStatusBreakdown, SessionKind, UpcomingSession, UNKNOWN_MENTOR,
};
use crate::risk;

/// Running sum of submitted ratings.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingTally {
    total: i64,
    count: usize,
}

impl RatingTally {
    pub fn push(&mut self, rating: Option<i32>) {
        if let Some(value) = rating {
            self.total += i64::from(value);
            self.count += 1;
        }
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total as f64 / self.count as f64)
        }
    }
}

/// Builds every dashboard aggregate from one snapshot of meetings.
///
/// `records` are expected in ascending date order; grouping preserves the
/// order in which each month and mentor first appears.
pub fn aggregate(
    records: &[MeetingRecord],
    now: NaiveDate,
    config: &AggregationConfig,
) -> AggregatedMetrics {
    debug!(records = records.len(), %now, "aggregating meetings");

    AggregatedMetrics {
        monthly_session_stats: aggregate_by_month(records),
        pair_status_breakdown: pair_status_breakdown(records, config.placeholders),
        per_mentor_stats: aggregate_by_mentor(records, now, config),
        upcoming_sessions: select_upcoming(
            records,
            now,
            config.upcoming_order,
            config.upcoming_limit,
        ),
        headline: risk::compute_headline(
            records,
            now,
            config.pair_keying,
            config.at_risk_window_days,
        ),
        recent_feedback: recent_feedback(records, config.feedback_limit),
    }
}

/// Groups by short month name ("Jan", "Feb", ...). The key is not
/// year-qualified, so the same month of different years shares a bucket.
pub fn aggregate_by_month(records: &[MeetingRecord]) -> IndexMap<String, MonthlySessionStats> {
    let mut groups: IndexMap<String, (usize, RatingTally)> = IndexMap::new();

    for record in records {
        let month = record.session_date.format("%b").to_string();
        let entry = groups.entry(month).or_default();
        entry.0 += 1;
        entry.1.push(record.submitted_mentor_rating());
    }

    groups
        .into_iter()
        .map(|(month, (sessions, ratings))| {
            (
                month,
                MonthlySessionStats {
                    sessions,
                    avg_satisfaction: ratings.mean().unwrap_or(0.0),
                },
            )
        })
        .collect()
}

pub fn aggregate_by_mentor(
    records: &[MeetingRecord],
    now: NaiveDate,
    config: &AggregationConfig,
) -> IndexMap<String, MentorEngagement> {
    let mut groups: IndexMap<String, (usize, RatingTally, Option<NaiveDate>)> = IndexMap::new();

    for record in records {
        let name = record.mentor_name().unwrap_or(UNKNOWN_MENTOR).to_string();
        let entry = groups.entry(name).or_default();
        entry.0 += 1;
        entry.1.push(record.submitted_mentor_rating());
        if record.session_date <= now {
            entry.2 = entry.2.max(Some(record.session_date));
        }
    }

    groups
        .into_iter()
        .map(|(name, (sessions, ratings, last_seen))| {
            let (last_active, status) = match config.recency {
                Recency::Fixed => ("today".to_string(), MentorStatus::Active),
                Recency::Computed => match last_seen {
                    Some(day) => (
                        risk::recency_label((now - day).num_days()),
                        risk::mentor_status(day, now, config.at_risk_window_days),
                    ),
                    None => ("scheduled".to_string(), MentorStatus::Active),
                },
            };

            (
                name,
                MentorEngagement {
                    sessions,
                    rating: ratings.mean(),
                    last_active,
                    status,
                },
            )
        })
        .collect()
}

pub fn select_upcoming(
    records: &[MeetingRecord],
    now: NaiveDate,
    order: UpcomingOrder,
    limit: usize,
) -> Vec<UpcomingSession> {
    let mut upcoming: Vec<&MeetingRecord> = records
        .iter()
        .filter(|record| record.session_date >= now)
        .collect();

    if order == UpcomingOrder::Soonest {
        upcoming.sort_by_key(|record| (record.session_date, record.session_time));
    }

    upcoming
        .into_iter()
        .take(limit)
        .map(|record| UpcomingSession {
            mentor: record.mentor_name().map(str::to_string),
            mentee: record.mentee_name().map(str::to_string),
            date: record.session_date,
            time: record.session_time,
            kind: SessionKind::from_mode(&record.mode),
        })
        .collect()
}

/// Every meeting counts as one matched instance; the other two buckets are
/// placeholders until meetings carry a matching status.
pub fn pair_status_breakdown(
    records: &[MeetingRecord],
    placeholders: PairStatusPlaceholders,
) -> PairStatusBreakdown {
    PairStatusBreakdown {
        matched: records.len(),
        pending: placeholders.pending,
        unmatched: placeholders.unmatched,
    }
}

/// The last `limit` meetings in input order.
pub fn recent_feedback(records: &[MeetingRecord], limit: usize) -> Vec<FeedbackEntry> {
    let skip = records.len().saturating_sub(limit);
    records
        .iter()
        .skip(skip)
        .map(|record| FeedbackEntry {
            mentor: record.mentor_name().map(str::to_string),
            mentee: record.mentee_name().map(str::to_string),
            topics: record.topics.clone(),
            mentor_feedback: record.mentor_feedback.clone(),
            mentee_feedback: record.mentee_feedback.clone(),
        })
        .collect()
}

/// Session counts per mentee, used by the mentor dashboard roster.
pub fn sessions_per_mentee(records: &[MeetingRecord]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for record in records {
        if let Some(name) = record.mentee_name() {
            *counts.entry(name.to_string()).or_insert(0) += 1;
        }
    }
    counts
}
