use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label used for sessions whose mentor profile is missing.
pub const UNKNOWN_MENTOR: &str = "Unknown Mentor";

/// A profile reference joined onto a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: Uuid,
    pub name: String,
}

/// One mentorship session, past or future.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingRecord {
    pub id: Uuid,
    pub session_date: NaiveDate,
    pub session_time: NaiveTime,
    pub mode: String,
    pub topics: String,
    pub mentor: Option<PersonRef>,
    pub mentee: Option<PersonRef>,
    pub mentor_rating: Option<i32>,
    pub mentee_rating: Option<i32>,
    pub mentor_feedback: Option<String>,
    pub mentee_feedback: Option<String>,
}

impl MeetingRecord {
    pub fn mentor_name(&self) -> Option<&str> {
        self.mentor.as_ref().map(|person| person.name.as_str())
    }

    pub fn mentee_name(&self) -> Option<&str> {
        self.mentee.as_ref().map(|person| person.name.as_str())
    }

    /// Mentor rating, if one was submitted. A stored zero means "not submitted".
    pub fn submitted_mentor_rating(&self) -> Option<i32> {
        submitted(self.mentor_rating)
    }

    pub fn submitted_mentee_rating(&self) -> Option<i32> {
        submitted(self.mentee_rating)
    }

    pub fn involves(&self, person_id: Uuid) -> bool {
        self.mentor.as_ref().is_some_and(|p| p.id == person_id)
            || self.mentee.as_ref().is_some_and(|p| p.id == person_id)
    }
}

fn submitted(rating: Option<i32>) -> Option<i32> {
    rating.filter(|value| *value != 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlySessionStats {
    pub sessions: usize,
    pub avg_satisfaction: f64,
}

/// Matched / pending / unmatched counts for the matching chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairStatusBreakdown {
    pub matched: usize,
    pub pending: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MentorStatus {
    Active,
    Inactive,
}

impl std::fmt::Display for MentorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MentorStatus::Active => f.write_str("active"),
            MentorStatus::Inactive => f.write_str("inactive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentorEngagement {
    pub sessions: usize,
    /// `None` when no mentor rating has been submitted yet.
    pub rating: Option<f64>,
    pub last_active: String,
    pub status: MentorStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Video,
    Chat,
}

impl SessionKind {
    pub fn from_mode(mode: &str) -> Self {
        if mode.eq_ignore_ascii_case("online") {
            SessionKind::Video
        } else {
            SessionKind::Chat
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Video => "Video Call",
            SessionKind::Chat => "Chat Session",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingSession {
    pub mentor: Option<String>,
    pub mentee: Option<String>,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub kind: SessionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeadlineMetrics {
    pub total_active_pairs: usize,
    pub sessions_this_month: usize,
    pub avg_satisfaction: f64,
    pub at_risk_pairs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub mentor: Option<String>,
    pub mentee: Option<String>,
    pub topics: String,
    pub mentor_feedback: Option<String>,
    pub mentee_feedback: Option<String>,
}

/// Everything the dashboard renders, rebuilt from scratch on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMetrics {
    pub monthly_session_stats: IndexMap<String, MonthlySessionStats>,
    pub pair_status_breakdown: PairStatusBreakdown,
    pub per_mentor_stats: IndexMap<String, MentorEngagement>,
    pub upcoming_sessions: Vec<UpcomingSession>,
    pub headline: HeadlineMetrics,
    pub recent_feedback: Vec<FeedbackEntry>,
}
