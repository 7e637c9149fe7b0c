use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::AggregatedMetrics;
use crate::sessions;

fn rating_label(rating: Option<f64>) -> String {
    rating
        .map(|value| format!("{value:.1}"))
        .unwrap_or_else(|| "no ratings".to_string())
}

fn name_or_blank(name: Option<&str>) -> &str {
    name.unwrap_or("(unassigned)")
}

/// Short plain-text summary for the terminal.
pub fn render_summary(metrics: &AggregatedMetrics) -> String {
    let headline = &metrics.headline;
    let mut output = String::new();

    let _ = writeln!(output, "Total active pairs:  {}", headline.total_active_pairs);
    let _ = writeln!(output, "Sessions this month: {}", headline.sessions_this_month);
    let _ = writeln!(output, "Avg satisfaction:    {:.1}", headline.avg_satisfaction);
    let _ = writeln!(output, "At-risk pairs:       {}", headline.at_risk_pairs);

    if !metrics.upcoming_sessions.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "Upcoming sessions:");
        for session in &metrics.upcoming_sessions {
            let _ = writeln!(
                output,
                "- {} <-> {} {} at {} ({})",
                name_or_blank(session.mentor.as_deref()),
                name_or_blank(session.mentee.as_deref()),
                sessions::format_date(session.date),
                sessions::format_time(session.time),
                session.kind.label()
            );
        }
    }

    output
}

pub fn build_report(
    source: &str,
    now: NaiveDate,
    metrics: &AggregatedMetrics,
    skipped_rows: usize,
) -> String {
    let headline = &metrics.headline;
    let mut output = String::new();

    let _ = writeln!(output, "# Mentorship Engagement Report");
    let _ = writeln!(output, "Generated from {} as of {}", source, now);
    if skipped_rows > 0 {
        let _ = writeln!(output, "{} malformed rows were skipped.", skipped_rows);
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Headline");
    let _ = writeln!(output, "- Total active pairs: {}", headline.total_active_pairs);
    let _ = writeln!(output, "- Sessions this month: {}", headline.sessions_this_month);
    let _ = writeln!(output, "- Avg satisfaction: {:.1}", headline.avg_satisfaction);
    let _ = writeln!(output, "- At-risk pairs: {}", headline.at_risk_pairs);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Session Trends");

    if metrics.monthly_session_stats.is_empty() {
        let _ = writeln!(output, "No sessions recorded.");
    } else {
        for (month, stats) in &metrics.monthly_session_stats {
            let _ = writeln!(
                output,
                "- {}: {} sessions (avg satisfaction {:.1})",
                month, stats.sessions, stats.avg_satisfaction
            );
        }
    }

    let breakdown = &metrics.pair_status_breakdown;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Matching Status");
    let _ = writeln!(output, "- Successfully matched: {}", breakdown.matched);
    let _ = writeln!(output, "- Pending match: {}", breakdown.pending);
    let _ = writeln!(output, "- Unmatched: {}", breakdown.unmatched);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Mentor Engagement");

    if metrics.per_mentor_stats.is_empty() {
        let _ = writeln!(output, "No mentors with sessions.");
    } else {
        let _ = writeln!(output, "| Mentor | Sessions | Rating | Last Active | Status |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for (name, stats) in &metrics.per_mentor_stats {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} | {} |",
                name,
                stats.sessions,
                rating_label(stats.rating),
                stats.last_active,
                stats.status
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Upcoming Sessions");

    if metrics.upcoming_sessions.is_empty() {
        let _ = writeln!(output, "No upcoming sessions.");
    } else {
        for session in &metrics.upcoming_sessions {
            let _ = writeln!(
                output,
                "- {} <-> {} on {} at {} ({})",
                name_or_blank(session.mentor.as_deref()),
                name_or_blank(session.mentee.as_deref()),
                sessions::format_date(session.date),
                sessions::format_time(session.time),
                session.kind.label()
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Feedback");

    if metrics.recent_feedback.is_empty() {
        let _ = writeln!(output, "No feedback recorded.");
    } else {
        for entry in &metrics.recent_feedback {
            let _ = writeln!(
                output,
                "- {} -> {}: {}",
                name_or_blank(entry.mentor.as_deref()),
                name_or_blank(entry.mentee.as_deref()),
                entry.topics
            );
            if let Some(text) = &entry.mentor_feedback {
                let _ = writeln!(output, "  > mentor: {}", text);
            }
            if let Some(text) = &entry.mentee_feedback {
                let _ = writeln!(output, "  > mentee: {}", text);
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::config::AggregationConfig;
    use crate::test_support::{date, meeting, person, rated};

    #[test]
    fn report_lists_every_section() {
        let mentor = person("Michael Chen");
        let mentee = person("Alex Chen");
        let mut upcoming = meeting(date(2024, 1, 20), Some(&mentor), Some(&mentee));
        upcoming.mentee_feedback = Some("Mock interview was great".to_string());
        let records = vec![
            rated(meeting(date(2024, 1, 10), Some(&mentor), Some(&mentee)), Some(4), None),
            upcoming,
        ];
        let metrics = aggregate(&records, date(2024, 1, 15), &AggregationConfig::default());

        let report = build_report("seed data", date(2024, 1, 15), &metrics, 1);
        assert!(report.contains("Generated from seed data as of 2024-01-15"));
        assert!(report.contains("1 malformed rows were skipped."));
        assert!(report.contains("- Sessions this month: 2"));
        assert!(report.contains("- Jan: 2 sessions (avg satisfaction 4.0)"));
        assert!(report.contains("| Michael Chen | 2 | 4.0 | today | active |"));
        assert!(report.contains("Michael Chen <-> Alex Chen on Sat, Jan 20, 2024 at 2:00 PM (Video Call)"));
        assert!(report.contains("  > mentee: Mock interview was great"));
    }

    #[test]
    fn empty_report_uses_placeholders() {
        let metrics = aggregate(&[], date(2024, 1, 15), &AggregationConfig::default());
        let report = build_report("empty export", date(2024, 1, 15), &metrics, 0);
        assert!(report.contains("No sessions recorded."));
        assert!(report.contains("No upcoming sessions."));
        assert!(!report.contains("malformed"));

        let summary = render_summary(&metrics);
        assert!(summary.contains("At-risk pairs:       0"));
        assert!(!summary.contains("Upcoming sessions:"));
    }
}
