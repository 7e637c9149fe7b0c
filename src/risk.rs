use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use crate::aggregate::RatingTally;
use crate::config::PairKeying;
use crate::models::{HeadlineMetrics, MeetingRecord, MentorStatus};

/// Identity of a (mentor, mentee) pair. Missing profiles produce a degenerate
/// key rather than excluding the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PairKey {
    Identity(Option<Uuid>, Option<Uuid>),
    DisplayName(Option<String>, Option<String>),
}

pub fn pair_key(record: &MeetingRecord, keying: PairKeying) -> PairKey {
    match keying {
        PairKeying::Identity => PairKey::Identity(
            record.mentor.as_ref().map(|p| p.id),
            record.mentee.as_ref().map(|p| p.id),
        ),
        PairKeying::DisplayName => PairKey::DisplayName(
            record.mentor_name().map(str::to_string),
            record.mentee_name().map(str::to_string),
        ),
    }
}

pub fn pair_keys<'a>(
    records: impl IntoIterator<Item = &'a MeetingRecord>,
    keying: PairKeying,
) -> HashSet<PairKey> {
    records
        .into_iter()
        .map(|record| pair_key(record, keying))
        .collect()
}

/// First day that still counts as recent for a trailing window ending at `now`.
/// Windows shorter than one day are widened to one; windows reaching past the
/// calendar's start begin at `NaiveDate::MIN`.
pub fn window_start(now: NaiveDate, window_days: i64) -> NaiveDate {
    Duration::try_days(window_days.max(1))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(NaiveDate::MIN)
}

pub fn compute_headline(
    records: &[MeetingRecord],
    now: NaiveDate,
    keying: PairKeying,
    window_days: i64,
) -> HeadlineMetrics {
    let all_pairs = pair_keys(records, keying);

    let sessions_this_month = records
        .iter()
        .filter(|record| {
            record.session_date.month() == now.month() && record.session_date.year() == now.year()
        })
        .count();

    let mut ratings = RatingTally::default();
    for record in records {
        ratings.push(record.submitted_mentor_rating());
        ratings.push(record.submitted_mentee_rating());
    }

    let cutoff = window_start(now, window_days);
    let recent_pairs = pair_keys(
        records.iter().filter(|record| record.session_date >= cutoff),
        keying,
    );

    HeadlineMetrics {
        total_active_pairs: all_pairs.len(),
        sessions_this_month,
        avg_satisfaction: ratings.mean().unwrap_or(0.0),
        at_risk_pairs: all_pairs.len().saturating_sub(recent_pairs.len()),
    }
}

pub fn mentor_status(last_seen: NaiveDate, now: NaiveDate, window_days: i64) -> MentorStatus {
    if last_seen >= window_start(now, window_days) {
        MentorStatus::Active
    } else {
        MentorStatus::Inactive
    }
}

pub fn recency_label(days_ago: i64) -> String {
    match days_ago {
        i64::MIN..=0 => "today".to_string(),
        1 => "yesterday".to_string(),
        2..=13 => format!("{days_ago} days ago"),
        14..=59 => format!("{} weeks ago", days_ago / 7),
        _ => format!("{} months ago", days_ago / 30),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{arb_records, date, meeting, person, rated};
    use proptest::prelude::*;

    #[test]
    fn empty_input_has_zero_headline() {
        let headline = compute_headline(&[], date(2024, 1, 15), PairKeying::Identity, 30);
        assert_eq!(headline, HeadlineMetrics::default());
    }

    #[test]
    fn sessions_this_month_match_month_and_year() {
        let mentor = person("Dr. Sarah Johnson");
        let mentee = person("Alice Chen");
        let records = vec![
            meeting(date(2023, 12, 1), Some(&mentor), Some(&mentee)),
            meeting(date(2024, 1, 10), Some(&mentor), Some(&mentee)),
            meeting(date(2024, 1, 20), Some(&mentor), Some(&mentee)),
            meeting(date(2024, 2, 1), Some(&mentor), Some(&mentee)),
            meeting(date(2023, 1, 12), Some(&mentor), Some(&mentee)),
        ];

        let headline = compute_headline(&records, date(2024, 1, 15), PairKeying::Identity, 30);
        assert_eq!(headline.sessions_this_month, 2);
    }

    #[test]
    fn pair_with_recent_session_is_not_at_risk() {
        let now = date(2024, 3, 15);
        let mentor = person("A");
        let mentee = person("B");
        let records = vec![
            meeting(now - Duration::days(40), Some(&mentor), Some(&mentee)),
            meeting(now - Duration::days(10), Some(&mentor), Some(&mentee)),
        ];

        let headline = compute_headline(&records, now, PairKeying::Identity, 30);
        assert_eq!(headline.total_active_pairs, 1);
        assert_eq!(headline.at_risk_pairs, 0);
    }

    #[test]
    fn stale_pairs_are_at_risk() {
        let now = date(2024, 3, 15);
        let mentor = person("Michael Chen");
        let first = person("Marcus Rodriguez");
        let second = person("Alex Thompson");
        let records = vec![
            meeting(now - Duration::days(45), Some(&mentor), Some(&first)),
            meeting(now - Duration::days(31), Some(&mentor), Some(&second)),
            meeting(now - Duration::days(30), Some(&mentor), Some(&second)),
        ];

        let headline = compute_headline(&records, now, PairKeying::Identity, 30);
        assert_eq!(headline.total_active_pairs, 2);
        assert_eq!(headline.at_risk_pairs, 1);
    }

    #[test]
    fn satisfaction_counts_both_sides_and_skips_unsubmitted() {
        let mentor = person("Jennifer Liu");
        let mentee = person("David Kim");
        let records = vec![
            rated(meeting(date(2024, 1, 5), Some(&mentor), Some(&mentee)), Some(4), Some(5)),
            rated(meeting(date(2024, 1, 6), Some(&mentor), Some(&mentee)), None, Some(3)),
            rated(meeting(date(2024, 1, 7), Some(&mentor), Some(&mentee)), Some(0), None),
        ];

        let headline = compute_headline(&records, date(2024, 1, 15), PairKeying::Identity, 30);
        assert!((headline.avg_satisfaction - 4.0).abs() < 0.001);
    }

    #[test]
    fn display_name_keying_merges_namesakes() {
        let mentor = person("Michael Chen");
        let namesake = person("Michael Chen");
        let mentee = person("Priya Patel");
        let records = vec![
            meeting(date(2024, 1, 5), Some(&mentor), Some(&mentee)),
            meeting(date(2024, 1, 6), Some(&namesake), Some(&mentee)),
        ];

        let now = date(2024, 1, 15);
        let by_id = compute_headline(&records, now, PairKeying::Identity, 30);
        let by_name = compute_headline(&records, now, PairKeying::DisplayName, 30);
        assert_eq!(by_id.total_active_pairs, 2);
        assert_eq!(by_name.total_active_pairs, 1);
    }

    #[test]
    fn records_without_profiles_share_a_degenerate_pair() {
        let records = vec![
            meeting(date(2024, 1, 5), None, None),
            meeting(date(2024, 1, 6), None, None),
        ];

        let headline = compute_headline(&records, date(2024, 1, 15), PairKeying::Identity, 30);
        assert_eq!(headline.total_active_pairs, 1);
        assert_eq!(headline.sessions_this_month, 2);
    }

    #[test]
    fn labels_follow_expected_tiers() {
        assert_eq!(recency_label(0), "today");
        assert_eq!(recency_label(1), "yesterday");
        assert_eq!(recency_label(5), "5 days ago");
        assert_eq!(recency_label(21), "3 weeks ago");
        assert_eq!(recency_label(95), "3 months ago");
        assert_eq!(recency_label(13), "13 days ago");
        assert_eq!(recency_label(14), "2 weeks ago");
        assert_eq!(recency_label(59), "8 weeks ago");
        assert_eq!(recency_label(60), "2 months ago");
    }

    #[test]
    fn window_start_respects_window_days() {
        assert_eq!(window_start(date(2024, 3, 15), 30), date(2024, 2, 14));
        assert_eq!(window_start(date(2024, 3, 15), 0), date(2024, 3, 14));
    }

    #[test]
    fn oversized_windows_saturate_instead_of_overflowing() {
        let now = date(2024, 1, 15);
        assert_eq!(window_start(now, 10_000_000_000), NaiveDate::MIN);
        assert_eq!(window_start(now, i64::MAX), NaiveDate::MIN);

        let mentor = person("A");
        let mentee = person("B");
        let records = vec![meeting(date(1990, 6, 1), Some(&mentor), Some(&mentee))];
        let headline = compute_headline(&records, now, PairKeying::Identity, 10_000_000_000);
        assert_eq!(headline.total_active_pairs, 1);
        assert_eq!(headline.at_risk_pairs, 0);
        assert_eq!(
            mentor_status(date(1990, 6, 1), now, i64::MAX),
            MentorStatus::Active
        );
    }

    proptest! {
        #[test]
        fn at_risk_never_exceeds_active_pairs(records in arb_records(), offset in -150i64..150) {
            let now = crate::test_support::anchor() + Duration::days(offset);
            for keying in [PairKeying::Identity, PairKeying::DisplayName] {
                let headline = compute_headline(&records, now, keying, 30);
                prop_assert!(headline.at_risk_pairs <= headline.total_active_pairs);
            }
        }
    }
}
