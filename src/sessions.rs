use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

use crate::models::MeetingRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionView {
    #[default]
    Upcoming,
    Past,
}

/// Meetings where `person_id` is either side, latest first.
pub fn sessions_for(records: &[MeetingRecord], person_id: Uuid) -> Vec<MeetingRecord> {
    let mut sessions: Vec<MeetingRecord> = records
        .iter()
        .filter(|record| record.involves(person_id))
        .cloned()
        .collect();
    sessions.sort_by(|a, b| {
        (b.session_date, b.session_time).cmp(&(a.session_date, a.session_time))
    });
    sessions
}

/// Splits meetings at `today`: sessions on `today` are still upcoming.
pub fn partition_sessions<'a>(
    records: &'a [MeetingRecord],
    today: NaiveDate,
) -> (Vec<&'a MeetingRecord>, Vec<&'a MeetingRecord>) {
    records
        .iter()
        .partition(|record| record.session_date >= today)
}

pub fn filter_view<'a>(
    records: &'a [MeetingRecord],
    today: NaiveDate,
    view: SessionView,
) -> Vec<&'a MeetingRecord> {
    let (upcoming, past) = partition_sessions(records, today);
    match view {
        SessionView::Upcoming => upcoming,
        SessionView::Past => past,
    }
}

/// "14:00" renders as "2:00 PM".
pub fn format_time(time: NaiveTime) -> String {
    time.format("%-I:%M %p").to_string()
}

/// Renders as "Sat, Jan 20, 2024".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, meeting, person};

    #[test]
    fn formats_times_on_twelve_hour_clock() {
        assert_eq!(format_time(NaiveTime::from_hms_opt(14, 0, 0).unwrap()), "2:00 PM");
        assert_eq!(format_time(NaiveTime::from_hms_opt(0, 5, 0).unwrap()), "12:05 AM");
        assert_eq!(format_time(NaiveTime::from_hms_opt(12, 30, 0).unwrap()), "12:30 PM");
        assert_eq!(format_time(NaiveTime::from_hms_opt(9, 15, 0).unwrap()), "9:15 AM");
    }

    #[test]
    fn formats_dates_with_weekday() {
        assert_eq!(format_date(date(2024, 1, 20)), "Sat, Jan 20, 2024");
        assert_eq!(format_date(date(2024, 1, 5)), "Fri, Jan 5, 2024");
    }

    #[test]
    fn today_counts_as_upcoming() {
        let mentor = person("Michael Chen");
        let records = vec![
            meeting(date(2024, 1, 10), Some(&mentor), None),
            meeting(date(2024, 1, 15), Some(&mentor), None),
            meeting(date(2024, 1, 20), Some(&mentor), None),
        ];

        let today = date(2024, 1, 15);
        let upcoming = filter_view(&records, today, SessionView::Upcoming);
        let past = filter_view(&records, today, SessionView::Past);
        assert_eq!(upcoming.len(), 2);
        assert_eq!(past.len(), 1);
        assert_eq!(past[0].session_date, date(2024, 1, 10));
    }

    #[test]
    fn sessions_for_matches_either_side_latest_first() {
        let mentor = person("Michael Chen");
        let alex = person("Alex Chen");
        let maria = person("Maria Rodriguez");
        let records = vec![
            meeting(date(2024, 1, 10), Some(&mentor), Some(&maria)),
            meeting(date(2024, 1, 20), Some(&mentor), Some(&alex)),
            meeting(date(2024, 1, 5), None, Some(&alex)),
        ];

        let for_mentor = sessions_for(&records, mentor.id);
        assert_eq!(for_mentor.len(), 2);
        assert_eq!(for_mentor[0].session_date, date(2024, 1, 20));

        let for_alex = sessions_for(&records, alex.id);
        assert_eq!(for_alex.len(), 2);
        assert_eq!(for_alex[1].session_date, date(2024, 1, 5));
    }
}
