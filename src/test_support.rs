use chrono::{NaiveDate, NaiveTime};
use proptest::prelude::*;
use uuid::Uuid;

use crate::models::{MeetingRecord, PersonRef};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

pub fn person(name: &str) -> PersonRef {
    PersonRef {
        id: Uuid::new_v4(),
        name: name.to_string(),
    }
}

pub fn meeting(
    session_date: NaiveDate,
    mentor: Option<&PersonRef>,
    mentee: Option<&PersonRef>,
) -> MeetingRecord {
    MeetingRecord {
        id: Uuid::new_v4(),
        session_date,
        session_time: NaiveTime::from_hms_opt(14, 0, 0).expect("valid test time"),
        mode: "online".to_string(),
        topics: "Career guidance".to_string(),
        mentor: mentor.cloned(),
        mentee: mentee.cloned(),
        mentor_rating: None,
        mentee_rating: None,
        mentor_feedback: None,
        mentee_feedback: None,
    }
}

pub fn rated(mut record: MeetingRecord, mentor: Option<i32>, mentee: Option<i32>) -> MeetingRecord {
    record.mentor_rating = mentor;
    record.mentee_rating = mentee;
    record
}

/// Reference date the generated records are scattered around.
pub fn anchor() -> NaiveDate {
    date(2024, 3, 15)
}

fn roster() -> Vec<PersonRef> {
    ["Dr. Sarah Johnson", "Michael Chen", "Jennifer Liu", "Michael Chen"]
        .iter()
        .enumerate()
        .map(|(index, name)| PersonRef {
            id: Uuid::from_u128(index as u128 + 1),
            name: name.to_string(),
        })
        .collect()
}

pub fn arb_record() -> impl Strategy<Value = MeetingRecord> {
    (
        -120i64..120,
        proptest::option::of(0usize..4),
        proptest::option::of(0usize..4),
        proptest::option::of(0i32..=5),
        proptest::option::of(0i32..=5),
        prop_oneof![Just("online"), Just("Online"), Just("in-person"), Just("chat")],
    )
        .prop_map(|(offset, mentor, mentee, mentor_rating, mentee_rating, mode)| {
            let people = roster();
            let mut record = meeting(
                anchor() + chrono::Duration::days(offset),
                mentor.map(|i| &people[i]),
                mentee.map(|i| &people[i]),
            );
            record.id = Uuid::from_u128(offset.unsigned_abs() as u128);
            record.mode = mode.to_string();
            rated(record, mentor_rating, mentee_rating)
        })
}

pub fn arb_records() -> impl Strategy<Value = Vec<MeetingRecord>> {
    proptest::collection::vec(arb_record(), 0..40)
}
