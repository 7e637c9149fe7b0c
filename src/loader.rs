use std::path::Path;

use anyhow::Context;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::RecordError;
use crate::models::{MeetingRecord, PersonRef};

/// A meeting row as exported to CSV or JSON, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMeeting {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub session_date: String,
    pub session_time: String,
    pub mode: String,
    #[serde(default)]
    pub topics: String,
    #[serde(default)]
    pub mentor_id: Option<Uuid>,
    #[serde(default)]
    pub mentor_name: Option<String>,
    #[serde(default)]
    pub mentee_id: Option<Uuid>,
    #[serde(default)]
    pub mentee_name: Option<String>,
    #[serde(default)]
    pub mentor_rating: Option<i32>,
    #[serde(default)]
    pub mentee_rating: Option<i32>,
    #[serde(default)]
    pub mentor_feedback: Option<String>,
    #[serde(default)]
    pub mentee_feedback: Option<String>,
}

impl RawMeeting {
    /// `row` is 1-based and only used for error reporting.
    pub fn into_record(self, row: usize) -> Result<MeetingRecord, RecordError> {
        let session_date = NaiveDate::parse_from_str(self.session_date.trim(), "%Y-%m-%d")
            .map_err(|_| RecordError::InvalidDate {
                row,
                value: self.session_date.clone(),
            })?;
        let session_time = parse_time(self.session_time.trim()).ok_or_else(|| {
            RecordError::InvalidTime {
                row,
                value: self.session_time.clone(),
            }
        })?;

        let mentor = person(self.mentor_id, self.mentor_name);
        let mentee = person(self.mentee_id, self.mentee_name);
        let id = self.id.unwrap_or_else(|| {
            meeting_id(session_date, session_time, mentor.as_ref(), mentee.as_ref())
        });

        Ok(MeetingRecord {
            id,
            session_date,
            session_time,
            mode: self.mode,
            topics: self.topics,
            mentor,
            mentee,
            mentor_rating: self.mentor_rating,
            mentee_rating: self.mentee_rating,
            mentor_feedback: non_empty(self.mentor_feedback),
            mentee_feedback: non_empty(self.mentee_feedback),
        })
    }
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .ok()
}

/// Exports without profile ids get a name-derived id so identity keying
/// stays stable across rows.
fn person(id: Option<Uuid>, name: Option<String>) -> Option<PersonRef> {
    let name = non_empty(name)?;
    let id = id.unwrap_or_else(|| Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes()));
    Some(PersonRef { id, name })
}

/// Rows without an id are keyed by slot and pair, so importing the same
/// export twice inserts nothing new.
fn meeting_id(
    date: NaiveDate,
    time: NaiveTime,
    mentor: Option<&PersonRef>,
    mentee: Option<&PersonRef>,
) -> Uuid {
    let side = |who: Option<&PersonRef>| who.map(|p| p.id.to_string()).unwrap_or_default();
    let key = format!("{date}|{time}|{}|{}", side(mentor), side(mentee));
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// A row as read from an export: either deserialized, or the reason it
/// could not be.
pub type RawRow = Result<RawMeeting, String>;

/// Validates raw rows, dropping the ones that cannot be parsed. The kept
/// records come back in ascending date order.
pub fn parse_records(rows: Vec<RawRow>) -> (Vec<MeetingRecord>, Vec<RecordError>) {
    let mut records = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let row_number = index + 1;
        let parsed = row
            .map_err(|reason| RecordError::Unreadable {
                row: row_number,
                reason,
            })
            .and_then(|raw| raw.into_record(row_number));

        match parsed {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(error = %err, "skipping malformed meeting row");
                rejected.push(err);
            }
        }
    }

    records.sort_by_key(|record| record.session_date);
    (records, rejected)
}

pub fn read_csv(path: &Path) -> anyhow::Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let rows: Vec<RawRow> = reader
        .deserialize::<RawMeeting>()
        .map(|result| result.map_err(|err| err.to_string()))
        .collect();

    info!(rows = rows.len(), path = %path.display(), "read meeting rows from csv");
    Ok(rows)
}

/// The file must hold a JSON array; each element is deserialized on its own
/// so one bad element does not sink the rest.
pub fn read_json(path: &Path) -> anyhow::Result<Vec<RawRow>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array", path.display()))?;

    let rows: Vec<RawRow> = values
        .into_iter()
        .map(|value| serde_json::from_value::<RawMeeting>(value).map_err(|err| err.to_string()))
        .collect();

    info!(rows = rows.len(), path = %path.display(), "read meeting rows from json");
    Ok(rows)
}
