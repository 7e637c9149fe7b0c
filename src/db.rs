use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{MeetingRecord, PersonRef};
use crate::notifications::Notification;

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<usize> {
    let michael = PersonRef {
        id: Uuid::parse_str("5b1f4a0e-8f3c-4c47-9d6e-2a4c1f7b9e01")?,
        name: "Michael Chen".to_string(),
    };
    let sarah = PersonRef {
        id: Uuid::parse_str("9c2e7d15-3b6a-4f0e-a8d1-6e5f2b4c7a02")?,
        name: "Dr. Sarah Johnson".to_string(),
    };
    let alex = PersonRef {
        id: Uuid::parse_str("1d8a6c3f-7e2b-4a95-b0c4-3f9e8d2a1b03")?,
        name: "Alex Chen".to_string(),
    };
    let maria = PersonRef {
        id: Uuid::parse_str("e4b7c2a9-6d1f-4e38-9a5b-8c2d7f1e6a04")?,
        name: "Maria Rodriguez".to_string(),
    };

    let meetings = vec![
        (
            "0a6e1b2c-4d5f-4a7b-8c9d-0e1f2a3b4c01",
            (2024, 1, 5),
            (15, 0),
            "online",
            "Introduction meeting, Goal setting",
            &michael,
            &alex,
            Some(5),
            Some(4),
            Some("Clear goals for the term"),
            Some("Helpful first session"),
        ),
        (
            "0a6e1b2c-4d5f-4a7b-8c9d-0e1f2a3b4c02",
            (2024, 1, 10),
            (16, 0),
            "online",
            "System design discussion, Resume review",
            &michael,
            &maria,
            Some(4),
            None,
            Some("Good progress on fundamentals"),
            None,
        ),
        (
            "0a6e1b2c-4d5f-4a7b-8c9d-0e1f2a3b4c03",
            (2024, 1, 20),
            (14, 0),
            "in-person",
            "Career guidance, Technical interview prep",
            &michael,
            &alex,
            None,
            Some(5),
            None,
            Some("Mock interview was great"),
        ),
        (
            "0a6e1b2c-4d5f-4a7b-8c9d-0e1f2a3b4c04",
            (2024, 2, 2),
            (11, 30),
            "online",
            "Machine learning project scoping",
            &sarah,
            &maria,
            Some(3),
            Some(4),
            Some("Needs a narrower scope"),
            Some("Useful pointers on datasets"),
        ),
    ];

    let mut records = Vec::with_capacity(meetings.len());
    for (
        id,
        (year, month, day),
        (hour, minute),
        mode,
        topics,
        mentor,
        mentee,
        mentor_rating,
        mentee_rating,
        mentor_feedback,
        mentee_feedback,
    ) in meetings
    {
        records.push(MeetingRecord {
            id: Uuid::parse_str(id)?,
            session_date: NaiveDate::from_ymd_opt(year, month, day).context("invalid date")?,
            session_time: NaiveTime::from_hms_opt(hour, minute, 0).context("invalid time")?,
            mode: mode.to_string(),
            topics: topics.to_string(),
            mentor: Some(mentor.clone()),
            mentee: Some(mentee.clone()),
            mentor_rating,
            mentee_rating,
            mentor_feedback: mentor_feedback.map(str::to_string),
            mentee_feedback: mentee_feedback.map(str::to_string),
        });
    }

    let inserted = import_records(pool, &records).await?;
    seed_notifications(pool, alex.id).await?;
    Ok(inserted)
}

async fn seed_notifications(pool: &PgPool, recipient: Uuid) -> anyhow::Result<()> {
    let notifications = [
        (
            "seed-mentor-assigned",
            "2024-01-15T10:00:00Z",
            "Mentor Assigned",
            "You have been matched with Michael Chen for software engineering mentorship",
            None,
        ),
        (
            "seed-meeting-reminder",
            "2024-01-14T14:30:00Z",
            "Upcoming Meeting Reminder",
            "You have a meeting with Michael Chen tomorrow at 2:00 PM",
            Some("2024-01-20T14:00:00Z"),
        ),
        (
            "seed-profile-review",
            "2024-01-13T09:00:00Z",
            "Profile Review",
            "Your mentor has reviewed your profile and left feedback",
            Some("2024-01-13T09:00:00Z"),
        ),
    ];

    for (key, created_at, title, description, event_date) in notifications {
        let created_at: DateTime<Utc> = created_at.parse().context("invalid seed timestamp")?;
        let event_date: Option<DateTime<Utc>> = event_date
            .map(str::parse)
            .transpose()
            .context("invalid seed event date")?;

        sqlx::query(
            r#"
            INSERT INTO mentorship.notifications
            (recipient_id, created_at, title, description, event_date, source_key)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (source_key) DO NOTHING
            "#,
        )
        .bind(recipient)
        .bind(created_at)
        .bind(title)
        .bind(description)
        .bind(event_date)
        .bind(key)
        .execute(pool)
        .await
        .with_context(|| format!("failed to seed notification {title}"))?;
    }

    Ok(())
}

/// Notifications for one profile plus broadcasts, or all of them when no
/// recipient is given. Undated notifications come first.
pub async fn fetch_notifications(
    pool: &PgPool,
    recipient: Option<Uuid>,
) -> anyhow::Result<Vec<Notification>> {
    let rows = sqlx::query(
        r#"
        SELECT id, recipient_id, created_at, title, description, event_date
        FROM mentorship.notifications
        WHERE $1::uuid IS NULL OR recipient_id IS NULL OR recipient_id = $1
        ORDER BY event_date ASC NULLS FIRST, id ASC
        "#,
    )
    .bind(recipient)
    .fetch_all(pool)
    .await
    .context("failed to fetch notifications")?;

    let notifications: Vec<Notification> = rows
        .into_iter()
        .map(|row| Notification {
            id: row.get("id"),
            recipient_id: row.get("recipient_id"),
            created_at: row.get("created_at"),
            title: row.get("title"),
            description: row.get("description"),
            event_date: row.get("event_date"),
        })
        .collect();

    debug!(count = notifications.len(), "fetched notifications");
    Ok(notifications)
}

/// Fetches every meeting with its mentor and mentee joined, oldest first.
/// Meetings whose profiles were deleted come back with the reference unset.
pub async fn fetch_meetings(pool: &PgPool) -> anyhow::Result<Vec<MeetingRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT m.id, m.session_date, m.session_time, m.mode, m.topics,
               m.mentor_rating, m.mentee_rating, m.mentor_feedback, m.mentee_feedback,
               mentor.id AS mentor_id, mentor.name AS mentor_name,
               mentee.id AS mentee_id, mentee.name AS mentee_name
        FROM mentorship.meetings m
        LEFT JOIN mentorship.profiles mentor ON mentor.id = m.mentor_id
        LEFT JOIN mentorship.profiles mentee ON mentee.id = m.mentee_id
        ORDER BY m.session_date ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .context("failed to fetch meetings")?;

    let mut meetings = Vec::with_capacity(rows.len());

    for row in rows {
        meetings.push(MeetingRecord {
            id: row.get("id"),
            session_date: row.get("session_date"),
            session_time: row.get("session_time"),
            mode: row.get("mode"),
            topics: row.get("topics"),
            mentor: joined(row.get("mentor_id"), row.get("mentor_name")),
            mentee: joined(row.get("mentee_id"), row.get("mentee_name")),
            mentor_rating: row.get("mentor_rating"),
            mentee_rating: row.get("mentee_rating"),
            mentor_feedback: row.get("mentor_feedback"),
            mentee_feedback: row.get("mentee_feedback"),
        });
    }

    debug!(count = meetings.len(), "fetched meetings");
    Ok(meetings)
}

fn joined(id: Option<Uuid>, name: Option<String>) -> Option<PersonRef> {
    Some(PersonRef { id: id?, name: name? })
}

async fn upsert_profile(pool: &PgPool, person: &PersonRef, role: &str) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO mentorship.profiles (id, name, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name
        "#,
    )
    .bind(person.id)
    .bind(&person.name)
    .bind(role)
    .execute(pool)
    .await
    .with_context(|| format!("failed to upsert profile {}", person.name))?;
    Ok(())
}

/// Inserts meetings and their profiles. Meetings already present are left
/// untouched; returns how many were newly inserted.
pub async fn import_records(pool: &PgPool, records: &[MeetingRecord]) -> anyhow::Result<usize> {
    let mut inserted = 0usize;

    for record in records {
        if let Some(mentor) = &record.mentor {
            upsert_profile(pool, mentor, "mentor").await?;
        }
        if let Some(mentee) = &record.mentee {
            upsert_profile(pool, mentee, "mentee").await?;
        }

        let result = sqlx::query(
            r#"
            INSERT INTO mentorship.meetings
            (id, session_date, session_time, mode, topics, mentor_id, mentee_id,
             mentor_rating, mentee_rating, mentor_feedback, mentee_feedback)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(record.id)
        .bind(record.session_date)
        .bind(record.session_time)
        .bind(&record.mode)
        .bind(&record.topics)
        .bind(record.mentor.as_ref().map(|p| p.id))
        .bind(record.mentee.as_ref().map(|p| p.id))
        .bind(record.mentor_rating)
        .bind(record.mentee_rating)
        .bind(&record.mentor_feedback)
        .bind(&record.mentee_feedback)
        .execute(pool)
        .await?;

        if result.rows_affected() > 0 {
            inserted += 1;
        }
    }

    info!(inserted, total = records.len(), "imported meetings");
    Ok(inserted)
}
