//! # Activity Repository
//!
//! Calendar entries: meetings, tasks, reminders and events.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use xonter_core::{Activity, ActivityKind, NewActivity, OwnerId, MAX_LIST_ROWS};

use super::{clean_optional, decode_owner, new_id};
use crate::error::{DbError, DbResult};

#[derive(Debug, sqlx::FromRow)]
struct ActivityRow {
    id: String,
    owner_id: String,
    title: String,
    description: Option<String>,
    starts_at: NaiveDateTime,
    ends_at: Option<NaiveDateTime>,
    kind: ActivityKind,
    completed: bool,
    created_at: DateTime<Utc>,
}

impl ActivityRow {
    fn into_activity(self) -> DbResult<Activity> {
        Ok(Activity {
            owner_id: decode_owner(&self.owner_id)?,
            id: self.id,
            title: self.title,
            description: self.description,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            kind: self.kind,
            completed: self.completed,
            created_at: self.created_at,
        })
    }
}

/// Repository for one owner's calendar.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: SqlitePool,
    owner: OwnerId,
}

impl ActivityRepository {
    /// Creates a repository bound to `owner`.
    pub fn new(pool: SqlitePool, owner: OwnerId) -> Self {
        ActivityRepository { pool, owner }
    }

    /// Validates and stores a new, pending activity.
    pub async fn insert(&self, payload: &NewActivity) -> DbResult<Activity> {
        payload.validate()?;

        let activity = Activity {
            id: new_id(),
            owner_id: self.owner.clone(),
            title: payload.title.trim().to_string(),
            description: clean_optional(&payload.description),
            starts_at: payload.starts_at,
            ends_at: payload.ends_at,
            kind: payload.kind,
            completed: false,
            created_at: Utc::now(),
        };

        debug!(id = %activity.id, starts_at = %activity.starts_at, "Inserting activity");

        sqlx::query(
            r#"
            INSERT INTO activities (
                id, owner_id, title, description, starts_at, ends_at, kind, completed, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&activity.id)
        .bind(self.owner.as_str())
        .bind(&activity.title)
        .bind(&activity.description)
        .bind(activity.starts_at)
        .bind(activity.ends_at)
        .bind(activity.kind)
        .bind(activity.completed)
        .bind(activity.created_at)
        .execute(&self.pool)
        .await?;

        Ok(activity)
    }

    /// Lists activities in chronological order (earliest start first).
    pub async fn list(&self) -> DbResult<Vec<Activity>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, owner_id, title, description, starts_at, ends_at, kind, completed, created_at
            FROM activities
            WHERE owner_id = ?1
            ORDER BY starts_at ASC
            LIMIT ?2
            "#,
        )
        .bind(self.owner.as_str())
        .bind(MAX_LIST_ROWS)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ActivityRow::into_activity).collect()
    }

    /// Flips the completed flag and returns the new value.
    pub async fn toggle_completed(&self, id: &str) -> DbResult<bool> {
        let completed: Option<bool> = sqlx::query_scalar(
            r#"
            UPDATE activities SET completed = NOT completed
            WHERE id = ?1 AND owner_id = ?2
            RETURNING completed
            "#,
        )
        .bind(id)
        .bind(self.owner.as_str())
        .fetch_optional(&self.pool)
        .await?;

        let completed = completed.ok_or_else(|| DbError::not_found("Activity", id))?;
        debug!(id = %id, completed, "Toggled activity");
        Ok(completed)
    }

    /// Counts activities not yet completed.
    pub async fn count_pending(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activities WHERE owner_id = ?1 AND completed = 0",
        )
        .bind(self.owner.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::setup;
    use chrono::NaiveDate;
    use xonter_core::split_pending;

    fn payload(title: &str, day: u32, hour: u32) -> NewActivity {
        let starts_at = NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        NewActivity {
            title: title.to_string(),
            description: None,
            starts_at,
            ends_at: Some(starts_at + chrono::Duration::hours(1)),
            kind: ActivityKind::Meeting,
        }
    }

    #[tokio::test]
    async fn test_list_is_chronological() {
        let (db, owner, _) = setup().await;
        let repo = db.activities(&owner);

        repo.insert(&payload("late", 20, 9)).await.unwrap();
        repo.insert(&payload("early", 2, 15)).await.unwrap();
        repo.insert(&payload("middle", 2, 16)).await.unwrap();

        let titles: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["early", "middle", "late"]);
    }

    #[tokio::test]
    async fn test_toggle_and_count_pending() {
        let (db, owner, _) = setup().await;
        let repo = db.activities(&owner);

        let first = repo.insert(&payload("call", 2, 9)).await.unwrap();
        repo.insert(&payload("visit", 3, 9)).await.unwrap();
        assert!(!first.completed);
        assert_eq!(repo.count_pending().await.unwrap(), 2);

        assert!(repo.toggle_completed(&first.id).await.unwrap());
        assert_eq!(repo.count_pending().await.unwrap(), 1);

        let (pending, done) = split_pending(repo.list().await.unwrap());
        assert_eq!(pending[0].title, "visit");
        assert_eq!(done[0].title, "call");

        assert!(!repo.toggle_completed(&first.id).await.unwrap());
        assert_eq!(repo.count_pending().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_other_owner_cannot_toggle() {
        let (db, alice, bob) = setup().await;
        let act = db.activities(&alice).insert(&payload("call", 2, 9)).await.unwrap();

        assert!(matches!(
            db.activities(&bob).toggle_completed(&act.id).await,
            Err(DbError::NotFound { .. })
        ));
        assert_eq!(db.activities(&alice).count_pending().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_end_before_start_is_rejected() {
        let (db, owner, _) = setup().await;
        let mut bad = payload("call", 2, 9);
        bad.ends_at = Some(bad.starts_at - chrono::Duration::minutes(5));

        assert!(matches!(
            db.activities(&owner).insert(&bad).await,
            Err(DbError::Validation(_))
        ));
    }
}
