use chrono::{DateTime, Utc};
use log::trace;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{Match, MatchFilter, MatchStatus, NewMatch},
    traits::MatchStoreError,
};

const SELECT_MATCHES: &str = r#"
    SELECT id, team_a, team_b, score_a, score_b, status, scheduled_at, created_at, updated_at FROM matches
    "#;

/// Inserts a new match and returns the full record, including the id assigned by SQLite.
///
/// This is not atomic with anything else the caller does. Pass `&mut *tx` if it needs to be.
pub async fn insert_match(new_match: NewMatch, conn: &mut SqliteConnection) -> Result<Match, MatchStoreError> {
    let result = sqlx::query(
        r#"
            INSERT INTO matches (team_a, team_b, score_a, score_b, status, scheduled_at, created_at)
            VALUES ($1, $2, 0, 0, $3, $4, $5);
        "#,
    )
    .bind(&new_match.team_a)
    .bind(&new_match.team_b)
    .bind(MatchStatus::InProgress.as_str())
    .bind(new_match.scheduled_at)
    .bind(new_match.created_at)
    .execute(conn)
    .await?;
    let id = result.last_insert_rowid();
    trace!("🗃️ Inserted match #{id}");
    Ok(new_match.into_match(id))
}

/// Writes the scores, status and `updated_at` of `record` over the stored row.
///
/// Only rows that are still `IN_PROGRESS` are written, so a closed match can never be reopened or rescored by a
/// late writer. Returns [`MatchStoreError::MatchClosed`] in that case, or [`MatchStoreError::MatchNotFound`] if the
/// row is gone.
pub async fn update_match(record: &Match, conn: &mut SqliteConnection) -> Result<Match, MatchStoreError> {
    let result = sqlx::query(
        r#"
            UPDATE matches SET score_a = $1, score_b = $2, status = $3, updated_at = $4
            WHERE id = $5 AND status = $6;
        "#,
    )
    .bind(record.score_a)
    .bind(record.score_b)
    .bind(record.status.as_str())
    .bind(record.updated_at)
    .bind(record.id)
    .bind(MatchStatus::InProgress.as_str())
    .execute(&mut *conn)
    .await?;
    if result.rows_affected() == 0 {
        return if match_exists(record.id, conn).await? {
            trace!("🗃️ Match #{} is closed. Update skipped", record.id);
            Err(MatchStoreError::MatchClosed(record.id))
        } else {
            Err(MatchStoreError::MatchNotFound(record.id))
        };
    }
    fetch_match_by_id(record.id, conn).await?.ok_or(MatchStoreError::MatchNotFound(record.id))
}

pub async fn fetch_match_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Match>, MatchStoreError> {
    let mut builder = QueryBuilder::<Sqlite>::new(SELECT_MATCHES);
    builder.push("WHERE id = ").push_bind(id);
    let record = builder.build_query_as::<Match>().fetch_optional(conn).await?;
    Ok(record)
}

/// Fetches the matches selected by `filter`, most recently scheduled first.
pub async fn fetch_matches(filter: MatchFilter, conn: &mut SqliteConnection) -> Result<Vec<Match>, MatchStoreError> {
    let mut builder = QueryBuilder::<Sqlite>::new(SELECT_MATCHES);
    match filter {
        MatchFilter::All => {},
        MatchFilter::Status(status) => {
            builder.push("WHERE status = ").push_bind(status.as_str());
        },
        MatchFilter::ScheduledBetween { from, to } => {
            push_range(&mut builder, from, to);
        },
    }
    builder.push(" ORDER BY scheduled_at DESC, id DESC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let matches = builder.build_query_as::<Match>().fetch_all(conn).await?;
    trace!("🗃️ Result of fetch_matches({filter}): {} matches", matches.len());
    Ok(matches)
}

fn push_range(builder: &mut QueryBuilder<'_, Sqlite>, from: DateTime<Utc>, to: DateTime<Utc>) {
    builder.push("WHERE scheduled_at >= ").push_bind(from);
    builder.push(" AND scheduled_at <= ").push_bind(to);
}

pub async fn match_exists(id: i64, conn: &mut SqliteConnection) -> Result<bool, MatchStoreError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM matches WHERE id = $1)")
        .bind(id)
        .fetch_one(conn)
        .await?;
    Ok(exists)
}

pub async fn delete_match(id: i64, conn: &mut SqliteConnection) -> Result<(), MatchStoreError> {
    let result = sqlx::query("DELETE FROM matches WHERE id = $1").bind(id).execute(conn).await?;
    trace!("🗃️ Deleted {} row(s) for match #{id}", result.rows_affected());
    Ok(())
}

/// Counts matches, optionally restricted to a single status.
pub async fn count_matches(
    status: Option<MatchStatus>,
    conn: &mut SqliteConnection,
) -> Result<i64, MatchStoreError> {
    let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM matches");
    if let Some(status) = status {
        builder.push(" WHERE status = ").push_bind(status.as_str());
    }
    let count: i64 = builder.build_query_scalar().fetch_one(conn).await?;
    Ok(count)
}
