use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, Set, Statement,
};

use crate::db::entities::visit;
use crate::db::models::DailyVisitCount;

/// Window shown on the dashboard chart.
pub const DEFAULT_VISIT_WINDOW_DAYS: u64 = 14;

/// Records one visit stamped with the current time.
pub async fn record_visit(db: &DatabaseConnection) -> Result<visit::Model, DbErr> {
    visit::ActiveModel {
        visited_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Counts visits per calendar day for the `days` most recent days that have
/// any visit, returned in ascending date order.
pub async fn get_recent_daily_visit_counts(
    db: &DatabaseConnection,
    days: u64,
) -> Result<Vec<DailyVisitCount>, DbErr> {
    let backend = db.get_database_backend();
    let limit = match backend {
        DbBackend::Postgres => "$1",
        _ => "?",
    };
    // DATE() and CAST(.. AS TEXT) behave the same on Postgres and SQLite.
    let sql = format!(
        r#"SELECT CAST(DATE(visited_at) AS TEXT) AS "date", COUNT(*) AS "count"
           FROM visit
           GROUP BY DATE(visited_at)
           ORDER BY DATE(visited_at) DESC
           LIMIT {limit}"#
    );
    let days = i64::try_from(days).unwrap_or(i64::MAX);

    let mut counts = DailyVisitCount::find_by_statement(Statement::from_sql_and_values(
        backend,
        sql,
        [days.into()],
    ))
    .all(db)
    .await?;

    // Newest first from the query, charts want oldest first.
    counts.reverse();
    Ok(counts)
}
