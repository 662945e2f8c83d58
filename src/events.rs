use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

/// Append an entry to the billing event log. Failures here must never
/// fail the request; callers log and move on.
pub async fn log_event(
    pool: &DbPool,
    invoice_id: Option<i64>,
    action: &str,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO invoice_events (id, invoice_id, action, metadata)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(id)
    .bind(invoice_id)
    .bind(action)
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}
