//! Retry for SQLite lock contention.
//!
//! The scheduler and edits write the same table from different connections.
//! A write that loses the lock race reports SQLITE_BUSY/LOCKED even with a busy
//! timeout when the WAL snapshot is stale, so those are retried with a short
//! backoff that fits inside one tick.

use std::future::Future;
use std::time::Duration;

/// Maximum number of retry attempts for database operations
pub const MAX_RETRIES: u32 = 3;

/// Check if a SQLite error is transient and should be retried
///
/// - SQLITE_BUSY (5): Database locked by another connection
/// - SQLITE_LOCKED (6): Database table is locked
/// - SQLITE_BUSY_SNAPSHOT (517): WAL snapshot is out of date (5 | 2<<8)
pub fn is_transient_error(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            let code = db_err.code().map(|c| c.to_string());
            matches!(code.as_deref(), Some("5") | Some("6") | Some("517"))
        }
        _ => false,
    }
}

/// Exponential backoff: 5ms, 10ms, 20ms
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(5 * 2u64.pow(attempt.saturating_sub(1)))
}

/// Run a database operation, retrying transient lock errors
pub async fn with_retry<F, Fut, T>(operation: F) -> std::result::Result<T, sqlx::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    let mut attempts = 0;
    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if is_transient_error(&e) && attempts < MAX_RETRIES => {
                attempts += 1;
                let delay = backoff_delay(attempts);
                tracing::debug!(
                    error = %e,
                    attempt = attempts,
                    max_retries = MAX_RETRIES,
                    delay_ms = delay.as_millis(),
                    "Database transient error, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
