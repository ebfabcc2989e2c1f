/**
 * Services Module
 * Data-access functions: one per read operation, each bound to exactly one
 * pool. Queries log structured failure detail here and re-raise; the route
 * layer decides the client-facing message.
 */

pub mod blogs;
pub mod industries;
pub mod reports;

/// Log a database failure with driver-reported detail. The detail stays in
/// the logs; callers propagate the error and surface a generic message.
pub(crate) fn log_db_error(context: &str, error: &sqlx::Error) {
    match error.as_database_error() {
        Some(db_err) => tracing::error!(
            error = %error,
            code = ?db_err.code(),
            detail = %db_err.message(),
            "{}",
            context
        ),
        None => tracing::error!(error = %error, "{}", context),
    }
}
