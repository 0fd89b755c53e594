use sqlx::postgres::PgDatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("invalid user id: {0}")]
    InvalidId(String),
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl RepoError {
    /// Maps unique-constraint violations onto [`RepoError::DuplicateEmail`],
    /// naming the colliding email when the server reports it.
    pub(crate) fn from_insert(err: sqlx::Error, email: Option<&str>) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                let reported = db
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.detail())
                    .and_then(key_from_detail);
                let email = reported.or(email).unwrap_or("duplicate email in batch");
                RepoError::DuplicateEmail(email.to_string())
            }
            _ => RepoError::Database(err),
        }
    }
}

// Postgres reports `Key (email)=(jay@example.com) already exists.`
fn key_from_detail(detail: &str) -> Option<&str> {
    let start = detail.find(")=(")? + 3;
    let end = detail.rfind(')')?;
    (end > start).then(|| &detail[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_detail_extracts_email() {
        assert_eq!(
            key_from_detail("Key (email)=(jay@example.com) already exists."),
            Some("jay@example.com")
        );
        assert_eq!(key_from_detail("something else"), None);
        assert_eq!(key_from_detail("Key (email)=() already exists."), None);
    }

    #[test]
    fn non_unique_errors_stay_database_errors() {
        let err = RepoError::from_insert(sqlx::Error::RowNotFound, Some("a@example.com"));
        assert!(matches!(err, RepoError::Database(sqlx::Error::RowNotFound)));
    }
}
