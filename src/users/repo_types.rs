use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::errors::RepoError;

/// User record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub avatar: Option<String>, // URL
    pub bio: Option<String>,
    pub rating: f64,
    pub email: String, // unique across users
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields accepted when inserting a user. Storage assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub rating: f64,
    pub email: String,
}

impl NewUser {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            avatar: None,
            bio: None,
            rating: 0.0,
            email: email.into(),
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    /// Checks the required fields before the record reaches storage.
    pub fn validate(&self) -> Result<(), RepoError> {
        if self.username.trim().is_empty() {
            return Err(RepoError::Validation("username is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(RepoError::Validation("email is required".into()));
        }
        if !self.rating.is_finite() {
            return Err(RepoError::Validation("rating must be a finite number".into()));
        }
        Ok(())
    }
}

/// Parses a path identifier into a user id.
pub fn parse_user_id(raw: &str) -> Result<Uuid, RepoError> {
    Uuid::parse_str(raw).map_err(|_| RepoError::InvalidId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn user_serializes_with_camel_case_timestamps() {
        let user = User {
            id: Uuid::nil(),
            username: "otito".into(),
            avatar: None,
            bio: Some("Backend builder".into()),
            rating: 4.9,
            email: "otito@example.com".into(),
            created_at: datetime!(2024-06-01 12:00 UTC),
            updated_at: datetime!(2024-06-02 08:30 UTC),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "otito");
        assert_eq!(json["rating"], 4.9);
        assert_eq!(json["avatar"], serde_json::Value::Null);
        assert_eq!(json["createdAt"], "2024-06-01T12:00:00Z");
        assert_eq!(json["updatedAt"], "2024-06-02T08:30:00Z");
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn new_user_defaults_rating_to_zero() {
        let user: NewUser =
            serde_json::from_str(r#"{"username":"zeke","email":"zeke@example.com"}"#).unwrap();
        assert_eq!(user.rating, 0.0);
        assert!(user.avatar.is_none());
        assert!(user.validate().is_ok());
    }

    #[test]
    fn validate_requires_username_and_email() {
        let err = NewUser::new("  ", "a@example.com").validate().unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));

        let err = NewUser::new("amara", "").validate().unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[test]
    fn validate_rejects_non_finite_rating() {
        let err = NewUser::new("jay", "jay@example.com")
            .with_rating(f64::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)));
    }

    #[test]
    fn parse_user_id_rejects_malformed() {
        let err = parse_user_id("not-an-id").unwrap_err();
        assert!(matches!(err, RepoError::InvalidId(ref s) if s == "not-an-id"));

        let id = Uuid::new_v4();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
    }
}
