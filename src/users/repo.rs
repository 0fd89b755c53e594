use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::errors::RepoError;
use super::repo_types::{NewUser, User};

const USER_COLUMNS: &str = "id, username, avatar, bio, rating, email, created_at, updated_at";

/// Storage contract for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<User>, RepoError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
    async fn update_rating(&self, id: Uuid, rating: f64) -> Result<Option<User>, RepoError>;
    /// Removes the user if present. Deleting an unknown id is not an error.
    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepoError>;
    async fn delete_all(&self) -> Result<u64, RepoError>;
    /// Inserts every record or none of them.
    async fn insert_many(&self, users: Vec<NewUser>) -> Result<Vec<User>, RepoError>;
}

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
}

impl PgUserRepository {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &PgPool {
        &self.db
    }

    pub async fn migrate(&self) -> Result<(), RepoError> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users"))
            .fetch_all(&self.db)
            .await?;
        debug!(count = users.len(), "listed users");
        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        user.validate()?;
        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (username, avatar, bio, rating, email)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.username)
        .bind(&user.avatar)
        .bind(&user.bio)
        .bind(user.rating)
        .bind(&user.email)
        .fetch_one(&self.db)
        .await
        .map_err(|e| RepoError::from_insert(e, Some(&user.email)))?;
        info!(user_id = %created.id, email = %created.email, "user created");
        Ok(created)
    }

    async fn update_rating(&self, id: Uuid, rating: f64) -> Result<Option<User>, RepoError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET rating = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(rating)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        debug!(user_id = %id, removed = result.rows_affected(), "delete user");
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let result = sqlx::query("DELETE FROM users").execute(&self.db).await?;
        Ok(result.rows_affected())
    }

    async fn insert_many(&self, users: Vec<NewUser>) -> Result<Vec<User>, RepoError> {
        if users.is_empty() {
            return Ok(Vec::new());
        }
        for user in &users {
            user.validate()?;
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO users (username, avatar, bio, rating, email) ");
        builder.push_values(&users, |mut row, user| {
            row.push_bind(&user.username)
                .push_bind(&user.avatar)
                .push_bind(&user.bio)
                .push_bind(user.rating)
                .push_bind(&user.email);
        });
        builder.push(" RETURNING ");
        builder.push(USER_COLUMNS);

        let inserted = builder
            .build_query_as::<User>()
            .fetch_all(&self.db)
            .await
            .map_err(|e| RepoError::from_insert(e, None))?;
        info!(count = inserted.len(), "users inserted");
        Ok(inserted)
    }
}

// These run against a live server: `DATABASE_URL=... cargo test -- --ignored`.
#[cfg(test)]
mod pg_tests {
    use super::*;

    fn sample(name: &str) -> NewUser {
        NewUser::new(name, format!("{name}@example.com")).with_rating(4.2)
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn crud_round_trip(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        let user = repo.create(sample("otito")).await.unwrap();
        assert_eq!(user.rating, 4.2);

        let found = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.email, "otito@example.com");
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());

        let updated = repo.update_rating(user.id, 5.0).await.unwrap().unwrap();
        assert_eq!(updated.rating, 5.0);
        assert!(updated.updated_at >= user.updated_at);

        repo.delete_by_id(user.id).await.unwrap();
        repo.delete_by_id(user.id).await.unwrap();
        assert!(repo.find_by_id(user.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn create_maps_unique_violation(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        repo.create(sample("amara")).await.unwrap();

        let err = repo
            .create(NewUser::new("other", "amara@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::DuplicateEmail(ref e) if e == "amara@example.com"));
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn insert_many_is_all_or_nothing(pool: PgPool) {
        let repo = PgUserRepository::new(pool);
        repo.create(sample("mina")).await.unwrap();

        let err = repo
            .insert_many(vec![sample("zeke"), sample("mina"), sample("jay")])
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::DuplicateEmail(ref e) if e == "mina@example.com"));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);

        let inserted = repo
            .insert_many(vec![sample("zeke"), sample("jay")])
            .await
            .unwrap();
        assert_eq!(inserted.len(), 2);
        assert_eq!(repo.delete_all().await.unwrap(), 3);
    }
}
