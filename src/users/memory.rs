//! In-memory user repository, used by tests and for running without a database.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::RepoError;
use super::repo::UserRepository;
use super::repo_types::{NewUser, User};

#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn materialize(user: NewUser, now: OffsetDateTime) -> User {
    User {
        id: Uuid::new_v4(),
        username: user.username,
        avatar: user.avatar,
        bio: user.bio,
        rating: user.rating,
        email: user.email,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, RepoError> {
        user.validate()?;
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::DuplicateEmail(user.email));
        }
        let created = materialize(user, OffsetDateTime::now_utc());
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update_rating(&self, id: Uuid, rating: f64) -> Result<Option<User>, RepoError> {
        let mut users = self.users.write().await;
        Ok(users.get_mut(&id).map(|user| {
            user.rating = rating;
            user.updated_at = OffsetDateTime::now_utc();
            user.clone()
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepoError> {
        self.users.write().await.remove(&id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut users = self.users.write().await;
        let removed = users.len() as u64;
        users.clear();
        Ok(removed)
    }

    async fn insert_many(&self, batch: Vec<NewUser>) -> Result<Vec<User>, RepoError> {
        for user in &batch {
            user.validate()?;
        }

        let mut users = self.users.write().await;
        {
            let mut seen: HashSet<&str> = users.values().map(|u| u.email.as_str()).collect();
            if let Some(dup) = batch.iter().find(|u| !seen.insert(u.email.as_str())) {
                return Err(RepoError::DuplicateEmail(dup.email.clone()));
            }
        }

        let now = OffsetDateTime::now_utc();
        let inserted: Vec<User> = batch.into_iter().map(|u| materialize(u, now)).collect();
        for user in &inserted {
            users.insert(user.id, user.clone());
        }
        Ok(inserted)
    }
}
