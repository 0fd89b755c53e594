use tracing::info;

use super::errors::RepoError;
use super::repo::UserRepository;
use super::repo_types::{NewUser, User};

/// The fixed sample profiles loaded by the `seed` binary.
pub fn sample_users() -> Vec<NewUser> {
    [
        ("otito", 1, "Backend builder", 4.9),
        ("amara", 2, "JavaScript learner", 4.5),
        ("zeke", 3, "Data nerd", 4.2),
        ("mina", 4, "Design enthusiast", 4.7),
        ("jay", 5, "TypeScript fan", 4.8),
    ]
    .into_iter()
    .map(|(name, avatar, bio, rating)| {
        NewUser::new(name, format!("{name}@example.com"))
            .with_avatar(format!("https://example.com/avatar{avatar}.png"))
            .with_bio(bio)
            .with_rating(rating)
    })
    .collect()
}

/// Clears every user and inserts the sample set.
pub async fn seed_users(repo: &dyn UserRepository) -> Result<Vec<User>, RepoError> {
    let removed = repo.delete_all().await?;
    info!(count = removed, "users cleared");
    let inserted = repo.insert_many(sample_users()).await?;
    info!(count = inserted.len(), "users seeded");
    Ok(inserted)
}
