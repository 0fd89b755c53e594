mod dto;
mod errors;
pub mod handlers;
pub mod memory;
pub mod repo;
mod repo_types;
pub mod seed;

use crate::state::AppState;
use axum::Router;

pub use errors::RepoError;
pub use memory::InMemoryUserRepository;
pub use repo::{PgUserRepository, UserRepository};
pub use repo_types::{parse_user_id, NewUser, User};

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
