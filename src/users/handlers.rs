use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{error::ApiError, state::AppState};

use super::dto::UpdateRatingRequest;
use super::repo_types::{parse_user_id, User};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/:id",
            get(get_user).put(update_rating).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list_all().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_user_id(&id)?;
    match state.users.find_by_id(id).await? {
        Some(user) => Ok(Json(user)),
        None => {
            warn!(user_id = %id, "user not found");
            Err(ApiError::NotFound)
        }
    }
}

#[instrument(skip(state, payload))]
pub async fn update_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateRatingRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let id = parse_user_id(&id)?;
    let Json(payload) = payload?;
    let user = state
        .users
        .update_rating(id, payload.rating)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!(user_id = %user.id, rating = user.rating, "rating updated");
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_user_id(&id)?;
    state.users.delete_by_id(id).await?;
    info!(user_id = %id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
