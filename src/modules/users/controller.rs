use anyhow::anyhow;
use axum::extract::{Path, State};
use axum::http::Method;
use axum::response::Response;
use tracing::instrument;

use crate::middleware::auth::Caller;
use crate::middleware::role::authorize;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::response::{ApiResponse, accepted};
use crate::validator::{PatchBody, parse_partial};

use super::model::{UpdateUserDto, UserRecord};
use super::service::UserService;

/// Parses the `{user_id}` path segment. A non-integer segment is a
/// bad request, not a missing user.
fn parse_target_id(segment: &str) -> Result<i64, AppError> {
    segment
        .trim()
        .parse::<i64>()
        .map_err(|_| AppError::bad_request(anyhow!("user id must be an integer, got {segment:?}")))
}

/// Get one user by id
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "Id of the user to fetch")),
    responses(
        (status = 200, description = "User found", body = UserRecord),
        (status = 400, description = "Malformed user id"),
        (status = 401, description = "Caller identity could not be resolved"),
        (status = 403, description = "Caller may not view this user"),
        (status = 404, description = "No user with this id"),
    ),
    security(("bearer_token" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Caller(caller): Caller,
) -> Result<Response, AppError> {
    let target = parse_target_id(&user_id)?;

    if !authorize(&Method::GET, &caller, target, false) {
        return Err(AppError::forbidden(anyhow!(
            "caller {} may not view user {target}",
            caller.id
        )));
    }

    let record = UserService::fetch(state.store.as_ref(), target).await?;
    Ok(ApiResponse::ok(record))
}

/// Partially update one user
#[utoipa::path(
    patch,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "Id of the user to update")),
    request_body = UpdateUserDto,
    responses(
        (status = 202, description = "Update accepted"),
        (status = 400, description = "Malformed id or body, or failed field validation"),
        (status = 401, description = "Caller identity could not be resolved"),
        (status = 403, description = "Caller may not update this user"),
        (status = 404, description = "No user with this id"),
    ),
    security(("bearer_token" = [])),
    tag = "Users"
)]
#[instrument(skip(state, body))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Caller(caller): Caller,
    PatchBody(body): PatchBody,
) -> Result<Response, AppError> {
    let target = parse_target_id(&user_id)?;

    // Presence of the role key is part of the permission decision and is
    // checked before the body is parsed into the typed DTO.
    let payload_has_role = body.get("role").is_some();

    if !authorize(&Method::PATCH, &caller, target, payload_has_role) {
        return Err(AppError::forbidden(anyhow!(
            "caller {} may not update user {target}",
            caller.id
        )));
    }

    let dto: UpdateUserDto = parse_partial(body)?;
    UserService::update(state.store.as_ref(), target, &caller, dto).await?;

    Ok(accepted())
}

/// Delete one user by id
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    params(("user_id" = i64, Path, description = "Id of the user to delete")),
    responses(
        (status = 200, description = "User deleted; data echoes the removed record", body = UserRecord),
        (status = 400, description = "Missing or malformed user id"),
        (status = 401, description = "Caller identity could not be resolved"),
        (status = 403, description = "Caller may not delete users"),
        (status = 404, description = "No user with this id"),
    ),
    security(("bearer_token" = [])),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Caller(caller): Caller,
) -> Result<Response, AppError> {
    // A blank or zero id is a malformed request, rejected before any lookup.
    if user_id.trim().is_empty() {
        return Err(AppError::bad_request(anyhow!("user id is required")));
    }
    let target = parse_target_id(&user_id)?;
    if target == 0 {
        return Err(AppError::bad_request(anyhow!("user id is required")));
    }

    if !authorize(&Method::DELETE, &caller, target, false) {
        return Err(AppError::forbidden(anyhow!(
            "caller {} may not delete user {target}",
            caller.id
        )));
    }

    let record = UserService::delete(state.store.as_ref(), target).await?;
    Ok(ApiResponse::ok(record))
}
