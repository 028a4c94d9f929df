use axum::{
    extract::{
        multipart::{Field, MultipartError},
        DefaultBodyLimit, Multipart, Path, State,
    },
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::{
    adapters::inbound::http::ProfileResponse,
    app_state::AppState,
    auth::AuthUser,
    domain::{
        models::{AvatarUpload, ProfileUpdateRequest, UserId, UserProfile},
        AVATAR_MAX_BYTES,
    },
    routes::ApiError,
};

// Oversized avatars must reach validation to get a field error, so the body
// limit sits well above the avatar limit.
const PROFILE_UPDATE_BODY_LIMIT: usize = 4 * AVATAR_MAX_BYTES;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me/profile", get(my_profile).put(update_my_profile))
        .route_layer(DefaultBodyLimit::max(PROFILE_UPDATE_BODY_LIMIT))
        .route("/:user_id/profile", get(user_profile))
}

#[instrument(name = "GET /users/me/profile", skip(app_state))]
async fn my_profile(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    profile_response(&app_state, user.id).await
}

#[instrument(name = "GET /users/:user_id/profile", skip(app_state))]
async fn user_profile(
    Path(user_id): Path<i32>,
    State(app_state): State<AppState>,
) -> Result<Json<ProfileResponse>, ApiError> {
    profile_response(&app_state, UserId::from(user_id)).await
}

#[instrument(name = "PUT /users/me/profile", skip(app_state, multipart))]
async fn update_my_profile(
    user: AuthUser,
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ProfileResponse>, ApiError> {
    let request = read_profile_form(&mut multipart).await?;

    let profile = app_state
        .profile_service
        .update_profile(&user.id, request)
        .await?;

    Ok(Json(to_response(&app_state, profile)))
}

async fn profile_response(
    app_state: &AppState,
    user_id: UserId,
) -> Result<Json<ProfileResponse>, ApiError> {
    let profile = app_state.profile_service.get_profile(&user_id).await?;

    Ok(Json(to_response(app_state, profile)))
}

fn to_response(app_state: &AppState, profile: UserProfile) -> ProfileResponse {
    ProfileResponse::new(profile, |path| app_state.profile_service.avatar_url(path))
}

async fn read_profile_form(multipart: &mut Multipart) -> Result<ProfileUpdateRequest, ApiError> {
    let mut request = ProfileUpdateRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("username") => request.username = Some(read_text(field).await?),
            Some("bio") => request.bio = Some(read_text(field).await?),
            Some("avatar") => request.avatar = read_avatar(field).await?,
            _ => continue,
        }
    }

    Ok(request)
}

async fn read_text(field: Field<'_>) -> Result<String, ApiError> {
    field.text().await.map_err(multipart_error)
}

/// Keeps the status multer reports, so an oversized body is a 413 rather than
/// a generic 400.
fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::new(err.status(), err.body_text())
}

/// Reads the avatar file part. An empty part without a file name is what
/// browsers send for an untouched file input and counts as no avatar.
async fn read_avatar(field: Field<'_>) -> Result<Option<AvatarUpload>, ApiError> {
    let content_type = field.content_type().map(str::to_string);
    let file_name = field
        .file_name()
        .map(str::to_string)
        .filter(|name| !name.is_empty());

    let bytes = field.bytes().await.map_err(multipart_error)?;

    if bytes.is_empty() && file_name.is_none() {
        return Ok(None);
    }

    Ok(Some(AvatarUpload {
        bytes: bytes.to_vec(),
        content_type,
        file_name,
    }))
}
