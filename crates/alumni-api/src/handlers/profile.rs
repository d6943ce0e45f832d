//! Profile handlers

use alumni_service::dto::ProfileResponse;
use alumni_service::ProfileService;
use axum::{
    extract::{Path, State},
    Json,
};

use crate::extractors::{AuthUser, ProfileForm};
use crate::response::ApiResult;
use crate::state::AppState;
use crate::storage::save_image;

/// GET /profile/:name
pub async fn get_profile(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let service = ProfileService::new(state.service_context());
    Ok(Json(service.get(&name).await?))
}

/// Create or replace the caller's profile
///
/// POST /profile/update
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    form: ProfileForm,
) -> ApiResult<Json<ProfileResponse>> {
    let picture = match &form.picture {
        Some(file) => Some(save_image(state.upload_dir(), file).await?),
        None => None,
    };

    let service = ProfileService::new(state.service_context());
    let response = service.update(&actor.name, form.request, picture).await?;
    Ok(Json(response))
}
