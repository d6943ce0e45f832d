//! Alumni account handlers
//!
//! Registration, login and the public directory.

use alumni_service::dto::{AlumniSummary, LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
use alumni_service::AccountService;
use axum::{extract::State, Json};

use crate::extractors::ValidatedJson;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new alumni account
///
/// POST /alumni/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = AccountService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /alumni/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let service = AccountService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// GET /alumni/
pub async fn list_alumni(State(state): State<AppState>) -> ApiResult<Json<Vec<AlumniSummary>>> {
    let service = AccountService::new(state.service_context());
    Ok(Json(service.list().await?))
}
