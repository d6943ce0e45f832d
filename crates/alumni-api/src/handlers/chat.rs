//! Chat handlers

use alumni_service::dto::{ChatMessageResponse, SendMessageRequest};
use alumni_service::ChatService;
use axum::{
    extract::{Path, State},
    Json,
};

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// Names `username` has exchanged messages with
///
/// GET /chat/users/:username
pub async fn list_partners(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<Vec<String>>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.partners(&username).await?))
}

/// GET /chat/:user1/:user2
pub async fn get_conversation(
    State(state): State<AppState>,
    Path((user1, user2)): Path<(String, String)>,
) -> ApiResult<Json<Vec<ChatMessageResponse>>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.conversation(&user1, &user2).await?))
}

/// Send a message as the authenticated account
///
/// POST /chat/send
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ValidatedJson(request): ValidatedJson<SendMessageRequest>,
) -> ApiResult<Json<ChatMessageResponse>> {
    let service = ChatService::new(state.service_context());
    Ok(Json(service.send_message(&actor.name, request).await?))
}
