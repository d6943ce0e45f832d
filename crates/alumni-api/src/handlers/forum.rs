//! Forum handlers
//!
//! Threads, replies and polls.

use alumni_service::dto::{
    CreatePollRequest, MessageResponse, PollResponse, ReplyRequest, ThreadResponse, VoteRequest,
};
use alumni_service::ForumService;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::extractors::{json_rejection, AuthUser, ReplyPath, ThreadForm, ThreadIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;
use crate::storage::save_image;

/// GET /forum/
pub async fn list_threads(State(state): State<AppState>) -> ApiResult<Json<Vec<ThreadResponse>>> {
    let service = ForumService::new(state.service_context());
    Ok(Json(service.list_threads().await?))
}

/// GET /forum/polls
pub async fn list_polls(State(state): State<AppState>) -> ApiResult<Json<Vec<ThreadResponse>>> {
    let service = ForumService::new(state.service_context());
    Ok(Json(service.list_polls().await?))
}

/// GET /forum/my-posts/:name
pub async fn list_by_author(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Vec<ThreadResponse>>> {
    let service = ForumService::new(state.service_context());
    Ok(Json(service.list_by_author(&name).await?))
}

/// GET /forum/:id
pub async fn get_thread(
    State(state): State<AppState>,
    ThreadIdPath(id): ThreadIdPath,
) -> ApiResult<Json<ThreadResponse>> {
    let service = ForumService::new(state.service_context());
    Ok(Json(service.get_thread(id).await?))
}

/// Create a discussion thread with an optional image
///
/// POST /forum/create-thread
pub async fn create_thread(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    form: ThreadForm,
) -> ApiResult<Created<Json<ThreadResponse>>> {
    let image = match &form.image {
        Some(file) => Some(save_image(state.upload_dir(), file).await?),
        None => None,
    };

    let service = ForumService::new(state.service_context());
    let thread = service.create_thread(&actor, form.request, image).await?;
    Ok(Created(Json(thread)))
}

/// POST /forum/create-poll
pub async fn create_poll(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ValidatedJson(request): ValidatedJson<CreatePollRequest>,
) -> ApiResult<Created<Json<ThreadResponse>>> {
    let service = ForumService::new(state.service_context());
    let thread = service.create_poll(&actor, request).await?;
    Ok(Created(Json(thread)))
}

/// POST /forum/:id/reply
pub async fn add_reply(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ThreadIdPath(id): ThreadIdPath,
    ValidatedJson(request): ValidatedJson<ReplyRequest>,
) -> ApiResult<Json<ThreadResponse>> {
    let service = ForumService::new(state.service_context());
    Ok(Json(service.add_reply(id, &actor, request).await?))
}

/// POST /forum/:id/poll
pub async fn vote(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ThreadIdPath(id): ThreadIdPath,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<Json<PollResponse>> {
    let Json(request) = payload.map_err(json_rejection)?;
    let service = ForumService::new(state.service_context());
    Ok(Json(service.vote(id, &actor, request).await?))
}

/// DELETE /forum/:id
pub async fn delete_thread(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    ThreadIdPath(id): ThreadIdPath,
) -> ApiResult<Json<MessageResponse>> {
    let service = ForumService::new(state.service_context());
    Ok(Json(service.delete_thread(id, &actor).await?))
}

/// DELETE /forum/:id/reply/:reply_id
pub async fn delete_reply(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    path: ReplyPath,
) -> ApiResult<Json<ThreadResponse>> {
    let service = ForumService::new(state.service_context());
    let thread = service
        .delete_reply(path.thread_id, path.reply_id, &actor)
        .await?;
    Ok(Json(thread))
}
