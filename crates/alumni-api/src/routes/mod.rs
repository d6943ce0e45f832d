//! Route definitions
//!
//! Paths match what the existing web client calls, so there is no version
//! prefix. Both `/alumni` and `/alumni/` (and likewise `/forum`) are served.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{alumni, chat, forum, health, profile};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately so they
/// bypass rate limiting)
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(alumni_routes())
        .merge(profile_routes())
        .merge(forum_routes())
        .merge(chat_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn alumni_routes() -> Router<AppState> {
    Router::new()
        .route("/alumni", get(alumni::list_alumni))
        .route("/alumni/", get(alumni::list_alumni))
        .route("/alumni/register", post(alumni::register))
        .route("/alumni/login", post(alumni::login))
}

fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile/update", post(profile::update_profile))
        .route("/profile/:name", get(profile::get_profile))
}

fn forum_routes() -> Router<AppState> {
    Router::new()
        .route("/forum", get(forum::list_threads))
        .route("/forum/", get(forum::list_threads))
        .route("/forum/polls", get(forum::list_polls))
        .route("/forum/my-posts/:name", get(forum::list_by_author))
        .route("/forum/create-thread", post(forum::create_thread))
        .route("/forum/create-poll", post(forum::create_poll))
        .route(
            "/forum/:id",
            get(forum::get_thread).delete(forum::delete_thread),
        )
        .route("/forum/:id/reply", post(forum::add_reply))
        .route("/forum/:id/poll", post(forum::vote))
        .route("/forum/:id/reply/:reply_id", delete(forum::delete_reply))
}

fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat/send", post(chat::send_message))
        .route("/chat/users/:username", get(chat::list_partners))
        .route("/chat/:user1/:user2", get(chat::get_conversation))
}
