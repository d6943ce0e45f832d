//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use alumni_core::entities::{Account, ChatMessage, Poll, Profile, Reply, Thread};

use super::responses::{
    AccountResponse, AlumniSummary, ChatMessageResponse, PollOptionResponse, PollResponse,
    ProfileResponse, ReplyResponse, ThreadResponse,
};

// ============================================================================
// Account Mappers
// ============================================================================

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.clone(),
            email: account.email.clone(),
            occupation: account.occupation.clone(),
            interests: account.interests.clone(),
            experience: account.experience.clone(),
            created_at: account.created_at,
        }
    }
}

impl From<Account> for AlumniSummary {
    fn from(account: Account) -> Self {
        Self {
            name: account.name,
            occupation: account.occupation,
        }
    }
}

// ============================================================================
// Profile Mappers
// ============================================================================

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            name: profile.name,
            department: profile.department,
            degree: profile.degree,
            about: profile.about,
            profile_pic: profile.profile_pic,
            updated_at: profile.updated_at,
        }
    }
}

// ============================================================================
// Forum Mappers
// ============================================================================

impl From<&Reply> for ReplyResponse {
    fn from(reply: &Reply) -> Self {
        Self {
            id: reply.id.to_string(),
            author_id: reply.author_id.to_string(),
            author: reply.author_name.clone(),
            message: reply.message.clone(),
            created_at: reply.created_at,
        }
    }
}

impl From<&Poll> for PollResponse {
    fn from(poll: &Poll) -> Self {
        Self {
            question: poll.question.clone(),
            options: poll
                .options
                .iter()
                .map(|o| PollOptionResponse {
                    option: o.label.clone(),
                    votes: o.votes,
                })
                .collect(),
            voted_users: poll.voted_users.iter().map(ToString::to_string).collect(),
        }
    }
}

impl From<&Thread> for ThreadResponse {
    fn from(thread: &Thread) -> Self {
        Self {
            id: thread.id.to_string(),
            author_id: thread.author_id.to_string(),
            author: thread.author_name.clone(),
            title: thread.title.clone(),
            content: thread.content.clone(),
            image: thread.image.clone(),
            tags: thread.tags.clone(),
            replies: thread.replies.iter().map(ReplyResponse::from).collect(),
            poll: thread.poll.as_ref().map(PollResponse::from),
            created_at: thread.created_at,
        }
    }
}

impl From<Thread> for ThreadResponse {
    fn from(thread: Thread) -> Self {
        Self::from(&thread)
    }
}

// ============================================================================
// Chat Mappers
// ============================================================================

impl From<ChatMessage> for ChatMessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id.to_string(),
            sender: message.sender,
            receiver: message.receiver,
            message: message.message,
            created_at: message.created_at,
        }
    }
}
