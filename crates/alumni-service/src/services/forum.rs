//! Forum service
//!
//! Threads, replies and polls. Every mutation that removes content checks
//! authorship by account id. Votes are recorded by the repository in a
//! single atomic step; the check here only rejects obvious misses early.

use alumni_core::entities::{parse_tags, Poll, Reply, Thread};
use alumni_core::{DomainError, Snowflake};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{
    CreatePollRequest, CreateThreadRequest, MessageResponse, PollResponse, ReplyRequest,
    ThreadResponse, VoteRequest,
};

use super::actor::Actor;
use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct ForumService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ForumService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    async fn load(&self, id: Snowflake) -> ServiceResult<Thread> {
        Ok(self
            .ctx
            .thread_repo()
            .find_by_id(id)
            .await?
            .ok_or(DomainError::ThreadNotFound(id))?)
    }

    /// Create a discussion thread. `image` is the stored path of an upload.
    #[instrument(skip(self, request), fields(author = %actor.name))]
    pub async fn create_thread(
        &self,
        actor: &Actor,
        request: CreateThreadRequest,
        image: Option<String>,
    ) -> ServiceResult<ThreadResponse> {
        request.validate()?;

        let tags = request.tags.as_deref().map(parse_tags).unwrap_or_default();
        let thread = Thread::new_discussion(
            self.ctx.generate_id(),
            actor.id,
            actor.name.clone(),
            &request.title,
            &request.content,
        )?
        .with_image(image)
        .with_tags(tags);

        self.ctx.thread_repo().create(&thread).await?;

        info!(thread_id = %thread.id, "Thread created");

        Ok(thread.into())
    }

    #[instrument(skip(self, request), fields(author = %actor.name))]
    pub async fn create_poll(
        &self,
        actor: &Actor,
        request: CreatePollRequest,
    ) -> ServiceResult<ThreadResponse> {
        request.validate()?;

        let poll = Poll::new(&request.poll_question, &request.poll_options)?;
        let thread = Thread::new_poll(self.ctx.generate_id(), actor.id, actor.name.clone(), poll);

        self.ctx.thread_repo().create(&thread).await?;

        info!(thread_id = %thread.id, "Poll created");

        Ok(thread.into())
    }

    /// All threads, newest first
    #[instrument(skip(self))]
    pub async fn list_threads(&self) -> ServiceResult<Vec<ThreadResponse>> {
        let threads = self.ctx.thread_repo().list_all().await?;
        Ok(threads.into_iter().map(ThreadResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_thread(&self, id: Snowflake) -> ServiceResult<ThreadResponse> {
        Ok(self.load(id).await?.into())
    }

    #[instrument(skip(self))]
    pub async fn list_by_author(&self, name: &str) -> ServiceResult<Vec<ThreadResponse>> {
        let threads = self.ctx.thread_repo().list_by_author(name).await?;
        Ok(threads.into_iter().map(ThreadResponse::from).collect())
    }

    /// Threads carrying a poll, newest first
    #[instrument(skip(self))]
    pub async fn list_polls(&self) -> ServiceResult<Vec<ThreadResponse>> {
        let threads = self.ctx.thread_repo().list_polls().await?;
        Ok(threads.into_iter().map(ThreadResponse::from).collect())
    }

    /// Append a reply and return the whole thread
    #[instrument(skip(self, request), fields(author = %actor.name))]
    pub async fn add_reply(
        &self,
        thread_id: Snowflake,
        actor: &Actor,
        request: ReplyRequest,
    ) -> ServiceResult<ThreadResponse> {
        request.validate()?;

        let reply = Reply::new(
            self.ctx.generate_id(),
            thread_id,
            actor.id,
            actor.name.clone(),
            &request.message,
        )?;

        self.ctx.thread_repo().add_reply(&reply).await?;

        info!(thread_id = %thread_id, reply_id = %reply.id, "Reply added");

        // Reload so replies written by others in the meantime are included
        Ok(self.load(thread_id).await?.into())
    }

    #[instrument(skip(self), fields(requester = %actor.id))]
    pub async fn delete_thread(&self, id: Snowflake, actor: &Actor) -> ServiceResult<MessageResponse> {
        let thread = self.load(id).await?;
        if !thread.is_authored_by(actor.id) {
            return Err(DomainError::NotThreadAuthor.into());
        }

        self.ctx.thread_repo().delete(id).await?;

        info!(thread_id = %id, "Thread deleted");

        Ok(MessageResponse::new("Thread deleted successfully"))
    }

    /// Remove one reply. The rest keep their order.
    #[instrument(skip(self), fields(requester = %actor.id))]
    pub async fn delete_reply(
        &self,
        thread_id: Snowflake,
        reply_id: Snowflake,
        actor: &Actor,
    ) -> ServiceResult<ThreadResponse> {
        let mut thread = self.load(thread_id).await?;
        let reply = thread
            .find_reply(reply_id)
            .ok_or(DomainError::ReplyNotFound(reply_id))?;
        if !reply.is_authored_by(actor.id) {
            return Err(DomainError::NotReplyAuthor.into());
        }

        self.ctx.thread_repo().delete_reply(thread_id, reply_id).await?;

        info!(thread_id = %thread_id, reply_id = %reply_id, "Reply deleted");

        thread.remove_reply(reply_id);
        Ok(thread.into())
    }

    /// Cast a vote and return the poll as stored afterwards
    #[instrument(skip(self), fields(voter = %actor.id))]
    pub async fn vote(
        &self,
        thread_id: Snowflake,
        actor: &Actor,
        request: VoteRequest,
    ) -> ServiceResult<PollResponse> {
        let thread = self.load(thread_id).await?;
        let poll = thread
            .poll
            .as_ref()
            .ok_or(DomainError::PollNotFound(thread_id))?;
        poll.check_vote(actor.id, request.option_index)?;

        self.ctx
            .thread_repo()
            .cast_vote(thread_id, actor.id, request.option_index)
            .await?;

        info!(thread_id = %thread_id, option = request.option_index, "Vote recorded");

        // Reload so concurrent votes are reflected in the counts
        let poll = self
            .load(thread_id)
            .await?
            .poll
            .ok_or(DomainError::PollNotFound(thread_id))?;
        Ok(PollResponse::from(&poll))
    }
}
