//! PostgreSQL implementation of ThreadRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use alumni_core::entities::{Reply, Thread};
use alumni_core::error::DomainError;
use alumni_core::traits::{RepoResult, ThreadRepository};
use alumni_core::value_objects::Snowflake;

use crate::mappers::{assemble_threads, ThreadChildren};
use crate::models::{PollOptionModel, PollVoteModel, ReplyModel, ThreadModel};

use super::error::{map_db_error, map_missing_parent, map_unique_violation};

const THREAD_COLUMNS: &str = r"
    SELECT id, author_id, author_name, title, content, image, tags, poll_question, created_at
    FROM threads
";

/// PostgreSQL implementation of ThreadRepository
#[derive(Clone)]
pub struct PgThreadRepository {
    pool: PgPool,
}

impl PgThreadRepository {
    /// Create a new PgThreadRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load replies, options and votes for `threads` with one query per table
    async fn hydrate(&self, threads: Vec<ThreadModel>) -> RepoResult<Vec<Thread>> {
        if threads.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = threads.iter().map(|t| t.id).collect();
        let poll_ids: Vec<i64> = threads
            .iter()
            .filter(|t| t.poll_question.is_some())
            .map(|t| t.id)
            .collect();

        let replies = sqlx::query_as::<_, ReplyModel>(
            r"
            SELECT id, thread_id, author_id, author_name, message, created_at
            FROM thread_replies
            WHERE thread_id = ANY($1)
            ORDER BY thread_id, id
            ",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let (options, votes) = if poll_ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let options = sqlx::query_as::<_, PollOptionModel>(
                r"
                SELECT thread_id, position, label, votes
                FROM poll_options
                WHERE thread_id = ANY($1)
                ORDER BY thread_id, position
                ",
            )
            .bind(&poll_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            let votes = sqlx::query_as::<_, PollVoteModel>(
                r"
                SELECT thread_id, voter_id
                FROM poll_votes
                WHERE thread_id = ANY($1)
                ORDER BY thread_id, voted_at, voter_id
                ",
            )
            .bind(&poll_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            (options, votes)
        };

        Ok(assemble_threads(
            threads,
            ThreadChildren {
                replies,
                options,
                votes,
            },
        ))
    }

    async fn fetch_list(&self, filter: &str, bind: Option<&str>) -> RepoResult<Vec<Thread>> {
        let sql = format!("{THREAD_COLUMNS} {filter} ORDER BY created_at DESC, id DESC");
        let mut query = sqlx::query_as::<_, ThreadModel>(&sql);
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(map_db_error)?;
        self.hydrate(rows).await
    }
}

#[async_trait]
impl ThreadRepository for PgThreadRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Thread>> {
        let sql = format!("{THREAD_COLUMNS} WHERE id = $1");
        let row = sqlx::query_as::<_, ThreadModel>(&sql)
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<Thread>> {
        self.fetch_list("", None).await
    }

    #[instrument(skip(self))]
    async fn list_by_author(&self, author_name: &str) -> RepoResult<Vec<Thread>> {
        self.fetch_list("WHERE author_name = $1", Some(author_name)).await
    }

    #[instrument(skip(self))]
    async fn list_polls(&self) -> RepoResult<Vec<Thread>> {
        self.fetch_list("WHERE poll_question IS NOT NULL AND poll_question <> ''", None)
            .await
    }

    #[instrument(skip(self, thread), fields(thread_id = %thread.id))]
    async fn create(&self, thread: &Thread) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO threads (id, author_id, author_name, title, content, image, tags, poll_question, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(thread.id.into_inner())
        .bind(thread.author_id.into_inner())
        .bind(&thread.author_name)
        .bind(&thread.title)
        .bind(&thread.content)
        .bind(&thread.image)
        .bind(&thread.tags)
        .bind(thread.poll.as_ref().map(|p| p.question.as_str()))
        .bind(thread.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            map_missing_parent(e, || {
                DomainError::AccountNotFound(thread.author_id.to_string())
            })
        })?;

        if let Some(poll) = &thread.poll {
            for (position, option) in poll.options.iter().enumerate() {
                sqlx::query(
                    r"
                    INSERT INTO poll_options (thread_id, position, label, votes)
                    VALUES ($1, $2, $3, $4)
                    ",
                )
                .bind(thread.id.into_inner())
                .bind(position as i32)
                .bind(&option.label)
                .bind(option.votes)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        // Replies, options and votes go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ThreadNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self, reply), fields(thread_id = %reply.thread_id, reply_id = %reply.id))]
    async fn add_reply(&self, reply: &Reply) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO thread_replies (id, thread_id, author_id, author_name, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(reply.id.into_inner())
        .bind(reply.thread_id.into_inner())
        .bind(reply.author_id.into_inner())
        .bind(&reply.author_name)
        .bind(&reply.message)
        .bind(reply.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_missing_parent(e, || DomainError::ThreadNotFound(reply.thread_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_reply(&self, thread_id: Snowflake, reply_id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM thread_replies WHERE id = $1 AND thread_id = $2")
            .bind(reply_id.into_inner())
            .bind(thread_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReplyNotFound(reply_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn cast_vote(
        &self,
        thread_id: Snowflake,
        voter_id: Snowflake,
        option_index: usize,
    ) -> RepoResult<()> {
        let position = i32::try_from(option_index).map_err(|_| DomainError::InvalidOptionIndex {
            index: option_index,
            count: 0,
        })?;

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // The (thread_id, voter_id) primary key is the voted-set check. A
        // concurrent duplicate blocks here until the first commits, then fails.
        sqlx::query(
            r"
            INSERT INTO poll_votes (thread_id, voter_id, position)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(thread_id.into_inner())
        .bind(voter_id.into_inner())
        .bind(position)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            let missing_thread = e
                .as_database_error()
                .is_some_and(|d| d.is_foreign_key_violation());
            if missing_thread {
                DomainError::ThreadNotFound(thread_id)
            } else {
                map_unique_violation(e, || DomainError::AlreadyVoted)
            }
        })?;

        let updated = sqlx::query(
            r"
            UPDATE poll_options
            SET votes = votes + 1
            WHERE thread_id = $1 AND position = $2
            ",
        )
        .bind(thread_id.into_inner())
        .bind(position)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            let count = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM poll_options WHERE thread_id = $1",
            )
            .bind(thread_id.into_inner())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            // Dropping the transaction rolls the vote row back
            return Err(if count == 0 {
                DomainError::PollNotFound(thread_id)
            } else {
                DomainError::InvalidOptionIndex {
                    index: option_index,
                    count: count as usize,
                }
            });
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
