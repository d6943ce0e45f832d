//! Thread assembly
//!
//! Rebuilds fully hydrated [`Thread`] entities from the flat rows of
//! `threads`, `thread_replies`, `poll_options` and `poll_votes`.

use std::collections::HashMap;

use alumni_core::entities::{Poll, PollOption, Reply, Thread};
use alumni_core::value_objects::Snowflake;

use crate::models::{PollOptionModel, PollVoteModel, ReplyModel, ThreadModel};

impl From<ReplyModel> for Reply {
    fn from(model: ReplyModel) -> Self {
        Reply {
            id: Snowflake::new(model.id),
            thread_id: Snowflake::new(model.thread_id),
            author_id: Snowflake::new(model.author_id),
            author_name: model.author_name,
            message: model.message,
            created_at: model.created_at,
        }
    }
}

/// Child rows for a batch of threads
#[derive(Debug, Default)]
pub struct ThreadChildren {
    pub replies: Vec<ReplyModel>,
    pub options: Vec<PollOptionModel>,
    pub votes: Vec<PollVoteModel>,
}

/// Stitch child rows onto their threads.
///
/// Thread order is preserved as given. Replies keep the order they arrive in,
/// which must be ascending id. Options are sorted by position.
pub fn assemble_threads(threads: Vec<ThreadModel>, children: ThreadChildren) -> Vec<Thread> {
    let mut replies: HashMap<i64, Vec<Reply>> = HashMap::new();
    for reply in children.replies {
        replies.entry(reply.thread_id).or_default().push(reply.into());
    }

    let mut options: HashMap<i64, Vec<PollOptionModel>> = HashMap::new();
    for option in children.options {
        options.entry(option.thread_id).or_default().push(option);
    }

    let mut votes: HashMap<i64, Vec<Snowflake>> = HashMap::new();
    for vote in children.votes {
        votes
            .entry(vote.thread_id)
            .or_default()
            .push(Snowflake::new(vote.voter_id));
    }

    threads
        .into_iter()
        .map(|model| {
            let poll = model.poll_question.map(|question| {
                let mut rows = options.remove(&model.id).unwrap_or_default();
                rows.sort_by_key(|o| o.position);
                Poll {
                    question,
                    options: rows
                        .into_iter()
                        .map(|o| PollOption {
                            label: o.label,
                            votes: o.votes,
                        })
                        .collect(),
                    voted_users: votes.remove(&model.id).unwrap_or_default(),
                }
            });

            Thread {
                id: Snowflake::new(model.id),
                author_id: Snowflake::new(model.author_id),
                author_name: model.author_name,
                title: model.title,
                content: model.content,
                image: model.image,
                tags: model.tags,
                replies: replies.remove(&model.id).unwrap_or_default(),
                poll,
                created_at: model.created_at,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn thread_row(id: i64, poll_question: Option<&str>) -> ThreadModel {
        ThreadModel {
            id,
            author_id: 1,
            author_name: "ada".to_string(),
            title: poll_question.is_none().then(|| "Title".to_string()),
            content: poll_question.is_none().then(|| "Body".to_string()),
            image: None,
            tags: vec!["rust".to_string()],
            poll_question: poll_question.map(ToString::to_string),
            created_at: Utc::now(),
        }
    }

    fn reply_row(id: i64, thread_id: i64) -> ReplyModel {
        ReplyModel {
            id,
            thread_id,
            author_id: 2,
            author_name: "bob".to_string(),
            message: format!("reply {id}"),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_assemble_attaches_children_to_their_threads() {
        let threads = vec![thread_row(20, Some("Best year?")), thread_row(10, None)];
        let children = ThreadChildren {
            replies: vec![reply_row(11, 10), reply_row(12, 10), reply_row(21, 20)],
            options: vec![
                PollOptionModel {
                    thread_id: 20,
                    position: 1,
                    label: "2020".to_string(),
                    votes: 3,
                },
                PollOptionModel {
                    thread_id: 20,
                    position: 0,
                    label: "2019".to_string(),
                    votes: 1,
                },
            ],
            votes: vec![PollVoteModel {
                thread_id: 20,
                voter_id: 99,
            }],
        };

        let assembled = assemble_threads(threads, children);
        assert_eq!(assembled.len(), 2);

        // Input order is kept
        assert_eq!(assembled[0].id, Snowflake::new(20));
        assert_eq!(assembled[1].id, Snowflake::new(10));

        let poll = assembled[0].poll.as_ref().unwrap();
        assert_eq!(poll.options[0].label, "2019");
        assert_eq!(poll.options[1].votes, 3);
        assert!(poll.has_voted(Snowflake::new(99)));
        assert_eq!(assembled[0].replies.len(), 1);

        let discussion = &assembled[1];
        assert!(discussion.poll.is_none());
        let ids: Vec<i64> = discussion.replies.iter().map(|r| r.id.into_inner()).collect();
        assert_eq!(ids, vec![11, 12]);
    }

    #[test]
    fn test_assemble_without_children() {
        let assembled = assemble_threads(vec![thread_row(1, None)], ThreadChildren::default());
        assert!(assembled[0].replies.is_empty());
        assert_eq!(assembled[0].tags, vec!["rust"]);
    }
}
