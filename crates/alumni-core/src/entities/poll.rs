//! Poll - a single-question vote embedded in a thread

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// One selectable answer and its running tally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOption {
    pub label: String,
    pub votes: i32,
}

impl PollOption {
    pub fn new(label: String) -> Self {
        Self { label, votes: 0 }
    }
}

/// Poll state. `voted_users` is the voted-set: each voter appears at most once,
/// and each appearance corresponds to exactly one counter increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub question: String,
    pub options: Vec<PollOption>,
    pub voted_users: Vec<Snowflake>,
}

impl Poll {
    /// Minimum number of options a poll must offer
    pub const MIN_OPTIONS: usize = 2;

    /// Build a fresh poll. Labels are trimmed and blank ones are discarded
    /// before the option count is checked.
    pub fn new(question: &str, labels: &[String]) -> Result<Self, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::ValidationError(
                "Poll question is required".to_string(),
            ));
        }

        let options: Vec<PollOption> = labels
            .iter()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .map(|l| PollOption::new(l.to_string()))
            .collect();

        if options.len() < Self::MIN_OPTIONS {
            return Err(DomainError::ValidationError(format!(
                "A poll needs at least {} options",
                Self::MIN_OPTIONS
            )));
        }

        Ok(Self {
            question: question.to_string(),
            options,
            voted_users: Vec::new(),
        })
    }

    #[inline]
    pub fn has_voted(&self, voter: Snowflake) -> bool {
        self.voted_users.contains(&voter)
    }

    pub fn total_votes(&self) -> i64 {
        self.options.iter().map(|o| i64::from(o.votes)).sum()
    }

    /// Check that `voter` may vote for `index` without mutating anything
    pub fn check_vote(&self, voter: Snowflake, index: usize) -> Result<(), DomainError> {
        if index >= self.options.len() {
            return Err(DomainError::InvalidOptionIndex {
                index,
                count: self.options.len(),
            });
        }
        if self.has_voted(voter) {
            return Err(DomainError::AlreadyVoted);
        }
        Ok(())
    }

    /// Apply a vote in memory. Persistent stores must perform the same
    /// check and increment as one atomic write.
    pub fn record_vote(&mut self, voter: Snowflake, index: usize) -> Result<(), DomainError> {
        self.check_vote(voter, index)?;
        self.options[index].votes += 1;
        self.voted_users.push(voter);
        Ok(())
    }
}
