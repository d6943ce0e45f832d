//! In-memory repositories and hooks for service unit tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use alumni_common::auth::JwtService;
use alumni_core::entities::{Account, ChatMessage, Profile, Reply, Thread};
use alumni_core::error::DomainError;
use alumni_core::traits::{
    AccountRepository, ChatRepository, ProfileChanges, ProfileRepository, RepoResult,
    ThreadRepository,
};
use alumni_core::{Snowflake, SnowflakeGenerator};
use async_trait::async_trait;

use super::context::{ServiceContext, ServiceContextBuilder};
use super::mirror::{RegistrationMirror, RegistrationRow};
use super::relay::MessageRelay;

pub const TEST_SECRET: &str = "test-secret-that-is-at-least-32-chars";

#[derive(Default)]
pub struct MemAccounts {
    rows: Mutex<Vec<(Account, String)>>,
}

#[async_trait]
impl AccountRepository for MemAccounts {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Account>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|(a, _)| a.id == id).map(|(a, _)| a.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Account>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .find(|(a, _)| a.email == email)
            .map(|(a, _)| a.clone()))
    }

    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn name_exists(&self, name: &str) -> RepoResult<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|(a, _)| a.name == name))
    }

    async fn create(&self, account: &Account, password_hash: &str) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|(a, _)| a.email == account.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if rows.iter().any(|(a, _)| a.name == account.name) {
            return Err(DomainError::NameAlreadyExists(account.name.clone()));
        }
        rows.push((account.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|(a, _)| a.id == id).map(|(_, h)| h.clone()))
    }

    async fn list_all(&self) -> RepoResult<Vec<Account>> {
        Ok(self.rows.lock().unwrap().iter().map(|(a, _)| a.clone()).collect())
    }
}

#[derive(Default)]
pub struct MemProfiles {
    rows: Mutex<HashMap<String, Profile>>,
}

#[async_trait]
impl ProfileRepository for MemProfiles {
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Profile>> {
        Ok(self.rows.lock().unwrap().get(name).cloned())
    }

    async fn upsert(&self, changes: &ProfileChanges) -> RepoResult<Profile> {
        let mut rows = self.rows.lock().unwrap();
        let profile = rows
            .entry(changes.name.clone())
            .or_insert_with(|| Profile::new(changes.name.clone()));
        profile.apply(
            changes.department.clone(),
            changes.degree.clone(),
            changes.about.clone(),
            changes.profile_pic.clone(),
        );
        Ok(profile.clone())
    }
}

#[derive(Default)]
pub struct MemThreads {
    rows: Mutex<Vec<Thread>>,
    /// Replies another writer slips in just before the next `add_reply`
    interleaved: Mutex<Vec<Reply>>,
}

impl MemThreads {
    pub fn interleave_reply(&self, reply: Reply) {
        self.interleaved.lock().unwrap().push(reply);
    }

    fn with_thread<T>(
        &self,
        id: Snowflake,
        f: impl FnOnce(&mut Thread) -> RepoResult<T>,
    ) -> RepoResult<T> {
        let mut rows = self.rows.lock().unwrap();
        let thread = rows
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(DomainError::ThreadNotFound(id))?;
        f(thread)
    }

    fn newest_first(&self, keep: impl Fn(&Thread) -> bool) -> Vec<Thread> {
        let mut out: Vec<Thread> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|&t| keep(t))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        out
    }
}

#[async_trait]
impl ThreadRepository for MemThreads {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Thread>> {
        Ok(self.rows.lock().unwrap().iter().find(|t| t.id == id).cloned())
    }

    async fn list_all(&self) -> RepoResult<Vec<Thread>> {
        Ok(self.newest_first(|_| true))
    }

    async fn list_by_author(&self, author_name: &str) -> RepoResult<Vec<Thread>> {
        Ok(self.newest_first(|t| t.author_name == author_name))
    }

    async fn list_polls(&self) -> RepoResult<Vec<Thread>> {
        Ok(self.newest_first(Thread::has_poll))
    }

    async fn create(&self, thread: &Thread) -> RepoResult<()> {
        self.rows.lock().unwrap().push(thread.clone());
        Ok(())
    }

    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.id != id);
        if rows.len() == before {
            return Err(DomainError::ThreadNotFound(id));
        }
        Ok(())
    }

    async fn add_reply(&self, reply: &Reply) -> RepoResult<()> {
        let interleaved: Vec<Reply> = self.interleaved.lock().unwrap().drain(..).collect();
        self.with_thread(reply.thread_id, |t| {
            for other in interleaved {
                t.push_reply(other);
            }
            t.push_reply(reply.clone());
            Ok(())
        })
    }

    async fn delete_reply(&self, thread_id: Snowflake, reply_id: Snowflake) -> RepoResult<()> {
        self.with_thread(thread_id, |t| {
            t.remove_reply(reply_id)
                .map(|_| ())
                .ok_or(DomainError::ReplyNotFound(reply_id))
        })
    }

    async fn cast_vote(
        &self,
        thread_id: Snowflake,
        voter_id: Snowflake,
        option_index: usize,
    ) -> RepoResult<()> {
        self.with_thread(thread_id, |t| {
            t.poll
                .as_mut()
                .ok_or(DomainError::PollNotFound(thread_id))?
                .record_vote(voter_id, option_index)
        })
    }
}

#[derive(Default)]
pub struct MemChat {
    rows: Mutex<Vec<ChatMessage>>,
}

#[async_trait]
impl ChatRepository for MemChat {
    async fn create(&self, message: &ChatMessage) -> RepoResult<()> {
        self.rows.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn find_conversation(&self, a: &str, b: &str) -> RepoResult<Vec<ChatMessage>> {
        let mut out: Vec<ChatMessage> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_between(a, b))
            .cloned()
            .collect();
        out.sort_by_key(|m| m.id);
        Ok(out)
    }

    async fn find_partners(&self, name: &str) -> RepoResult<Vec<String>> {
        let mut out: Vec<String> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter_map(|m| m.counterpart(name).map(ToString::to_string))
            .collect();
        out.sort();
        out.dedup();
        Ok(out)
    }
}

/// Records every relayed event; fails on demand
#[derive(Default)]
pub struct RecordingRelay {
    pub events: Mutex<Vec<(String, String, serde_json::Value)>>,
    pub fail: bool,
}

#[async_trait]
impl MessageRelay for RecordingRelay {
    async fn relay(
        &self,
        recipient: &str,
        event_type: &str,
        data: serde_json::Value,
    ) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("relay unavailable");
        }
        self.events
            .lock()
            .unwrap()
            .push((recipient.to_string(), event_type.to_string(), data));
        Ok(())
    }
}

/// Records every mirrored row; fails on demand
#[derive(Default)]
pub struct RecordingMirror {
    pub rows: Mutex<Vec<RegistrationRow>>,
    pub fail: bool,
}

#[async_trait]
impl RegistrationMirror for RecordingMirror {
    async fn append(&self, row: &RegistrationRow) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("webhook returned 500");
        }
        self.rows.lock().unwrap().push(row.clone());
        Ok(())
    }
}

fn base_builder() -> ServiceContextBuilder {
    ServiceContextBuilder::new()
        .account_repo(Arc::new(MemAccounts::default()))
        .profile_repo(Arc::new(MemProfiles::default()))
        .thread_repo(Arc::new(MemThreads::default()))
        .chat_repo(Arc::new(MemChat::default()))
        .jwt_service(Arc::new(JwtService::new(TEST_SECRET, 3600)))
        .snowflake_generator(Arc::new(SnowflakeGenerator::new(1)))
}

/// Context over fresh in-memory repositories, without relay or mirror
pub fn context() -> ServiceContext {
    base_builder().build().unwrap()
}

pub fn context_with_threads(threads: Arc<MemThreads>) -> ServiceContext {
    base_builder().thread_repo(threads).build().unwrap()
}

pub fn context_with_relay(relay: Arc<RecordingRelay>) -> ServiceContext {
    base_builder().relay(relay).build().unwrap()
}

pub fn context_with_mirror(mirror: Arc<RecordingMirror>) -> ServiceContext {
    base_builder()
        .mirror(Some(mirror as Arc<dyn RegistrationMirror>))
        .build()
        .unwrap()
}
