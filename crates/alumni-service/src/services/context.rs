//! Service context - dependency container for services
//!
//! Holds the repositories, the token service, the id generator and the two
//! optional outbound hooks (chat relay and registration mirror). It holds no
//! connection pools, so services can run against in-memory repositories.

use std::sync::Arc;

use alumni_common::auth::JwtService;
use alumni_core::traits::{AccountRepository, ChatRepository, ProfileRepository, ThreadRepository};
use alumni_core::{Snowflake, SnowflakeGenerator};

use super::error::{ServiceError, ServiceResult};
use super::mirror::RegistrationMirror;
use super::relay::MessageRelay;

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    account_repo: Arc<dyn AccountRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    thread_repo: Arc<dyn ThreadRepository>,
    chat_repo: Arc<dyn ChatRepository>,

    // Outbound hooks, both optional
    relay: Option<Arc<dyn MessageRelay>>,
    mirror: Option<Arc<dyn RegistrationMirror>>,

    jwt_service: Arc<JwtService>,
    snowflake_generator: Arc<SnowflakeGenerator>,
}

impl ServiceContext {
    #[must_use]
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    pub fn profile_repo(&self) -> &dyn ProfileRepository {
        self.profile_repo.as_ref()
    }

    pub fn thread_repo(&self) -> &dyn ThreadRepository {
        self.thread_repo.as_ref()
    }

    pub fn chat_repo(&self) -> &dyn ChatRepository {
        self.chat_repo.as_ref()
    }

    // === Outbound ===

    /// Real-time relay for chat messages, if one is attached
    pub fn relay(&self) -> Option<&dyn MessageRelay> {
        self.relay.as_deref()
    }

    /// Registration mirror, if one is configured
    pub fn mirror(&self) -> Option<&dyn RegistrationMirror> {
        self.mirror.as_deref()
    }

    // === Services ===

    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("relay", &self.relay.is_some())
            .field("mirror", &self.mirror.is_some())
            .finish()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    account_repo: Option<Arc<dyn AccountRepository>>,
    profile_repo: Option<Arc<dyn ProfileRepository>>,
    thread_repo: Option<Arc<dyn ThreadRepository>>,
    chat_repo: Option<Arc<dyn ChatRepository>>,
    relay: Option<Arc<dyn MessageRelay>>,
    mirror: Option<Arc<dyn RegistrationMirror>>,
    jwt_service: Option<Arc<JwtService>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn profile_repo(mut self, repo: Arc<dyn ProfileRepository>) -> Self {
        self.profile_repo = Some(repo);
        self
    }

    pub fn thread_repo(mut self, repo: Arc<dyn ThreadRepository>) -> Self {
        self.thread_repo = Some(repo);
        self
    }

    pub fn chat_repo(mut self, repo: Arc<dyn ChatRepository>) -> Self {
        self.chat_repo = Some(repo);
        self
    }

    pub fn relay(mut self, relay: Arc<dyn MessageRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    pub fn mirror(mut self, mirror: Option<Arc<dyn RegistrationMirror>>) -> Self {
        self.mirror = mirror;
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            account_repo: self
                .account_repo
                .ok_or_else(|| ServiceError::validation("account_repo is required"))?,
            profile_repo: self
                .profile_repo
                .ok_or_else(|| ServiceError::validation("profile_repo is required"))?,
            thread_repo: self
                .thread_repo
                .ok_or_else(|| ServiceError::validation("thread_repo is required"))?,
            chat_repo: self
                .chat_repo
                .ok_or_else(|| ServiceError::validation("chat_repo is required"))?,
            relay: self.relay,
            mirror: self.mirror,
            jwt_service: self
                .jwt_service
                .ok_or_else(|| ServiceError::validation("jwt_service is required"))?,
            snowflake_generator: self
                .snowflake_generator
                .ok_or_else(|| ServiceError::validation("snowflake_generator is required"))?,
        })
    }
}
