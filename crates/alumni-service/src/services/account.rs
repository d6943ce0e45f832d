//! Account service
//!
//! Handles alumni registration, login and the public directory.

use alumni_common::auth::{hash_password, validate_password_strength, verify_password};
use alumni_common::AppError;
use alumni_core::entities::{normalize_email, Account};
use alumni_core::DomainError;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{
    AccountResponse, AlumniSummary, LoginRequest, LoginResponse, MessageResponse, RegisterRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::mirror::RegistrationRow;

/// Account service
pub struct AccountService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccountService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new alumni account
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<MessageResponse> {
        request.validate()?;
        validate_password_strength(&request.password)?;

        let name = request.name.trim();
        let occupation = request.occupation.trim();
        if name.is_empty() || occupation.is_empty() {
            return Err(ServiceError::validation("Name and occupation are required"));
        }

        let email = normalize_email(&request.email);
        if self.ctx.account_repo().email_exists(&email).await? {
            return Err(DomainError::EmailAlreadyExists.into());
        }
        // The name keys profiles, chat and the relay channel
        if self.ctx.account_repo().name_exists(name).await? {
            return Err(DomainError::NameAlreadyExists(name.to_string()).into());
        }

        let password_hash = hash_password(&request.password)?;

        let account = Account::new(
            self.ctx.generate_id(),
            name.to_string(),
            email,
            occupation.to_string(),
        )
        .with_interests(request.interests)
        .with_experience(request.experience);

        // A concurrent registration for the same email or name loses on a unique index
        self.ctx.account_repo().create(&account, &password_hash).await?;

        info!(account_id = %account.id, "Alumni registered");

        if let Some(mirror) = self.ctx.mirror() {
            if let Err(e) = mirror.append(&RegistrationRow::from(&account)).await {
                warn!(account_id = %account.id, error = %e, "Registration mirror failed");
            }
        }

        Ok(MessageResponse::new("Alumni registered successfully"))
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<LoginResponse> {
        let email = normalize_email(&request.email);

        let account = self
            .ctx
            .account_repo()
            .find_by_email(&email)
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown email");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .account_repo()
            .get_password_hash(account.id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = %account.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(account_id = %account.id, "Login failed: invalid password");
            return Err(ServiceError::App(AppError::InvalidCredentials));
        }

        let issued = self
            .ctx
            .jwt_service()
            .issue(account.id, &account.email, &account.name)?;

        info!(account_id = %account.id, "Alumni logged in");

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            alumni: AccountResponse::from(&account),
            token: issued.token,
        })
    }

    /// Public directory of every account, oldest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<AlumniSummary>> {
        let accounts = self.ctx.account_repo().list_all().await?;
        Ok(accounts.into_iter().map(AlumniSummary::from).collect())
    }
}
