//! Profile service

use alumni_core::traits::ProfileChanges;
use alumni_core::DomainError;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{ProfileResponse, UpdateProfileRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

pub struct ProfileService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ProfileService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> ServiceResult<ProfileResponse> {
        let profile = self
            .ctx
            .profile_repo()
            .find_by_name(name)
            .await?
            .ok_or_else(|| DomainError::ProfileNotFound(name.to_string()))?;

        Ok(profile.into())
    }

    /// Create or overwrite the profile for `name`.
    ///
    /// `picture` is the stored path of a newly uploaded file. When it is
    /// `None` the existing picture stays in place.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        name: &str,
        request: UpdateProfileRequest,
        picture: Option<String>,
    ) -> ServiceResult<ProfileResponse> {
        request.validate()?;

        let changes = ProfileChanges {
            name: name.to_string(),
            department: request.department.trim().to_string(),
            degree: request.degree.trim().to_string(),
            about: request.about.trim().to_string(),
            profile_pic: picture,
        };
        let profile = self.ctx.profile_repo().upsert(&changes).await?;

        info!(name = %name, "Profile updated");

        Ok(profile.into())
    }
}
