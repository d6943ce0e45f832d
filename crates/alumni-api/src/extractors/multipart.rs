//! Form extractors for endpoints that accept file uploads
//!
//! Text fields are collected into the matching request DTO. File parts are
//! buffered in memory and handed to the handler, which stores them only
//! after the caller is authenticated.

use alumni_common::AppError;
use alumni_service::dto::{CreateThreadRequest, UpdateProfileRequest};
use axum::{
    async_trait,
    body::Bytes,
    extract::{multipart::Field, multipart::MultipartError, FromRef, FromRequest, Multipart, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Json,
};
use validator::Validate;

use super::validated::json_rejection;
use crate::response::ApiError;
use crate::state::AppState;

/// File part of a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// `POST /forum/create-thread` body
#[derive(Debug)]
pub struct ThreadForm {
    pub request: CreateThreadRequest,
    pub image: Option<UploadedFile>,
}

/// `POST /profile/update` body, either JSON or multipart
#[derive(Debug)]
pub struct ProfileForm {
    pub request: UpdateProfileRequest,
    pub picture: Option<UploadedFile>,
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

fn multipart_error(err: &MultipartError, limit_mb: u32) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit_mb }.into()
    } else {
        ApiError::invalid_body(err.body_text())
    }
}

/// Reads one form part at a time, enforcing the upload size limit
struct FormReader {
    multipart: Multipart,
    limit_mb: u32,
    max_bytes: usize,
}

impl FormReader {
    async fn open<S>(req: Request, state: &S) -> Result<Self, ApiError>
    where
        S: Send + Sync,
        AppState: FromRef<S>,
    {
        let storage = AppState::from_ref(state).config().storage.clone();
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        Ok(Self {
            multipart,
            limit_mb: storage.max_file_size_mb,
            max_bytes: storage.max_file_size_bytes(),
        })
    }

    async fn next(&mut self) -> Result<Option<Field<'_>>, ApiError> {
        let limit_mb = self.limit_mb;
        self.multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(&e, limit_mb))
    }

    async fn text(field: Field<'_>, limit_mb: u32) -> Result<String, ApiError> {
        field.text().await.map_err(|e| multipart_error(&e, limit_mb))
    }

    /// Buffer a file part. Browsers send an empty part when no file was
    /// chosen; that counts as no upload.
    async fn file(field: Field<'_>, limit_mb: u32, max_bytes: usize) -> Result<Option<UploadedFile>, ApiError> {
        let file_name = field.file_name().map(ToString::to_string);
        let content_type = field.content_type().map(ToString::to_string);
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e, limit_mb))?;

        if bytes.is_empty() {
            return Ok(None);
        }
        if bytes.len() > max_bytes {
            return Err(AppError::PayloadTooLarge { limit_mb }.into());
        }

        Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }))
    }
}

#[async_trait]
impl<S> FromRequest<S> for ThreadForm
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut reader = FormReader::open(req, state).await?;
        let (limit_mb, max_bytes) = (reader.limit_mb, reader.max_bytes);
        let mut request = CreateThreadRequest::default();
        let mut image = None;

        while let Some(field) = reader.next().await? {
            let name = field.name().map(ToString::to_string);
            match name.as_deref() {
                Some("title") => request.title = FormReader::text(field, limit_mb).await?,
                Some("content") => request.content = FormReader::text(field, limit_mb).await?,
                Some("tags") => request.tags = Some(FormReader::text(field, limit_mb).await?),
                Some("image") => image = FormReader::file(field, limit_mb, max_bytes).await?,
                _ => {}
            }
        }

        request.validate()?;

        Ok(Self { request, image })
    }
}

#[async_trait]
impl<S> FromRequest<S> for ProfileForm
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let Json(request) = Json::<UpdateProfileRequest>::from_request(req, state)
                .await
                .map_err(json_rejection)?;
            request.validate()?;
            return Ok(Self {
                request,
                picture: None,
            });
        }

        let mut reader = FormReader::open(req, state).await?;
        let (limit_mb, max_bytes) = (reader.limit_mb, reader.max_bytes);
        let mut request = UpdateProfileRequest::default();
        let mut picture = None;

        while let Some(field) = reader.next().await? {
            let name = field.name().map(ToString::to_string);
            match name.as_deref() {
                Some("department") => request.department = FormReader::text(field, limit_mb).await?,
                Some("degree") => request.degree = FormReader::text(field, limit_mb).await?,
                Some("about") => request.about = FormReader::text(field, limit_mb).await?,
                Some("profilePic") => picture = FormReader::file(field, limit_mb, max_bytes).await?,
                _ => {}
            }
        }

        request.validate()?;

        Ok(Self { request, picture })
    }
}
