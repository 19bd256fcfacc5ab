//! Multipart form extractor for workspace creation
//!
//! Reads a text field `name` and an optional file field `image`. Other fields
//! are skipped.

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
};
use tracker_service::{CreateWorkspaceRequest, ImageUpload, NewWorkspace};
use validator::Validate;

use crate::response::ApiError;

/// Parsed and validated workspace creation form
#[derive(Debug, Clone)]
pub struct WorkspaceForm(pub NewWorkspace);

fn body_error(e: MultipartError) -> ApiError {
    ApiError::invalid_body(e.body_text())
}

#[async_trait]
impl<S> FromRequest<S> for WorkspaceForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        let mut name = None;
        let mut image = None;

        while let Some(field) = multipart.next_field().await.map_err(body_error)? {
            let field_name = field.name().map(str::to_string);
            match field_name.as_deref() {
                Some("name") => name = Some(field.text().await.map_err(body_error)?),
                Some("image") => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let bytes = field.bytes().await.map_err(body_error)?;
                    // Browsers send an empty part when no file was picked
                    if !(file_name.is_empty() && bytes.is_empty()) {
                        image = Some(ImageUpload {
                            file_name,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                _ => {}
            }
        }

        let request = CreateWorkspaceRequest {
            name: name.unwrap_or_default(),
        };
        request.validate()?;

        Ok(Self(NewWorkspace { request, image }))
    }
}
