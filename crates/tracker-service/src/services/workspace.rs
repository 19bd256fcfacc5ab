//! Workspace service
//!
//! Creation with an optional image upload, owner-scoped reads, and name search
//! where the total count runs concurrently with the page fetch.

use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use tracker_core::entities::{User, Workspace};
use tracker_core::{DomainError, PageRequest, WorkspaceSearch};

use crate::dto::{
    CreateWorkspaceRequest, IdResponse, PaginatedResponse, SearchWorkspacesQuery,
    WorkspaceResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// An uploaded file as received from the transport
#[derive(Clone)]
pub struct ImageUpload {
    /// Client-supplied file name; only its extension is used
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Everything needed to create a workspace
#[derive(Debug, Clone)]
pub struct NewWorkspace {
    pub request: CreateWorkspaceRequest,
    pub image: Option<ImageUpload>,
}

/// Workspace service
pub struct WorkspaceService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> WorkspaceService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a workspace owned by `owner`
    ///
    /// The image is checked against the upload policy before anything is
    /// uploaded. Name uniqueness is enforced by the repository.
    #[instrument(skip(self, owner, input), fields(user_id = %owner.id, name = %input.request.name))]
    pub async fn create(&self, owner: &User, input: NewWorkspace) -> ServiceResult<IdResponse> {
        input
            .request
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let image_key = match input.image {
            Some(image) => Some(self.upload_image(image).await?),
            None => None,
        };

        let workspace = Workspace::new(input.request.name, owner.id, image_key);

        if let Err(e) = self.ctx.workspace_repo().create(&workspace).await {
            if let (DomainError::WorkspaceNameAlreadyExists, Some(key)) = (&e, &workspace.image) {
                warn!(image_key = %key, "Workspace name taken, uploaded image is orphaned");
            }
            return Err(e.into());
        }

        info!(workspace_id = %workspace.id, "Workspace created");

        Ok(IdResponse::new(workspace.id))
    }

    async fn upload_image(&self, image: ImageUpload) -> ServiceResult<String> {
        let checked = self
            .ctx
            .settings()
            .image_policy
            .check(&image.file_name, image.bytes.len())?;

        // Stored type follows the extension; the client's declared type is ignored
        let key = format!("workspaces/{}.{}", Uuid::new_v4(), checked.extension);
        self.ctx
            .storage()
            .put_object(&key, image.bytes, checked.content_type)
            .await?;

        Ok(key)
    }

    /// Fetch a workspace the caller owns
    ///
    /// Someone else's workspace reads as not found.
    #[instrument(skip(self))]
    pub async fn get(&self, owner_id: Uuid, workspace_id: Uuid) -> ServiceResult<WorkspaceResponse> {
        let workspace = self
            .ctx
            .workspace_repo()
            .find_by_id(workspace_id)
            .await?
            .filter(|w| w.is_owned_by(owner_id))
            .ok_or(DomainError::WorkspaceNotFound(workspace_id))?;

        Ok(WorkspaceResponse::from(workspace))
    }

    /// Search the caller's workspaces by name, newest first
    ///
    /// Missing paging parameters fall back to the configured defaults.
    #[instrument(skip(self, query), fields(name = %query.name))]
    pub async fn search(
        &self,
        owner_id: Uuid,
        query: SearchWorkspacesQuery,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> ServiceResult<PaginatedResponse<WorkspaceResponse>> {
        query
            .validate()
            .map_err(|e| ServiceError::validation(e.to_string()))?;

        let settings = self.ctx.settings();
        let page = PageRequest::new(
            page.unwrap_or(1),
            page_size.unwrap_or(settings.default_page_size),
            settings.max_page_size,
        );

        let search = WorkspaceSearch {
            user_id: owner_id,
            name: query.name,
            limit: page.limit(),
            offset: page.offset(),
        };

        let repo = self.ctx.workspace_repo();
        let (total, workspaces) =
            tokio::try_join!(repo.count_matching(&search), repo.find_matching(&search))?;

        Ok(PaginatedResponse::new(
            workspaces.into_iter().map(WorkspaceResponse::from).collect(),
            page.page,
            page.page_size,
            total,
            page.total_pages(total),
        ))
    }
}
