//! Workspace handlers

use axum::{extract::State, Json};
use tracker_service::{
    IdResponse, PaginatedResponse, SearchWorkspacesQuery, WorkspaceResponse, WorkspaceService,
};

use crate::extractors::{AuthUser, Pagination, ValidatedQuery, WorkspaceForm, WorkspaceIdPath};
use crate::response::ApiResult;
use crate::state::AppState;

/// Create a workspace, optionally with an image
///
/// POST /workspaces (multipart: `name`, `image`)
pub async fn create_workspace(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WorkspaceForm(input): WorkspaceForm,
) -> ApiResult<Json<IdResponse>> {
    let service = WorkspaceService::new(state.service_context());
    let response = service.create(&identity.user, input).await?;
    Ok(Json(response))
}

/// GET /workspaces/:workspace_id
pub async fn get_workspace(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    WorkspaceIdPath(workspace_id): WorkspaceIdPath,
) -> ApiResult<Json<WorkspaceResponse>> {
    let service = WorkspaceService::new(state.service_context());
    let response = service.get(identity.user.id, workspace_id).await?;
    Ok(Json(response))
}

/// Search the caller's workspaces by name
///
/// GET /workspaces?name=&page=&page_size=
pub async fn search_workspaces(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    ValidatedQuery(query): ValidatedQuery<SearchWorkspacesQuery>,
    pagination: Pagination,
) -> ApiResult<Json<PaginatedResponse<WorkspaceResponse>>> {
    let service = WorkspaceService::new(state.service_context());
    let response = service
        .search(identity.user.id, query, pagination.page, pagination.page_size)
        .await?;
    Ok(Json(response))
}
