//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use tracker_core::entities::{User, Workspace};

use super::responses::{UserInfoResponse, WorkspaceResponse};

impl From<&User> for UserInfoResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<Workspace> for WorkspaceResponse {
    fn from(workspace: Workspace) -> Self {
        Self {
            id: workspace.id,
            name: workspace.name,
            user_id: workspace.user_id,
            image: workspace.image,
            created_at: workspace.created_at,
            updated_at: workspace.updated_at,
        }
    }
}
