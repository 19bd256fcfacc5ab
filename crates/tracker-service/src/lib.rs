//! # tracker-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use dto::{
    CreateWorkspaceRequest, HealthChecks, HealthResponse, IdResponse, LoginRequest,
    LoginResponse, PaginatedResponse, PaginationMeta, ReadinessResponse, RegisterRequest,
    SearchWorkspacesQuery, UserInfoResponse, WorkspaceResponse,
};
pub use services::{
    AuthService, GuardService, ImageUpload, NewWorkspace, RequestIdentity, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, ServiceSettings, WorkspaceService,
};
