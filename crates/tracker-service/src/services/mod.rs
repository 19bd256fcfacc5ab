//! Business logic services
//!
//! Services borrow a [`ServiceContext`] and orchestrate the repository and
//! storage ports behind it.

pub mod auth;
pub mod context;
pub mod error;
pub mod guard;
pub mod workspace;

pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use guard::{GuardService, RequestIdentity};
pub use workspace::{ImageUpload, NewWorkspace, WorkspaceService};
