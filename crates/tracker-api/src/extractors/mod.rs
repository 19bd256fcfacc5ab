//! Axum extractors for request handling
//!
//! Custom extractors for the token guards, validation, pagination, and the
//! workspace upload form.

mod auth;
mod multipart;
mod pagination;
mod path;
mod validated;

pub use auth::{AuthUser, RefreshUser};
pub use multipart::WorkspaceForm;
pub use pagination::Pagination;
pub use path::WorkspaceIdPath;
pub use validated::{ValidatedJson, ValidatedQuery};
