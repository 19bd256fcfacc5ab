//! # tracker-core
//!
//! Domain layer containing entities, value objects, and the repository/storage ports.
//! This crate has zero dependencies on infrastructure (database, object storage, web framework).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{TokenRecord, User, UserCredentials, Workspace};
pub use error::DomainError;
pub use traits::{
    ObjectStorage, RepoResult, TokenRepository, UserRepository, WorkspaceRepository,
    WorkspaceSearch,
};
pub use value_objects::{ImagePolicy, PageRequest, ValidatedImage};
