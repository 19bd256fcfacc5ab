//! Ports implemented by the infrastructure crates

mod repositories;
mod storage;

pub use repositories::{
    RepoResult, TokenRepository, UserRepository, WorkspaceRepository, WorkspaceSearch,
};
pub use storage::ObjectStorage;
