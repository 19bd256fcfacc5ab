//! Database models - SQLx-compatible structs for PostgreSQL tables

mod token;
mod user;
mod workspace;

pub use token::TokenModel;
pub use user::{CredentialsModel, UserModel};
pub use workspace::WorkspaceModel;
