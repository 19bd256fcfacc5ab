//! Model -> entity conversions
//!
//! Inserts bind entity fields directly, so only the read direction needs a mapper.

use tracker_core::entities::{TokenRecord, User, UserCredentials, Workspace};

use crate::models::{CredentialsModel, TokenModel, UserModel, WorkspaceModel};

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<CredentialsModel> for UserCredentials {
    fn from(model: CredentialsModel) -> Self {
        UserCredentials {
            user_id: model.id,
            password_hash: model.password_hash,
        }
    }
}

impl From<TokenModel> for TokenRecord {
    fn from(model: TokenModel) -> Self {
        TokenRecord {
            id: model.id,
            user_id: model.user_id,
            expired_at: model.expired_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<WorkspaceModel> for Workspace {
    fn from(model: WorkspaceModel) -> Self {
        Workspace {
            id: model.id,
            name: model.name,
            user_id: model.user_id,
            image: model.image,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
