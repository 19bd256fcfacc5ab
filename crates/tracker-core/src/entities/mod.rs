//! Domain entities - core business objects

mod token;
mod user;
mod workspace;

pub use token::TokenRecord;
pub use user::{User, UserCredentials};
pub use workspace::Workspace;
