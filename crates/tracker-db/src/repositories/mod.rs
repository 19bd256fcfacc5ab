//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in tracker-core.
//! Every call runs under the deadline given at construction.

mod error;
mod token;
mod user;
mod workspace;

pub use error::{escape_like, DEFAULT_QUERY_TIMEOUT};
pub use token::PgTokenRepository;
pub use user::PgUserRepository;
pub use workspace::PgWorkspaceRepository;
