//! # tracker-db
//!
//! Database layer implementing the tracker-core repository traits with PostgreSQL via SQLx.
//!
//! - Connection pool management and embedded migrations
//! - Database models with SQLx `FromRow` derives and model -> entity mappers
//! - Repository implementations, each call bounded by a deadline
//! - Background reaper for expired token records
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tracker_db::{create_pool, run_migrations, PgUserRepository};
//!
//! async fn example(config: &tracker_common::DatabaseConfig) -> anyhow::Result<()> {
//!     let pool = create_pool(config).await?;
//!     run_migrations(&pool).await?;
//!     let users = PgUserRepository::with_timeout(pool, config.request_timeout());
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod reaper;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool};
pub use reaper::spawn_token_reaper;
pub use repositories::{PgTokenRepository, PgUserRepository, PgWorkspaceRepository};
