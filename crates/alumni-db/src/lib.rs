//! # alumni-db
//!
//! PostgreSQL implementations of the repository traits defined in `alumni-core`.
//!
//! - Connection pool management and embedded-directory migrations
//! - Database models with SQLx `FromRow` derives
//! - Model to entity mappers, including thread re-assembly
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use alumni_db::{create_pool, run_migrations, DatabaseConfig, PgThreadRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let threads = PgThreadRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAccountRepository, PgChatRepository, PgProfileRepository, PgThreadRepository,
};
