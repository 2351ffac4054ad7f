//! Repository layer for relational task persistence.
//!
//! # Responsibility
//! - Define the relational CRUD contract over the `tasks` table.
//! - Isolate SQLite query details from controller orchestration.
//!
//! # Invariants
//! - Write paths validate descriptions before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.

pub mod task_repo;
