//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the list-level operations UI layers invoke.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod task_list;
