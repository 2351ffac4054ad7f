//! Task domain model.
//!
//! # Responsibility
//! - Define the task record shared by every store backend.
//! - Own description normalization so all write paths trim the same way.
//!
//! # Invariants
//! - A persisted description is never empty and never carries surrounding
//!   whitespace.

pub mod task;
