//! Domain model for flag archive resources.
//!
//! # Responsibility
//! - Define stored records, external DTOs and request shapes per resource.
//! - Provide the `Patch` wrapper used by partial updates.
//!
//! # Invariants
//! - Records are identified by a storage-assigned integer id.
//! - Each resource kind has one immutable, unique external key.

pub mod flag_entity;
pub mod page;
pub mod patch;
pub mod user;
