//! Pure transforms between stored records, DTOs and request payloads.
//!
//! # Invariants
//! - No field is invented on the inbound path; storage assigns `id` and
//!   timestamps.
//! - The only outbound narrowing is dropping `created_at`/`updated_at`.
//! - Strings pass through unchanged (no trimming, no case folding).

pub mod flag_entity;
pub mod user;
