//! Resource use-case services.
//!
//! # Responsibility
//! - Orchestrate validator, storage gateway and mapper per operation.
//! - Classify storage failures into `ServiceError` at this boundary.
//!
//! # Invariants
//! - Services hold no mutable state between calls.
//! - No operation is retried here; retry policy belongs to the caller.

pub mod flag_entity_service;
pub mod user_service;

use crate::error::{ServiceError, ServiceResult};
use crate::repo::{PageQuery, RepoError};
use log::{error, info, warn};
use std::time::Instant;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size policy for list operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Used when the caller omits the size or passes `0`.
    pub default_size: u32,
    /// Upper bound applied to every requested size.
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

impl PageLimits {
    /// Resolves the effective page size; never exceeds `max_size`.
    pub fn normalize(&self, size: Option<u32>) -> u32 {
        let requested = match size {
            None | Some(0) => self.default_size,
            Some(value) => value,
        };
        requested.clamp(1, self.max_size.max(1))
    }

    /// Offset window for a zero-based page index.
    pub fn window(&self, page: u32, size: Option<u32>) -> PageQuery {
        let limit = self.normalize(size);
        PageQuery {
            offset: u64::from(page) * u64::from(limit),
            limit,
        }
    }
}

/// Maps a gateway failure to the service taxonomy.
///
/// Unclassified failures are logged with their cause and surfaced as a bare
/// `Internal`.
pub(crate) fn classify(resource: &'static str, event: &str, err: RepoError) -> ServiceError {
    match err {
        RepoError::NotFound(id) => ServiceError::NotFound { resource, id },
        RepoError::Conflict { key } => ServiceError::Conflict { resource, key },
        other => {
            error!(
                "event={event} module=service status=error error_code=storage_failure error={other}"
            );
            ServiceError::Internal
        }
    }
}

/// Emits one outcome line per operation.
pub(crate) fn log_outcome<T>(
    event: &str,
    started_at: Instant,
    result: ServiceResult<T>,
) -> ServiceResult<T> {
    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!("event={event} module=service status=ok duration_ms={duration_ms}"),
        Err(ServiceError::Internal) => error!(
            "event={event} module=service status=error kind=internal duration_ms={duration_ms}"
        ),
        Err(err) => warn!(
            "event={event} module=service status=rejected kind={} duration_ms={duration_ms}",
            err.kind()
        ),
    }
    result
}
