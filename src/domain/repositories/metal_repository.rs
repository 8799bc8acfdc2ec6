use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::metal::{ListOptions, Metal, MetalFilter, MetalPage, MetalPatch};

/// Errors surfaced by repository implementations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(Uuid),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Repository trait for the Metal entity
///
/// Defines the contract for persisting and retrieving metals.
/// Implementations should handle database-specific details.
#[async_trait]
pub trait MetalRepository: Send + Sync {
    /// Save a metal (insert or update)
    async fn save(&self, metal: &Metal) -> Result<(), RepositoryError>;

    /// Insert a batch of metals, returning the number inserted
    async fn insert_many(&self, metals: &[Metal]) -> Result<u64, RepositoryError>;

    /// Find a page of metals matching the filter
    async fn find(
        &self,
        filter: &MetalFilter,
        options: &ListOptions,
    ) -> Result<MetalPage, RepositoryError>;

    /// Count the metals matching the filter
    async fn count(&self, filter: &MetalFilter) -> Result<i64, RepositoryError>;

    /// Find a metal by its ID, soft-deleted or not
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Metal>, RepositoryError>;

    /// Apply a patch to every metal matching the filter, returning the
    /// number of records changed
    async fn update_many(
        &self,
        filter: &MetalFilter,
        patch: &MetalPatch,
        updated_by: Uuid,
    ) -> Result<u64, RepositoryError>;

    /// Soft-delete the given records, returning the number newly marked
    async fn soft_delete_many(&self, ids: &[Uuid], updated_by: Uuid)
        -> Result<u64, RepositoryError>;

    /// Count dependent records (lots) attached to the given metals
    async fn count_dependents(&self, ids: &[Uuid]) -> Result<i64, RepositoryError>;

    /// Hard-delete a metal and its dependent records
    ///
    /// Returns `RepositoryError::NotFound` when no row was removed.
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// Hard-delete a batch of metals and their dependent records,
    /// returning the number of metals removed
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepositoryError>;
}
