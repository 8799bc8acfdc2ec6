// Repository interfaces (ports)
// Implemented by the infrastructure layer

pub mod metal_repository;

pub use metal_repository::{MetalRepository, RepositoryError};
