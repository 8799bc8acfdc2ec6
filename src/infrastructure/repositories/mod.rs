// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

pub mod postgres_metal_repository;

pub use postgres_metal_repository::PostgresMetalRepository;
