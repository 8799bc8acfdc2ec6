// Request middleware
// Extractors applied to protected routes

pub mod auth;

pub use auth::JwtAuth;
