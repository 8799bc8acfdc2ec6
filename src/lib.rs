//! Metals API Library
//!
//! This library provides the core functionality for the Metals API,
//! including domain logic, repositories, and infrastructure components.

pub mod api;
pub mod auth;
pub mod domain;
pub mod infrastructure;
