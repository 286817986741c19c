//! Domain layer - Pure business abstractions
//!
//! This layer contains NO web framework dependencies (no Axum).
//! Only entity DTOs, repository trait definitions and domain error types.

pub mod errors;
pub mod repositories;

pub use errors::{Dependents, DomainError, EntityKind, FieldError};
pub use repositories::*;
