//! Recipe module: domain types, validation, slug resolution, persistence and the service.

pub mod domain;
pub mod validation;
pub mod slug;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::RecipeService;
