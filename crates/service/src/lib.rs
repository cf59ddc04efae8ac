//! Service layer providing business-oriented operations on top of models.
//! - Separates business logic from data access (`recipe::repository`).
//! - Reuses validation and entity definitions in `models` crate.
//! - Caching is an injected capability (`cache::CacheStore`), never a global.

pub mod errors;
pub mod pagination;
pub mod cache;
pub mod recipe;
#[cfg(test)]
pub mod test_support;
