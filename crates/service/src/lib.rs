//! Service layer for the Guhdeh admin backend.
//! - `domain`: wire records, create inputs and patch types with validation.
//! - `storage`: the `Storage` trait with in-memory and sea-orm backends.
//! - `auth`, `insights`, `seed`: business workflows on top of storage.

pub mod errors;
pub mod domain;
pub mod storage;
pub mod auth;
pub mod insights;
pub mod pagination;
pub mod seed;
#[cfg(test)]
pub mod test_support;
