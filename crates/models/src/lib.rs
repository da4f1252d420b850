//! sea-orm entities for the seven marketplace tables plus connection helpers.
//!
//! Enumerated columns (`role`, `status`, `plan`, ...) are stored as lower snake
//! case strings; the service layer owns the typed enums.
pub mod errors;
pub mod db;
pub mod user;
pub mod runner;
pub mod job;
pub mod service;
pub mod subscription;
pub mod dispute;
pub mod analytics;

#[cfg(test)]
mod tests;
