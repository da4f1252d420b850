/// Connection and migration smoke tests
pub mod db_tests;

/// CRUD round trips for the marketplace tables
pub mod crud_tests;

/// Database tests run only against an explicitly configured Postgres.
pub(crate) fn db_tests_disabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}
