/// Database layer for the PostgreSQL store
///
/// # Modules
///
/// - `pool`: connection pool creation, health check, shutdown
/// - `migrations`: embedded schema migrations

pub mod migrations;
pub mod pool;
