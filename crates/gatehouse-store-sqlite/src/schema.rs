//! SQL schema for the Gatehouse SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `status` carries no CHECK constraint: the admin writes it from outside and
/// unknown values are reported on read instead of failing the admin's write.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per identity. Rows are never deleted by the server.
-- The default BINARY collation keeps the email key case-sensitive.
CREATE TABLE IF NOT EXISTS accounts (
    email         TEXT PRIMARY KEY,
    account_id    TEXT NOT NULL UNIQUE,
    given_name    TEXT NOT NULL,
    family_name   TEXT NOT NULL,
    password_hash TEXT NOT NULL,   -- PHC string
    status        TEXT NOT NULL DEFAULT 'pending',  -- 'pending' | 'approved' | 'rejected'
    created_at    TEXT NOT NULL    -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS accounts_status_idx ON accounts(status);

PRAGMA user_version = 1;
";
