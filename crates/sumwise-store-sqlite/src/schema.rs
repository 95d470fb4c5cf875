//! SQL schema for the Sumwise SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- One row per fact. Identity is (operand_a, operand_b, operation); only the
-- tags column is ever updated in place.
CREATE TABLE IF NOT EXISTS facts (
    fact_id     INTEGER PRIMARY KEY,
    operand_a   INTEGER NOT NULL CHECK (operand_a BETWEEN 0 AND 20),
    operand_b   INTEGER NOT NULL CHECK (operand_b BETWEEN 0 AND 20),
    operation   TEXT    NOT NULL CHECK (operation IN ('add', 'subtract')),
    tags        TEXT    NOT NULL DEFAULT '[]',   -- JSON array of strings
    created_at  TEXT    NOT NULL,                -- ISO 8601 UTC
    UNIQUE (operand_a, operand_b, operation)
);

-- Append-only attempt log; rows die with their fact.
CREATE TABLE IF NOT EXISTS performance_records (
    record_id     TEXT    PRIMARY KEY,
    fact_id       INTEGER NOT NULL REFERENCES facts(fact_id) ON DELETE CASCADE,
    timestamp     TEXT    NOT NULL,                -- ISO 8601 UTC
    response_time REAL    NOT NULL CHECK (response_time >= 0),
    is_correct    INTEGER NOT NULL,
    mode          TEXT    NOT NULL DEFAULT 'practice'
                          CHECK (mode IN ('practice', 'timed'))
);

-- Host-owned key/value flags such as didSeedFacts.
CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS records_fact_idx ON performance_records(fact_id);
CREATE INDEX IF NOT EXISTS records_time_idx ON performance_records(timestamp);

PRAGMA user_version = 1;
";
