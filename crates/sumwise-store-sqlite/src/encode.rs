//! Encoding and decoding helpers between Rust domain types and the column
//! representations stored in SQLite.
//!
//! Timestamps are RFC 3339 strings, tags a compact JSON array, enums their
//! lowercase discriminant, and UUIDs hyphenated lowercase strings.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use sumwise_core::{
  fact::{Fact, FactKey},
  operation::Operation,
  record::{PerformanceRecord, PracticeMode},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// Fixed-width nanosecond precision so stored timestamps sort as text.
pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Operation ────────────────────────────────────────────────────────────────

pub fn encode_operation(op: Operation) -> &'static str { op.into() }

pub fn decode_operation(s: &str) -> Result<Operation> {
  Ok(Operation::from_discriminant(s)?)
}

// ─── PracticeMode ─────────────────────────────────────────────────────────────

pub fn encode_mode(mode: PracticeMode) -> &'static str { mode.into() }

pub fn decode_mode(s: &str) -> Result<PracticeMode> {
  s.parse::<PracticeMode>()
    .map_err(|_| sumwise_core::Error::UnknownMode(s.to_owned()).into())
}

// ─── Operands ─────────────────────────────────────────────────────────────────

pub fn decode_operand(v: i64) -> Result<u8> {
  u8::try_from(v).map_err(|_| Error::OutOfRange(format!("operand {v}")))
}

// ─── Tags ────────────────────────────────────────────────────────────────────

pub fn encode_tags(tags: &BTreeSet<String>) -> Result<String> {
  Ok(serde_json::to_string(tags)?)
}

pub fn decode_tags(s: &str) -> Result<BTreeSet<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `facts` row.
pub struct RawFact {
  pub operand_a: i64,
  pub operand_b: i64,
  pub operation: String,
  pub tags:      String,
}

impl RawFact {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      operand_a: row.get(0)?,
      operand_b: row.get(1)?,
      operation: row.get(2)?,
      tags:      row.get(3)?,
    })
  }

  pub fn into_fact(self) -> Result<Fact> {
    Ok(Fact {
      operand_a: decode_operand(self.operand_a)?,
      operand_b: decode_operand(self.operand_b)?,
      operation: decode_operation(&self.operation)?,
      tags:      decode_tags(&self.tags)?,
    })
  }
}

/// Raw values read from a `performance_records` row joined with its fact.
pub struct RawRecord {
  pub record_id:     String,
  pub operand_a:     i64,
  pub operand_b:     i64,
  pub operation:     String,
  pub timestamp:     String,
  pub response_time: f64,
  pub is_correct:    bool,
  pub mode:          String,
}

impl RawRecord {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:     row.get(0)?,
      operand_a:     row.get(1)?,
      operand_b:     row.get(2)?,
      operation:     row.get(3)?,
      timestamp:     row.get(4)?,
      response_time: row.get(5)?,
      is_correct:    row.get(6)?,
      mode:          row.get(7)?,
    })
  }

  pub fn into_record(self) -> Result<PerformanceRecord> {
    Ok(PerformanceRecord {
      record_id:     decode_uuid(&self.record_id)?,
      fact:          FactKey::new(
        decode_operand(self.operand_a)?,
        decode_operand(self.operand_b)?,
        decode_operation(&self.operation)?,
      ),
      timestamp:     decode_dt(&self.timestamp)?,
      response_time: self.response_time,
      is_correct:    self.is_correct,
      mode:          decode_mode(&self.mode)?,
    })
  }
}
