//! [`SqliteStore`] — the SQLite implementation of [`FactStore`] and
//! [`SettingsStore`].

use std::{
  collections::BTreeSet,
  path::Path,
  sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use sumwise_core::{
  fact::{Fact, FactKey},
  record::{NewAttempt, PerformanceRecord},
  store::{FactQuery, FactStore, SettingsStore},
};

use crate::{
  encode::{
    encode_dt, encode_mode, encode_operation, encode_tags, encode_uuid, RawFact,
    RawRecord,
  },
  schema::SCHEMA,
  Error, Result,
};

const FACT_KEY_MATCH: &str =
  "operand_a = ?1 AND operand_b = ?2 AND operation = ?3";

/// Column values identifying a fact row.
type KeyParams = (u8, u8, &'static str);

fn key_params(key: FactKey) -> KeyParams {
  (key.operand_a, key.operand_b, encode_operation(key.operation))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Sumwise fact store backed by a single SQLite file.
///
/// Clones share the connection and the staging buffer.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  /// Facts inserted since the last successful save.
  staged: Arc<Mutex<Vec<Fact>>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, staged: Arc::default() })
  }

  /// Number of facts waiting for [`FactStore::save`].
  pub fn staged_len(&self) -> usize { self.lock_staged().len() }

  fn lock_staged(&self) -> MutexGuard<'_, Vec<Fact>> {
    self.staged.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Put a batch whose save failed back in front of anything staged since.
  fn restore_staged(&self, batch: Vec<Fact>) {
    let mut staged = self.lock_staged();
    let newer = std::mem::replace(&mut *staged, batch);
    staged.extend(newer);
  }

  /// Insert `facts` in one transaction, skipping identities already stored.
  async fn persist(&self, facts: &[Fact]) -> Result<usize> {
    let rows = facts
      .iter()
      .map(|f| -> Result<_> {
        Ok((
          f.operand_a,
          f.operand_b,
          encode_operation(f.operation),
          encode_tags(&f.tags)?,
        ))
      })
      .collect::<Result<Vec<_>>>()?;
    let created_at = encode_dt(Utc::now());

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
          let mut stmt = tx.prepare(
            "INSERT INTO facts (operand_a, operand_b, operation, tags, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (operand_a, operand_b, operation) DO NOTHING",
          )?;
          for (a, b, op, tags) in &rows {
            inserted +=
              stmt.execute(rusqlite::params![a, b, op, tags, created_at])?;
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(inserted)
  }
}

// ─── FactStore impl ──────────────────────────────────────────────────────────

impl FactStore for SqliteStore {
  type Error = Error;

  // ── Facts ─────────────────────────────────────────────────────────────────

  async fn insert_fact(&self, fact: Fact) -> Result<()> {
    self.lock_staged().push(fact);
    Ok(())
  }

  async fn save(&self) -> Result<usize> {
    let batch = std::mem::take(&mut *self.lock_staged());
    if batch.is_empty() {
      return Ok(0);
    }

    match self.persist(&batch).await {
      Ok(inserted) => {
        tracing::debug!(staged = batch.len(), inserted, "saved facts");
        Ok(inserted)
      }
      Err(e) => {
        self.restore_staged(batch);
        Err(e)
      }
    }
  }

  async fn query_facts(&self, query: &FactQuery) -> Result<Vec<Fact>> {
    let op_str = query.operation.map(encode_operation);

    let raws: Vec<RawFact> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT operand_a, operand_b, operation, tags
           FROM facts
           WHERE ?1 IS NULL OR operation = ?1
           ORDER BY operation, operand_a, operand_b",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![op_str], RawFact::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Tag, band and answer predicates are evaluated here rather than in SQL
    // because tags are stored as a JSON array.
    let mut facts = Vec::new();
    for raw in raws {
      let fact = raw.into_fact()?;
      if query.matches(&fact) {
        facts.push(fact);
      }
    }

    Ok(
      facts
        .into_iter()
        .skip(query.offset.unwrap_or(0))
        .take(query.limit.unwrap_or(usize::MAX))
        .collect(),
    )
  }

  async fn count_facts(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM facts", [], |r| r.get(0))?)
      })
      .await?;
    Ok(count as usize)
  }

  async fn get_fact(&self, key: FactKey) -> Result<Option<Fact>> {
    let (a, b, op) = key_params(key);

    let raw: Option<RawFact> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT operand_a, operand_b, operation, tags
                 FROM facts WHERE {FACT_KEY_MATCH}"
              ),
              rusqlite::params![a, b, op],
              RawFact::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawFact::into_fact).transpose()
  }

  async fn update_tags(&self, key: FactKey, tags: BTreeSet<String>) -> Result<Fact> {
    let (a, b, op) = key_params(key);
    let tags_str   = encode_tags(&tags)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("UPDATE facts SET tags = ?4 WHERE {FACT_KEY_MATCH}"),
          rusqlite::params![a, b, op, tags_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::FactNotFound(key));
    }
    Ok(Fact::from(key).with_tags(tags))
  }

  async fn delete_fact(&self, key: FactKey) -> Result<bool> {
    let (a, b, op) = key_params(key);

    // performance_records rows go with it via ON DELETE CASCADE.
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &format!("DELETE FROM facts WHERE {FACT_KEY_MATCH}"),
          rusqlite::params![a, b, op],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Performance records ───────────────────────────────────────────────────

  async fn record_attempt(&self, input: NewAttempt) -> Result<PerformanceRecord> {
    if !input.has_valid_response_time() {
      return Err(Error::InvalidResponseTime(input.response_time));
    }

    let record = PerformanceRecord {
      record_id:     Uuid::new_v4(),
      fact:          input.fact,
      timestamp:     input.timestamp,
      response_time: input.response_time,
      is_correct:    input.is_correct,
      mode:          input.mode,
    };

    let (a, b, op)    = key_params(record.fact);
    let record_id_str = encode_uuid(record.record_id);
    let ts_str        = encode_dt(record.timestamp);
    let response_time = record.response_time;
    let is_correct    = record.is_correct;
    let mode_str      = encode_mode(record.mode);

    let found = self
      .conn
      .call(move |conn| {
        let fact_id: Option<i64> = conn
          .query_row(
            &format!("SELECT fact_id FROM facts WHERE {FACT_KEY_MATCH}"),
            rusqlite::params![a, b, op],
            |r| r.get(0),
          )
          .optional()?;

        let Some(fact_id) = fact_id else {
          return Ok(false);
        };

        conn.execute(
          "INSERT INTO performance_records (
             record_id, fact_id, timestamp, response_time, is_correct, mode
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            record_id_str,
            fact_id,
            ts_str,
            response_time,
            is_correct,
            mode_str,
          ],
        )?;
        Ok(true)
      })
      .await?;

    if !found {
      return Err(Error::FactNotFound(record.fact));
    }
    Ok(record)
  }

  async fn records_for(&self, key: FactKey) -> Result<Vec<PerformanceRecord>> {
    let (a, b, op) = key_params(key);

    let raws: Vec<RawRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             r.record_id, f.operand_a, f.operand_b, f.operation,
             r.timestamp, r.response_time, r.is_correct, r.mode
           FROM performance_records r
           JOIN facts f ON f.fact_id = r.fact_id
           WHERE f.operand_a = ?1 AND f.operand_b = ?2 AND f.operation = ?3
           ORDER BY r.timestamp, r.rowid",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![a, b, op], RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }

  async fn count_records(&self) -> Result<usize> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM performance_records",
          [],
          |r| r.get(0),
        )?)
      })
      .await?;
    Ok(count as usize)
  }
}

// ─── SettingsStore impl ──────────────────────────────────────────────────────

impl SettingsStore for SqliteStore {
  type Error = Error;

  async fn get_flag(&self, key: &str) -> Result<bool> {
    let key = key.to_owned();

    let value: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM settings WHERE key = ?1",
              rusqlite::params![key],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    Ok(value.is_some_and(|v| v != 0))
  }

  async fn set_flag(&self, key: &str, value: bool) -> Result<()> {
    let key = key.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO settings (key, value) VALUES (?1, ?2)
           ON CONFLICT (key) DO UPDATE SET value = excluded.value",
          rusqlite::params![key, value],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
