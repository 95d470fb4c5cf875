//! First-run seeding: populate an empty store with the starter facts exactly
//! once per installation.
//!
//! The [`DID_SEED_FACTS`] flag gates the generator. It is set only after the
//! facts were saved, so a failed save leaves it unset and seeding runs again
//! on the next launch. Nothing here retries.

use thiserror::Error;

use crate::{
  seed::starter_facts,
  store::{DID_SEED_FACTS, FactStore, SettingsStore},
};

/// What [`seed_if_needed`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
  /// The flag was already set; the generator was not called.
  AlreadySeeded,
  /// Starter facts were generated and saved.
  Seeded { inserted: usize },
}

#[derive(Debug, Error)]
pub enum SeedError<E: std::error::Error + 'static> {
  #[error("starter fact generation failed: {0}")]
  Generation(#[source] crate::Error),

  #[error("persistence error: {0}")]
  Persistence(#[source] E),
}

/// Seed `store` with the starter facts unless the seeded flag is set.
pub async fn seed_if_needed<S>(
  store: &S,
) -> Result<SeedOutcome, SeedError<<S as FactStore>::Error>>
where
  S: FactStore + SettingsStore<Error = <S as FactStore>::Error>,
{
  if store
    .get_flag(DID_SEED_FACTS)
    .await
    .map_err(SeedError::Persistence)?
  {
    tracing::debug!("starter facts already seeded");
    return Ok(SeedOutcome::AlreadySeeded);
  }

  let facts = starter_facts().map_err(SeedError::Generation)?;
  let generated = facts.len();
  for fact in facts {
    store.insert_fact(fact).await.map_err(SeedError::Persistence)?;
  }

  let inserted = match store.save().await {
    Ok(n) => n,
    Err(e) => {
      tracing::warn!(error = %e, "failed to save starter facts; will retry next launch");
      return Err(SeedError::Persistence(e));
    }
  };

  store
    .set_flag(DID_SEED_FACTS, true)
    .await
    .map_err(SeedError::Persistence)?;

  tracing::info!(generated, inserted, "seeded starter facts");
  Ok(SeedOutcome::Seeded { inserted })
}

#[cfg(test)]
mod tests {
  use std::{
    collections::{BTreeSet, HashMap, HashSet},
    sync::Mutex,
  };

  use super::*;
  use crate::{
    fact::{Fact, FactKey},
    record::{NewAttempt, PerformanceRecord},
    seed::STARTER_FACT_COUNT,
    store::FactQuery,
  };

  #[derive(Debug, Error)]
  #[error("disk full")]
  struct DiskFull;

  /// A minimal in-memory store whose `save` can be made to fail.
  #[derive(Default)]
  struct MemoryStore {
    staged:    Mutex<Vec<Fact>>,
    facts:     Mutex<HashSet<Fact>>,
    flags:     Mutex<HashMap<String, bool>>,
    fail_save: Mutex<bool>,
  }

  impl FactStore for MemoryStore {
    type Error = DiskFull;

    async fn insert_fact(&self, fact: Fact) -> Result<(), DiskFull> {
      self.staged.lock().unwrap().push(fact);
      Ok(())
    }

    async fn save(&self) -> Result<usize, DiskFull> {
      if *self.fail_save.lock().unwrap() {
        return Err(DiskFull);
      }
      let staged = std::mem::take(&mut *self.staged.lock().unwrap());
      let mut facts = self.facts.lock().unwrap();
      Ok(staged.into_iter().filter(|f| facts.insert(f.clone())).count())
    }

    async fn query_facts(&self, query: &FactQuery) -> Result<Vec<Fact>, DiskFull> {
      let facts = self.facts.lock().unwrap();
      Ok(facts.iter().filter(|f| query.matches(f)).cloned().collect())
    }

    async fn count_facts(&self) -> Result<usize, DiskFull> {
      Ok(self.facts.lock().unwrap().len())
    }

    async fn get_fact(&self, key: FactKey) -> Result<Option<Fact>, DiskFull> {
      let facts = self.facts.lock().unwrap();
      Ok(facts.get(&Fact::from(key)).cloned())
    }

    async fn update_tags(
      &self,
      _key: FactKey,
      _tags: BTreeSet<String>,
    ) -> Result<Fact, DiskFull> {
      unimplemented!("not used by seeding")
    }

    async fn delete_fact(&self, key: FactKey) -> Result<bool, DiskFull> {
      Ok(self.facts.lock().unwrap().remove(&Fact::from(key)))
    }

    async fn record_attempt(
      &self,
      _input: NewAttempt,
    ) -> Result<PerformanceRecord, DiskFull> {
      unimplemented!("not used by seeding")
    }

    async fn records_for(
      &self,
      _key: FactKey,
    ) -> Result<Vec<PerformanceRecord>, DiskFull> {
      Ok(Vec::new())
    }

    async fn count_records(&self) -> Result<usize, DiskFull> { Ok(0) }
  }

  impl SettingsStore for MemoryStore {
    type Error = DiskFull;

    async fn get_flag(&self, key: &str) -> Result<bool, DiskFull> {
      Ok(self.flags.lock().unwrap().get(key).copied().unwrap_or(false))
    }

    async fn set_flag(&self, key: &str, value: bool) -> Result<(), DiskFull> {
      self.flags.lock().unwrap().insert(key.to_owned(), value);
      Ok(())
    }
  }

  #[tokio::test]
  async fn seeds_empty_store_once() {
    let store = MemoryStore::default();

    let first = seed_if_needed(&store).await.unwrap();
    assert_eq!(first, SeedOutcome::Seeded { inserted: STARTER_FACT_COUNT });
    assert_eq!(store.count_facts().await.unwrap(), STARTER_FACT_COUNT);
    assert!(store.get_flag(DID_SEED_FACTS).await.unwrap());

    let second = seed_if_needed(&store).await.unwrap();
    assert_eq!(second, SeedOutcome::AlreadySeeded);
    assert_eq!(store.count_facts().await.unwrap(), STARTER_FACT_COUNT);
  }

  #[tokio::test]
  async fn set_flag_skips_generation() {
    let store = MemoryStore::default();
    store.set_flag(DID_SEED_FACTS, true).await.unwrap();

    let outcome = seed_if_needed(&store).await.unwrap();
    assert_eq!(outcome, SeedOutcome::AlreadySeeded);
    assert_eq!(store.count_facts().await.unwrap(), 0);
    assert!(store.staged.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn failed_save_leaves_flag_unset() {
    let store = MemoryStore::default();
    *store.fail_save.lock().unwrap() = true;

    let err = seed_if_needed(&store).await.unwrap_err();
    assert!(matches!(err, SeedError::Persistence(DiskFull)));
    assert!(!store.get_flag(DID_SEED_FACTS).await.unwrap());
    assert_eq!(store.count_facts().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn retry_after_failed_save_seeds_exactly_once() {
    let store = MemoryStore::default();
    *store.fail_save.lock().unwrap() = true;
    seed_if_needed(&store).await.unwrap_err();

    *store.fail_save.lock().unwrap() = false;
    let outcome = seed_if_needed(&store).await.unwrap();

    // The retried save also flushes the facts staged by the failed attempt;
    // identity deduplication keeps the total at one set.
    assert_eq!(outcome, SeedOutcome::Seeded { inserted: STARTER_FACT_COUNT });
    assert_eq!(store.count_facts().await.unwrap(), STARTER_FACT_COUNT);
    assert!(store.get_flag(DID_SEED_FACTS).await.unwrap());
  }
}
