//! The `FactStore` and `SettingsStore` traits and supporting query types.
//!
//! The traits are implemented by storage backends (e.g.
//! `sumwise-store-sqlite`). The seeding flow and the CLI depend on these
//! abstractions, not on any concrete backend.

use std::{collections::BTreeSet, future::Future, ops::RangeInclusive};

use crate::{
  fact::{Band, Fact, FactKey},
  operation::Operation,
  record::{NewAttempt, PerformanceRecord},
};

/// Settings key for the persisted "starter facts were seeded" flag.
pub const DID_SEED_FACTS: &str = "didSeedFacts";

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`FactStore::query_facts`]. Every set field must match.
#[derive(Debug, Clone, Default)]
pub struct FactQuery {
  pub operation: Option<Operation>,
  /// Returned facts must carry all of these tags.
  pub tags:      Vec<String>,
  /// Restrict to facts tagged with this band.
  pub band:      Option<Band>,
  /// Restrict to facts whose answer lies in this range.
  pub answer:    Option<RangeInclusive<i32>>,
  pub limit:     Option<usize>,
  pub offset:    Option<usize>,
}

impl FactQuery {
  /// Whether `fact` satisfies every predicate except `limit` and `offset`.
  pub fn matches(&self, fact: &Fact) -> bool {
    self.operation.is_none_or(|op| fact.operation == op)
      && self.tags.iter().all(|t| fact.has_tag(t))
      && self.band.is_none_or(|b| fact.has_tag(&b.tag()))
      && self
        .answer
        .as_ref()
        .is_none_or(|range| range.contains(&fact.answer()))
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Abstraction over a fact and attempt store backend.
///
/// Facts are written as a unit of work: [`insert_fact`](Self::insert_fact)
/// stages, [`save`](Self::save) persists everything staged at once. Deleting
/// a fact deletes every performance record it owns.
pub trait FactStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Facts ─────────────────────────────────────────────────────────────

  /// Stage a fact for the next [`save`](Self::save).
  fn insert_fact(
    &self,
    fact: Fact,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Persist all staged facts in one transaction and return how many were
  /// new. Facts whose identity is already stored are dropped silently.
  ///
  /// On failure the staged facts are kept so the caller may retry.
  fn save(&self) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Facts matching `query`, ordered by operation then operands.
  fn query_facts<'a>(
    &'a self,
    query: &'a FactQuery,
  ) -> impl Future<Output = Result<Vec<Fact>, Self::Error>> + Send + 'a;

  fn count_facts(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  /// Retrieve a fact by identity. Returns `None` if not found.
  fn get_fact(
    &self,
    key: FactKey,
  ) -> impl Future<Output = Result<Option<Fact>, Self::Error>> + Send + '_;

  /// Replace a fact's tags. Tags are the only mutable part of a fact.
  fn update_tags(
    &self,
    key: FactKey,
    tags: BTreeSet<String>,
  ) -> impl Future<Output = Result<Fact, Self::Error>> + Send + '_;

  /// Delete a fact and all of its performance records. Returns `false` if
  /// no such fact existed.
  fn delete_fact(
    &self,
    key: FactKey,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Performance records ───────────────────────────────────────────────

  /// Append an attempt to an existing fact.
  fn record_attempt(
    &self,
    input: NewAttempt,
  ) -> impl Future<Output = Result<PerformanceRecord, Self::Error>> + Send + '_;

  /// All attempts at a fact, oldest first.
  fn records_for(
    &self,
    key: FactKey,
  ) -> impl Future<Output = Result<Vec<PerformanceRecord>, Self::Error>> + Send + '_;

  fn count_records(
    &self,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}

/// Persisted boolean settings owned by the host, such as
/// [`DID_SEED_FACTS`].
pub trait SettingsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read a flag; an unset flag reads as `false`.
  fn get_flag<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn set_flag<'a>(
    &'a self,
    key: &'a str,
    value: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

#[cfg(test)]
mod tests {
  use super::*;

  fn tagged(a: u8, b: u8, op: Operation, tags: &[&str]) -> Fact {
    Fact::new(a, b, op).with_tags(tags.iter().copied())
  }

  #[test]
  fn empty_query_matches_everything() {
    let q = FactQuery::default();
    assert!(q.matches(&Fact::new(1, 1, Operation::Add)));
    assert!(q.matches(&Fact::new(9, 4, Operation::Subtract)));
  }

  #[test]
  fn query_predicates_combine() {
    let fact = tagged(8, 6, Operation::Add, &["commutative", "band4"]);

    let by_op = FactQuery {
      operation: Some(Operation::Add),
      ..Default::default()
    };
    assert!(by_op.matches(&fact));

    let wrong_op = FactQuery {
      operation: Some(Operation::Subtract),
      ..Default::default()
    };
    assert!(!wrong_op.matches(&fact));

    let by_tags = FactQuery {
      tags: vec!["commutative".into(), "band4".into()],
      ..Default::default()
    };
    assert!(by_tags.matches(&fact));

    let missing_tag = FactQuery {
      tags: vec!["commutative".into(), "doubles".into()],
      ..Default::default()
    };
    assert!(!missing_tag.matches(&fact));

    let by_band = FactQuery { band: Band::new(4), ..Default::default() };
    assert!(by_band.matches(&fact));
    let other_band = FactQuery { band: Band::new(5), ..Default::default() };
    assert!(!other_band.matches(&fact));

    let by_answer = FactQuery { answer: Some(10..=14), ..Default::default() };
    assert!(by_answer.matches(&fact));
    let low_answer = FactQuery { answer: Some(0..=10), ..Default::default() };
    assert!(!low_answer.matches(&fact));
  }
}
