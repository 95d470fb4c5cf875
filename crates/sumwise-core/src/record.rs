//! Performance records — one per answer attempt.
//!
//! Records are append-only and owned by their fact: the store deletes them
//! together with it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::fact::FactKey;

/// The context an attempt was made in.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PracticeMode {
  #[default]
  Practice,
  Timed,
}

/// A single stored attempt at a fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceRecord {
  pub record_id:     Uuid,
  /// The owning fact.
  pub fact:          FactKey,
  pub timestamp:     DateTime<Utc>,
  /// Seconds from prompt to answer.
  pub response_time: f64,
  pub is_correct:    bool,
  pub mode:          PracticeMode,
}

/// Input to [`crate::store::FactStore::record_attempt`].
/// `record_id` is always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAttempt {
  pub fact:          FactKey,
  pub timestamp:     DateTime<Utc>,
  pub response_time: f64,
  pub is_correct:    bool,
  pub mode:          PracticeMode,
}

impl NewAttempt {
  /// An attempt made now, in practice mode.
  pub fn new(fact: FactKey, response_time: f64, is_correct: bool) -> Self {
    Self {
      fact,
      timestamp: Utc::now(),
      response_time,
      is_correct,
      mode: PracticeMode::default(),
    }
  }

  pub fn in_mode(mut self, mode: PracticeMode) -> Self {
    self.mode = mode;
    self
  }

  /// Response times must be finite and non-negative.
  pub fn has_valid_response_time(&self) -> bool {
    self.response_time.is_finite() && self.response_time >= 0.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::operation::Operation;

  #[test]
  fn defaults_to_practice_mode() {
    let key = FactKey::new(3, 4, Operation::Add);
    let attempt = NewAttempt::new(key, 1.5, true);
    assert_eq!(attempt.mode, PracticeMode::Practice);
    assert_eq!(attempt.in_mode(PracticeMode::Timed).mode, PracticeMode::Timed);
  }

  #[test]
  fn response_time_validation() {
    let key = FactKey::new(3, 4, Operation::Add);
    assert!(NewAttempt::new(key, 0.0, true).has_valid_response_time());
    assert!(NewAttempt::new(key, 2.25, false).has_valid_response_time());
    assert!(!NewAttempt::new(key, -0.1, true).has_valid_response_time());
    assert!(!NewAttempt::new(key, f64::NAN, true).has_valid_response_time());
    assert!(!NewAttempt::new(key, f64::INFINITY, true).has_valid_response_time());
  }

  #[test]
  fn mode_strings() {
    assert_eq!(PracticeMode::Practice.as_ref(), "practice");
    assert_eq!(PracticeMode::Timed.as_ref(), "timed");
    assert_eq!("timed".parse::<PracticeMode>().unwrap(), PracticeMode::Timed);
    assert!("drill".parse::<PracticeMode>().is_err());
  }
}
