//! Error types for `sumwise-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The filler loop cycled through every counter state without reaching
  /// the target size. Indicates a defect in the rule tables.
  #[error(
    "fact generation stalled at {collected} facts after {iterations} filler \
     iterations"
  )]
  Generation { collected: usize, iterations: usize },

  #[error("unknown operation: {0:?}")]
  UnknownOperation(String),

  #[error("unknown practice mode: {0:?}")]
  UnknownMode(String),

  #[error("invalid fact key: {0:?}")]
  InvalidKey(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
