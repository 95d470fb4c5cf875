//! The arithmetic operation a fact exercises.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoStaticStr};

use crate::{Error, Result};

/// Addition or subtraction.
///
/// The `AsRefStr` / `EnumString` form (`"add"`, `"subtract"`) is the storage
/// discriminant; [`Operation::symbol`] is the display form.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
  Add,
  Subtract,
}

impl Operation {
  /// Plus sign for addition; U+2212 MINUS SIGN (not a hyphen) for
  /// subtraction.
  pub fn symbol(self) -> &'static str {
    match self {
      Self::Add => "+",
      Self::Subtract => "\u{2212}",
    }
  }

  pub fn apply(self, a: u8, b: u8) -> i32 {
    match self {
      Self::Add => i32::from(a) + i32::from(b),
      Self::Subtract => i32::from(a) - i32::from(b),
    }
  }

  pub fn inverse(self) -> Self {
    match self {
      Self::Add => Self::Subtract,
      Self::Subtract => Self::Add,
    }
  }

  /// Parse an operator symbol. The ASCII hyphen is accepted on input so keys
  /// can be typed on a plain keyboard.
  pub fn from_symbol(s: &str) -> Result<Self> {
    match s {
      "+" => Ok(Self::Add),
      "\u{2212}" | "-" => Ok(Self::Subtract),
      other => Err(Error::UnknownOperation(other.to_owned())),
    }
  }

  /// Parse the storage discriminant.
  pub fn from_discriminant(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownOperation(s.to_owned()))
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.symbol())
  }
}

#[cfg(test)]
mod tests {
  use strum::IntoEnumIterator;

  use super::*;

  #[test]
  fn addition_applies() {
    assert_eq!(Operation::Add.apply(5, 3), 8);
    assert_eq!(Operation::Add.apply(0, 0), 0);
    assert_eq!(Operation::Add.apply(10, 10), 20);
  }

  #[test]
  fn subtraction_applies() {
    assert_eq!(Operation::Subtract.apply(5, 3), 2);
    assert_eq!(Operation::Subtract.apply(10, 0), 10);
    assert_eq!(Operation::Subtract.apply(20, 8), 12);
    // Not reachable from the generator, but the evaluator is signed.
    assert_eq!(Operation::Subtract.apply(3, 5), -2);
  }

  #[test]
  fn inverse_flips() {
    assert_eq!(Operation::Add.inverse(), Operation::Subtract);
    assert_eq!(Operation::Subtract.inverse(), Operation::Add);
    assert_eq!(Operation::Add.inverse().inverse(), Operation::Add);
  }

  #[test]
  fn symbols_use_true_minus_sign() {
    assert_eq!(Operation::Add.symbol(), "+");
    assert_eq!(Operation::Subtract.symbol(), "−");
    assert_ne!(Operation::Subtract.symbol(), "-");
    assert_eq!(Operation::Subtract.to_string(), "\u{2212}");
  }

  #[test]
  fn exactly_two_variants() {
    let all: Vec<_> = Operation::iter().collect();
    assert_eq!(all, vec![Operation::Add, Operation::Subtract]);
  }

  #[test]
  fn discriminant_roundtrip() {
    assert_eq!(Operation::Add.as_ref(), "add");
    assert_eq!(Operation::Subtract.as_ref(), "subtract");
    for op in Operation::iter() {
      assert_eq!(Operation::from_discriminant(op.as_ref()).unwrap(), op);
    }
    assert!(matches!(
      Operation::from_discriminant("multiply"),
      Err(Error::UnknownOperation(_))
    ));
  }

  #[test]
  fn symbol_parsing_accepts_hyphen() {
    assert_eq!(Operation::from_symbol("+").unwrap(), Operation::Add);
    assert_eq!(Operation::from_symbol("−").unwrap(), Operation::Subtract);
    assert_eq!(Operation::from_symbol("-").unwrap(), Operation::Subtract);
    assert!(Operation::from_symbol("×").is_err());
  }
}
