//! Fact types — the unit a learner practices.
//!
//! A fact is an arithmetic identity `a OP b`. Its identity is the triple
//! `(operand_a, operand_b, operation)`; tags are descriptive labels and never
//! take part in equality or hashing. `6 + 8` and `8 + 6` are distinct facts.

use std::{
  collections::BTreeSet,
  fmt,
  hash::{Hash, Hasher},
  str::FromStr,
};

use serde::{Deserialize, Serialize};
use strum::AsRefStr;

use crate::{Error, Result, operation::Operation};

// ─── Identity ────────────────────────────────────────────────────────────────

/// The identity projection of a [`Fact`].
///
/// Formats as the fact's unique key (`"5+3"`, `"12−5"`) and parses back from
/// it. Parsing also accepts an ASCII hyphen and surrounding whitespace, so
/// `"12 - 5"` names the same fact as `"12−5"`.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FactKey {
  pub operand_a: u8,
  pub operand_b: u8,
  pub operation: Operation,
}

impl FactKey {
  pub fn new(operand_a: u8, operand_b: u8, operation: Operation) -> Self {
    Self { operand_a, operand_b, operation }
  }
}

impl fmt::Display for FactKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}{}", self.operand_a, self.operation.symbol(), self.operand_b)
  }
}

impl FromStr for FactKey {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let invalid = || Error::InvalidKey(s.to_owned());
    let trimmed = s.trim();

    // Whitespace is allowed around the operator, not inside an operand.
    let split = trimmed
      .find(|c: char| !c.is_ascii_digit() && !c.is_whitespace())
      .ok_or_else(invalid)?;
    let (a_str, rest) = trimmed.split_at(split);
    let op_len = rest.chars().next().map(char::len_utf8).ok_or_else(invalid)?;
    let (op_str, b_str) = rest.split_at(op_len);
    let (a_str, b_str) = (a_str.trim_end(), b_str.trim_start());

    let operation = Operation::from_symbol(op_str).map_err(|_| invalid())?;
    let operand_a = parse_operand(a_str).ok_or_else(invalid)?;
    let operand_b = parse_operand(b_str).ok_or_else(invalid)?;

    Ok(Self { operand_a, operand_b, operation })
  }
}

fn parse_operand(s: &str) -> Option<u8> {
  if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  s.parse().ok()
}

// ─── Tags ────────────────────────────────────────────────────────────────────

/// The mental technique a fact exercises. The `AsRefStr` form is the tag
/// string stored on the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr)]
pub enum Strategy {
  #[strum(serialize = "doubles")]
  Doubles,
  #[strum(serialize = "nearDouble")]
  NearDouble,
  #[strum(serialize = "make10")]
  Make10,
  #[strum(serialize = "bridge10")]
  Bridge10,
  #[strum(serialize = "zeroOneTwo")]
  ZeroOneTwo,
  #[strum(serialize = "teen")]
  Teen,
  #[strum(serialize = "decompose")]
  Decompose,
  #[strum(serialize = "countBack")]
  CountBack,
  #[strum(serialize = "teenDiff")]
  TeenDiff,
  #[strum(serialize = "commutative")]
  Commutative,
  #[strum(serialize = "mixed")]
  Mixed,
}

/// A pedagogical difficulty tier, 1 (easiest) to 6 (hardest). Rendered as a
/// `band{n}` tag.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Band(pub(crate) u8);

impl Band {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 6;

  pub fn new(n: u8) -> Option<Self> {
    (Self::MIN..=Self::MAX).contains(&n).then_some(Self(n))
  }

  pub fn number(self) -> u8 { self.0 }

  pub fn tag(self) -> String { format!("band{}", self.0) }

  pub fn from_tag(tag: &str) -> Option<Self> {
    tag.strip_prefix("band")?.parse().ok().and_then(Self::new)
  }

  pub fn all() -> impl Iterator<Item = Self> {
    (Self::MIN..=Self::MAX).map(Self)
  }
}

// ─── Fact ────────────────────────────────────────────────────────────────────

/// One arithmetic fact.
///
/// Operands are expected in `[0, 20]`, subtraction facts to satisfy
/// `operand_a >= operand_b`, and addition facts to sum to at most 20. The
/// generator guarantees this by construction; the type does not check it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
  pub operand_a: u8,
  pub operand_b: u8,
  pub operation: Operation,
  pub tags:      BTreeSet<String>,
}

impl Fact {
  /// An untagged fact.
  pub fn new(operand_a: u8, operand_b: u8, operation: Operation) -> Self {
    Self { operand_a, operand_b, operation, tags: BTreeSet::new() }
  }

  pub fn with_tags<I, T>(mut self, tags: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    self.tags.extend(tags.into_iter().map(Into::into));
    self
  }

  /// Attach a strategy tag and a band tag.
  pub fn tagged(self, strategy: Strategy, band: Band) -> Self {
    self.with_tags([strategy.as_ref().to_owned(), band.tag()])
  }

  pub fn key(&self) -> FactKey {
    FactKey::new(self.operand_a, self.operand_b, self.operation)
  }

  pub fn answer(&self) -> i32 {
    self.operation.apply(self.operand_a, self.operand_b)
  }

  /// `"5 + 3"`, `"10 − 3"`.
  pub fn display_string(&self) -> String { self.to_string() }

  /// `"5+3"`, `"10−3"`. Uses the same symbol as the display string so an
  /// addition and a subtraction over the same operands never share a key.
  pub fn unique_key(&self) -> String { self.key().to_string() }

  pub fn has_tag(&self, tag: &str) -> bool { self.tags.contains(tag) }

  pub fn has_strategy(&self, strategy: Strategy) -> bool {
    self.has_tag(strategy.as_ref())
  }

  /// The lowest band among the fact's tags, if any.
  pub fn band(&self) -> Option<Band> {
    self.tags.iter().filter_map(|t| Band::from_tag(t)).min()
  }
}

impl From<FactKey> for Fact {
  fn from(key: FactKey) -> Self {
    Self::new(key.operand_a, key.operand_b, key.operation)
  }
}

impl fmt::Display for Fact {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{} {} {}",
      self.operand_a,
      self.operation.symbol(),
      self.operand_b
    )
  }
}

impl PartialEq for Fact {
  fn eq(&self, other: &Self) -> bool { self.key() == other.key() }
}

impl Eq for Fact {}

impl Hash for Fact {
  fn hash<H: Hasher>(&self, state: &mut H) { self.key().hash(state) }
}
