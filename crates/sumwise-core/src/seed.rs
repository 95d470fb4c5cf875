//! The starter-fact generator.
//!
//! Produces the curated set of [`STARTER_FACT_COUNT`] facts a new
//! installation is seeded with: fixed strategy groups (doubles, make-10,
//! bridge-10, ...) followed by a filler sweep of mixed additions and
//! subtractions, deduplicated by fact identity and shuffled.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};

use crate::{
  Error, Result,
  fact::{Band, Fact, Strategy},
  operation::Operation,
};

/// Number of facts every call to [`starter_facts`] returns.
pub const STARTER_FACT_COUNT: usize = 100;

/// Largest sum an addition fact may have.
const MAX_SUM: u8 = 20;

// ─── Fixed groups ────────────────────────────────────────────────────────────

struct FixedGroup {
  strategy:  Strategy,
  band:      Band,
  operation: Operation,
  pairs:     &'static [(u8, u8)],
}

const FIXED_GROUPS: &[FixedGroup] = &[
  FixedGroup {
    strategy:  Strategy::Bridge10,
    band:      Band(4),
    operation: Operation::Add,
    pairs:     &[
      (8, 7), (9, 6), (7, 6), (9, 5), (6, 8),
      (5, 9), (11, 9), (12, 8), (13, 7), (14, 6),
    ],
  },
  FixedGroup {
    strategy:  Strategy::ZeroOneTwo,
    band:      Band(3),
    operation: Operation::Add,
    pairs:     &[(0, 7), (7, 0), (10, 1), (10, 2)],
  },
  FixedGroup {
    strategy:  Strategy::ZeroOneTwo,
    band:      Band(3),
    operation: Operation::Subtract,
    pairs:     &[(12, 2), (11, 1), (10, 2), (9, 1)],
  },
  FixedGroup {
    strategy:  Strategy::Teen,
    band:      Band(5),
    operation: Operation::Add,
    pairs:     &[(11, 9), (12, 8), (13, 7), (14, 6), (15, 5)],
  },
  FixedGroup {
    strategy:  Strategy::Decompose,
    band:      Band(6),
    operation: Operation::Subtract,
    pairs:     &[(13, 5), (14, 6), (15, 7), (16, 8), (17, 9)],
  },
  FixedGroup {
    strategy:  Strategy::CountBack,
    band:      Band(6),
    operation: Operation::Subtract,
    pairs:     &[(10, 7), (12, 3), (11, 2), (9, 4), (8, 5)],
  },
  FixedGroup {
    strategy:  Strategy::TeenDiff,
    band:      Band(6),
    operation: Operation::Subtract,
    pairs:     &[
      (20, 9), (19, 8), (18, 7), (17, 6), (16, 5),
      (15, 4), (14, 3), (13, 2), (12, 1), (20, 0),
    ],
  },
  FixedGroup {
    strategy:  Strategy::Commutative,
    band:      Band(4),
    operation: Operation::Add,
    pairs:     &[(6, 8), (8, 6), (7, 9), (9, 7), (4, 6), (6, 4)],
  },
];

// ─── Filler sweep ────────────────────────────────────────────────────────────

const FILLER_START: (u8, u8) = (3, 2);
const FILLER_A_MIN: u8 = 2;
const FILLER_A_MAX: u8 = 20;
const FILLER_B_MIN: u8 = 2;
const FILLER_B_MAX: u8 = 10;

/// Distinct `(a, b)` counter states. After this many iterations every state
/// has been visited and no further iteration can add a fact.
const FILLER_CYCLE: usize = (FILLER_A_MAX - FILLER_A_MIN + 1) as usize
  * (FILLER_B_MAX - FILLER_B_MIN + 1) as usize;

// ─── Generation ──────────────────────────────────────────────────────────────

/// Generate the starter facts in a uniformly shuffled order.
pub fn starter_facts() -> Result<Vec<Fact>> {
  starter_facts_with_rng(&mut rand::thread_rng())
}

/// [`starter_facts`] with a caller-supplied random source.
///
/// The output order is a pure function of `rng`.
pub fn starter_facts_with_rng<R: Rng + ?Sized>(rng: &mut R) -> Result<Vec<Fact>> {
  let mut facts: Vec<Fact> =
    collect_facts(STARTER_FACT_COUNT)?.into_iter().collect();
  // HashSet iteration order varies per process.
  facts.sort_by_key(Fact::key);
  facts.shuffle(rng);
  Ok(facts)
}

/// Build the identity set up to `target` facts.
fn collect_facts(target: usize) -> Result<HashSet<Fact>> {
  let mut facts = HashSet::with_capacity(target);

  for n in 1..=10 {
    facts.insert(
      Fact::new(n, n, Operation::Add).tagged(Strategy::Doubles, Band(1)),
    );
  }
  for n in 1..=9 {
    facts.insert(
      Fact::new(n, n + 1, Operation::Add).tagged(Strategy::NearDouble, Band(1)),
    );
  }
  for x in 1..=9 {
    facts.insert(
      Fact::new(x, 10 - x, Operation::Add).tagged(Strategy::Make10, Band(2)),
    );
  }
  for group in FIXED_GROUPS {
    for &(a, b) in group.pairs {
      facts.insert(
        Fact::new(a, b, group.operation).tagged(group.strategy, group.band),
      );
    }
  }
  let fixed = facts.len();

  let (mut a, mut b) = FILLER_START;
  let mut iterations = 0;
  while facts.len() < target {
    if iterations == FILLER_CYCLE {
      return Err(Error::Generation { collected: facts.len(), iterations });
    }
    iterations += 1;

    if a + b <= MAX_SUM {
      insert_below(
        &mut facts,
        target,
        Fact::new(a, b, Operation::Add).tagged(Strategy::Mixed, Band(5)),
      );
    }
    if a >= b {
      insert_below(
        &mut facts,
        target,
        Fact::new(a, b, Operation::Subtract).tagged(Strategy::Mixed, Band(6)),
      );
    }

    a += 1;
    if a > FILLER_A_MAX {
      a = FILLER_A_MIN;
      b += 1;
      if b > FILLER_B_MAX {
        b = FILLER_B_MIN;
      }
    }
  }

  tracing::debug!(
    fixed,
    filler = facts.len() - fixed,
    iterations,
    "collected starter facts"
  );
  Ok(facts)
}

/// Insert unless the set is already full, so an iteration that could add two
/// facts never overshoots the target.
fn insert_below(facts: &mut HashSet<Fact>, target: usize, fact: Fact) {
  if facts.len() < target {
    facts.insert(fact);
  }
}
