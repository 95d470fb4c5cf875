//! Subcommand implementations over a [`FactStore`].

use std::collections::BTreeSet;

use anyhow::{Context as _, bail};
use clap::Subcommand;
use sumwise_core::{
  fact::{Band, FactKey},
  operation::Operation,
  record::{NewAttempt, PracticeMode},
  store::{FactQuery, FactStore},
};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Seed the starter facts if this store has never been seeded.
  Seed,

  /// List facts, optionally filtered.
  List {
    /// `add` or `subtract`.
    #[arg(long)]
    op:    Option<Operation>,
    /// Require this tag; repeatable.
    #[arg(long = "tag", value_name = "TAG")]
    tags:  Vec<String>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=6))]
    band:  Option<u8>,
    #[arg(long)]
    limit: Option<usize>,
  },

  /// Print the number of stored facts and attempts.
  Count,

  /// Record one answer attempt.
  Attempt {
    /// Fact key such as `6+8` or `12-5`.
    key:     FactKey,
    /// Seconds taken to answer.
    #[arg(long)]
    seconds: f64,
    /// The answer was wrong.
    #[arg(long)]
    wrong:   bool,
    #[arg(long, default_value = "practice")]
    mode:    PracticeMode,
  },

  /// Show every attempt at a fact, oldest first.
  History { key: FactKey },

  /// Replace a fact's tags.
  Tag {
    key:  FactKey,
    #[arg(required = true)]
    tags: Vec<String>,
  },

  /// Delete a fact and all of its attempts.
  Delete { key: FactKey },
}

pub async fn run<S>(store: &S, command: Command) -> anyhow::Result<()>
where
  S: FactStore,
{
  match command {
    // Seeding already ran before dispatch.
    Command::Seed => {
      let facts = store.count_facts().await.context("counting facts")?;
      println!("{facts} facts loaded");
    }

    Command::List { op, tags, band, limit } => {
      let query = FactQuery {
        operation: op,
        tags,
        band: band.and_then(Band::new),
        limit,
        ..Default::default()
      };
      let facts = store.query_facts(&query).await.context("querying facts")?;
      for fact in &facts {
        let tags: Vec<&str> = fact.tags.iter().map(String::as_str).collect();
        println!(
          "{:<10} = {:>2}   {}",
          fact.display_string(),
          fact.answer(),
          tags.join(", ")
        );
      }
      println!("{} facts", facts.len());
    }

    Command::Count => {
      let facts = store.count_facts().await.context("counting facts")?;
      let records = store.count_records().await.context("counting records")?;
      println!("{facts} facts, {records} attempts");
    }

    Command::Attempt { key, seconds, wrong, mode } => {
      let attempt = NewAttempt::new(key, seconds, !wrong).in_mode(mode);
      let record = store
        .record_attempt(attempt)
        .await
        .with_context(|| format!("recording attempt at {key}"))?;
      tracing::debug!(record_id = %record.record_id, "recorded attempt");
      println!(
        "{key}: {} in {:.2}s ({})",
        if record.is_correct { "correct" } else { "wrong" },
        record.response_time,
        record.mode.as_ref()
      );
    }

    Command::History { key } => {
      if store.get_fact(key).await?.is_none() {
        bail!("no fact {key}");
      }
      let records = store
        .records_for(key)
        .await
        .with_context(|| format!("reading attempts at {key}"))?;
      for r in &records {
        println!(
          "{}  {:>6.2}s  {:<7}  {}",
          r.timestamp.format("%Y-%m-%d %H:%M:%S"),
          r.response_time,
          if r.is_correct { "correct" } else { "wrong" },
          r.mode.as_ref()
        );
      }
      let correct = records.iter().filter(|r| r.is_correct).count();
      println!("{correct}/{} correct", records.len());
    }

    Command::Tag { key, tags } => {
      let tags: BTreeSet<String> = tags.into_iter().collect();
      let fact = store
        .update_tags(key, tags)
        .await
        .with_context(|| format!("updating tags on {key}"))?;
      let tags: Vec<&str> = fact.tags.iter().map(String::as_str).collect();
      println!("{}: {}", fact.display_string(), tags.join(", "));
    }

    Command::Delete { key } => {
      if !store.delete_fact(key).await? {
        bail!("no fact {key}");
      }
      println!("deleted {key}");
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use clap::Parser;

  use super::*;

  #[derive(Parser, Debug)]
  struct Harness {
    #[command(subcommand)]
    command: Command,
  }

  fn parse(args: &[&str]) -> Command {
    Harness::try_parse_from(std::iter::once("sumwise").chain(args.iter().copied()))
      .unwrap()
      .command
  }

  #[test]
  fn attempt_parses_key_and_mode() {
    match parse(&["attempt", "12-5", "--seconds", "2.5", "--mode", "timed"]) {
      Command::Attempt { key, seconds, wrong, mode } => {
        assert_eq!(key, FactKey::new(12, 5, Operation::Subtract));
        assert_eq!(seconds, 2.5);
        assert!(!wrong);
        assert_eq!(mode, PracticeMode::Timed);
      }
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn list_parses_filters() {
    match parse(&["list", "--op", "add", "--tag", "doubles", "--band", "1"]) {
      Command::List { op, tags, band, limit } => {
        assert_eq!(op, Some(Operation::Add));
        assert_eq!(tags, vec!["doubles".to_owned()]);
        assert_eq!(band, Some(1));
        assert_eq!(limit, None);
      }
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn band_out_of_range_rejected() {
    let result = Harness::try_parse_from(["sumwise", "list", "--band", "7"]);
    assert!(result.is_err());
  }

  #[test]
  fn bad_key_rejected() {
    let result = Harness::try_parse_from(["sumwise", "history", "5*3"]);
    assert!(result.is_err());
  }
}
