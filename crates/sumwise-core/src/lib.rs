//! Core types and trait definitions for Sumwise, an arithmetic-fact practice
//! store.
//!
//! This crate is deliberately free of database and CLI dependencies. It owns
//! the fact model, the starter-fact generator, the storage traits, and the
//! first-run seeding flow that ties them together.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod fact;
pub mod operation;
pub mod record;
pub mod seed;
pub mod seeding;
pub mod store;

pub use error::{Error, Result};
