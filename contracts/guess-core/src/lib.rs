#![no_std]

//! # Guess Core
//!
//! Shared primitives for the hidden-number guessing game:
//!
//! - [`commitment`]: binds a hider to a value in `[0, 100)` without revealing it.
//! - [`circuit`]: the comparison and range circuits whose public outputs are
//!   attested by the proving collaborator, plus their public-input encoding.
//! - [`ledger`]: a depth-256 sparse Merkle map from player id to score, updated
//!   through path witnesses against a single published root.
//!
//! Everything here is a pure function of its inputs and the host's keccak256,
//! so both the game contract and the verifier contract link the same code.
//!
//! ## Hash domains
//! ```text
//! commitment = keccak256("GGC1" || value_u32_be || salt)
//! player_id  = keccak256("GGP1" || address_strkey)
//! leaf       = keccak256("GGL1" || score_u64_be)
//! node       = keccak256("GGN1" || left || right)
//! ```

#[cfg(any(test, feature = "testutils"))]
extern crate std;

pub mod circuit;
pub mod commitment;
pub mod ledger;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use circuit::{CheckInput, CheckOutput, CircuitError, Clue, ComparisonProof};
pub use commitment::{Opening, MAX_GUESSES, VALUE_BOUND};
pub use ledger::{LedgerError, ScoreWitness, LEDGER_DEPTH};
