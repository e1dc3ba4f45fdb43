//! Off-chain collaborators used by tests and clients: the attested prover and
//! a reference score map that produces ledger witnesses.

mod prover;
mod score_map;

pub use prover::{AttestedProver, HideProof};
pub use score_map::ScoreMap;
