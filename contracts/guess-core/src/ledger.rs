//! Authenticated score ledger: a depth-256 sparse Merkle map from player id
//! to score.
//!
//! Only the root is stored on-chain. A caller proves the current score of
//! one key with a [`ScoreWitness`] (the key and its 256 sibling hashes,
//! leaf level first) and the same witness yields the root after the update.
//! A witness is valid for exactly one root; once any entry changes it must
//! be rebuilt.
//!
//! ```text
//! leaf(score)        = keccak256("GGL1" || score_u64_be)
//! node(left, right)  = keccak256("GGN1" || left || right)
//! ```
//!
//! Absent keys hold `leaf(0)`, so the empty root is the root of the map in
//! which every player has score 0.

use soroban_sdk::{contracterror, contracttype, Address, Bytes, BytesN, Env, Vec};

/// Domain separator for ledger leaves: ASCII "GGL1".
pub const LEAF_TAG: [u8; 4] = *b"GGL1";

/// Domain separator for ledger inner nodes: ASCII "GGN1".
pub const NODE_TAG: [u8; 4] = *b"GGN1";

/// Domain separator for player identity hashes: ASCII "GGP1".
pub const PLAYER_TAG: [u8; 4] = *b"GGP1";

/// One level per key bit.
pub const LEDGER_DEPTH: u32 = 256;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScoreWitness {
    pub key: BytesN<32>,
    pub siblings: Vec<BytesN<32>>,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum LedgerError {
    WitnessMismatch = 1,
    MalformedWitness = 2,
    ScoreOverflow = 3,
}

/// Identity hash of an account; used as the guesser id and as the ledger key.
pub fn player_id(env: &Env, player: &Address) -> BytesN<32> {
    let mut pre = Bytes::from_array(env, &PLAYER_TAG);
    pre.append(&player.to_string().to_bytes());
    env.crypto().keccak256(&pre).into()
}

pub fn leaf_hash(env: &Env, score: u64) -> BytesN<32> {
    let mut pre = [0u8; 12];
    pre[..4].copy_from_slice(&LEAF_TAG);
    pre[4..].copy_from_slice(&score.to_be_bytes());
    env.crypto().keccak256(&Bytes::from_array(env, &pre)).into()
}

pub fn node_hash(env: &Env, left: &BytesN<32>, right: &BytesN<32>) -> BytesN<32> {
    let mut pre = [0u8; 68];
    pre[..4].copy_from_slice(&NODE_TAG);
    pre[4..36].copy_from_slice(&left.to_array());
    pre[36..].copy_from_slice(&right.to_array());
    env.crypto().keccak256(&Bytes::from_array(env, &pre)).into()
}

/// Bit `level` of `key`; bit 0 is the least-significant bit of the last byte.
/// A set bit means the path node at that level is a right child.
pub fn key_bit(key: &[u8; 32], level: u32) -> bool {
    let byte = key[31 - (level / 8) as usize];
    (byte >> (level % 8)) & 1 == 1
}

/// Root of the map where every key holds score 0.
pub fn empty_root(env: &Env) -> BytesN<32> {
    let mut current = leaf_hash(env, 0);
    for _ in 0..LEDGER_DEPTH {
        current = node_hash(env, &current, &current);
    }
    current
}

/// Fold `leaf(score)` up the witness path.
pub fn root_after(env: &Env, score: u64, witness: &ScoreWitness) -> Result<BytesN<32>, LedgerError> {
    if witness.siblings.len() != LEDGER_DEPTH {
        return Err(LedgerError::MalformedWitness);
    }
    let key = witness.key.to_array();
    let mut current = leaf_hash(env, score);
    for (level, sibling) in witness.siblings.iter().enumerate() {
        current = if key_bit(&key, level as u32) {
            node_hash(env, &sibling, &current)
        } else {
            node_hash(env, &current, &sibling)
        };
    }
    Ok(current)
}

/// Check that `current_score` at `witness.key` is committed by `root`, then
/// return the root with that entry replaced by `new_score`.
pub fn verify_and_compute(
    env: &Env,
    root: &BytesN<32>,
    current_score: u64,
    witness: &ScoreWitness,
    new_score: u64,
) -> Result<BytesN<32>, LedgerError> {
    let claimed = root_after(env, current_score, witness)?;
    if claimed != *root {
        return Err(LedgerError::WitnessMismatch);
    }
    root_after(env, new_score, witness)
}

/// [`verify_and_compute`] with `new_score = current_score + delta`. The
/// witness is checked first, so an unauthenticated claim never reports
/// `ScoreOverflow`.
pub fn apply_delta(
    env: &Env,
    root: &BytesN<32>,
    current_score: u64,
    witness: &ScoreWitness,
    delta: u64,
) -> Result<BytesN<32>, LedgerError> {
    let claimed = root_after(env, current_score, witness)?;
    if claimed != *root {
        return Err(LedgerError::WitnessMismatch);
    }
    let new_score = current_score
        .checked_add(delta)
        .ok_or(LedgerError::ScoreOverflow)?;
    root_after(env, new_score, witness)
}
