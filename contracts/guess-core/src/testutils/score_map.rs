use std::collections::BTreeMap;
use std::vec::Vec as StdVec;

use soroban_sdk::{BytesN, Env, Vec};

use crate::ledger::{key_bit, leaf_hash, node_hash, ScoreWitness, LEDGER_DEPTH};

/// Full copy of the score ledger, kept off-chain to build witnesses.
/// Absent keys hold score 0.
#[derive(Clone, Debug, Default)]
pub struct ScoreMap {
    scores: BTreeMap<[u8; 32], u64>,
}

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &BytesN<32>) -> u64 {
        self.scores.get(&key.to_array()).copied().unwrap_or(0)
    }

    pub fn set(&mut self, key: &BytesN<32>, score: u64) {
        if score == 0 {
            self.scores.remove(&key.to_array());
        } else {
            self.scores.insert(key.to_array(), score);
        }
    }

    pub fn root(&self, env: &Env) -> BytesN<32> {
        let zeros = zero_hashes(env);
        let entries: StdVec<_> = self.scores.iter().map(|(k, v)| (*k, *v)).collect();
        subtree(env, &zeros, &entries, LEDGER_DEPTH)
    }

    pub fn witness(&self, env: &Env, key: &BytesN<32>) -> ScoreWitness {
        let zeros = zero_hashes(env);
        let target = key.to_array();
        let mut siblings = Vec::new(env);
        for level in 0..LEDGER_DEPTH {
            // Keys that share the path above `level` but branch the other way at it.
            let branch: StdVec<_> = self
                .scores
                .iter()
                .filter(|(k, _)| {
                    key_bit(k, level) != key_bit(&target, level)
                        && (level + 1..LEDGER_DEPTH).all(|l| key_bit(k, l) == key_bit(&target, l))
                })
                .map(|(k, v)| (*k, *v))
                .collect();
            siblings.push_back(subtree(env, &zeros, &branch, level));
        }
        ScoreWitness {
            key: key.clone(),
            siblings,
        }
    }
}

/// `zeros[h]` is the root of an all-zero subtree of height `h`.
fn zero_hashes(env: &Env) -> StdVec<BytesN<32>> {
    let mut zeros = StdVec::with_capacity(LEDGER_DEPTH as usize + 1);
    zeros.push(leaf_hash(env, 0));
    for h in 0..LEDGER_DEPTH as usize {
        let next = node_hash(env, &zeros[h], &zeros[h]);
        zeros.push(next);
    }
    zeros
}

fn subtree(env: &Env, zeros: &[BytesN<32>], entries: &[([u8; 32], u64)], height: u32) -> BytesN<32> {
    if entries.is_empty() {
        return zeros[height as usize].clone();
    }
    if height == 0 {
        return leaf_hash(env, entries[0].1);
    }
    let (right, left): (StdVec<_>, StdVec<_>) = entries
        .iter()
        .copied()
        .partition(|(k, _)| key_bit(k, height - 1));
    node_hash(
        env,
        &subtree(env, zeros, &left, height - 1),
        &subtree(env, zeros, &right, height - 1),
    )
}
