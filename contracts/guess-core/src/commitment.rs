//! Commit-reveal binding for the hidden number.
//!
//! `commitment = keccak256("GGC1" || value_u32_be || salt)`. The all-zero
//! value is reserved as the "no round" sentinel and is never accepted as a
//! commitment.

use soroban_sdk::{contracttype, Bytes, BytesN, Env};

/// Domain separator for commitments: ASCII "GGC1".
pub const COMMIT_TAG: [u8; 4] = *b"GGC1";

/// Hidden values live in `[0, VALUE_BOUND)`.
pub const VALUE_BOUND: u32 = 100;

/// Guesses granted per round.
pub const MAX_GUESSES: u32 = 5;

const COMMIT_PREIMAGE_LEN: usize = 4 + 4 + 32;

/// The hider's private opening of a commitment.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Opening {
    pub value: u32,
    pub salt: BytesN<32>,
}

impl Opening {
    pub fn new(value: u32, salt: BytesN<32>) -> Self {
        Self { value, salt }
    }

    pub fn commitment(&self, env: &Env) -> BytesN<32> {
        commit(env, self.value, &self.salt)
    }

    pub fn in_range(&self) -> bool {
        self.value < VALUE_BOUND
    }
}

/// Hash `(value, salt)` into a public commitment.
pub fn commit(env: &Env, value: u32, salt: &BytesN<32>) -> BytesN<32> {
    let mut pre = [0u8; COMMIT_PREIMAGE_LEN];
    pre[..4].copy_from_slice(&COMMIT_TAG);
    pre[4..8].copy_from_slice(&value.to_be_bytes());
    pre[8..].copy_from_slice(&salt.to_array());
    env.crypto().keccak256(&Bytes::from_array(env, &pre)).into()
}

/// Recompute the commitment for a claimed opening and compare it with
/// `commitment` without early exit.
pub fn open(env: &Env, commitment: &BytesN<32>, value: u32, salt: &BytesN<32>) -> bool {
    let computed = commit(env, value, salt);
    ct_eq(&computed.to_array(), &commitment.to_array())
}

/// The EMPTY sentinel.
pub fn empty(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0u8; 32])
}

pub fn is_empty(commitment: &BytesN<32>) -> bool {
    commitment.to_array() == [0u8; 32]
}

fn ct_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    let mut diff = 0u8;
    for i in 0..32 {
        diff |= a[i] ^ b[i];
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salt(env: &Env, fill: u8) -> BytesN<32> {
        BytesN::from_array(env, &[fill; 32])
    }

    #[test]
    fn commit_is_deterministic() {
        let env = Env::default();
        let s = salt(&env, 0x5A);
        assert_eq!(commit(&env, 42, &s), commit(&env, 42, &s));
    }

    #[test]
    fn commit_matches_documented_preimage() {
        let env = Env::default();
        let s = salt(&env, 0x11);
        let mut pre = Bytes::from_array(&env, b"GGC1");
        pre.append(&Bytes::from_array(&env, &7u32.to_be_bytes()));
        pre.append(&Bytes::from_array(&env, &[0x11; 32]));
        let expected: BytesN<32> = env.crypto().keccak256(&pre).into();
        assert_eq!(commit(&env, 7, &s), expected);
    }

    #[test]
    fn open_accepts_every_honest_opening() {
        let env = Env::default();
        env.cost_estimate().budget().reset_unlimited();
        let s = salt(&env, 0xC3);
        for value in 0..VALUE_BOUND {
            let c = commit(&env, value, &s);
            assert!(open(&env, &c, value, &s));
        }
    }

    #[test]
    fn open_rejects_wrong_value_or_salt() {
        let env = Env::default();
        let s = salt(&env, 0x01);
        let c = commit(&env, 9, &s);
        assert!(!open(&env, &c, 10, &s));
        assert!(!open(&env, &c, 9, &salt(&env, 0x02)));
    }

    #[test]
    fn commitment_never_hits_empty_sentinel() {
        let env = Env::default();
        let s = salt(&env, 0x00);
        let c = commit(&env, 0, &s);
        assert!(!is_empty(&c));
        assert!(is_empty(&empty(&env)));
    }

    #[test]
    fn opening_range() {
        let env = Env::default();
        assert!(Opening::new(99, salt(&env, 1)).in_range());
        assert!(!Opening::new(100, salt(&env, 1)).in_range());
    }
}
