#![no_std]

//! # Check Verifier (attested execution)
//!
//! On-chain side of the proving collaborator for the guessing game. The prover
//! runs a circuit on the hider's private opening inside an attested
//! environment and signs the circuit's public input/output encoding with an
//! ed25519 key. This contract holds the matching public key and checks the
//! signature.
//!
//! | Circuit | Id | Public inputs | Proves |
//! |---------|----|---------------|--------|
//! | CHECK   | 1  | 48 bytes      | `clue` orders the value committed in `hidden_value_hash` against `guessed` |
//! | RANGE   | 2  | 44 bytes      | the value committed in `commitment` is below 100 |
//!
//! ## Public inputs layout
//! ```text
//! CHECK: "GGX1" || 1 (u32) || guessed (u32) || clue (u32) || hidden_value_hash (32)
//! RANGE: "GGX1" || 2 (u32) || bound (u32)   || commitment (32)
//! ```
//!
//! **Proof:** the 64-byte ed25519 signature over the public inputs.
//!
//! ## Verification steps
//! 1. Proof is exactly 64 bytes.
//! 2. Public inputs decode as a known circuit (length, tag, clue and bound
//!    checked, hash non-zero).
//! 3. `ed25519_verify(prover_key, public_inputs, proof)`.
//!
//! Steps 1 and 2 return `false` with an `EvVerifyFailed` diagnostic. Step 3
//! aborts the invocation on a bad signature, so callers use `try_verify` and
//! treat an error the same as `false`.

use guess_core::circuit::{self, InputsError};
use soroban_sdk::{contract, contracterror, contractevent, contractimpl, contracttype, Address, Bytes, BytesN, Env};

// ═══════════════════════════════════════════════════════════════════════════════
//  Error codes
// ═══════════════════════════════════════════════════════════════════════════════

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CheckVerifyError {
    ProofWrongLength = 1,
    InputsWrongLength = 2,
    UnknownTag = 3,
    UnknownCircuit = 4,
    InvalidClue = 5,
    ZeroHash = 6,
    WrongBound = 7,
    ProverKeyNotSet = 8,
    AdminNotSet = 9,
}

impl From<InputsError> for CheckVerifyError {
    fn from(e: InputsError) -> Self {
        match e {
            InputsError::WrongLength => CheckVerifyError::InputsWrongLength,
            InputsError::UnknownTag => CheckVerifyError::UnknownTag,
            InputsError::UnknownCircuit => CheckVerifyError::UnknownCircuit,
            InputsError::InvalidClue => CheckVerifyError::InvalidClue,
            InputsError::ZeroHash => CheckVerifyError::ZeroHash,
            InputsError::WrongBound => CheckVerifyError::WrongBound,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Events
// ═══════════════════════════════════════════════════════════════════════════════

#[contractevent]
pub struct EvVerifyFailed {
    pub reason: u32,
}

#[contractevent]
pub struct EvVerifySuccess {
    pub circuit: u32, // 1 = CHECK, 2 = RANGE
}

#[contracttype]
#[derive(Clone)]
enum StorageKey {
    Admin,
    ProverKey,
}

/// ed25519 signature length.
const SIGNATURE_LEN: u32 = 64;

const LEDGER_RATE_SECS: u32 = 5;
const TTL_SECONDS: u32 = 30 * 24 * 60 * 60;
const INSTANCE_TTL_LEDGERS: u32 = TTL_SECONDS / LEDGER_RATE_SECS;

// ═══════════════════════════════════════════════════════════════════════════════
//  Contract
// ═══════════════════════════════════════════════════════════════════════════════

#[contract]
pub struct CheckVerifier;

#[contractimpl]
impl CheckVerifier {
    pub fn __constructor(env: Env, admin: Address, prover_key: BytesN<32>) {
        env.storage().instance().set(&StorageKey::Admin, &admin);
        env.storage().instance().set(&StorageKey::ProverKey, &prover_key);
    }

    /// Verify an attestation over CHECK or RANGE public inputs.
    ///
    /// Returns `true` if the proof is valid, `false` for malformed input.
    /// A well-formed but forged signature aborts the call.
    pub fn verify(env: Env, public_inputs: Bytes, proof: Bytes) -> bool {
        if proof.len() != SIGNATURE_LEN {
            return Self::reject(&env, CheckVerifyError::ProofWrongLength);
        }

        let decoded = match circuit::decode_public_inputs(&env, &public_inputs) {
            Ok(decoded) => decoded,
            Err(e) => return Self::reject(&env, e.into()),
        };

        let prover_key = match Self::load_prover_key(&env) {
            Ok(key) => key,
            Err(e) => return Self::reject(&env, e),
        };

        let signature: BytesN<64> = match proof.try_into() {
            Ok(sig) => sig,
            Err(_) => return Self::reject(&env, CheckVerifyError::ProofWrongLength),
        };
        env.crypto()
            .ed25519_verify(&prover_key, &public_inputs, &signature);

        EvVerifySuccess {
            circuit: decoded.circuit_id(),
        }
        .publish(&env);
        true
    }

    pub fn get_prover_key(env: Env) -> Result<BytesN<32>, CheckVerifyError> {
        Self::load_prover_key(&env)
    }

    pub fn set_prover_key(env: Env, prover_key: BytesN<32>) -> Result<(), CheckVerifyError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        env.storage()
            .instance()
            .set(&StorageKey::ProverKey, &prover_key);
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_LEDGERS, INSTANCE_TTL_LEDGERS);
        Ok(())
    }

    pub fn get_admin(env: Env) -> Result<Address, CheckVerifyError> {
        Self::load_admin(&env)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), CheckVerifyError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        env.storage()
            .instance()
            .set(&StorageKey::Admin, &new_admin);
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_LEDGERS, INSTANCE_TTL_LEDGERS);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    //  Internal
    // ═══════════════════════════════════════════════════════════════════════════

    fn reject(env: &Env, reason: CheckVerifyError) -> bool {
        EvVerifyFailed {
            reason: reason as u32,
        }
        .publish(env);
        false
    }

    fn load_admin(env: &Env) -> Result<Address, CheckVerifyError> {
        env.storage()
            .instance()
            .get(&StorageKey::Admin)
            .ok_or(CheckVerifyError::AdminNotSet)
    }

    fn load_prover_key(env: &Env) -> Result<BytesN<32>, CheckVerifyError> {
        env.storage()
            .instance()
            .get(&StorageKey::ProverKey)
            .ok_or(CheckVerifyError::ProverKeyNotSet)
    }
}
