#![no_std]

//! # Guess Game
//!
//! A two-party number-guessing game. A hider commits to a number in `[0, 100)`
//! without revealing it; a guesser proposes numbers and learns only whether
//! the hidden value is less than, equal to or greater than each guess. Scores
//! live in an authenticated map of which only the root is stored here.
//!
//! ## Round flow
//! 1. `hide` (or `hide_with_proof`) publishes `commitment = keccak256("GGC1"
//!    || value || salt)` and grants 5 guesses.
//! 2. `guess` records a number for the single guesser of the round.
//! 3. Either:
//!    - `check_value` accepts a comparison proof for the pending guess and
//!      records its clue; loop back to 2; or
//!    - `reveal` opens the commitment against the pending guess and settles
//!      immediately (+1 on a hit).
//! 4. `update_score` settles once the clue is EQUALS or no guesses remain,
//!    applying +1 or +0 to the guesser's score through a ledger witness.
//!
//! There is exactly one round at a time. Every transition reads round state
//! through [`state::Field`] and fails with `StaleState` rather than overwrite
//! a slot that moved underneath it.

use guess_core::circuit::{self, CheckOutput, CircuitError, Clue, ComparisonProof};
use guess_core::commitment::{self, Opening, MAX_GUESSES};
use guess_core::ledger::{self, LedgerError, ScoreWitness};
use soroban_sdk::{
    contract, contractclient, contracterror, contractevent, contractimpl, contracttype, Address,
    Bytes, BytesN, Env,
};

mod state;

use state::{Field, Round, StateKey};

// ═══════════════════════════════════════════════════════════════════════════════
//  Contract Events
// ═══════════════════════════════════════════════════════════════════════════════

#[contractevent]
pub struct EvNumberHidden {
    pub hider: Address,
    pub commitment: BytesN<32>,
}

#[contractevent]
pub struct EvNumberGuessed {
    pub guesser: Address,
    pub number: u32,
    pub guesses_remaining: u32,
}

#[contractevent]
pub struct EvClueRecorded {
    pub guessed_number: u32,
    pub clue: u32, // 1 = LESS, 2 = EQUALS, 3 = GREATER
}

#[contractevent]
pub struct EvNumberRevealed {
    pub value: u32,
    pub guessed_number: u32,
    pub won: bool,
}

#[contractevent]
pub struct EvScoreUpdated {
    pub player: BytesN<32>,
    pub delta: u64,
    pub score_root: BytesN<32>,
}

#[contractevent]
pub struct EvRoundCleared {
    pub commitment: BytesN<32>,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  External trait interfaces
// ═══════════════════════════════════════════════════════════════════════════════

/// Verifier side of the proving collaborator.
///
/// `public_inputs` is the circuit encoding from `guess_core::circuit`
/// (CHECK: 48 bytes, RANGE: 44 bytes). A forged proof may abort the call
/// instead of returning `false`, so this contract only uses `try_verify`.
#[contractclient(name = "CheckVerifierClient")]
pub trait CheckVerifier {
    fn verify(env: Env, public_inputs: Bytes, proof: Bytes) -> bool;
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Errors
// ═══════════════════════════════════════════════════════════════════════════════

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum GuessGameError {
    AlreadyHidden = 1,
    ValueOutOfRange = 2,
    AlreadyGuessed = 3,
    NoGuessesLeft = 4,
    WrongGuesser = 5,
    CommitmentMismatch = 6,
    NoActiveGuess = 7,
    ProofInvalid = 8,
    StaleProof = 9,
    NotSettleable = 10,
    WitnessMismatch = 11,
    NoActiveRound = 12,
    SelfGuessNotAllowed = 13,
    ZeroCommitment = 14,
    StaleState = 15,
    ScoreOverflow = 16,
    AdminNotSet = 17,
    VerifierNotSet = 18,
}

impl From<CircuitError> for GuessGameError {
    fn from(e: CircuitError) -> Self {
        match e {
            CircuitError::ValueOutOfRange => GuessGameError::ValueOutOfRange,
            CircuitError::AmbiguousOrdering => GuessGameError::ProofInvalid,
        }
    }
}

impl From<LedgerError> for GuessGameError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::WitnessMismatch | LedgerError::MalformedWitness => {
                GuessGameError::WitnessMismatch
            }
            LedgerError::ScoreOverflow => GuessGameError::ScoreOverflow,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Data Types
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only snapshot of the round for clients.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundView {
    pub hidden_commitment: BytesN<32>,
    pub guessed_number: Option<u32>,
    pub guesser: Option<BytesN<32>>,
    pub hider: Option<BytesN<32>>,
    pub guesses_remaining: u32,
    pub last_clue: Clue,
}

#[contracttype]
#[derive(Clone)]
enum StorageKey {
    Admin,
    VerifierAddress,
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Constants
// ═══════════════════════════════════════════════════════════════════════════════

// Ledger rate is approximately 5 seconds per ledger on Stellar
const LEDGER_RATE_SECS: u32 = 5;

// TTL expressed in human-readable time units (30 days)
const TTL_SECONDS: u32 = 30 * 24 * 60 * 60;

/// Instance TTL in ledgers: 30 * 24 * 60 * 60 / 5 = 518,400 ledgers
const INSTANCE_TTL_LEDGERS: u32 = TTL_SECONDS / LEDGER_RATE_SECS;

// ═══════════════════════════════════════════════════════════════════════════════
//  Contract
// ═══════════════════════════════════════════════════════════════════════════════

#[contract]
pub struct GuessGameContract;

#[contractimpl]
impl GuessGameContract {
    // ───────────────────────────────────────────────────────────────────────────
    //  Public: Constructor
    // ───────────────────────────────────────────────────────────────────────────

    pub fn __constructor(env: Env, admin: Address, verifier: Address) {
        env.storage()
            .instance()
            .set(&StorageKey::Admin, &admin);
        env.storage()
            .instance()
            .set(&StorageKey::VerifierAddress, &verifier);
        env.storage()
            .instance()
            .set(&StateKey::ScoreRoot, &ledger::empty_root(&env));
        env.storage()
            .instance()
            .set(&StateKey::HiddenCommitment, &commitment::empty(&env));
        env.storage()
            .instance()
            .set(&StateKey::GuessesRemaining, &0u32);
        env.storage()
            .instance()
            .set(&StateKey::LastClue, &Clue::Unset);
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Public: Round lifecycle
    // ───────────────────────────────────────────────────────────────────────────

    /// Open a round by committing to `value`. The value and salt travel in
    /// the clear as invocation arguments; `hide_with_proof` keeps them
    /// private.
    pub fn hide(env: Env, hider: Address, value: u32, salt: BytesN<32>) -> Result<(), GuessGameError> {
        hider.require_auth();

        let round = Round::load(&env);
        if round.is_active() {
            return Err(GuessGameError::AlreadyHidden);
        }

        let commitment = circuit::range(&env, &Opening::new(value, salt))?;
        Self::start_round(&env, &round, &hider, &commitment)
    }

    /// Open a round from a commitment plus a RANGE proof that it hides a
    /// value below 100.
    pub fn hide_with_proof(
        env: Env,
        hider: Address,
        commitment: BytesN<32>,
        proof: Bytes,
    ) -> Result<(), GuessGameError> {
        hider.require_auth();

        let round = Round::load(&env);
        if round.is_active() {
            return Err(GuessGameError::AlreadyHidden);
        }
        if commitment::is_empty(&commitment) {
            return Err(GuessGameError::ZeroCommitment);
        }

        let public_inputs = circuit::encode_range_inputs(&env, &commitment);
        Self::call_verifier(&env, &public_inputs, &proof)?;
        Self::start_round(&env, &round, &hider, &commitment)
    }

    pub fn guess(env: Env, guesser: Address, number: u32) -> Result<(), GuessGameError> {
        guesser.require_auth();

        let round = Round::load(&env);
        if !round.is_active() {
            return Err(GuessGameError::NoActiveRound);
        }

        let id = ledger::player_id(&env, &guesser);
        if round.hider.get().as_ref() == Some(&id) {
            return Err(GuessGameError::SelfGuessNotAllowed);
        }
        if round.guessed_number.get().is_some() {
            return Err(GuessGameError::AlreadyGuessed);
        }
        // A round already won takes no further guesses.
        let remaining = round.remaining();
        if remaining == 0 || round.clue() == Clue::Equals {
            return Err(GuessGameError::NoGuessesLeft);
        }
        if let Some(current) = round.guesser.get() {
            if current != id {
                return Err(GuessGameError::WrongGuesser);
            }
        }

        let remaining = remaining - 1;
        round.guessed_number.set(&env, &number)?;
        round.guesser.set(&env, &id)?;
        round.guesses_remaining.set(&env, &remaining)?;
        Self::bump_instance(&env);

        EvNumberGuessed {
            guesser,
            number,
            guesses_remaining: remaining,
        }
        .publish(&env);
        Ok(())
    }

    /// Record the clue for the pending guess from a comparison proof.
    ///
    /// The proof must verify and its public fields must match live state:
    /// `public_input.guessed_number` is the pending guess and
    /// `public_output.hidden_value_hash` is the round commitment.
    pub fn check_value(env: Env, proof: ComparisonProof) -> Result<(), GuessGameError> {
        let round = Round::load(&env);
        let guessed = round
            .guessed_number
            .get()
            .ok_or(GuessGameError::NoActiveGuess)?;

        let public_inputs =
            circuit::encode_check_inputs(&env, &proof.public_input, &proof.public_output);
        Self::call_verifier(&env, &public_inputs, &proof.proof)?;

        let CheckOutput {
            clue,
            hidden_value_hash,
        } = proof.public_output;
        if proof.public_input.guessed_number != guessed || hidden_value_hash != round.commitment(&env) {
            return Err(GuessGameError::StaleProof);
        }

        round.last_clue.set(&env, &clue)?;
        round.guessed_number.clear(&env)?;
        Self::bump_instance(&env);

        EvClueRecorded {
            guessed_number: guessed,
            clue: clue.code(),
        }
        .publish(&env);
        Ok(())
    }

    /// Open the commitment against the pending guess and settle the round:
    /// +1 to the guesser on a hit, +0 otherwise.
    pub fn reveal(
        env: Env,
        opening: Opening,
        score: u64,
        witness: ScoreWitness,
    ) -> Result<(), GuessGameError> {
        let round = Round::load(&env);
        if !round.is_active() {
            return Err(GuessGameError::NoActiveRound);
        }
        let guessed = round
            .guessed_number
            .get()
            .ok_or(GuessGameError::NoActiveGuess)?;

        let hidden = round.commitment(&env);
        if !commitment::open(&env, &hidden, opening.value, &opening.salt) {
            return Err(GuessGameError::CommitmentMismatch);
        }

        let won = opening.value == guessed;
        EvNumberRevealed {
            value: opening.value,
            guessed_number: guessed,
            won,
        }
        .publish(&env);

        Self::settle(&env, &round, score, &witness, won as u64)
    }

    /// Settle a round whose clue is EQUALS or whose guesses are used up.
    pub fn update_score(env: Env, score: u64, witness: ScoreWitness) -> Result<(), GuessGameError> {
        let round = Round::load(&env);
        if !round.is_active() {
            return Err(GuessGameError::NoActiveRound);
        }

        let won = round.clue() == Clue::Equals;
        if round.guessed_number.get().is_some() || !(won || round.remaining() == 0) {
            return Err(GuessGameError::NotSettleable);
        }

        Self::settle(&env, &round, score, &witness, won as u64)
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Public: Reads
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_round(env: Env) -> RoundView {
        let round = Round::load(&env);
        RoundView {
            hidden_commitment: round.commitment(&env),
            guessed_number: round.guessed_number.get(),
            guesser: round.guesser.get(),
            hider: round.hider.get(),
            guesses_remaining: round.remaining(),
            last_clue: round.clue(),
        }
    }

    pub fn get_score_root(env: Env) -> BytesN<32> {
        Self::score_root(&env)
            .get()
            .unwrap_or_else(|| ledger::empty_root(&env))
    }

    // ───────────────────────────────────────────────────────────────────────────
    //  Public: Admin
    // ───────────────────────────────────────────────────────────────────────────

    pub fn get_admin(env: Env) -> Result<Address, GuessGameError> {
        Self::load_admin(&env)
    }

    pub fn set_admin(env: Env, new_admin: Address) -> Result<(), GuessGameError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        env.storage()
            .instance()
            .set(&StorageKey::Admin, &new_admin);
        Self::bump_instance(&env);
        Ok(())
    }

    pub fn get_verifier(env: Env) -> Result<Address, GuessGameError> {
        Self::load_verifier(&env)
    }

    pub fn set_verifier(env: Env, new_verifier: Address) -> Result<(), GuessGameError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        env.storage()
            .instance()
            .set(&StorageKey::VerifierAddress, &new_verifier);
        Self::bump_instance(&env);
        Ok(())
    }

    pub fn upgrade(env: Env, new_wasm_hash: BytesN<32>) -> Result<(), GuessGameError> {
        let admin = Self::load_admin(&env)?;
        admin.require_auth();
        env.deployer().update_current_contract_wasm(new_wasm_hash);
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    //  Internal: Transitions
    // ═══════════════════════════════════════════════════════════════════════════

    fn start_round(
        env: &Env,
        round: &Round,
        hider: &Address,
        commitment: &BytesN<32>,
    ) -> Result<(), GuessGameError> {
        let hider_id = ledger::player_id(env, hider);
        round.start(env, commitment, &hider_id, MAX_GUESSES)?;
        Self::bump_instance(env);

        EvNumberHidden {
            hider: hider.clone(),
            commitment: commitment.clone(),
        }
        .publish(env);
        Ok(())
    }

    /// Apply `delta` to the current guesser's score and clear the round.
    fn settle(
        env: &Env,
        round: &Round,
        score: u64,
        witness: &ScoreWitness,
        delta: u64,
    ) -> Result<(), GuessGameError> {
        let guesser = round.guesser.get().ok_or(GuessGameError::NotSettleable)?;

        let root_field = Self::score_root(env);
        let root = root_field
            .get()
            .unwrap_or_else(|| ledger::empty_root(env));
        let new_root = ledger::apply_delta(env, &root, score, witness, delta)?;
        // The witness must authenticate against the root before its key is trusted.
        if witness.key != guesser {
            return Err(GuessGameError::WrongGuesser);
        }
        root_field.set(env, &new_root)?;

        let cleared = round.commitment(env);
        round.clear(env)?;
        Self::bump_instance(env);

        EvScoreUpdated {
            player: guesser,
            delta,
            score_root: new_root,
        }
        .publish(env);
        EvRoundCleared {
            commitment: cleared,
        }
        .publish(env);
        Ok(())
    }

    fn call_verifier(env: &Env, public_inputs: &Bytes, proof: &Bytes) -> Result<(), GuessGameError> {
        let verifier_addr = Self::load_verifier(env)?;
        let verifier = CheckVerifierClient::new(env, &verifier_addr);
        match verifier.try_verify(public_inputs, proof) {
            Ok(Ok(true)) => Ok(()),
            _ => Err(GuessGameError::ProofInvalid),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    //  Internal: Storage
    // ═══════════════════════════════════════════════════════════════════════════

    fn score_root(env: &Env) -> Field<BytesN<32>> {
        Field::read(env, StateKey::ScoreRoot)
    }

    fn bump_instance(env: &Env) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_TTL_LEDGERS, INSTANCE_TTL_LEDGERS);
    }

    fn load_admin(env: &Env) -> Result<Address, GuessGameError> {
        env.storage()
            .instance()
            .get(&StorageKey::Admin)
            .ok_or(GuessGameError::AdminNotSet)
    }

    fn load_verifier(env: &Env) -> Result<Address, GuessGameError> {
        env.storage()
            .instance()
            .get(&StorageKey::VerifierAddress)
            .ok_or(GuessGameError::VerifierNotSet)
    }
}
