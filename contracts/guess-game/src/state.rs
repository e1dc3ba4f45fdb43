//! Round state with explicit read-sets and write-sets.
//!
//! Every round field is read through a [`Field`], which remembers the value
//! it observed. Writing re-reads storage first and fails with `StaleState`
//! if the stored value is no longer the observed one, so a transition can
//! only overwrite what it actually looked at.

use core::fmt::Debug;

use guess_core::circuit::Clue;
use guess_core::commitment;
use soroban_sdk::{contracttype, BytesN, Env, IntoVal, TryFromVal, Val};

use crate::GuessGameError;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StateKey {
    HiddenCommitment,
    GuessedNumber,
    Guesser,
    Hider,
    GuessesRemaining,
    LastClue,
    ScoreRoot,
}

/// One instance-storage slot as observed at the start of a transition.
/// An absent slot is observed as `None`.
pub struct Field<T> {
    key: StateKey,
    observed: Option<T>,
}

impl<T> Field<T>
where
    T: IntoVal<Env, Val> + TryFromVal<Env, Val> + Clone + PartialEq,
    <T as TryFromVal<Env, Val>>::Error: Debug,
{
    pub fn read(env: &Env, key: StateKey) -> Self {
        let observed = env.storage().instance().get(&key);
        Self { key, observed }
    }

    pub fn get(&self) -> Option<T> {
        self.observed.clone()
    }

    pub fn get_or(&self, default: T) -> T {
        self.observed.clone().unwrap_or(default)
    }

    pub fn set(&self, env: &Env, value: &T) -> Result<(), GuessGameError> {
        self.assert_unchanged(env)?;
        env.storage().instance().set(&self.key, value);
        Ok(())
    }

    pub fn clear(&self, env: &Env) -> Result<(), GuessGameError> {
        self.assert_unchanged(env)?;
        env.storage().instance().remove(&self.key);
        Ok(())
    }

    fn assert_unchanged(&self, env: &Env) -> Result<(), GuessGameError> {
        let current: Option<T> = env.storage().instance().get(&self.key);
        if current != self.observed {
            return Err(GuessGameError::StaleState);
        }
        Ok(())
    }
}

/// The single global round.
pub struct Round {
    pub hidden_commitment: Field<BytesN<32>>,
    pub guessed_number: Field<u32>,
    pub guesser: Field<BytesN<32>>,
    pub hider: Field<BytesN<32>>,
    pub guesses_remaining: Field<u32>,
    pub last_clue: Field<Clue>,
}

impl Round {
    pub fn load(env: &Env) -> Self {
        Self {
            hidden_commitment: Field::read(env, StateKey::HiddenCommitment),
            guessed_number: Field::read(env, StateKey::GuessedNumber),
            guesser: Field::read(env, StateKey::Guesser),
            hider: Field::read(env, StateKey::Hider),
            guesses_remaining: Field::read(env, StateKey::GuessesRemaining),
            last_clue: Field::read(env, StateKey::LastClue),
        }
    }

    /// The stored commitment, or the EMPTY sentinel.
    pub fn commitment(&self, env: &Env) -> BytesN<32> {
        self.hidden_commitment.get_or(commitment::empty(env))
    }

    pub fn is_active(&self) -> bool {
        match self.hidden_commitment.get() {
            Some(c) => !commitment::is_empty(&c),
            None => false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.guesses_remaining.get_or(0)
    }

    pub fn clue(&self) -> Clue {
        self.last_clue.get_or(Clue::Unset)
    }

    /// Open a new round. Clears any leftover guess, guesser and clue.
    pub fn start(
        &self,
        env: &Env,
        commitment: &BytesN<32>,
        hider: &BytesN<32>,
        guesses: u32,
    ) -> Result<(), GuessGameError> {
        self.hidden_commitment.set(env, commitment)?;
        self.hider.set(env, hider)?;
        self.guesses_remaining.set(env, &guesses)?;
        self.last_clue.set(env, &Clue::Unset)?;
        self.guessed_number.clear(env)?;
        self.guesser.clear(env)?;
        Ok(())
    }

    /// Reset every field to its empty sentinel.
    pub fn clear(&self, env: &Env) -> Result<(), GuessGameError> {
        self.hidden_commitment.set(env, &commitment::empty(env))?;
        self.guessed_number.clear(env)?;
        self.guesser.clear(env)?;
        self.hider.clear(env)?;
        self.guesses_remaining.set(env, &0)?;
        self.last_clue.set(env, &Clue::Unset)?;
        Ok(())
    }
}
