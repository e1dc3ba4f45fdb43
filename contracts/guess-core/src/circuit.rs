//! Comparison and range circuits.
//!
//! A circuit runs off-chain on the hider's private [`Opening`]; only its
//! public input/output encoding reaches the chain, attested by the proving
//! collaborator and checked by the verifier contract.
//!
//! ## Public-input layouts
//! ```text
//! CHECK: "GGX1" || circuit_id(4) || guessed(4) || clue(4) || hidden_value_hash(32)   = 48 bytes
//! RANGE: "GGX1" || circuit_id(4) || bound(4)   || commitment(32)                     = 44 bytes
//! ```
//! All integers are big-endian u32.

use soroban_sdk::{contracterror, contracttype, Bytes, BytesN, Env};

use crate::commitment::{self, Opening, VALUE_BOUND};

/// Domain separator for circuit public inputs: ASCII "GGX1".
pub const PUBLIC_INPUT_TAG: [u8; 4] = *b"GGX1";

pub const CIRCUIT_CHECK: u32 = 1;
pub const CIRCUIT_RANGE: u32 = 2;

pub const CHECK_INPUTS_LEN: u32 = 48;
pub const RANGE_INPUTS_LEN: u32 = 44;

/// Three-way ordering of the hidden value against a guess.
///
/// `Unset` only ever appears in round state before the first check of a
/// round; a circuit never outputs it.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Clue {
    Unset = 0,
    Less = 1,
    Equals = 2,
    Greater = 3,
}

impl Clue {
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            0 => Some(Clue::Unset),
            1 => Some(Clue::Less),
            2 => Some(Clue::Equals),
            3 => Some(Clue::Greater),
            _ => None,
        }
    }

    pub fn code(self) -> u32 {
        self as u32
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckInput {
    pub guessed_number: u32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CheckOutput {
    pub clue: Clue,
    pub hidden_value_hash: BytesN<32>,
}

/// A comparison result together with the collaborator's proof over it.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ComparisonProof {
    pub public_input: CheckInput,
    pub public_output: CheckOutput,
    pub proof: Bytes,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CircuitError {
    ValueOutOfRange = 1,
    /// The ordering predicates were not mutually exclusive.
    AmbiguousOrdering = 2,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum InputsError {
    WrongLength = 1,
    UnknownTag = 2,
    UnknownCircuit = 3,
    InvalidClue = 4,
    ZeroHash = 5,
    WrongBound = 6,
}

/// Decoded public inputs of either circuit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PublicInputs {
    Check {
        input: CheckInput,
        output: CheckOutput,
    },
    Range {
        bound: u32,
        commitment: BytesN<32>,
    },
}

impl PublicInputs {
    pub fn circuit_id(&self) -> u32 {
        match self {
            PublicInputs::Check { .. } => CIRCUIT_CHECK,
            PublicInputs::Range { .. } => CIRCUIT_RANGE,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Circuits
// ═══════════════════════════════════════════════════════════════════════════════

/// Select the clue from the three ordering predicates. Exactly one must hold.
pub fn select_clue(hidden_less: bool, hidden_equal: bool, hidden_greater: bool) -> Result<Clue, CircuitError> {
    match (hidden_less, hidden_equal, hidden_greater) {
        (true, false, false) => Ok(Clue::Less),
        (false, true, false) => Ok(Clue::Equals),
        (false, false, true) => Ok(Clue::Greater),
        _ => Err(CircuitError::AmbiguousOrdering),
    }
}

/// Comparison circuit: order the hidden value against the public guess and
/// re-derive the commitment the clue is bound to.
pub fn check(env: &Env, input: &CheckInput, opening: &Opening) -> Result<CheckOutput, CircuitError> {
    let guessed = input.guessed_number;
    let clue = select_clue(
        opening.value < guessed,
        opening.value == guessed,
        opening.value > guessed,
    )?;

    Ok(CheckOutput {
        clue,
        hidden_value_hash: opening.commitment(env),
    })
}

/// Range circuit: prove the opening's value is below [`VALUE_BOUND`] and
/// output its commitment.
pub fn range(env: &Env, opening: &Opening) -> Result<BytesN<32>, CircuitError> {
    if !opening.in_range() {
        return Err(CircuitError::ValueOutOfRange);
    }
    Ok(opening.commitment(env))
}

// ═══════════════════════════════════════════════════════════════════════════════
//  Public-input encoding
// ═══════════════════════════════════════════════════════════════════════════════

pub fn encode_check_inputs(env: &Env, input: &CheckInput, output: &CheckOutput) -> Bytes {
    let mut buf = [0u8; CHECK_INPUTS_LEN as usize];
    buf[..4].copy_from_slice(&PUBLIC_INPUT_TAG);
    buf[4..8].copy_from_slice(&CIRCUIT_CHECK.to_be_bytes());
    buf[8..12].copy_from_slice(&input.guessed_number.to_be_bytes());
    buf[12..16].copy_from_slice(&output.clue.code().to_be_bytes());
    buf[16..].copy_from_slice(&output.hidden_value_hash.to_array());
    Bytes::from_array(env, &buf)
}

pub fn encode_range_inputs(env: &Env, commitment: &BytesN<32>) -> Bytes {
    let mut buf = [0u8; RANGE_INPUTS_LEN as usize];
    buf[..4].copy_from_slice(&PUBLIC_INPUT_TAG);
    buf[4..8].copy_from_slice(&CIRCUIT_RANGE.to_be_bytes());
    buf[8..12].copy_from_slice(&VALUE_BOUND.to_be_bytes());
    buf[12..].copy_from_slice(&commitment.to_array());
    Bytes::from_array(env, &buf)
}

/// Parse and validate an encoded public-input blob.
pub fn decode_public_inputs(env: &Env, inputs: &Bytes) -> Result<PublicInputs, InputsError> {
    if inputs.len() < 8 {
        return Err(InputsError::WrongLength);
    }
    let mut tag = [0u8; 4];
    inputs.slice(0..4).copy_into_slice(&mut tag);
    if tag != PUBLIC_INPUT_TAG {
        return Err(InputsError::UnknownTag);
    }

    match read_u32(inputs, 4) {
        CIRCUIT_CHECK => {
            if inputs.len() != CHECK_INPUTS_LEN {
                return Err(InputsError::WrongLength);
            }
            let clue = match Clue::from_u32(read_u32(inputs, 12)) {
                Some(Clue::Unset) | None => return Err(InputsError::InvalidClue),
                Some(clue) => clue,
            };
            let hidden_value_hash = read_bytes32(env, inputs, 16);
            if commitment::is_empty(&hidden_value_hash) {
                return Err(InputsError::ZeroHash);
            }
            Ok(PublicInputs::Check {
                input: CheckInput {
                    guessed_number: read_u32(inputs, 8),
                },
                output: CheckOutput {
                    clue,
                    hidden_value_hash,
                },
            })
        }
        CIRCUIT_RANGE => {
            if inputs.len() != RANGE_INPUTS_LEN {
                return Err(InputsError::WrongLength);
            }
            let bound = read_u32(inputs, 8);
            if bound != VALUE_BOUND {
                return Err(InputsError::WrongBound);
            }
            let commitment = read_bytes32(env, inputs, 12);
            if commitment::is_empty(&commitment) {
                return Err(InputsError::ZeroHash);
            }
            Ok(PublicInputs::Range { bound, commitment })
        }
        _ => Err(InputsError::UnknownCircuit),
    }
}

fn read_u32(data: &Bytes, offset: u32) -> u32 {
    let mut word = [0u8; 4];
    data.slice(offset..offset + 4).copy_into_slice(&mut word);
    u32::from_be_bytes(word)
}

fn read_bytes32(env: &Env, data: &Bytes, offset: u32) -> BytesN<32> {
    let mut arr = [0u8; 32];
    data.slice(offset..offset + 32).copy_into_slice(&mut arr);
    BytesN::from_array(env, &arr)
}
