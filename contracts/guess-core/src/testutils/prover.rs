use ed25519_dalek::{Signer, SigningKey};
use soroban_sdk::{Bytes, BytesN, Env};

use crate::circuit::{self, CheckInput, CircuitError, ComparisonProof};
use crate::commitment::Opening;

/// Commitment plus a RANGE attestation, as consumed by `hide_with_proof`.
#[derive(Clone, Debug)]
pub struct HideProof {
    pub commitment: BytesN<32>,
    pub proof: Bytes,
}

/// Runs a circuit on the private opening and signs its public-input
/// encoding. The verifier contract holds the matching public key.
pub struct AttestedProver {
    key: SigningKey,
}

impl AttestedProver {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn public_key(&self, env: &Env) -> BytesN<32> {
        BytesN::from_array(env, &self.key.verifying_key().to_bytes())
    }

    /// Sign an arbitrary public-input blob. Circuit failures never reach
    /// here; use this directly only to build forged or malformed proofs.
    pub fn attest(&self, env: &Env, public_inputs: &Bytes) -> Bytes {
        let mut msg = std::vec![0u8; public_inputs.len() as usize];
        public_inputs.copy_into_slice(&mut msg);
        let sig = self.key.sign(&msg);
        Bytes::from_array(env, &sig.to_bytes())
    }

    pub fn prove_check(
        &self,
        env: &Env,
        guessed_number: u32,
        opening: &Opening,
    ) -> Result<ComparisonProof, CircuitError> {
        let input = CheckInput { guessed_number };
        let output = circuit::check(env, &input, opening)?;
        let proof = self.attest(env, &circuit::encode_check_inputs(env, &input, &output));
        Ok(ComparisonProof {
            public_input: input,
            public_output: output,
            proof,
        })
    }

    pub fn prove_range(&self, env: &Env, opening: &Opening) -> Result<HideProof, CircuitError> {
        let commitment = circuit::range(env, opening)?;
        let proof = self.attest(env, &circuit::encode_range_inputs(env, &commitment));
        Ok(HideProof { commitment, proof })
    }
}
