//! # Proof Results
//!
//! A verified proof carries the raw slot values as `abi.encode(bytes[])`,
//! positionally aligned with the bundle.

use crate::domain::CodecError;
use alloy_primitives::Bytes as SolBytes;
use alloy_sol_types::SolValue;
use shared_types::Bytes;

/// `abi.encode(bytes[] results)`.
pub fn encode_results(results: &[Bytes]) -> Bytes {
    results
        .iter()
        .cloned()
        .map(SolBytes::from)
        .collect::<Vec<_>>()
        .abi_encode()
}

/// Decode a proof into its raw results.
///
/// Only the canonical encoding is accepted: truncated tails, missing padding
/// and trailing bytes are all [`CodecError::MalformedProof`].
pub fn decode_results(proof: &[u8]) -> Result<Vec<Bytes>, CodecError> {
    let results: Vec<Bytes> = Vec::<SolBytes>::abi_decode(proof, true)
        .map_err(|e| CodecError::MalformedProof(e.to_string()))?
        .into_iter()
        .map(|result| result.to_vec())
        .collect();

    if encode_results(&results) != proof {
        return Err(CodecError::MalformedProof(
            "not the canonical bytes[] encoding".to_string(),
        ));
    }
    Ok(results)
}

/// Decode a proof and require exactly `expected` results.
pub fn decode_results_exact(proof: &[u8], expected: usize) -> Result<Vec<Bytes>, CodecError> {
    let results = decode_results(proof)?;
    if results.len() != expected {
        return Err(CodecError::ResultCountMismatch {
            expected,
            got: results.len(),
        });
    }
    Ok(results)
}
