//! # Rescaling
//!
//! Reads proven storage words and normalises token amounts to 18 decimals.

use primitive_types::U256;

use crate::domain::ConsumerError;

/// Largest supported token precision.
pub const MAX_DECIMALS: u64 = 18;

/// Read a result as a big-endian unsigned integer of at most 32 bytes.
pub fn result_to_uint(result: &[u8]) -> Result<U256, ConsumerError> {
    if result.len() > 32 {
        return Err(ConsumerError::InvalidResult(format!(
            "{} bytes do not fit a uint256",
            result.len()
        )));
    }
    Ok(U256::from_big_endian(result))
}

/// `raw * 10^(18 - decimals)`.
pub fn rescale(raw: U256, decimals: U256) -> Result<U256, ConsumerError> {
    if decimals > U256::from(MAX_DECIMALS) {
        return Err(ConsumerError::InvalidDecimals(decimals));
    }
    let factor = U256::exp10((MAX_DECIMALS - decimals.as_u64()) as usize);
    raw.checked_mul(factor).ok_or(ConsumerError::Overflow)
}

/// Ownership flag of an NFT `balanceOf` word: any non-zero byte.
pub fn is_owned(result: &[u8]) -> bool {
    result.iter().any(|b| *b != 0)
}
